//! Asynchronous CSV reader with batch interface
//!
//! Provides batch reading of classified records from a CSV stream for the
//! async strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV stream → AsyncReader → Batches of ClassifiedRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::ClassifiedRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use log::warn;

/// Asynchronous CSV reader
///
/// Rows that cannot be deserialized are logged, counted and skipped, so a
/// batch only ever holds usable records.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            skipped: 0,
        }
    }

    /// Read up to `batch_size` records
    ///
    /// Returns an empty vector once the end of the stream is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<ClassifiedRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => batch.push(convert_csv_record(csv_record)),
                Some(Err(e)) => {
                    warn!("Skipping malformed row: {}", e);
                    self.skipped += 1;
                }
                None => break,
            }
        }

        batch
    }

    /// Number of rows skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawAmount;
    use futures::io::Cursor;

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let csv_content = "id,amount,category\n1,\"10,00\",Mercado\n2,\"20,00\",Lazer\n3,\"30,00\",Saúde\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, 1);
        assert_eq!(batch[0].raw_amount, RawAmount::Text("10,00".to_string()));
        assert_eq!(batch[1].category.as_deref(), Some("Lazer"));

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, 3);

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = AsyncReader::new(Cursor::new("id,amount\n".as_bytes()));

        let batch = async_reader.read_batch(10).await;
        assert_eq!(batch.len(), 0);
    }

    #[tokio::test]
    async fn test_async_reader_skips_malformed_rows() {
        let csv_content = "id,amount\nnot-a-number,\"1,00\"\n2,\"5,00\"\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, 2);
        assert_eq!(async_reader.skipped(), 1);
    }

    #[tokio::test]
    async fn test_async_reader_portuguese_headers() {
        let csv_content = "id,tipo,valor,categoria,empresa,descricao,data\n\
                           5,saida,\"(45,90)\",Lazer,Cinema,Ingresso,2024-03-02\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind_hint.as_deref(), Some("saida"));
        assert_eq!(batch[0].raw_amount, RawAmount::Text("(45,90)".to_string()));
        assert_eq!(batch[0].counterparty.as_deref(), Some("Cinema"));
        assert_eq!(batch[0].raw_date.as_deref(), Some("2024-03-02"));
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_handling() {
        let csv_content = "id,amount,category\n  1  ,  100.0  ,  Mercado  \n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, 1);
        assert_eq!(batch[0].category.as_deref(), Some("Mercado"));
    }
}
