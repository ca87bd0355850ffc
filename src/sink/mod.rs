use async_trait::async_trait;

use crate::error::Result;
use crate::process::Chunk;

pub mod mysql;

pub use mysql::MySqlSink;

/// Insert-only destination for chunks.
#[async_trait]
pub trait TableSink: Send {
    /// Name used in notices.
    fn table_name(&self) -> &str;

    /// Append every record of `chunk` as one unit of work. Returns rows written.
    async fn append(&mut self, chunk: &Chunk) -> Result<u64>;

    /// `SELECT COUNT(*)` on the target.
    async fn count_rows(&mut self) -> Result<u64>;

    /// Release the connection. Default is a no-op.
    async fn close(&mut self) {}
}
