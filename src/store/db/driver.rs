#[cfg(feature = "pg")]
pub mod pg;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::fmt::Debug;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::error::Result;

#[async_trait]
pub trait DatabaseDriver: Debug + Sync + Send + 'static {
    /// Backend name for log messages and the dashboard footer.
    fn name(&self) -> &'static str;
    fn connection(&self) -> DatabaseConnection;
    async fn configure(&self) -> Result<()>;
    async fn checkpoint(&self) -> Result<()>;
}
