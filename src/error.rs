use thiserror::Error;

use crate::insight::InsightError;

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    /// Reported by stores that are not backed by a database, e.g. [`MemoryStore`](crate::store::memory::MemoryStore).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("duplicate item id '{0}'")]
    DuplicateItem(String),

    #[error("malformed transaction row '{id}': {reason}")]
    MalformedRow { id: String, reason: String },

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("write-behind worker has stopped")]
    WorkerGone,

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error(transparent)]
    Insight(#[from] InsightError),

    #[error(transparent)]
    Builder(#[from] fieldx::error::FieldXError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shortcut for [`LedgerError::Invalid`] with `format!` arguments.
#[macro_export]
macro_rules! invalid {
    ($($arg:tt)+) => {
        $crate::error::LedgerError::Invalid(format!($($arg)+))
    };
}
