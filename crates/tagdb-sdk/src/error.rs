use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("reload error: {0}")]
    Reload(#[from] tagdb_reload::ReloadError),

    #[error("query error: {0}")]
    Query(#[from] tagdb_query::QueryError),
}

pub type SdkResult<T> = Result<T, SdkError>;
