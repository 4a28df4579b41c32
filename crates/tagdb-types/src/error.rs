use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("failed to parse {input:?} as pointer. expected format: 'kind{{key:val}}'")]
    MalformedPointer { input: String },
}
