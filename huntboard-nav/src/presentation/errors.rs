use thiserror::Error;

/// Errors emitted while reading or writing persisted panel layouts.
#[derive(Debug, Error)]
pub enum LayoutStoreError {
    #[error("layout store IO failed")]
    Io(#[from] std::io::Error),
    #[error("layout store JSON failed")]
    Json(#[from] serde_json::Error),
    #[error("layout store is unavailable")]
    Unavailable,
}
