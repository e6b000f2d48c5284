pub type StorygridResult<T> = Result<T, StorygridError>;

#[derive(thiserror::Error, Debug)]
pub enum StorygridError {
    /// Composite image bytes could not be decoded. Propagated to the
    /// caller without retry; fetch retries belong to the HTTP collaborator.
    #[error("load error: {0}")]
    Load(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorygridError {
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }
}
