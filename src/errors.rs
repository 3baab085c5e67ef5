use crate::path::PathError;

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("not a bookmark file: {0}")]
    Format(String),

    #[error("failed to read upload: {0}")]
    Read(#[from] std::io::Error),

    #[error("upload exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

impl ImportError {
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FolderError {
    #[error("folder not found: {0}")]
    NotFound(String),

    #[error("the root folder cannot be renamed or deleted")]
    Root,

    #[error("folder already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid folder path: {0}")]
    Path(#[from] PathError),
}
