use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogdeskError {
    #[error("Not in a blogdesk project. Run 'blogdesk init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .blogdesk/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Blog not found: {0}")]
    BlogNotFound(String),

    #[error("Ambiguous blog ID '{0}' matches more than one post")]
    AmbiguousId(String),

    #[error("All fields required: {0} is missing")]
    MissingField(&'static str),

    #[error("Unsupported image type '{0}'. JPG/PNG only.")]
    UnsupportedImageType(String),

    #[error("Image is {size} bytes. Max 1MB ({limit} bytes).")]
    ImageTooLarge { size: u64, limit: u64 },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, BlogdeskError>;
