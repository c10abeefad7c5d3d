use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MirrorError>;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} error for url: {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty filename")]
    EmptyFilename,

    #[error("File {path} already in database")]
    AlreadyInDatabase { path: String },

    #[error("File {path} not in database")]
    NotInDatabase { path: String },

    #[error("File {member} isn't a file or a directory")]
    MemberNotFound { member: String },

    #[error("Unsupported archive format: {name}")]
    UnsupportedArchive { name: String },

    #[error("Command '{command}' returned non-zero exit status {code}")]
    PostInstallFailed { command: String, code: i32 },

    #[error("'{value}' is not a valid octal integer")]
    InvalidMode { value: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Binary not found: {name}")]
    BinaryNotFound { name: String },
}

impl MirrorError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        MirrorError::ConfigError {
            message: message.into(),
        }
    }
}
