use std::io::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IgcError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Access denied or read-only: {path}")]
    PermissionOrReadOnly { path: String },

    #[error("Write failure on {path}: {reason}")]
    WriteFailure { path: String, reason: String },

    #[error("Drive {drive}: not ready")]
    MediaNotReady { drive: char },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Not same device: {src} -> {dst}")]
    CrossDevice { src: String, dst: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IgcError {
    /// 호스트 I/O 에러를 경로 정보와 함께 분류
    pub fn from_io(err: std::io::Error, path: &str) -> Self {
        let path = path.to_string();
        match err.kind() {
            ErrorKind::NotFound => IgcError::NotFound { path },
            ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => {
                IgcError::PermissionOrReadOnly { path }
            }
            ErrorKind::AlreadyExists => IgcError::AlreadyExists { path },
            ErrorKind::NotADirectory => IgcError::NotADirectory { path },
            ErrorKind::CrossesDevices => IgcError::CrossDevice {
                src: path.clone(),
                dst: path,
            },
            ErrorKind::StorageFull | ErrorKind::WriteZero | ErrorKind::UnexpectedEof => {
                IgcError::WriteFailure {
                    path,
                    reason: err.to_string(),
                }
            }
            _ => IgcError::Io(err),
        }
    }

    /// 같은 드라이브 내 rename이 장치 경계 때문에 실패했는지 여부
    pub fn is_cross_device(&self) -> bool {
        matches!(self, IgcError::CrossDevice { .. })
    }
}

pub type Result<T> = std::result::Result<T, IgcError>;
