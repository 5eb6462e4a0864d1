use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes reported by the tool.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    /// Bad arguments, missing/invalid config file, invalid port.
    pub const USAGE: i32 = -1;
    pub const INVALID_ADDRESS: i32 = -3;
    pub const CONNECT_FAILED: i32 = -4;
    pub const UNEXPECTED: i32 = -5;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read settings file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "NotFound",
            ConfigError::Io { .. } => "Io",
            ConfigError::Parse { .. } => "Parse",
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid IPv4 address: {0:?}")]
    InvalidAddress(String),

    #[error("connect failed ({kind:?}, os error {code})")]
    ConnectFailed {
        kind: io::ErrorKind,
        code: i32,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ProbeError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ProbeError::InvalidAddress(_) => exit::INVALID_ADDRESS,
            ProbeError::ConnectFailed { .. } => exit::CONNECT_FAILED,
            ProbeError::Unexpected(_) => exit::UNEXPECTED,
        }
    }
}
