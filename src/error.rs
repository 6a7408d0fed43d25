//! Error types for Wally
//!
//! Uses `thiserror` for library errors. Every error aborts the run;
//! the binary maps each kind to a process exit code via [`WallyError::exit_code`].

use thiserror::Error;

/// Result type alias for Wally operations
pub type WallyResult<T> = Result<T, WallyError>;

/// Main error type for Wally operations
#[derive(Error, Debug)]
pub enum WallyError {
    /// Too few positional arguments on the command line
    #[error("you are missing command line arguments: {message}")]
    MissingArguments { message: String },

    /// Input was rejected by hostname resolution
    #[error("'{input}' is not a valid hostname selection")]
    InvalidShorthand { input: String },

    /// A shorthand mapped to a whitelist with no entries
    #[error("the {purpose} hostname whitelist is empty")]
    EmptyWhitelist { purpose: String },

    /// Network switching was required but the platform cannot do it
    #[error("your OS is not supported for connecting to a Wallaby Wi-Fi hotspot")]
    UnsupportedPlatform,

    /// Only Python projects can be deployed
    #[error("language '{language}' is not supported - only Python is supported currently")]
    UnsupportedLanguage { language: String },

    /// A reserved feature that has no working implementation yet
    #[error("{feature} is not implemented")]
    NotImplemented { feature: String },

    /// A remote command exited non-zero; carries the remote error verbatim
    #[error("remote command failed: {command}: {stderr}")]
    RemoteCommandFailed { command: String, stderr: String },

    /// The SSH session could not be established
    #[error("failed to connect to {host}: {message}")]
    ConnectionFailed { host: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parsing error
    #[error("invalid configuration in {path}: {message}")]
    Config { path: String, message: String },

    /// Interactive prompt was aborted or unreadable
    #[error("prompt aborted: {0}")]
    PromptAborted(String),
}

impl WallyError {
    /// Map this error to the process exit code reported by the CLI.
    ///
    /// Code 1: general/argument error
    /// Code 2: unsupported OS for a required network switch
    /// Code 3: feature not implemented (non-Python language, reserved
    ///         network operations)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedPlatform => 2,
            Self::UnsupportedLanguage { .. } | Self::NotImplemented { .. } => 3,
            _ => 1,
        }
    }
}
