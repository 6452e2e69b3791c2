use log::debug;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error during {} for `{}`: {}", .operation, .target, .message)]
    Remote {
        operation: String,
        target: String,
        message: String,
    },

    #[error("Parameter `{}` already exists, refusing to overwrite it.", .name)]
    AlreadyExists { name: String },

    #[error("Giving up on `{}` after {} attempts: {}", .name, .attempts, .source)]
    Persist {
        name: String,
        attempts: u32,
        source: Box<Error>,
    },

    #[error("Prompt was cancelled.")]
    PromptCancelled,

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Could not start the async runtime: {}", .0)]
    Runtime(std::io::Error),

    #[error("Misc error: {}", .0)]
    Misc(String),
}

impl Error {
    pub fn remote(
        operation: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let err = Self::Remote {
            operation: operation.into(),
            target: target.into(),
            message: message.into(),
        };
        debug!("{err}");
        err
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// Whether a failed write is worth attempting again.
    ///
    /// Only transport/API failures are; a name clash or a cancelled prompt
    /// will fail the same way every time.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}
