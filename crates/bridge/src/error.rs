use std::error::Error as StdError;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by plugin callbacks and the event loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A plugin refused the event it was handed.
    #[error("invalid bridge input: {message}")]
    InvalidInput { message: String },

    /// The outbound queue is gone, usually because the writer stopped.
    #[error("bridge operation unavailable: {message}")]
    Unavailable { message: String },

    #[error("bridge operation failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    SerdeYaml(#[from] serde_yaml::Error),
}

impl Error {
    #[must_use]
    pub fn invalid_input(message: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
