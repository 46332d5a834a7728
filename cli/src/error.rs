use metalcloud::ApiError;
use std::path::PathBuf;
use tableformatter::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} {reference} not found")]
    NotFound { kind: &'static str, reference: String },

    #[error("{kind} '{reference}' matches {count} records, use the ID instead")]
    Ambiguous {
        kind: &'static str,
        reference: String,
        count: usize,
    },

    #[error("Operation not confirmed. Aborting")]
    NotConfirmed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read configuration file {}: {message}", path.display())]
    ConfigFile { path: PathBuf, message: String },

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Render error: {0}")]
    Table(#[from] TableError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialoguer error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}: {1}")]
    WithContext(String, Box<CliError>),
}

impl CliError {
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    pub fn validation<M: Into<String>>(message: M) -> Self {
        Self::Validation(message.into())
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Table(err) => err.user_message(),
            Self::Io(err) => format!("I/O operation failed: {err}"),
            Self::Prompt(err) => format!("UI interaction error: {err}"),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

pub trait ResultExt<T, E> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: Into<CliError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let cli_err: CliError = err.into();
            cli_err.with_context(context())
        })
    }
}
