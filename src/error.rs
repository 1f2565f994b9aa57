use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to decode some part of a kernel TCP table.
///
/// The message names the offending field and its raw value. Lower level
/// failures are kept as the `source`, so the whole chain can be reported.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FormatError {
    message: String,
    #[source]
    source: Option<Cause>,
}

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn wrap(message: impl Into<String>, source: impl Into<Cause>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Attaches a message to any error, turning it into a [`FormatError`].
pub(crate) trait WrapFormat<T> {
    fn wrap_format<F>(self, message: F) -> Result<T, FormatError>
    where
        F: FnOnce() -> String;
}

impl<T, E> WrapFormat<T> for Result<T, E>
where
    E: Into<Cause>,
{
    fn wrap_format<F>(self, message: F) -> Result<T, FormatError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| FormatError::wrap(message(), e))
    }
}
