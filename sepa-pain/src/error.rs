use crate::checksum::ChecksumError;

/// Everything that can go wrong while assembling or serializing a pain
/// document. None of these are recovered internally; they surface to the
/// caller at the point of detection.
#[derive(Debug, thiserror::Error)]
pub enum SepaError {
    /// A child entity bound to a different pain format or payment method
    /// was attached to an aggregate.
    #[error("structural error: {0}")]
    Structural(String),
    /// A field failed a format, length, range, charset or cross-field rule.
    #[error("validation of {field} failed for {value:?}: {message}")]
    Validation {
        field: String,
        value: String,
        message: String,
    },
    /// Unknown or unsupported pain format identifier.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("checksum error: {0}")]
    Checksum(#[from] ChecksumError),
    #[error("xml writer error: {0}")]
    Xml(#[from] xml::writer::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SepaError {
    pub(crate) fn validation(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SepaError::Validation {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

pub type SepaResult<T> = Result<T, SepaError>;
