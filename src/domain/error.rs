use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Caller-supplied data breaks a post rule; the message is safe to return.
    #[error("{message}")]
    Validation { message: String },
    /// A stored value no longer maps onto a known variant.
    #[error("unrecognized {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unknown_variant(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}
