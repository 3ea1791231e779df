//! Error types for deauther-rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the core and protocol crates report
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed frame or address text
    #[error("Malformed input: {0}")]
    Protocol(String),

    /// The attack task died or could not be joined
    #[error("Attack failed: {0}")]
    Attack(String),

    /// Rejected configuration; nothing was started
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("No interface named '{0}'")]
    InterfaceNotFound(String),

    /// Sender setup failed or the radio refused a frame
    #[error("Interface error: {0}")]
    Interface(String),

    #[error("Unknown attack {0}")]
    InvalidAttackId(u8),
}

impl Error {
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        Error::Protocol(msg.into())
    }

    pub fn attack<S: Into<String>>(msg: S) -> Self {
        Error::Attack(msg.into())
    }

    pub fn invalid_parameter<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by bad caller input rather than the environment
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameter { .. } | Error::InvalidAttackId(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = Error::invalid_parameter("targets", "No targets specified");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'targets': No targets specified"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_interface_error_is_not_configuration() {
        let err = Error::Interface("send failed".to_string());
        assert!(!err.is_configuration());
    }
}
