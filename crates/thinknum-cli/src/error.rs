use thinknum_core::{ClientError, ErrorKind};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Client(error) => match error.kind() {
                ErrorKind::InvalidArgument | ErrorKind::InvalidFilterComposition => 2,
                ErrorKind::AuthenticationFailed => 3,
                ErrorKind::JobSubmissionFailed
                | ErrorKind::JobStatusCheckFailed
                | ErrorKind::Cancelled
                | ErrorKind::Api => 4,
                ErrorKind::QueryTimeout => 5,
                ErrorKind::Transport | ErrorKind::Decode => 10,
            },
            Self::Command(_) => 2,
            Self::Io(_) => 11,
            Self::Serialization(_) => 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let cases = [
            (CliError::from(ClientError::invalid_argument("x")), 2),
            (CliError::from(ClientError::invalid_filter_composition("x")), 2),
            (CliError::from(ClientError::authentication_failed("x")), 3),
            (
                CliError::from(ClientError::Api {
                    status: 500,
                    message: String::from("x"),
                }),
                4,
            ),
            (
                CliError::from(ClientError::QueryTimeout {
                    budget: Duration::from_secs(1),
                    elapsed: Duration::from_secs(2),
                }),
                5,
            ),
            (CliError::from(ClientError::Transport(String::from("x"))), 10),
            (CliError::Io(std::io::Error::other("x")), 11),
            (CliError::Command(String::from("x")), 2),
        ];

        for (error, code) in cases {
            assert_eq!(error.exit_code(), code, "{error}");
        }
    }
}
