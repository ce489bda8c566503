use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Prometheus(#[from] prometheus::Error),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }
}

/// Failure to obtain the record line from the upstream quote source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("no quote record found in response from {url}")]
    NoRecordFound { url: String },
}

impl FetchError {
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    /// Body reads surface the client's timeout as an `io::Error` wrapping the
    /// `reqwest::Error`, with kind `Other`.
    pub fn from_io(url: &str, err: std::io::Error) -> Self {
        let wrapped_timeout = err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout);

        if wrapped_timeout || err.kind() == std::io::ErrorKind::TimedOut {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                reason: format!("failed to read response body: {err}"),
            }
        }
    }
}

/// Rejection of a candidate record line.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("record has {found} fields, expected at least 6")]
    InsufficientFields { found: usize },
    #[error("field `{field}` has invalid value `{raw}`: {reason}")]
    InvalidNumber {
        field: &'static str,
        raw: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn timed_out_io_error_is_a_timeout() {
        let io_err = io::Error::new(io::ErrorKind::TimedOut, "slow");
        let err = FetchError::from_io("http://upstream", io_err);
        assert!(matches!(err, FetchError::Timeout { .. }), "unexpected error: {err:?}");
    }

    #[test]
    fn other_io_error_is_a_transport_error() {
        let io_err = io::Error::new(io::ErrorKind::Other, "reset");
        let err = FetchError::from_io("http://upstream", io_err);
        assert!(
            matches!(err, FetchError::Transport { ref reason, .. } if reason.contains("reset")),
            "unexpected error: {err:?}"
        );
    }
}
