/// Shared error type used across all LeaseAbstract crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// The AI provider rejected or failed a request. `status` is the
    /// upstream HTTP status when one was received.
    #[error("{message}")]
    Provider { status: Option<u16>, message: String },

    #[error("store: {0}")]
    Store(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("{0}")]
    Validation(String),

    #[error("config: {0}")]
    Config(String),

    /// A run reached a terminal state other than `completed`.
    /// Displays as the bare status string (e.g. `expired`).
    #[error("{status}")]
    RunFailed { run_id: String, status: String },

    #[error("run {run_id} did not finish after {polls} polls")]
    RunTimeout { run_id: String, polls: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Upstream HTTP status for provider errors, if any.
    pub fn provider_status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_failed_displays_bare_status() {
        let err = Error::RunFailed {
            run_id: "run_1".into(),
            status: "expired".into(),
        };
        assert_eq!(err.to_string(), "expired");
    }

    #[test]
    fn provider_error_surfaces_message() {
        let err = Error::Provider {
            status: Some(400),
            message: "Invalid file format".into(),
        };
        assert_eq!(err.to_string(), "Invalid file format");
        assert_eq!(err.provider_status(), Some(400));
        assert_eq!(Error::Store("down".into()).provider_status(), None);
    }
}
