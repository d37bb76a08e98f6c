use shared::domain::CategoryId;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    ContractViolation,
    Local,
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
    #[error("{endpoint} broke its response contract: {reason}")]
    ContractViolation { endpoint: String, reason: String },
    #[error("category {0} not found")]
    CategoryNotFound(CategoryId),
    #[error("page {requested} is outside 1..={last}")]
    PageOutOfRange { requested: u32, last: u32 },
}

impl ListError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Status { .. } => ErrorKind::Transport,
            Self::ContractViolation { .. } => ErrorKind::ContractViolation,
            Self::CategoryNotFound(_) | Self::PageOutOfRange { .. } => ErrorKind::Local,
        }
    }

    /// True when the failure came back from a remote call.
    pub fn is_remote(&self) -> bool {
        self.kind() != ErrorKind::Local
    }

    pub(crate) fn contract(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}
