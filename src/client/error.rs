use thiserror::Error;

/// Every way a client call can fail. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Rejected locally before any request was made.
    #[error("Todo text cannot be empty")]
    EmptyText,
    #[error("Network error. Please try again.")]
    Network,
    #[error("Server is unavailable. Please try again later.")]
    ServerUnavailable,
    #[error("Todo not found. It may have been deleted.")]
    NotFound,
    /// A 400 whose message is shown as the server phrased it.
    #[error("{0}")]
    Rejected(String),
    #[error("Unexpected response from server.")]
    UnexpectedResponse,
    #[error("Something went wrong. Please try again.")]
    Unknown,
}

pub type ApiResult<T> = Result<T, ClientError>;
