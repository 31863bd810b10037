use std::fmt;

// === StoreError ===

/// Errors returned by remote store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Transport-level failure (connection refused, timeout, DNS).
    Network(String),
    /// The store rejected the credentials or the session expired.
    Auth(String),
    /// The store refused the operation (constraint violation, scoping rejection).
    Rejected(String),
    /// The response body could not be decoded.
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Network(msg) => write!(f, "Store network error: {}", msg),
            StoreError::Auth(msg) => write!(f, "Store auth error: {}", msg),
            StoreError::Rejected(msg) => write!(f, "Store rejected operation: {}", msg),
            StoreError::Decode(msg) => write!(f, "Store response decode error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// === SaveError ===

/// Errors from the add-bookmark workflow.
///
/// Metadata and summary degradation never appear here — both fetchers fall
/// back to substitute values and the save still succeeds.
#[derive(Debug)]
pub enum SaveError {
    /// The submitted URL does not parse as an absolute URL.
    InvalidUrl(String),
    /// The insert call to the remote store failed.
    Store(StoreError),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            SaveError::Store(err) => write!(f, "Save failed: {}", err),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<StoreError> for SaveError {
    fn from(err: StoreError) -> Self {
        SaveError::Store(err)
    }
}
