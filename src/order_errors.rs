//! # Card Error Types Module
//!
//! Error types for the collaborators around the parser: barcode encoding,
//! image rendering, chat "clipboard" delivery, document download and storage.
//! Parsing itself has no error type because it cannot fail.

/// Custom error types for card operations
#[derive(Debug, Clone)]
pub enum CardError {
    /// Payload cannot be expressed in the barcode symbology
    Barcode(String),
    /// Copying a value to the user failed
    Clipboard(String),
    /// Fetching an uploaded text document failed
    Download(String),
    /// Persisting the raw text failed
    Storage(String),
    /// Reading the stored raw text failed
    StorageLoad(String),
    /// Deleting the stored raw text failed
    StorageClear(String),
    /// Image encoding errors
    Render(String),
}

impl std::fmt::Display for CardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardError::Barcode(msg) => write!(f, "Barcode error: {msg}"),
            CardError::Clipboard(msg) => write!(f, "Clipboard error: {msg}"),
            CardError::Download(msg) => write!(f, "Download error: {msg}"),
            CardError::Storage(msg) => write!(f, "Storage error: {msg}"),
            CardError::StorageLoad(msg) => write!(f, "Storage load error: {msg}"),
            CardError::StorageClear(msg) => write!(f, "Storage clear error: {msg}"),
            CardError::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for CardError {}

impl From<anyhow::Error> for CardError {
    fn from(err: anyhow::Error) -> Self {
        CardError::Storage(err.to_string())
    }
}

impl From<image::ImageError> for CardError {
    fn from(err: image::ImageError) -> Self {
        CardError::Render(err.to_string())
    }
}

impl CardError {
    /// Localization key of the one-line notice shown to the user
    pub fn notice_key(&self) -> &'static str {
        match self {
            CardError::Barcode(_) => "error-barcode",
            CardError::Clipboard(_) => "error-clipboard-write",
            CardError::Download(_) => "error-clipboard-read",
            CardError::Storage(_) => "error-storage",
            CardError::StorageLoad(_) => "error-storage-load",
            CardError::StorageClear(_) => "error-storage-clear",
            CardError::Render(_) => "error-render",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CardError::Barcode("non-ASCII character 'ł'".to_string());
        assert_eq!(err.to_string(), "Barcode error: non-ASCII character 'ł'");
    }

    #[test]
    fn test_from_anyhow() {
        let err: CardError = anyhow::anyhow!("connection refused").into();
        assert!(matches!(err, CardError::Storage(_)));
        assert_eq!(err.notice_key(), "error-storage");
    }

    #[test]
    fn test_storage_notice_per_operation() {
        assert_eq!(CardError::Storage(String::new()).notice_key(), "error-storage");
        assert_eq!(CardError::StorageLoad(String::new()).notice_key(), "error-storage-load");
        assert_eq!(CardError::StorageClear(String::new()).notice_key(), "error-storage-clear");
    }
}
