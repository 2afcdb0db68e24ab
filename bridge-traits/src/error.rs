use thiserror::Error;

/// Failures of the adapter layer itself.
///
/// Native calls report failure with null handles, which callers see as
/// `Option`; these variants cover what happens around them.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The host passed a null pointer where a native handle was required.
    #[error("Null {0} handle returned by native library")]
    NullHandle(&'static str),

    /// A log sink could not write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_null_handle_message() {
        let err = BridgeError::NullHandle("session");
        assert_eq!(err.to_string(), "Null session handle returned by native library");
    }

    #[test]
    fn test_io_error_converts() {
        fn write() -> Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stderr closed"))?;
            Ok(())
        }

        let err = write().unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
        assert_eq!(err.to_string(), "IO error: stderr closed");
    }
}
