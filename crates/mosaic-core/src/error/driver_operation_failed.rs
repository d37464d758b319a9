use super::Error;

/// Error when a store adapter operation fails.
///
/// Adapters wrap the failure of their underlying client (network, file system, embedded
/// database) with [`Error::driver_operation_failed`]. mosaic never retries or re-wraps these
/// errors; they reach the caller of the `get`, `set`, `preload` or `commit` that triggered
/// the store call unchanged.
#[derive(Debug)]
pub(super) struct DriverOperationFailed {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DriverOperationFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for DriverOperationFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a store adapter failure.
    pub fn driver_operation_failed(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::DriverOperationFailed(
            DriverOperationFailed {
                inner: Box::new(err),
            },
        ))
    }

    /// Returns `true` if this error is a store adapter failure.
    pub fn is_driver_operation_failed(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::DriverOperationFailed(_))
    }
}
