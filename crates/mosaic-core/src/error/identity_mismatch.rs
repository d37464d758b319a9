use super::Error;
use crate::stmt::Id;

/// Error when the records composed into an aggregate do not share one identifier.
#[derive(Debug)]
pub(super) struct IdentityMismatch {
    expected: Option<Id>,
    found: Option<Id>,
}

impl std::error::Error for IdentityMismatch {}

impl core::fmt::Display for IdentityMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match (&self.expected, &self.found) {
            (Some(expected), Some(found)) => write!(
                f,
                "identity mismatch: expected records with id {expected}, found {found}"
            ),
            _ => f.write_str("identity mismatch: an aggregate needs at least one record"),
        }
    }
}

impl Error {
    /// Creates an identity mismatch error for two records that were composed together but
    /// carry different identifiers.
    pub fn identity_mismatch(expected: &Id, found: &Id) -> Error {
        Error::from(super::ErrorKind::IdentityMismatch(IdentityMismatch {
            expected: Some(expected.clone()),
            found: Some(found.clone()),
        }))
    }

    /// Creates an identity error for an aggregate constructed without any record.
    pub fn identity_missing() -> Error {
        Error::from(super::ErrorKind::IdentityMismatch(IdentityMismatch {
            expected: None,
            found: None,
        }))
    }

    /// Returns `true` if this error is an identity error.
    pub fn is_identity_mismatch(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::IdentityMismatch(_))
    }
}
