use super::Error;

/// Error when a model or aggregate name is not registered, or a record of that model is
/// not part of the aggregate it is requested from.
#[derive(Debug)]
pub(super) struct UnknownModel {
    name: Box<str>,
}

impl std::error::Error for UnknownModel {}

impl core::fmt::Display for UnknownModel {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown model `{}`", self.name)
    }
}

impl Error {
    /// Creates an unknown model error.
    pub fn unknown_model(name: &str) -> Error {
        let err = UnknownModel { name: name.into() };
        Error::from(super::ErrorKind::UnknownModel(err))
    }

    /// Returns `true` if this error is an unknown model error.
    pub fn is_unknown_model(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::UnknownModel(_))
    }
}
