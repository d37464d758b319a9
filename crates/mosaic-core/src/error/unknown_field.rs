use super::Error;

/// Error when a field name is not declared by the model or aggregate schema it is looked up
/// in.
#[derive(Debug)]
pub(super) struct UnknownField {
    owner: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UnknownField {}

impl core::fmt::Display for UnknownField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown field `{}.{}`", self.owner, self.field)
    }
}

impl Error {
    /// Creates an unknown field error. `owner` is the model or aggregate name.
    pub fn unknown_field(owner: &str, field: &str) -> Error {
        Error::from(super::ErrorKind::UnknownField(UnknownField {
            owner: owner.into(),
            field: field.into(),
        }))
    }

    /// Returns `true` if this error is an unknown field error.
    pub fn is_unknown_field(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::UnknownField(_))
    }
}
