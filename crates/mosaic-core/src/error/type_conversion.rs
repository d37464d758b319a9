use super::Error;
use crate::stmt::Value;

/// Error when a value cannot be converted to the expected type.
#[derive(Debug)]
pub(super) struct TypeConversion {
    value: Value,
    to_type: &'static str,
}

impl std::error::Error for TypeConversion {}

impl core::fmt::Display for TypeConversion {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot convert {} to {}",
            self.value.kind_name(),
            self.to_type
        )
    }
}

impl Error {
    /// Creates a type conversion error.
    pub fn type_conversion(value: Value, to_type: &'static str) -> Error {
        let err = TypeConversion { value, to_type };
        Error::from(super::ErrorKind::TypeConversion(err))
    }

    /// Returns `true` if this error is a type conversion error.
    pub fn is_type_conversion(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::TypeConversion(_))
    }
}
