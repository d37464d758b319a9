use super::Value;
use crate::{Error, Result};
use std::fmt;

/// Opaque identifier shared by a record and every aggregate composed from it.
///
/// The canonical representation is a string; integer identifiers are stored in their decimal
/// form, so `Id::from_int(7) == Id::from_string("7")`. There are no implicit conversions:
/// build identifiers with [`Id::from_int`] or [`Id::from_string`] and read them back with
/// [`Id::to_int`] or [`Id::as_str`].
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Id {
    repr: String,
}

impl Id {
    pub fn from_int(id: i64) -> Self {
        Self {
            repr: id.to_string(),
        }
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self { repr: id.into() }
    }

    /// Return an integer representation of the identifier.
    pub fn to_int(&self) -> Result<i64> {
        self.repr
            .parse()
            .map_err(|_| Error::type_conversion(Value::Id(self.clone()), "i64"))
    }

    /// Return the string representation of the identifier.
    pub fn as_str(&self) -> &str {
        &self.repr
    }
}

impl Value {
    pub const fn is_id(&self) -> bool {
        matches!(self, Self::Id(_))
    }

    pub fn to_id(self) -> Result<Id> {
        match self {
            Self::Id(id) => Ok(id),
            value => Err(Error::type_conversion(value, "Id")),
        }
    }
}

impl From<Id> for Value {
    fn from(src: Id) -> Self {
        Self::Id(src)
    }
}

impl From<&Id> for Value {
    fn from(src: &Id) -> Self {
        Self::Id(src.clone())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_tuple("Id").field(&self.repr).finish()
    }
}
