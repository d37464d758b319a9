use super::{Id, Type};
use crate::{Error, Result};

/// A field value as exchanged with the store adapter.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit floating point number
    F64(f64),

    /// A record identifier
    Id(Id),

    /// A list of values
    List(Vec<Value>),

    /// Null value
    #[default]
    Null,

    /// String value
    String(String),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn list_from_vec(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_list(self) -> Result<Vec<Value>> {
        match self {
            Self::List(items) => Ok(items),
            value => Err(Error::type_conversion(value, "List")),
        }
    }

    /// Returns `true` if this value may be stored in a field of type `ty`.
    ///
    /// `Null` is accepted by every type; nullability is a property of the field, not of the
    /// type.
    pub fn is_a(&self, ty: &Type) -> bool {
        match (self, ty) {
            (Self::Null, _) | (_, Type::Any) => true,
            (Self::Bool(_), Type::Bool) => true,
            (Self::I64(_), Type::I64) => true,
            (Self::F64(_), Type::F64) => true,
            (Self::String(_), Type::String) => true,
            (Self::Id(_), Type::Id) => true,
            (Self::List(items), Type::List(item_ty)) => items.iter().all(|item| item.is_a(item_ty)),
            _ => false,
        }
    }

    /// Short name of the value's variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::I64(_) => "I64",
            Self::F64(_) => "F64",
            Self::Id(_) => "Id",
            Self::List(_) => "List",
            Self::Null => "Null",
            Self::String(_) => "String",
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(src: Vec<T>) -> Self {
        Self::List(src.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            value => Err(Error::type_conversion(value, "bool")),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            value => Err(Error::type_conversion(value, "String")),
        }
    }
}
