use crate::{
    stmt::{Id, Type, Value},
    Error, Result,
};

use std::fmt;

/// A Rust type that a field value can be loaded into and stored from.
pub trait Primitive: Sized + Clone + PartialEq + fmt::Debug {
    /// The field type values of this primitive have.
    fn ty() -> Type;

    /// Returns `true` if the primitive represents a nullable type (e.g. `Option`).
    fn nullable() -> bool {
        false
    }

    fn load(value: Value) -> Result<Self>;

    fn into_value(self) -> Value;
}

macro_rules! impl_primitive {
    ( $( $ty:ty => $field_ty:expr ),* $(,)? ) => {
        $(
            impl Primitive for $ty {
                fn ty() -> Type {
                    $field_ty
                }

                fn load(value: Value) -> Result<Self> {
                    value.try_into()
                }

                fn into_value(self) -> Value {
                    self.into()
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Type::Bool,
    i32 => Type::I64,
    i64 => Type::I64,
    u32 => Type::I64,
    f64 => Type::F64,
    String => Type::String,
}

impl Primitive for Id {
    fn ty() -> Type {
        Type::Id
    }

    fn load(value: Value) -> Result<Self> {
        value.to_id()
    }

    fn into_value(self) -> Value {
        Value::Id(self)
    }
}

impl Primitive for Value {
    fn ty() -> Type {
        Type::Any
    }

    fn load(value: Value) -> Result<Self> {
        Ok(value)
    }

    fn into_value(self) -> Value {
        self
    }
}

impl<T: Primitive> Primitive for Option<T> {
    fn ty() -> Type {
        T::ty()
    }

    fn nullable() -> bool {
        true
    }

    fn load(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::load(value)?))
        }
    }

    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Null,
        }
    }
}

impl<T: Primitive> Primitive for Vec<T> {
    fn ty() -> Type {
        Type::list(T::ty())
    }

    fn load(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::load).collect(),
            value => Err(Error::type_conversion(value, "List")),
        }
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(Primitive::into_value).collect())
    }
}
