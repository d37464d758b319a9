use super::Value;
use crate::{Error, Result};

macro_rules! impl_int {
    ( $($ty:ty),* ) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::I64(value.into())
                }
            }

            impl From<&$ty> for Value {
                fn from(value: &$ty) -> Self {
                    Self::I64((*value).into())
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self> {
                    match value {
                        Value::I64(v) => <$ty>::try_from(v)
                            .map_err(|_| Error::type_conversion(Value::I64(v), stringify!($ty))),
                        value => Err(Error::type_conversion(value, stringify!($ty))),
                    }
                }
            }
        )*
    };
}

impl_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            // Integers widen losslessly up to 2^53; wider values round.
            Value::I64(v) => Ok(v as f64),
            value => Err(Error::type_conversion(value, "f64")),
        }
    }
}
