mod primitive;
pub use primitive::Primitive;

pub use mosaic_core::stmt::{Fields, Filter, Id, Type, Value};
