mod filter;
pub use filter::Filter;

mod id;
pub use id::Id;

mod num;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

use indexmap::IndexMap;

/// Field values keyed by field name, in the order they were requested or written.
pub type Fields = IndexMap<String, Value>;
