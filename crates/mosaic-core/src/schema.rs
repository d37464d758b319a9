mod aggregate;
pub use aggregate::Aggregate;

mod field;
pub use field::Field;

mod model;
pub use model::Model;

mod name;
pub use name::Name;
