mod aggregate;
pub use aggregate::{AggregateProvider, Provider};

mod model;
pub use model::ModelProvider;
