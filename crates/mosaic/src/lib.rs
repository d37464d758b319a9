mod aggregate;
pub use aggregate::{Aggregate, Aggregator, Context};

mod lazy_list;
pub use lazy_list::{LazyList, ListEvent};

pub mod mapping;
pub use mapping::Mapping;

mod model;
pub use model::Model;

pub mod provider;
pub use provider::{AggregateProvider, ModelProvider, Provider};

mod record;
pub use record::Record;

pub mod registry;
pub use registry::Registry;

pub mod stmt;

pub use mosaic_core::{bail, driver, err, schema, Collection, Database, Error, IntoError, Result};
