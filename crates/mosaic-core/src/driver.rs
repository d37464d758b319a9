pub mod operation;
pub use operation::Operation;

mod response;
pub use response::Response;

use crate::Result;

use std::{fmt::Debug, sync::Arc};

/// Store adapter for one collection.
///
/// Every interaction between a record and its backing store goes through [`exec`]. Calls are
/// synchronous and may block for as long as the underlying store needs; timeouts and
/// cancellation are the adapter's responsibility. Errors returned here reach the caller of
/// the triggering operation unchanged.
///
/// [`exec`]: Collection::exec
pub trait Collection: Debug + Send + Sync + 'static {
    /// Execute a store operation
    fn exec(&self, op: Operation) -> Result<Response>;
}

/// A store holding named collections.
pub trait Database: Debug + Send + Sync + 'static {
    /// Return the adapter for the collection named `name`.
    fn collection(&self, name: &str) -> Result<Arc<dyn Collection>>;
}
