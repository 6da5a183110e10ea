//! Public API surface of the runtime.

mod errors;

pub use errors::{RepositoryError, Result, RuntimeError};
