//! In-memory store implementation for testing and development.

mod store;

pub use store::InMemoryStore;
