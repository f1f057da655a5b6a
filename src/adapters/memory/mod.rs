//! In-memory repository adapters.

mod store;

pub use store::InMemoryStore;
