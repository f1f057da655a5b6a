//! Event adapters.
//!
//! - `BroadcastEventBus` - production bus behind the live WebSocket feed
//! - `InMemoryEventBus` - recorder for handler tests

mod broadcast;
mod in_memory;

pub use broadcast::{BroadcastEventBus, DEFAULT_CAPACITY};
pub use in_memory::InMemoryEventBus;
