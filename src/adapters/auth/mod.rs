//! Authentication adapters implementing `SessionValidator`.
//!
//! - `JwksSessionValidator` - verifies provider-signed ID tokens
//! - `MockSessionValidator` - fixed tokens for tests

mod jwks;
mod mock;

pub use jwks::JwksSessionValidator;
pub use mock::MockSessionValidator;
