//! Payment authorization adapters.

mod stub;

pub use stub::StubPreapprovalProvider;
