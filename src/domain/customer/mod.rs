//! Customer domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Customer entity and search predicate
//! - `contact` - Normalized name and email value objects
//! - `ledger` - Counter adjustments applied alongside subscription writes

mod aggregate;
mod contact;
mod ledger;

pub use aggregate::{matches_contact, Customer};
pub use contact::{CustomerName, EmailAddress};
pub use ledger::LedgerChange;
