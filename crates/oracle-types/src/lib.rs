//! Shared data model for the market-fact oracle.
//!
//! Facts, transactions and their filtered views, keys and signatures live
//! here so that every other crate in the workspace speaks the same types.

pub mod account;
pub mod api;
pub mod errors;
pub mod fact;
pub mod serde_helpers;
pub mod transaction;

pub use account::*;
pub use api::*;
pub use errors::*;
pub use fact::*;
pub use transaction::*;
