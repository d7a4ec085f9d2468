//! Service layer providing business-oriented operations on top of the
//! document store.
//! - Separates token and booking/catalog logic from the web framework.
//! - Provides clear error types and documented interfaces.

pub mod booking;
pub mod catalog;
pub mod errors;
pub mod token;
