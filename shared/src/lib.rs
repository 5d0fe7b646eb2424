//! Shared domain logic for the POS Inventory Platform
//!
//! This crate contains the pure, I/O-free pieces of the system: the
//! barcode resolution chain and input validation helpers. Everything
//! here is deterministic and testable without a database.

pub mod barcode;
pub mod validation;

pub use barcode::*;
pub use validation::*;
