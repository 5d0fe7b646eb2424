//! HTTP handlers for the POS Inventory Platform

pub mod barcode;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod vendors;

pub use barcode::*;
pub use customers::*;
pub use health::*;
pub use inventory::*;
pub use orders::*;
pub use products::*;
pub use vendors::*;
