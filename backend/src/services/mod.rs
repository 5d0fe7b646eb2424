//! Business logic services for the POS Inventory Platform

pub mod alert;
pub mod channels;
pub mod customers;
pub mod ledger;
pub mod product;
pub mod sales;
pub mod stock;
pub mod vendors;

pub use alert::AlertService;
pub use channels::ChannelService;
pub use customers::CustomerService;
pub use ledger::LedgerService;
pub use product::ProductService;
pub use sales::SalesService;
pub use stock::StockService;
pub use vendors::VendorService;
