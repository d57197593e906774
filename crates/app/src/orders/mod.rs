//! Order back-office

mod service;

pub use service::OrdersService;
