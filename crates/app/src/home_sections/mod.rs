//! Home page sections

mod service;

pub use service::HomeSectionsService;
