//! Session lifecycle

mod gate;
mod service;

pub use gate::SessionGate;
pub use service::SessionService;
