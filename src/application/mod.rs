// Application layer: the facade the shell and other clients call into.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
