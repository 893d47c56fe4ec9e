pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod io;
pub mod logging;

pub use application::{AppError, LedgerService, Session};
pub use config::LedgerConfig;
pub use domain::*;
