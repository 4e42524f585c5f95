pub mod config;
pub mod error;
pub mod manager;
pub mod process;
pub mod tui;
pub mod user;

pub use error::{Error, Result};
