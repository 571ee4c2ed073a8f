pub mod actions;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod guard;
pub mod io;
pub mod prompt;
pub mod registry;
pub mod runner;
pub mod session;
pub mod tools;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::{HostprepError, Result};
