//! Airspace CLI - external collaborators of the monitor core.
//!
//! - `config`: environment and file configuration
//! - `input`: JSON feeds and interactive console entry
//! - `report`: table and event output
//! - `sim`: built-in and random traffic scenarios

pub mod config;
pub mod input;
pub mod report;
pub mod sim;

pub use config::Config;
pub use report::TableObserver;
