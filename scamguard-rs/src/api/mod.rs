//! REST API module for scamguard-rs
//!
//! Provides HTTP endpoints for message classification and blocklist
//! management

pub mod handlers;
pub mod server;

pub use server::ApiServer;
