pub mod ai;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod seed;
pub mod server;
pub mod utils;

pub use error::AtelierError;
pub use server::{AtelierState, atelier_router};
