pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod posts;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
