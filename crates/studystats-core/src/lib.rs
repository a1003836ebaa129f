pub mod aggregate;
pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod validate;

pub use error::{Result, StatsError};
