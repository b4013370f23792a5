pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod guidance;
pub mod metadata;
pub mod query;
pub mod schema;
