pub mod client;
pub mod error;
pub mod request;

pub use client::{MeiliClient, SearchBackend, load_index_metadata};
pub use error::SearchError;
pub use request::SearchResponse;
