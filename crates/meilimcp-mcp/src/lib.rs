pub mod http;
pub mod prompts;
pub mod protocol;
pub mod server;
pub mod tools;

pub use server::{ServerContext, ServerError, run_server};
