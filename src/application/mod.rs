// Application layer: use cases shared by the HTTP API and the CLI.

mod analytics;
pub mod error;
pub mod reporting;
mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
