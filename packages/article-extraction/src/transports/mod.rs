//! Transport implementations.
//!
//! # Available Transports
//!
//! - `HttpTransport` - reqwest client with configurable timeout and TLS policy
//! - `MockTransport` - For testing
//!
//! # Example
//!
//! ```rust,ignore
//! use article_extraction::transports::HttpTransport;
//! use article_extraction::PipelineConfig;
//!
//! let transport = HttpTransport::new(&PipelineConfig::default())?;
//! ```

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::{MockReply, MockTransport};

// Re-export from traits for convenience
pub use crate::traits::transport::{FetchRequest, RawResponse, Transport};
