//! Core trait abstractions for the article extraction library.
//!
//! These traits define the seams applications implement or mock:
//! the network transport and the completion backend.

pub mod completion;
pub mod transport;
