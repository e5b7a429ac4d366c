//! Data types for the article extraction library.

pub mod config;
pub mod page;
pub mod profile;
pub mod result;
