//! Service Ports
//!
//! Abstract interfaces for external services.

mod downloader;
mod generation;

pub use downloader::*;
pub use generation::*;
