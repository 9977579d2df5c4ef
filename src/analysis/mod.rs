//! Analysis modules.
//!
//! Directory processing and the ownership aggregation it feeds.

pub mod aggregator;
pub mod processor;

pub use aggregator::*;
pub use processor::{DirectoryProcessor, ProcessOptions};
