//! Ready-made loaders.
//!
//! - [`SourceLoader`]: host loader reading module files as text
//! - [`CachingLoader`]: memoizing wrapper for any host loader
//! - [`declared_location`]: path loader driven by declared class locations

pub mod caching;
pub mod declared;
pub mod source;

pub use caching::CachingLoader;
pub use declared::declared_location;
pub use source::SourceLoader;
