//! Application Layer

pub mod blog;
pub mod config;

pub use blog::BlogQueries;
pub use config::CmsConfig;
