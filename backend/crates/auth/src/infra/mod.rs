//! Infrastructure Layer
//!
//! Hosted auth service client.

pub mod gotrue;

pub use gotrue::GoTrueBackend;
