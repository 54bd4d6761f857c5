//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cookie parsing, Set-Cookie building and chunked cookie values
//! - HTTP client for the hosted auth/database backend

pub mod client;
pub mod cookie;
