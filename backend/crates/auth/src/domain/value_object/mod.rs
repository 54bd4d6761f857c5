//! Value Objects

pub mod route_policy;
