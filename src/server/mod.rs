//! Web UI host and JSON API

pub mod api;
pub mod page;
