//! Agent gateway server: configuration, router construction, serve loop.

pub mod config;
pub mod http;
