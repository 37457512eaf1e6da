//! A small static file server.
//!
//! Serves the files under a configured root directory over HTTP/1.1 with
//! directory listings, index file resolution and conditional requests.
//! The binary in `main.rs` wires these modules together; the library
//! target exists so the request pipeline can be driven directly in tests.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
