//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! file-serving business logic.

pub mod cache;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_400_response, build_403_response, build_404_response,
    build_405_response, build_file_response, build_html_response, build_redirect_response,
};
