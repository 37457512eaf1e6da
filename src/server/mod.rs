// Server module entry point
// Provides listener setup, the accept loop and connection handling

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module file is mapped to server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used functions
pub use listener::bind_listener;
