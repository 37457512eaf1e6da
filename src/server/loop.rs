// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop until `shutdown` fires.
///
/// Accept errors are logged and the loop keeps going; a transient failure
/// on one connection must not take the server down. Returning drops the
/// listener and releases the port.
pub async fn run(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::handle(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(err) => {
                        logger::log_error(&format!("Failed to accept connection: {err}"));
                    }
                }
            }

            () = shutdown.notified() => break,
        }
    }
}
