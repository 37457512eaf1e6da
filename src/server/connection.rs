// Connection handling module
// Serves a single accepted TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve an accepted connection in a spawned task.
///
/// Wraps the TCP stream in `TokioIo`, enables HTTP/1.1 keep-alive and runs
/// the request handler for every request on the connection.
pub fn handle(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let service = service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { handler::handle_request(req, peer_addr, state).await }
        });

        if let Err(err) = builder.serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
