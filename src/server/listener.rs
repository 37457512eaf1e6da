// Listener module
// Creates the TCP listener the accept loop runs on

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Create a `TcpListener` bound to `addr` with `SO_REUSEADDR` enabled.
///
/// `SO_REUSEADDR` allows rebinding a port still in TIME_WAIT after a
/// restart. `SO_REUSEPORT` is deliberately not set, so a second instance on
/// the same port fails at bind time instead of silently sharing traffic.
pub fn bind_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    // Tokio requires the socket in non-blocking mode.
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;
    TcpListener::from_std(socket.into())
}
