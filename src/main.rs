use std::sync::Arc;

use tokio::sync::Notify;

use servedir::config::{AppState, Config};
use servedir::logger;
use servedir::server::{self, server_loop, signal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    logger::init(&config)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.get_socket_addr()?;

    let state = match AppState::new(config) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            logger::log_error(&format!("Cannot serve: {err}"));
            return Err(Box::new(err));
        }
    };

    let listener = match server::bind_listener(addr) {
        Ok(listener) => listener,
        Err(err) => {
            logger::log_bind_failed(&addr, &err);
            return Err(Box::new(err));
        }
    };

    logger::log_server_start(&listener.local_addr()?);

    let shutdown = Arc::new(Notify::new());
    signal::start_signal_handler(Arc::clone(&shutdown));
    server_loop::run(listener, state, shutdown).await;

    Ok(())
}
