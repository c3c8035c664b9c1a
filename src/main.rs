use staticd::config::{AppState, Config};
use staticd::{logger, server};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = Config::load()?;
    // First startup argument overrides the configured document root
    cfg.apply_root_override(std::env::args().nth(1));

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(AppState::new(cfg));
    server::signal::start_signal_handler(Arc::clone(&state));

    logger::log_server_start(&addr, &state.config);
    server::run(listener, state).await?;

    logger::log_shutdown();
    Ok(())
}
