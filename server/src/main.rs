use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use holdem_server::{app, Registry, ServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let config = ServerConfig::from_args(std::env::args().skip(1));
    let addr = config.bind_addr;
    let app = app(Registry::new(), config);

    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
