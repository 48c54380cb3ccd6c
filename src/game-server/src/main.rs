use common::utility::create_shutdown_channel;
use game_server::{config::GameServerConfig, entrypoint::serve};
use tracing::{error, Level};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_max_level(Level::DEBUG)
        .init();
    let config = match GameServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    let shutdown_receiver = create_shutdown_channel().await;
    serve(config, shutdown_receiver, None).await;
}
