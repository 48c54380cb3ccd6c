use std::sync::Arc;

use super::config::GameServerConfig;
use super::model::internal::GameRequest;
use super::service::game_manager::GameManager;
use super::service::game_socket::GameSocket;
use super::service::game_thread::GameThread;
use super::service::session_store::SessionStore;
use agent::session::SessionConfig;
use common::utility::random_address;
use common::websocket::WebsocketHandler;
use itertools::Itertools;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, Level};

pub async fn serve(
    config: GameServerConfig,
    shutdown_receiver: broadcast::Receiver<()>,
    ready_signal: Option<tokio::sync::oneshot::Sender<()>>,
) {
    info!(
        "Strategy roster: {}",
        config.session.strategies.iter().join(", ")
    );
    let store = Arc::new(Mutex::new(
        SessionStore::new(config.session.clone()).expect("Invalid session configuration"),
    ));
    let mut game_shutdown_receiver = shutdown_receiver.resubscribe();
    let mut socket_shutdown_receiver = shutdown_receiver.resubscribe();
    let manager_shutdown_receiver = shutdown_receiver.resubscribe();
    let (to_game_sender, to_game_receiver): (
        mpsc::Sender<GameRequest>,
        mpsc::Receiver<GameRequest>,
    ) = mpsc::channel(100);

    // Single consumer: turns never interleave
    let game_store = store.clone();
    let game_handle: JoinHandle<()> = tokio::spawn(async move {
        GameThread::run(game_store, &mut game_shutdown_receiver, to_game_receiver).await
    });
    // REST endpoint: read-only view of sessions
    let rest_address = config.rest_address.clone();
    let manager_handle: JoinHandle<()> = tokio::spawn(async move {
        GameManager::new()
            .listen(rest_address, manager_shutdown_receiver, store)
            .await
    });
    // Websocket handler - route each client's requests to the game thread
    let socket_address = config.socket_address.clone();
    let websocket_handle: JoinHandle<()> = tokio::spawn(async move {
        GameSocket::new()
            .listen(socket_address, &mut socket_shutdown_receiver, to_game_sender)
            .await
    });
    // Signal that the server is ready
    if let Some(ready_signal) = ready_signal {
        info!("Sent ready");
        ready_signal.send(()).expect("Failed to send ready signal");
    }

    websocket_handle
        .await
        .expect("Websocket exited non-gracefully");
    manager_handle
        .await
        .expect("Game manager exited non-gracefully");
    game_handle
        .await
        .expect("Game thread exited non-gracefully");
}

pub struct GameServer {
    pub rest_address: String,
    pub socket_address: String,
    shutdown_sender: broadcast::Sender<()>,
}
impl GameServer {
    /// Start a server on free local ports.
    pub async fn new(session: SessionConfig) -> Self {
        // Init logging, ignore error if already set
        let _ = tracing_subscriber::fmt()
            .with_line_number(true)
            .with_file(true)
            .with_max_level(Level::DEBUG)
            .try_init();

        let config = GameServerConfig {
            socket_address: random_address().await,
            rest_address: random_address().await,
            session,
        };

        // Create server
        let (shutdown_sender, shutdown_receiver) = broadcast::channel(1);
        let (ready_sender, ready_receiver) = tokio::sync::oneshot::channel();
        let socket_address = config.socket_address.clone();
        let rest_address = config.rest_address.clone();
        tokio::spawn(serve(config, shutdown_receiver, Some(ready_sender)));

        // Wait for server to be ready
        ready_receiver.await.expect("Server failed to start");
        // Let the listeners bind
        tokio::task::yield_now().await;

        GameServer {
            shutdown_sender,
            rest_address,
            socket_address,
        }
    }
    pub async fn shutdown(&self) {
        self.shutdown_sender.send(()).expect("Failed to shutdown");
    }
}
