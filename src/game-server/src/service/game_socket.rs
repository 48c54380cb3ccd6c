use std::sync::Arc;

use crate::model::internal::{GameRequest, PlayerHandle};
use async_trait::async_trait;
use common::{
    message::game_server::{ClientRequest, ClientResponse},
    model::messages::Id,
    websocket::{WebSocketState, WebsocketHandler},
};
use tokio::sync::{mpsc::Sender, Mutex};
use tracing::error;

pub struct GameSocket {
    state: Arc<Mutex<WebSocketState<ClientResponse>>>,
}
impl GameSocket {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(WebSocketState::new())),
        }
    }
}
impl Default for GameSocket {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebsocketHandler<ClientRequest, ClientResponse, GameRequest> for GameSocket {
    fn get_state(&self) -> Arc<Mutex<WebSocketState<ClientResponse>>> {
        self.state.clone()
    }

    async fn respond_to_request(
        user_id: Id,
        request: ClientRequest,
        to_user_sender: Sender<ClientResponse>,
        internal_sender: Sender<GameRequest>,
    ) -> Option<ClientResponse> {
        // Resolve player object and route to the game thread, which answers through
        // the player's sender
        let request = GameRequest {
            player: PlayerHandle {
                id: user_id,
                sender: to_user_sender,
            },
            request,
        };
        if let Err(e) = internal_sender.send(request).await {
            error!("Failed to send internal message: {}", e);
        }
        None
    }

    fn drop_after_send(response: ClientResponse) -> bool {
        matches!(response, ClientResponse::Goodbye { tally: _ })
    }
}
