use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{
        broadcast,
        mpsc::{self, Sender},
        Mutex,
    },
};
use tokio_tungstenite::{
    accept_async,
    tungstenite::{
        protocol::{frame::coding::CloseCode, CloseFrame},
        Message,
    },
    WebSocketStream,
};
use tracing::{debug, error, info, warn};

use crate::{
    model::messages::{Id, OpenSocketRequest},
    utility::Channel,
};

#[derive(Clone)]
pub struct Connection<RS> {
    pub user_id: Id,
    pub to_socket: Channel<RS>,
}
impl<RS> Connection<RS> {
    pub fn new(user_id: Id, to_socket: Channel<RS>) -> Self {
        Connection { user_id, to_socket }
    }
}

pub struct WebSocketState<T> {
    user_handles: HashMap<Id, Connection<T>>,
}
impl<T> WebSocketState<T> {
    pub fn new() -> Self {
        WebSocketState {
            user_handles: HashMap::new(),
        }
    }

    /// Forget `connection`, unless a newer socket has already replaced it.
    fn release(&mut self, connection: &Connection<T>) {
        let current = self.user_handles.get(&connection.user_id).is_some_and(|handle| {
            Arc::ptr_eq(&handle.to_socket.receiver, &connection.to_socket.receiver)
        });
        if current {
            self.user_handles.remove(&connection.user_id);
        }
    }
}

impl<T> Default for WebSocketState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
pub trait WebsocketHandler<ExternalRQ, ExternalRS, InternalRQ>
where
    Self: Send + Sync + 'static,
    ExternalRQ: for<'de> Deserialize<'de> + Send + 'static,
    ExternalRS: Clone + Send + Serialize + 'static,
    InternalRQ: Send + 'static,
{
    fn get_state(&self) -> Arc<Mutex<WebSocketState<ExternalRS>>>;

    async fn listen(
        &mut self,
        address: String,
        shutdown_receiver: &mut broadcast::Receiver<()>,
        internal_sender: Sender<InternalRQ>,
    ) {
        let ws_listener = TcpListener::bind(address.clone())
            .await
            .unwrap_or_else(|e| {
                panic!("Failed to bind to {}: {}", address, e);
            });
        info!("Initialized ws listener: {}", address);
        loop {
            tokio::select! {
                result = ws_listener.accept() => {
                    match result {
                        Err(e) => {
                            error!("Failed to accept connection from {} with error: {}", address, e);
                        }
                        Ok((stream, address)) => {
                            tokio::spawn(Self::connection_thread(
                                self.get_state(),
                                stream,
                                address,
                                internal_sender.clone(),
                            ));
                        }
                    }
                },
                _ = shutdown_receiver.recv() => {
                    break;
                }
            };
        }
        info!("Exited ws listener");
    }

    // Thread to handle connection lifetime
    async fn connection_thread(
        state: Arc<Mutex<WebSocketState<ExternalRS>>>,
        stream: TcpStream,
        address: SocketAddr,
        internal_sender: Sender<InternalRQ>,
    ) {
        info!("New ws connection: {}", address);

        let stream = match accept_async(stream).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Websocket handshake with {} failed: {}", address, e);
                return;
            }
        };
        let (mut ws_sender, mut ws_receiver) = stream.split();

        // The first message sent is always the user's id
        let Some(user_id) = Self::identify(&mut ws_receiver).await else {
            warn!("Connection closed before receiving user ID");
            return;
        };

        // Lookup user's Connection by user_id
        let connection = {
            // Acquire state mutex in limited scope so we don't deadlock for the lifetime of the
            // connection
            state
                .lock()
                .await
                .user_handles
                .entry(user_id)
                .or_insert_with(|| Connection::new(user_id, Channel::from(mpsc::channel(100))))
                .clone()
        };
        // Held for the lifetime of the socket: one live socket per user
        let mut to_socket = connection.to_socket.receiver.lock().await;

        debug!("Listening to {:?}", user_id);
        loop {
            let response = tokio::select! {
                // Messages pushed by internal services
                pushed = to_socket.recv() => {
                    let Some(pushed) = pushed else {
                        break;
                    };
                    Some(pushed)
                }

                // Otherwise, handle incoming messages
                msg = ws_receiver.next() => {
                    let Some(msg) = msg else {
                        debug!("Socket for {:?} closed by client", user_id);
                        break;
                    };
                    let msg = match msg {
                        Ok(msg) => msg,
                        Err(e) => {
                            warn!("Error receiving message: {}", e);
                            break;
                        }
                    };

                    let result = Self::handle_external_message(
                        &connection,
                        msg,
                        internal_sender.clone()
                    ).await;

                    let Ok(response) = result else {
                        break
                    };
                    response
                }
            };

            let Some(response) = response else {
                continue;
            };
            let response_body =
                serde_json::to_string(&response).expect("Could not serialize response.");
            if let Err(e) = ws_sender.send(Message::Text(response_body)).await {
                warn!("Failed to send to {:?}: {}", user_id, e);
                break;
            }

            // Drop connection according to criteria
            if Self::drop_after_send(response) {
                // Forget the user before the client sees the close
                state.lock().await.release(&connection);
                let close = ws_sender
                    .send(Message::Close(Some(CloseFrame {
                        code: CloseCode::Normal,
                        reason: "Decided to close after sending the previous message".into(),
                    })))
                    .await;
                if let Err(e) = close {
                    warn!("Failed to close socket for {:?}: {}", user_id, e);
                }
                break;
            }
        }
        state.lock().await.release(&connection);
        debug!("Stopped listening to {:?}", user_id);
    }

    async fn identify(
        ws_receiver: &mut futures_util::stream::SplitStream<WebSocketStream<TcpStream>>,
    ) -> Option<Id> {
        loop {
            match ws_receiver.next().await? {
                Err(e) => {
                    warn!("Error receiving message: {}", e);
                    return None;
                }
                Ok(msg) => {
                    if !msg.is_text() {
                        warn!("Received non-text message");
                        continue;
                    }
                    let Ok(msg_str) = msg.to_text() else {
                        continue;
                    };
                    match serde_json::from_str::<OpenSocketRequest>(msg_str) {
                        Ok(request) => return Some(request.user_id),
                        Err(error) => {
                            warn!("Failed to parse identification message: {:?}", error);
                        }
                    }
                }
            }
        }
    }

    // Read message from connection, return immediate response
    async fn handle_external_message(
        connection: &Connection<ExternalRS>,
        message: Message,
        internal_sender: Sender<InternalRQ>,
    ) -> Result<Option<ExternalRS>, &'static str> {
        if message.is_close() {
            return Err("Client closed the socket");
        }
        if !message.is_text() {
            debug!("Ignoring non-text message from {:?}", connection.user_id);
            return Ok(None);
        }

        // Deserialize request
        let body = message.to_text().map_err(|_| "Invalid utf-8")?;
        let request: ExternalRQ = match serde_json::from_str(body) {
            Ok(request) => request,
            Err(e) => {
                warn!("Could not deserialize request {:?}: {}", body, e);
                return Ok(None);
            }
        };

        Ok(Self::respond_to_request(
            connection.user_id,
            request,
            connection.to_socket.sender.clone(),
            internal_sender,
        )
        .await)
    }

    // Criterion to drop connection. By default, always keep the connection alive.
    fn drop_after_send(_response: ExternalRS) -> bool {
        false
    }

    // Logic to handle a client's request
    async fn respond_to_request(
        _user_id: Id,
        _request: ExternalRQ,
        _to_user_sender: Sender<ExternalRS>,
        _internal_sender: Sender<InternalRQ>,
    ) -> Option<ExternalRS> {
        None
    }
}
