use std::sync::Arc;

use common::{
    message::game_server::{ClientRequest, ClientResponse, RoundResultResponse},
    model::messages::Id,
};
use tokio::sync::{broadcast, mpsc::Receiver, Mutex};
use tracing::{debug, info, warn};

use crate::{model::internal::GameRequest, service::session_store::SessionStore};

/// Applies client requests to their sessions one at a time.
pub struct GameThread {}
impl GameThread {
    pub async fn run(
        store: Arc<Mutex<SessionStore>>,
        shutdown_receiver: &mut broadcast::Receiver<()>,
        mut from_socket: Receiver<GameRequest>,
    ) {
        info!("Initialized game thread");
        loop {
            tokio::select! {
                request = from_socket.recv() => {
                    let Some(request) = request else {
                        break;
                    };
                    Self::handle(&store, request).await;
                }
                _ = shutdown_receiver.recv() => {
                    break;
                }
            }
        }
        info!("Exiting game thread");
    }

    pub async fn handle(store: &Arc<Mutex<SessionStore>>, request: GameRequest) {
        let GameRequest { player, request } = request;
        debug!("{:?} from {}", request, player.id);
        // The whole turn happens under the store lock
        let response = {
            let mut store = store.lock().await;
            Self::update(&mut store, player.id, request)
        };
        if let Err(e) = player.sender.send(response).await {
            warn!("Could not respond to {}: {}", player.id, e);
        }
    }

    fn update(
        store: &mut SessionStore,
        player_id: Id,
        request: ClientRequest,
    ) -> ClientResponse {
        match request {
            ClientRequest::Move { value } => {
                let session = store.session_mut(player_id);
                let outcome = session.play_turn(value);
                info!("{}: {}", player_id, outcome);
                ClientResponse::RoundResult(RoundResultResponse {
                    outcome,
                    tally: session.current_tally(),
                })
            }
            ClientRequest::GetTally => ClientResponse::Tally(store.tally(&player_id)),
            ClientRequest::Quit => {
                let tally = store
                    .remove(&player_id)
                    .map(|session| session.current_tally())
                    .unwrap_or_default();
                ClientResponse::Goodbye { tally }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use agent::{session::SessionConfig, strategy::StrategyKind};
    use common::model::game::{Move, Outcome, SessionTally};
    use tokio::sync::mpsc;

    use super::*;
    use crate::model::internal::PlayerHandle;

    fn store() -> Arc<Mutex<SessionStore>> {
        let config = SessionConfig {
            seed: Some(3),
            strategies: vec![StrategyKind::MostUsed],
            log_capacity: None,
        };
        Arc::new(Mutex::new(SessionStore::new(config).unwrap()))
    }

    #[tokio::test]
    async fn plays_turns_and_quits() {
        let store = store();
        let (sender, mut receiver) = mpsc::channel(8);
        let player = PlayerHandle {
            id: Id::new(),
            sender,
        };
        let send = |request| GameRequest {
            player: player.clone(),
            request,
        };

        GameThread::handle(&store, send(ClientRequest::Move { value: Move::Rock })).await;
        let Some(ClientResponse::RoundResult(round)) = receiver.recv().await else {
            panic!("Expected a round result");
        };
        assert_eq!(round.outcome.result, Outcome::Tie);
        assert_eq!(round.outcome.strategy, "MostUsed");

        GameThread::handle(&store, send(ClientRequest::Move { value: Move::Paper })).await;
        let Some(ClientResponse::RoundResult(round)) = receiver.recv().await else {
            panic!("Expected a round result");
        };
        assert_eq!(round.outcome.result, Outcome::PlayerWin);

        let expected = SessionTally {
            player_wins: 1,
            computer_wins: 0,
            ties: 1,
        };
        GameThread::handle(&store, send(ClientRequest::GetTally)).await;
        assert_eq!(receiver.recv().await, Some(ClientResponse::Tally(expected)));

        GameThread::handle(&store, send(ClientRequest::Quit)).await;
        assert_eq!(
            receiver.recv().await,
            Some(ClientResponse::Goodbye { tally: expected })
        );
        assert!(store.lock().await.is_empty());
    }

    #[tokio::test]
    async fn stops_on_shutdown() {
        let (shutdown_sender, mut shutdown_receiver) = broadcast::channel(1);
        let (_to_game, from_socket) = mpsc::channel(8);
        let handle = tokio::spawn(async move {
            GameThread::run(store(), &mut shutdown_receiver, from_socket).await
        });
        shutdown_sender.send(()).unwrap();
        handle.await.unwrap();
    }
}
