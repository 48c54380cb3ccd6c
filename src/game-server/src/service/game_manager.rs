use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use common::model::messages::Id;
use tokio::sync::{broadcast, Mutex};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    model::external::{LoggedRound, StrategiesResponse},
    service::session_store::SessionStore,
};

/// Read-only REST view over the live sessions.
pub struct GameManager {}

impl GameManager {
    pub fn new() -> Self {
        GameManager {}
    }

    pub async fn listen(
        &self,
        address: String,
        mut shutdown_receiver: broadcast::Receiver<()>,
        store: Arc<Mutex<SessionStore>>,
    ) {
        let listener = tokio::net::TcpListener::bind(address.clone())
            .await
            .unwrap_or_else(|e| panic!("Failed to bind to {}: {}", address, e));
        info!("Game manager listening on {}", address);
        axum::serve(listener, Self::router(store))
            .with_graceful_shutdown(async move {
                let _ = shutdown_receiver.recv().await;
            })
            .await
            .expect("REST endpoint exited non-gracefully");
        info!("Exited game manager");
    }

    pub fn router(store: Arc<Mutex<SessionStore>>) -> Router {
        Router::new()
            .route("/", get(Self::root))
            .route("/strategies", get(Self::strategies))
            .route("/session/{id}/tally", get(Self::tally))
            .route("/session/{id}/log", get(Self::log))
            .layer(TraceLayer::new_for_http())
            .with_state(store)
    }

    async fn root() -> &'static str {
        "Hello, World!"
    }

    async fn strategies(State(store): State<Arc<Mutex<SessionStore>>>) -> Json<StrategiesResponse> {
        let strategies = store
            .lock()
            .await
            .strategy_names()
            .into_iter()
            .map(str::to_owned)
            .collect();
        Json(StrategiesResponse { strategies })
    }

    async fn tally(
        State(store): State<Arc<Mutex<SessionStore>>>,
        Path(id): Path<Id>,
    ) -> Response {
        match store.lock().await.get(&id) {
            Some(session) => Json(session.current_tally()).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn log(State(store): State<Arc<Mutex<SessionStore>>>, Path(id): Path<Id>) -> Response {
        match store.lock().await.get(&id) {
            Some(session) => {
                let rounds: Vec<LoggedRound> = session.log().map(LoggedRound::from).collect();
                Json(rounds).into_response()
            }
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

impl Default for GameManager {
    fn default() -> Self {
        Self::new()
    }
}
