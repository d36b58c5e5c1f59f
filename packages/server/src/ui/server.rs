//! Server construction and execution.

use std::sync::Arc;

use axum::{Router, routing::get};
use hiroma_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::domain::{MessagePusher, RoomRegistry};
use crate::infrastructure::pusher::WebSocketMessagePusher;
use crate::usecase::{
    CreateRoomUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase, SendMessageUseCase,
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Room-based broadcast chat server.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a server with all dependencies wired up.
    pub fn new(config: ServerConfig) -> Self {
        // Initialize dependencies in order:
        // 1. RoomRegistry (shared room and membership state)
        // 2. MessagePusher (WebSocket implementation) and Clock
        // 3. UseCases
        // 4. AppState

        // 1. Create the registry; one mutex serializes all room mutations
        let registry = Arc::new(Mutex::new(RoomRegistry::new(config.clone())));

        // 2. Create MessagePusher (WebSocket implementation) and Clock
        let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        // 3. Create UseCases
        let create_room_usecase = Arc::new(CreateRoomUseCase::new(registry.clone(), clock.clone()));
        let list_rooms_usecase = Arc::new(ListRoomsUseCase::new(registry.clone()));
        let join_room_usecase = Arc::new(JoinRoomUseCase::new(
            registry.clone(),
            message_pusher.clone(),
        ));
        let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
            registry.clone(),
            message_pusher.clone(),
        ));
        let send_message_usecase = Arc::new(SendMessageUseCase::new(
            registry,
            message_pusher.clone(),
            config.clone(),
            clock,
        ));

        // 4. Create AppState
        let state = Arc::new(AppState {
            config,
            message_pusher,
            create_room_usecase,
            list_rooms_usecase,
            join_room_usecase,
            leave_room_usecase,
            send_message_usecase,
        });

        Self { state }
    }

    /// The axum router. Split out so integration tests can serve it on an
    /// ephemeral port.
    pub fn app(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the chat server.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.app();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
