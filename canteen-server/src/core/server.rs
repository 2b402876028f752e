//! Server Implementation
//!
//! HTTP 服务器启动和管理

use tokio::sync::broadcast::error::RecvError;

use crate::api::build_app;
use crate::core::{Config, Result, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config)?,
        };

        spawn_order_event_logger(&state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("🍛 Canteen server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, build_app(state))
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

/// 订单事件写入日志 (kitchen display 接入前的唯一订阅者)
fn spawn_order_event_logger(state: &ServerState) {
    let mut rx = state.orders.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => tracing::info!(
                    target: "orders",
                    event_type = ?event.event_type,
                    order_id = %event.order_id,
                    token = %event.token,
                    status = %event.status,
                    "Order event"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Order event logger lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
