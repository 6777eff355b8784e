use anyhow::{Context, Result};
use campus_api::ApiClient;
use campus_auth::SessionStore;
use campus_chats::{ChatEndpoint, ChatSession, WebSocketTransport};
use campus_config::AppConfig;
use campus_storage::{initialize_storage, SqliteKeyValueStore, SqlitePool};
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global subscriber. Output goes to stderr so stdout stays
    /// free for command output.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct ClientServices {
    pub storage: SqlitePool,
    pub sessions: SessionStore<SqliteKeyValueStore>,
    pub api: ApiClient,
    pub chat_endpoint: ChatEndpoint,
}

impl ClientServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let storage = initialize_storage(&config.storage)
            .await
            .context("failed to open local storage")?;
        let sessions = SessionStore::new(SqliteKeyValueStore::new(storage.clone()));
        let api = ApiClient::new(&config.api).context("failed to build api client")?;
        let chat_endpoint = ChatEndpoint::parse(&config.chat.ws_base_url)
            .context("invalid chat endpoint")?;

        info!(api = %api.base_url(), "client services ready");

        Ok(Self {
            storage,
            sessions,
            api,
            chat_endpoint,
        })
    }

    /// A fresh chat session over WebSocket; must be used inside the runtime.
    pub fn chat_session(&self) -> ChatSession<WebSocketTransport> {
        ChatSession::new(WebSocketTransport::new(), self.chat_endpoint.clone())
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
