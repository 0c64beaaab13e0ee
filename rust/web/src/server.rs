use std::convert::Infallible;
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::reply::Reply;
use warp::Filter;

use crate::assets::AssetServer;
use crate::handlers;
use crate::hub::ClientHub;
use crate::room::{GameRoom, RoomError};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    static_dir: PathBuf,
    match_log: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port,
            static_dir: static_dir.into(),
            match_log: None,
        }
    }

    /// Also append every accepted move to a JSONL match log at `path`.
    pub fn with_match_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.match_log = Some(path.into());
        self
    }

    pub fn for_tests() -> Self {
        let dir = std::env::temp_dir().join("skirmish_web_static");
        Self::new("127.0.0.1", 0, dir)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Room error: {0}")]
    RoomError(#[from] RoomError),
}

/// Shared dependencies of every route: the client registry, the one game
/// room, and the static asset server.
#[derive(Clone)]
pub struct AppContext {
    config: ServerConfig,
    hub: ClientHub,
    room: Arc<GameRoom>,
    assets: Arc<AssetServer>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        if !config.static_dir().exists() {
            fs::create_dir_all(config.static_dir())
                .map_err(|err| ServerError::ConfigError(err.to_string()))?;
        }

        let hub = ClientHub::new();
        let room = match &config.match_log {
            Some(path) => GameRoom::with_match_log(hub.clone(), path)?,
            None => GameRoom::new(hub.clone()),
        };
        let assets = Arc::new(AssetServer::new(config.static_dir().to_path_buf()));

        Ok(Self {
            config,
            hub,
            room: Arc::new(room),
            assets,
        })
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests()).expect("test context")
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn hub(&self) -> ClientHub {
        self.hub.clone()
    }

    pub fn room(&self) -> Arc<GameRoom> {
        Arc::clone(&self.room)
    }

    pub fn assets(&self) -> Arc<AssetServer> {
        Arc::clone(&self.assets)
    }
}

#[derive(Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let context = AppContext::new(config)?;
        Ok(Self { context })
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let config = context.config().clone();
        let bind_addr = Self::bind_addr(&config)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(address = %addr, "server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }
        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;
        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }
        ServerError::ConfigError(err.to_string())
    }

    /// All routes as one boxed filter. Public so integration tests can drive
    /// the WebSocket endpoint through `warp::test` without binding a port.
    pub fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let health = Self::health_route();
        let game = Self::game_route(context);
        let statics = Self::static_routes(context);

        health.or(game).unify().or(statics).unify().boxed()
    }

    fn health_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health().into_response())
            .boxed()
    }

    fn game_route(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let hub = context.hub();
        let room = context.room();

        warp::path("ws")
            .and(warp::path::end())
            .and(warp::ws())
            .and(Self::with_hub(hub))
            .and(Self::with_room(room))
            .map(|upgrade: warp::ws::Ws, hub: ClientHub, room: Arc<GameRoom>| {
                upgrade
                    .on_upgrade(move |socket| handlers::client_connected(socket, hub, room))
                    .into_response()
            })
            .boxed()
    }

    fn static_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let assets = context.assets();

        let index = warp::path::end()
            .and(warp::get())
            .and(Self::with_assets(assets.clone()))
            .and_then(|assets: Arc<AssetServer>| async move {
                let response = assets
                    .index()
                    .await
                    .unwrap_or_else(|err| assets.error_response(err));
                Ok::<_, Infallible>(response)
            });

        let files = warp::path("static")
            .and(warp::path::tail())
            .and(warp::get())
            .and(Self::with_assets(assets))
            .and_then(|tail: warp::path::Tail, assets: Arc<AssetServer>| async move {
                let response = assets
                    .asset(tail.as_str())
                    .await
                    .unwrap_or_else(|err| assets.error_response(err));
                Ok::<_, Infallible>(response)
            });

        index.or(files).unify().boxed()
    }

    fn with_hub(hub: ClientHub) -> impl Filter<Extract = (ClientHub,), Error = Infallible> + Clone {
        warp::any().map(move || hub.clone())
    }

    fn with_room(
        room: Arc<GameRoom>,
    ) -> impl Filter<Extract = (Arc<GameRoom>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&room))
    }

    fn with_assets(
        assets: Arc<AssetServer>,
    ) -> impl Filter<Extract = (Arc<AssetServer>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&assets))
    }
}

pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
