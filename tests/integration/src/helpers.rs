//! Test helpers for integration tests
//!
//! Spawns a real gateway on an ephemeral port and drives it over a
//! WebSocket client connection.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use hub_common::{AppConfig, AppSettings, Environment, JwtConfig, JwtService, ServerConfig};
use hub_core::UserId;
use hub_gateway::protocol::GatewayMessage;
use hub_gateway::{create_app, create_gateway_state};
use hub_service::ProfileDirectory;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

const TEST_JWT_SECRET: &str = "integration-test-secret-key";

/// How long to wait for an expected frame
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait before concluding no frame is coming
const SILENCE_TIMEOUT: Duration = Duration::from_millis(300);

/// Test gateway instance that manages lifecycle
pub struct TestGateway {
    pub addr: SocketAddr,
    pub profiles: Arc<ProfileDirectory>,
    jwt: JwtService,
    _handle: JoinHandle<()>,
}

impl TestGateway {
    /// Start a gateway on an ephemeral port with an empty profile directory
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let config = test_config(addr.port());
        let profiles = Arc::new(ProfileDirectory::new());
        let state = create_gateway_state(config, profiles.clone());
        let app = create_app(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            profiles,
            jwt: JwtService::new(TEST_JWT_SECRET, 900, 604_800),
            _handle: handle,
        })
    }

    /// Mint a valid access token for a user
    pub fn token_for(&self, user_id: UserId) -> Result<String> {
        let pair = self
            .jwt
            .generate_token_pair(user_id)
            .context("failed to mint test token")?;
        Ok(pair.access_token)
    }

    /// Gateway WebSocket URL with the given token
    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://{}/gateway?token={token}", self.addr)
    }

    /// Connect a client as the given user and consume the Hello frame
    pub async fn connect(&self, user_id: UserId) -> Result<TestClient> {
        let token = self.token_for(user_id)?;
        let (stream, _) = connect_async(self.ws_url(&token)).await?;
        let mut client = TestClient { stream };

        let hello = client.recv().await?;
        if hello.op != hub_gateway::protocol::OpCode::Hello {
            bail!("expected Hello frame, got {hello}");
        }

        Ok(client)
    }

    /// Attempt a raw connection with an arbitrary token, without reading frames
    pub async fn try_connect_raw(
        &self,
        token: &str,
    ) -> Result<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>> {
        let (stream, _) = connect_async(self.ws_url(token)).await?;
        Ok(stream)
    }
}

/// A connected WebSocket client
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl TestClient {
    /// Send a gateway message
    pub async fn send(&mut self, message: GatewayMessage) -> Result<()> {
        let json = message.to_json()?;
        self.stream.send(Message::Text(json.into())).await?;
        Ok(())
    }

    /// Receive the next gateway message, skipping control frames
    pub async fn recv(&mut self) -> Result<GatewayMessage> {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;

        loop {
            let frame = tokio::time::timeout_at(deadline, self.stream.next())
                .await
                .context("timed out waiting for frame")?
                .context("connection closed")??;

            match frame {
                Message::Text(text) => return Ok(GatewayMessage::from_json(text.as_ref())?),
                Message::Ping(_) | Message::Pong(_) => {}
                Message::Close(frame) => bail!("connection closed: {frame:?}"),
                other => bail!("unexpected frame: {other:?}"),
            }
        }
    }

    /// Drain frames until the server closes, returning the close code
    pub async fn expect_close_code(&mut self) -> Result<u16> {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;

        loop {
            let frame = tokio::time::timeout_at(deadline, self.stream.next())
                .await
                .context("timed out waiting for close frame")?
                .context("stream ended without a close frame")??;

            match frame {
                Message::Close(Some(frame)) => return Ok(frame.code.into()),
                Message::Close(None) => bail!("close frame carried no code"),
                _ => {}
            }
        }
    }

    /// Send a raw text frame, bypassing the protocol envelope
    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.stream.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Assert that no data frame arrives within the silence window
    pub async fn expect_silence(&mut self) -> Result<()> {
        match tokio::time::timeout(SILENCE_TIMEOUT, self.stream.next()).await {
            Err(_) => Ok(()),
            Ok(Some(Ok(Message::Text(text)))) => bail!("unexpected frame: {text}"),
            Ok(Some(Ok(_))) => Ok(()),
            Ok(Some(Err(e))) => bail!("websocket error: {e}"),
            Ok(None) => bail!("connection closed"),
        }
    }

    /// Close the connection
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Build a config pointing at the given port
pub fn test_config(port: u16) -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "chat-hub-test".to_string(),
            env: Environment::Development,
        },
        gateway: ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604_800,
        },
    }
}
