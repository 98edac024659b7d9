//! # Websocket Transport Adapter
//!
//! ## Purpose
//!
//! Default [`Transport`] implementation over a tokio-tungstenite websocket.
//! Negotiates the ETP subprotocol, authenticates with basic credentials, and
//! bridges the socket to the engine's event-channel contract: binary frames
//! in, one ConnectionLost event when the socket dies. No reconnection - that
//! is a caller policy, not a transport concern.

use crate::error::{BridgeError, Result};
use crate::ports::{ConnectConfig, Transport, TransportEvent};
use async_trait::async_trait;
use base64::Engine as _;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::HeaderValue, Message},
};
use tracing::{debug, warn};

const CHANNEL_CAPACITY: usize = 64;

/// Websocket-backed transport
#[derive(Default)]
pub struct WebSocketTransport {
    outbound: Mutex<Option<mpsc::Sender<Message>>>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn connect(&self, config: ConnectConfig) -> Result<mpsc::Receiver<TransportEvent>> {
        let mut request =
            config
                .url
                .as_str()
                .into_client_request()
                .map_err(|e| BridgeError::ConnectFailed {
                    reason: e.to_string(),
                })?;

        let headers = request.headers_mut();
        headers.insert(
            "Sec-WebSocket-Protocol",
            HeaderValue::from_static(config.subprotocol),
        );
        if !config.username.is_empty() {
            let credentials = base64::engine::general_purpose::STANDARD
                .encode(format!("{}:{}", config.username, config.password));
            let value = HeaderValue::from_str(&format!("Basic {credentials}")).map_err(|e| {
                BridgeError::ConnectFailed {
                    reason: format!("invalid credentials: {e}"),
                }
            })?;
            headers.insert("Authorization", value);
        }

        let (socket, _) = connect_async(request)
            .await
            .map_err(|e| BridgeError::ConnectFailed {
                reason: e.to_string(),
            })?;
        debug!(url = %config.url, "websocket connected");

        let (mut sink, mut stream) = socket.split();
        let (out_tx, mut out_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel::<TransportEvent>(CHANNEL_CAPACITY);

        tokio::spawn(async move {
            while let Some(message) = out_rx.recv().await {
                if let Err(err) = sink.send(message).await {
                    warn!(%err, "websocket write failed, stopping writer");
                    break;
                }
            }
        });

        tokio::spawn(async move {
            loop {
                let lost = match stream.next().await {
                    Some(Ok(Message::Binary(frame))) => {
                        if event_tx.send(TransportEvent::Frame(frame)).await.is_err() {
                            break; // engine went away
                        }
                        continue;
                    }
                    Some(Ok(Message::Close(_))) => "closed by server".to_string(),
                    Some(Ok(_)) => continue, // ping/pong/text are not protocol frames
                    Some(Err(err)) => err.to_string(),
                    None => "stream ended".to_string(),
                };
                let _ = event_tx.send(TransportEvent::ConnectionLost(lost)).await;
                break;
            }
        });

        *self.outbound.lock().await = Some(out_tx);
        Ok(event_rx)
    }

    async fn write(&self, frame: Vec<u8>) -> Result<()> {
        let guard = self.outbound.lock().await;
        let sender = guard.as_ref().ok_or(BridgeError::NotConnected)?;
        sender
            .send(Message::Binary(frame))
            .await
            .map_err(|_| BridgeError::WriteFailed {
                reason: "websocket writer is gone".to_string(),
            })
    }
}
