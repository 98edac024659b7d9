//! # ETP Bridge Engine
//!
//! ## Purpose
//!
//! Owns the single outbound ETP session: drives the handshake, dispatches
//! inbound messages to the discovery resolver, channel registry, and
//! streaming aggregator, schedules periodic resource discovery, and serves
//! the store-write operations. All I/O goes through the injected
//! collaborators; the engine itself is pure session logic.
//!
//! ## Control Flow
//!
//! ```text
//!                      ┌──────────────┐  frames   ┌────────────────────┐
//!  ETP endpoint ─────> │  Transport   │ ────────> │  dispatch loop     │
//!                      └──────────────┘           │   ├─ handshake     │
//!                            ▲                    │   ├─ registry      │
//!                      writes│                    │   ├─ aggregator ──────> data topics
//!                      ┌──────────────┐           │   └─ discovery ───────> metadata store
//!  control topic ────> │ send (lock)  │ <──────── └────────────────────┘
//!  refresh timer ────> └──────────────┘
//! ```
//!
//! Inbound handling is serialized on one task; every outbound send funnels
//! through the session lock so message-id allocation and the frame write
//! happen as one atomic unit.

use crate::aggregator::StreamAggregator;
use crate::config::{BridgeConfig, DestinationLogSpec};
use crate::discovery::DiscoveryResolver;
use crate::error::{BridgeError, Result};
use crate::ports::{
    ConnectConfig, DisconnectHandler, EtpCodec, MetadataStore, PubSubBridge, Transport,
    TransportEvent,
};
use crate::registry::ChannelRegistry;
use crate::session::Session;
use crate::store::{create_log_document, log_data_document, LogRow};
use etp_protocol::messages::ChannelMetadata;
use etp_protocol::{InboundBody, InboundMessage, MessageFactory, OutboundMessage};
use etp_types::{
    DiscoveryRoot, EntityUri, MnemonicSpec, ResourceKind, StreamCommand, StreamRequest,
    STREAM_REQUEST_TOPIC, STREAM_RESPONSE_TOPIC,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

/// The ETP v1.1 client engine
///
/// One instance manages exactly one outbound session. Cheap to clone handles
/// are not provided on purpose: the engine is expected to live in an `Arc`
/// at the application root.
pub struct EtpBridge {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    destination_log: Option<DestinationLogSpec>,
    transport: Arc<dyn Transport>,
    codec: Arc<dyn EtpCodec>,
    bridge: Arc<dyn PubSubBridge>,
    session: Mutex<Session>,
    registry: Arc<ChannelRegistry>,
    aggregator: StreamAggregator,
    resolver: DiscoveryResolver,
    connected: AtomicBool,
    on_disconnect: parking_lot::RwLock<Option<DisconnectHandler>>,
}

impl EtpBridge {
    /// Validate configuration and assemble the engine.
    ///
    /// Fails with a configuration error - before any connection is attempted -
    /// when destination-log auto-creation is enabled but incompletely
    /// specified.
    pub fn new(
        config: BridgeConfig,
        transport: Arc<dyn Transport>,
        codec: Arc<dyn EtpCodec>,
        bridge: Arc<dyn PubSubBridge>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Result<Self> {
        let destination_log = config.destination_log_spec()?;
        let registry = Arc::new(ChannelRegistry::new());
        Ok(Self {
            inner: Arc::new(EngineInner {
                destination_log,
                aggregator: StreamAggregator::new(Arc::clone(&registry), Arc::clone(&bridge)),
                resolver: DiscoveryResolver::new(metadata),
                session: Mutex::new(Session::new(
                    &config.application_name,
                    &config.application_version,
                )),
                registry,
                transport,
                codec,
                bridge,
                connected: AtomicBool::new(false),
                on_disconnect: parking_lot::RwLock::new(None),
            }),
        })
    }

    /// Connect to the endpoint, request the session, and start dispatching.
    ///
    /// `on_disconnect` fires once if the transport later reports connection
    /// loss; the engine does not reconnect.
    pub async fn connect(
        &self,
        url: &str,
        username: &str,
        password: &str,
        on_disconnect: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<()> {
        let inner = &self.inner;
        *inner.on_disconnect.write() = Some(Box::new(on_disconnect));

        let events = inner
            .transport
            .connect(ConnectConfig::new(url, username, password))
            .await?;
        inner.connected.store(true, Ordering::SeqCst);
        info!(url, "connected to ETP endpoint");

        // Session request and id allocation under one lock, like every send.
        {
            let mut session = inner.session.lock().await;
            session.mark_requested();
            let message = session.factory_mut().request_session();
            inner.write_encoded(&message).await?;
        }

        let dispatch = Arc::clone(inner);
        tokio::spawn(async move { dispatch.run_dispatch_loop(events).await });
        Ok(())
    }

    /// Begin periodic resource discovery and start serving stream-control
    /// requests from the bridge.
    pub async fn initialize_discovery(&self, refresh_interval_minutes: u64) -> Result<()> {
        self.inner.send_get_resources().await?;

        let refresher = Arc::clone(&self.inner);
        let period = Duration::from_secs(refresh_interval_minutes * 60);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                if !refresher.connected.load(Ordering::SeqCst) {
                    debug!("stopping discovery refresh: session disconnected");
                    break;
                }
                if let Err(err) = refresher.send_get_resources().await {
                    warn!(%err, "periodic discovery refresh failed");
                }
            }
        });

        debug!(topic = STREAM_REQUEST_TOPIC, "subscribing to stream-control requests");
        let mut requests = self.inner.bridge.subscribe(STREAM_REQUEST_TOPIC).await?;
        let control = Arc::clone(&self.inner);
        tokio::spawn(async move {
            while let Some(payload) = requests.recv().await {
                control.handle_control_payload(&payload).await;
            }
            debug!("stream-control subscription closed");
        });
        Ok(())
    }

    /// Ask the store to enumerate streaming channels behind a log URI
    pub async fn start_stream_for_log_uri(&self, log_uri: &str) -> Result<()> {
        EntityUri::parse(log_uri)?;
        debug!(log_uri, "describing streaming channels");
        self.inner
            .send(|factory| factory.channel_describe(log_uri))
            .await
    }

    /// Explicitly unsupported: no unsubscribe message exists in this engine,
    /// so nothing is ever sent.
    pub async fn stop_stream_for_log_uri(&self, log_uri: &str) -> Result<()> {
        let _ = log_uri;
        Err(BridgeError::NotSupported(
            "stopping a channel stream is not implemented".to_string(),
        ))
    }

    /// Unconditionally create (or overwrite) a log in the store
    pub async fn create_log_in_store(
        &self,
        well_uid: &str,
        wellbore_uid: &str,
        log_uid: &str,
        log_name: &str,
        mnemonics: &[MnemonicSpec],
    ) -> Result<()> {
        self.inner
            .create_log(well_uid, wellbore_uid, log_uid, log_name, mnemonics)
            .await
    }

    /// Append rows of log data to an existing log in the store
    pub async fn write_log_data_to_store(
        &self,
        well_uid: &str,
        wellbore_uid: &str,
        log_uid: &str,
        rows: &[LogRow],
    ) -> Result<()> {
        let uri = EntityUri::for_log(well_uid, wellbore_uid, log_uid).to_uri_string();
        let document = log_data_document(well_uid, wellbore_uid, log_uid, rows);
        self.inner
            .send(|factory| factory.put_object(&uri, ResourceKind::Log, document.into_bytes()))
            .await
    }
}

impl EngineInner {
    /// Build an outbound message and write it.
    ///
    /// Holding the session lock across the whole sequence makes "allocate
    /// next id, encode, write" one atomic unit, which keeps message ids on
    /// the wire strictly increasing.
    async fn send(&self, build: impl FnOnce(&mut MessageFactory) -> OutboundMessage) -> Result<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(BridgeError::NotConnected);
        }
        let mut session = self.session.lock().await;
        let message = build(session.factory_mut());
        self.write_encoded(&message).await
    }

    async fn write_encoded(&self, message: &OutboundMessage) -> Result<()> {
        let frame = self.codec.encode(message)?;
        debug!(
            protocol = message.header.protocol,
            message_type = message.header.message_type,
            message_id = message.header.message_id,
            "writing message"
        );
        self.transport.write(frame).await
    }

    /// One GetResources per refreshed discovery root
    async fn send_get_resources(&self) -> Result<()> {
        debug!("sending GetResources for discovery roots");
        for root in DiscoveryRoot::REFRESHED {
            self.send(|factory| factory.get_resources(root.as_uri()))
                .await?;
        }
        Ok(())
    }

    async fn run_dispatch_loop(self: Arc<Self>, mut events: mpsc::Receiver<TransportEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                TransportEvent::Frame(frame) => match self.codec.decode(&frame) {
                    Ok(message) => self.dispatch(message).await,
                    Err(err) => warn!(%err, "dropping undecodable inbound frame"),
                },
                TransportEvent::ConnectionLost(reason) => {
                    self.handle_connection_lost(&reason).await;
                    break;
                }
            }
        }
        debug!("dispatch loop ended");
    }

    /// Route one decoded message. Unhandled (protocol, messageType) pairs are
    /// logged and dropped; nothing inbound is fatal.
    async fn dispatch(&self, message: InboundMessage) {
        match message.body {
            InboundBody::OpenSession(_) => self.handle_open_session().await,
            InboundBody::ChannelMetadata(metadata) => {
                self.handle_channel_metadata(&metadata).await
            }
            InboundBody::ChannelData(data) => {
                if let Err(err) = self.aggregator.process(&data).await {
                    warn!(%err, "failed to publish aggregated channel data");
                }
            }
            InboundBody::GetResourcesResponse(response) => self.resolver.apply(&response).await,
            InboundBody::StoreObject(object) => {
                debug!(
                    uri = %object.data_object.resource.uri,
                    payload = %String::from_utf8_lossy(&object.data_object.data),
                    "store object received"
                );
            }
            InboundBody::Unhandled => {
                warn!(
                    protocol = message.header.protocol,
                    message_type = message.header.message_type,
                    "no handler implemented for message"
                );
            }
        }
    }

    /// OpenSession auto-advance: arm idle streaming without waiting for any
    /// further input.
    async fn handle_open_session(&self) {
        {
            let mut session = self.session.lock().await;
            if !session.open() {
                return;
            }
        }
        info!("session open, arming channel streaming");
        if let Err(err) = self.send(|factory| factory.channel_streaming_start()).await {
            error!(%err, "failed to arm channel streaming");
        }
    }

    /// Register described channels and subscribe to all of them
    async fn handle_channel_metadata(&self, metadata: &ChannelMetadata) {
        let channel_ids = self.registry.register_from_metadata(metadata);
        if channel_ids.is_empty() {
            warn!("channel metadata response yielded no registrable channels");
            return;
        }
        info!(channels = channel_ids.len(), "starting channel streaming");
        if let Err(err) = self
            .send(|factory| factory.channel_streaming_start_for(&channel_ids))
            .await
        {
            error!(%err, "failed to start streaming for described channels");
        }
    }

    async fn handle_connection_lost(&self, reason: &str) {
        warn!(reason, "connection lost");
        self.connected.store(false, Ordering::SeqCst);
        self.session.lock().await.mark_disconnected();
        if let Some(callback) = &*self.on_disconnect.read() {
            callback(reason);
        }
    }

    async fn handle_control_payload(&self, payload: &[u8]) {
        let request: StreamRequest = match serde_json::from_slice(payload) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "dropping unparseable stream-control request");
                return;
            }
        };
        debug!(
            command = ?request.command,
            log_uid = %request.log_uid,
            "stream-control request received"
        );
        match request.command {
            StreamCommand::Start => self.handle_stream_start(request).await,
            StreamCommand::Stop => {
                // Accepted, but there is no unsubscribe in this engine.
                debug!("stop command is not implemented");
            }
            StreamCommand::Unknown => {
                warn!("unexpected stream-control command");
            }
        }
    }

    async fn handle_stream_start(&self, request: StreamRequest) {
        if let Some(spec) = &self.destination_log {
            if let Err(err) = self
                .create_log(
                    &request.well_uid,
                    &request.wellbore_uid,
                    &spec.log_uid,
                    &spec.log_name,
                    &spec.mnemonics,
                )
                .await
            {
                warn!(%err, "failed to create destination log on stream start");
            }
        }

        let uri = EntityUri::for_log(&request.well_uid, &request.wellbore_uid, &request.log_uid)
            .to_uri_string();
        let response = match self.send(|factory| factory.channel_describe(&uri)).await {
            Ok(()) => request.into_ok(),
            Err(err) => {
                error!(%err, %uri, "failed to describe streaming channels");
                request.into_failed(err.to_string())
            }
        };
        self.publish_control_response(&response).await;
    }

    async fn publish_control_response(&self, response: &StreamRequest) {
        let payload = match serde_json::to_vec(response) {
            Ok(payload) => payload,
            Err(err) => {
                error!(%err, "failed to serialize stream-control response");
                return;
            }
        };
        if let Err(err) = self.bridge.publish(STREAM_RESPONSE_TOPIC, payload).await {
            error!(%err, "failed to publish stream-control response");
        }
    }

    async fn create_log(
        &self,
        well_uid: &str,
        wellbore_uid: &str,
        log_uid: &str,
        log_name: &str,
        mnemonics: &[MnemonicSpec],
    ) -> Result<()> {
        let uri = EntityUri::for_log(well_uid, wellbore_uid, log_uid).to_uri_string();
        info!(%uri, "creating log in store");
        let document = create_log_document(well_uid, wellbore_uid, log_uid, log_name, mnemonics);
        self.send(|factory| factory.put_object(&uri, ResourceKind::Log, document.into_bytes()))
            .await
    }
}
