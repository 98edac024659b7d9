//! End-to-end engine tests against in-memory collaborators
//!
//! The fakes speak JSON over the codec boundary so every frame the engine
//! writes can be inspected structurally, and inbound messages can be injected
//! as typed values.

use async_trait::async_trait;
use etp_bridge::{
    BridgeConfig, BridgeError, ConnectConfig, EtpBridge, EtpCodec, MetadataStore, PubSubBridge,
    Result, Transport, TransportEvent,
};
use etp_protocol::messages::{
    ChannelData, ChannelMetadata, ChannelMetadataRecord, DataItem, DataValue, DataValueItem,
    GetResourcesResponse, OpenSession, Resource,
};
use etp_protocol::{InboundBody, InboundMessage, MessageHeader, OutboundMessage, ProtocolId};
use etp_types::{LogRecord, WellRecord, WellboreRecord};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeTransport {
    frames: Mutex<Vec<Vec<u8>>>,
    inbound: Mutex<Option<mpsc::Sender<TransportEvent>>>,
    fail_writes: AtomicBool,
}

impl FakeTransport {
    async fn inject(&self, message: InboundMessage) {
        let frame = serde_json::to_vec(&message).unwrap();
        let tx = self.inbound.lock().unwrap().clone().expect("not connected");
        tx.send(TransportEvent::Frame(frame)).await.unwrap();
    }

    async fn drop_connection(&self, reason: &str) {
        let tx = self.inbound.lock().unwrap().clone().expect("not connected");
        tx.send(TransportEvent::ConnectionLost(reason.to_string()))
            .await
            .unwrap();
    }

    fn written(&self) -> Vec<Value> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .map(|frame| serde_json::from_slice(frame).unwrap())
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn connect(&self, _config: ConnectConfig) -> Result<mpsc::Receiver<TransportEvent>> {
        let (tx, rx) = mpsc::channel(64);
        *self.inbound.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn write(&self, frame: Vec<u8>) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BridgeError::WriteFailed {
                reason: "socket torn down".to_string(),
            });
        }
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }
}

struct JsonCodec;

impl EtpCodec for JsonCodec {
    fn encode(&self, message: &OutboundMessage) -> Result<Vec<u8>> {
        serde_json::to_vec(message).map_err(|e| BridgeError::Codec(e.to_string()))
    }

    fn decode(&self, frame: &[u8]) -> Result<InboundMessage> {
        serde_json::from_slice(frame).map_err(|e| BridgeError::Codec(e.to_string()))
    }
}

#[derive(Default)]
struct FakeBridge {
    published: Mutex<Vec<(String, Vec<u8>)>>,
    subscriptions: Mutex<HashMap<String, mpsc::Sender<Vec<u8>>>>,
}

impl FakeBridge {
    async fn send_control(&self, payload: Value) {
        let tx = self
            .subscriptions
            .lock()
            .unwrap()
            .get("etp/stream/request")
            .cloned()
            .expect("engine has not subscribed");
        tx.send(serde_json::to_vec(&payload).unwrap()).await.unwrap();
    }

    fn published_on(&self, topic: &str) -> Vec<Value> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, payload)| serde_json::from_slice(payload).unwrap())
            .collect()
    }
}

#[async_trait]
impl PubSubBridge for FakeBridge {
    async fn subscribe(&self, topic: &str) -> Result<mpsc::Receiver<Vec<u8>>> {
        let (tx, rx) = mpsc::channel(64);
        self.subscriptions.lock().unwrap().insert(topic.to_string(), tx);
        Ok(rx)
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }
}

#[derive(Default)]
struct FakeStore {
    wells: Mutex<Vec<WellRecord>>,
    wellbores: Mutex<Vec<WellboreRecord>>,
    logs: Mutex<Vec<LogRecord>>,
}

#[async_trait]
impl MetadataStore for FakeStore {
    async fn upsert_well(&self, record: WellRecord) -> Result<()> {
        self.wells.lock().unwrap().push(record);
        Ok(())
    }
    async fn upsert_wellbore(&self, record: WellboreRecord) -> Result<()> {
        self.wellbores.lock().unwrap().push(record);
        Ok(())
    }
    async fn upsert_log(&self, record: LogRecord) -> Result<()> {
        self.logs.lock().unwrap().push(record);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    engine: EtpBridge,
    transport: Arc<FakeTransport>,
    bridge: Arc<FakeBridge>,
    store: Arc<FakeStore>,
    disconnected: Arc<AtomicBool>,
}

impl Harness {
    fn new(config: BridgeConfig) -> Self {
        let transport = Arc::new(FakeTransport::default());
        let bridge = Arc::new(FakeBridge::default());
        let store = Arc::new(FakeStore::default());
        let engine = EtpBridge::new(
            config,
            transport.clone(),
            Arc::new(JsonCodec),
            bridge.clone(),
            store.clone(),
        )
        .unwrap();
        Self {
            engine,
            transport,
            bridge,
            store,
            disconnected: Arc::new(AtomicBool::new(false)),
        }
    }

    async fn connect(&self) {
        let flag = self.disconnected.clone();
        self.engine
            .connect("wss://store.example.com/etp", "user", "secret", move |_| {
                flag.store(true, Ordering::SeqCst);
            })
            .await
            .unwrap();
    }

    /// Drive the handshake to SessionOpen (RequestSession out, OpenSession
    /// in, Start out).
    async fn open_session(&self) {
        self.connect().await;
        self.transport.inject(open_session()).await;
        wait_until(|| self.transport.written().len() >= 2).await;
    }

    fn frames_for(&self, protocol: i32, message_type: i32) -> Vec<Value> {
        self.transport
            .written()
            .into_iter()
            .filter(|frame| {
                frame["header"]["protocol"] == json!(protocol)
                    && frame["header"]["messageType"] == json!(message_type)
            })
            .collect()
    }
}

async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 2s");
}

fn open_session() -> InboundMessage {
    InboundMessage {
        header: MessageHeader::new(ProtocolId::Core, 2, 1),
        body: InboundBody::OpenSession(OpenSession {
            application_name: "test-store".to_string(),
            application_version: "7.0".to_string(),
            session_id: "session-1".to_string(),
            supported_protocols: vec![],
            supported_objects: vec![],
        }),
    }
}

fn channel_metadata(channels: &[(i64, &str, &str, &str)]) -> InboundMessage {
    InboundMessage {
        header: MessageHeader::new(ProtocolId::ChannelStreaming, 2, 2),
        body: InboundBody::ChannelMetadata(ChannelMetadata {
            channels: channels
                .iter()
                .map(|&(channel_id, name, uom, uri)| ChannelMetadataRecord {
                    channel_id,
                    channel_uri: uri.to_string(),
                    channel_name: name.to_string(),
                    data_type: "double".to_string(),
                    uom: uom.to_string(),
                    description: String::new(),
                })
                .collect(),
        }),
    }
}

fn channel_data(samples: &[(i64, i64, f64)]) -> InboundMessage {
    InboundMessage {
        header: MessageHeader::new(ProtocolId::ChannelStreaming, 3, 3),
        body: InboundBody::ChannelData(ChannelData {
            data: samples
                .iter()
                .map(|&(channel_id, timestamp, value)| DataItem {
                    channel_id,
                    indexes: vec![timestamp],
                    value: DataValue {
                        item: DataValueItem::Double(value),
                    },
                })
                .collect(),
        }),
    }
}

fn resource_response(uri: &str, content_type: &str, last_changed: i64) -> InboundMessage {
    InboundMessage {
        header: MessageHeader::new(ProtocolId::Discovery, 2, 4),
        body: InboundBody::GetResourcesResponse(GetResourcesResponse {
            resource: Resource {
                uri: uri.to_string(),
                content_type: content_type.to_string(),
                name: "discovered".to_string(),
                resource_type: "DataObject".to_string(),
                custom_data: HashMap::new(),
                last_changed,
                channel_subscribable: true,
                object_notifiable: false,
            },
        }),
    }
}

const L1_URI: &str = "eml://witsml14/well(W1)/wellbore(B1)/log(L1)";
const L2_URI: &str = "eml://witsml14/well(W2)/wellbore(B2)/log(L2)";

// ---------------------------------------------------------------------------
// Handshake
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connect_requests_session_then_open_session_arms_streaming() {
    let harness = Harness::new(BridgeConfig::default());
    harness.connect().await;

    let frames = harness.transport.written();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["header"]["protocol"], json!(0));
    assert_eq!(frames[0]["header"]["messageType"], json!(1));
    assert_eq!(frames[0]["header"]["messageId"], json!(1));
    assert_eq!(
        frames[0]["body"]["RequestSession"]["applicationName"],
        json!("wellbridge")
    );

    harness.transport.inject(open_session()).await;
    wait_until(|| harness.transport.written().len() == 2).await;

    let frames = harness.transport.written();
    assert_eq!(frames[1]["header"]["protocol"], json!(1));
    assert_eq!(frames[1]["header"]["messageType"], json!(0));
    assert_eq!(frames[1]["header"]["messageId"], json!(2));
    assert_eq!(frames[1]["body"]["Start"]["maxMessageRate"], json!(1000));
    assert_eq!(frames[1]["body"]["Start"]["maxDataItems"], json!(10000));
}

#[tokio::test]
async fn duplicate_open_session_does_not_rearm_streaming() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;

    harness.transport.inject(open_session()).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(harness.transport.written().len(), 2);
}

// ---------------------------------------------------------------------------
// Channel streaming
// ---------------------------------------------------------------------------

#[tokio::test]
async fn channel_metadata_starts_streaming_for_registered_channels() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;

    harness
        .transport
        .inject(channel_metadata(&[
            (4, "GR", "gAPI", L1_URI),
            (9, "ROP", "m/h", L1_URI),
        ]))
        .await;
    wait_until(|| !harness.frames_for(1, 4).is_empty()).await;

    let start = &harness.frames_for(1, 4)[0];
    let channels = start["body"]["ChannelStreamingStart"]["channels"]
        .as_array()
        .unwrap();
    assert_eq!(channels.len(), 2);
    assert_eq!(channels[0]["channelId"], json!(4));
    assert_eq!(channels[1]["channelId"], json!(9));
    assert!(channels
        .iter()
        .all(|c| c["receiveChangeNotification"] == json!(true)));
}

#[tokio::test]
async fn channel_data_publishes_one_message_per_log() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;
    harness
        .transport
        .inject(channel_metadata(&[
            (1, "GR", "gAPI", L1_URI),
            (2, "ROP", "m/h", L2_URI),
        ]))
        .await;
    wait_until(|| !harness.frames_for(1, 4).is_empty()).await;

    harness
        .transport
        .inject(channel_data(&[
            (1, 1_700_000_000_000_000, 55.0),
            (2, 1_700_000_000_000_000, 12.5),
        ]))
        .await;
    wait_until(|| harness.bridge.published.lock().unwrap().len() == 2).await;

    let l1_rows = harness.bridge.published_on("etp/stream/incoming/W1/B1/L1");
    assert_eq!(l1_rows.len(), 1);
    let rows = l1_rows[0].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["time"], json!("2023-11-14T22:13:20.000Z"));
    assert_eq!(rows[0]["GR"]["units"], json!("gAPI"));
    assert_eq!(rows[0]["GR"]["value"], json!(55.0));

    let l2_rows = harness.bridge.published_on("etp/stream/incoming/W2/B2/L2");
    assert_eq!(l2_rows.len(), 1);
}

#[tokio::test]
async fn samples_sharing_log_and_timestamp_merge_into_one_row() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;
    harness
        .transport
        .inject(channel_metadata(&[
            (1, "GR", "gAPI", L1_URI),
            (2, "ROP", "m/h", L1_URI),
        ]))
        .await;
    wait_until(|| !harness.frames_for(1, 4).is_empty()).await;

    harness
        .transport
        .inject(channel_data(&[
            (1, 1_700_000_000_000_000, 55.0),
            (2, 1_700_000_000_000_000, 12.5),
        ]))
        .await;
    wait_until(|| !harness.bridge.published.lock().unwrap().is_empty()).await;

    let published = harness.bridge.published_on("etp/stream/incoming/W1/B1/L1");
    assert_eq!(published.len(), 1);
    let rows = published[0].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["GR"]["value"], json!(55.0));
    assert_eq!(rows[0]["ROP"]["value"], json!(12.5));
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn discovery_enumerates_all_three_roots() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;
    harness.engine.initialize_discovery(60).await.unwrap();

    let get_resources = harness.frames_for(3, 1);
    assert_eq!(get_resources.len(), 3);
    let uris: Vec<&str> = get_resources
        .iter()
        .map(|f| f["body"]["GetResources"]["uri"].as_str().unwrap())
        .collect();
    assert_eq!(
        uris,
        vec![
            "eml://witsml14/log",
            "eml://witsml14/well",
            "eml://witsml14/wellbore"
        ]
    );
}

#[tokio::test]
async fn discovered_resources_upsert_into_their_collections() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;

    harness
        .transport
        .inject(resource_response(
            "eml://witsml14/well(W1)",
            "application/x-witsml+xml;version=1.4.1.1;type=well",
            1_700_000_000_000_000,
        ))
        .await;
    harness
        .transport
        .inject(resource_response(
            L1_URI,
            "application/x-witsml+xml;version=1.4.1.1;type=log",
            1_700_000_000_000_000,
        ))
        .await;
    wait_until(|| !harness.store.logs.lock().unwrap().is_empty()).await;

    let wells = harness.store.wells.lock().unwrap();
    assert_eq!(wells.len(), 1);
    assert_eq!(wells[0].uid, "W1");
    assert_eq!(wells[0].uri, "eml://witsml14/well(W1)");
    assert_eq!(wells[0].last_changed.timestamp_millis(), 1_700_000_000_000);

    let logs = harness.store.logs.lock().unwrap();
    assert_eq!(logs[0].uid, "L1");
    assert_eq!(logs[0].parent_well_uid.as_deref(), Some("W1"));
    assert_eq!(logs[0].parent_wellbore_uid.as_deref(), Some("B1"));
}

#[tokio::test]
async fn unclassifiable_resource_is_dropped() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;

    harness
        .transport
        .inject(resource_response(
            "eml://witsml14/well(W1)",
            "application/x-witsml+xml;version=1.4.1.1",
            0,
        ))
        .await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(harness.store.wells.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Stream control
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_command_describes_log_and_echoes_ok() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;
    harness.engine.initialize_discovery(60).await.unwrap();

    harness
        .bridge
        .send_control(json!({
            "command": "start",
            "wellUid": "W1",
            "wellboreUid": "B1",
            "logUid": "L1",
        }))
        .await;
    wait_until(|| !harness.bridge.published_on("etp/stream/response").is_empty()).await;

    let describes = harness.frames_for(1, 1);
    assert_eq!(describes.len(), 1);
    assert_eq!(
        describes[0]["body"]["ChannelDescribe"]["uris"],
        json!([L1_URI])
    );
    // no destination log configured, so nothing was written to the store
    assert!(harness.frames_for(4, 2).is_empty());

    let responses = harness.bridge.published_on("etp/stream/response");
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["error"], json!(false));
    assert_eq!(responses[0]["logUid"], json!("L1"));
}

#[tokio::test]
async fn start_command_creates_destination_log_when_configured() {
    let config = BridgeConfig {
        create_destination_log_on_stream_start: true,
        destination_log_name: Some("mirrored stream".to_string()),
        destination_log_uid: Some("L-DEST".to_string()),
        destination_mnemonics: Some(vec![etp_types::MnemonicSpec {
            mnemonic: "GR".to_string(),
            unit: "gAPI".to_string(),
            data_type: "double".to_string(),
        }]),
        ..Default::default()
    };
    let harness = Harness::new(config);
    harness.open_session().await;
    harness.engine.initialize_discovery(60).await.unwrap();

    harness
        .bridge
        .send_control(json!({
            "command": "start",
            "wellUid": "W1",
            "wellboreUid": "B1",
            "logUid": "L1",
        }))
        .await;
    wait_until(|| !harness.bridge.published_on("etp/stream/response").is_empty()).await;

    let puts = harness.frames_for(4, 2);
    assert_eq!(puts.len(), 1);
    let resource_uri = puts[0]["body"]["PutObject"]["dataObject"]["resource"]["uri"]
        .as_str()
        .unwrap();
    assert_eq!(
        resource_uri,
        "eml://witsml14/well(W1)/wellbore(B1)/log(L-DEST)"
    );
    let data: Vec<u8> = puts[0]["body"]["PutObject"]["dataObject"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap() as u8)
        .collect();
    let document = String::from_utf8(data).unwrap();
    assert!(document.contains("<name>mirrored stream</name>"));
    assert!(document.contains("<mnemonic>GR</mnemonic>"));

    assert_eq!(harness.frames_for(1, 1).len(), 1);
}

#[tokio::test]
async fn failed_describe_echoes_error_exactly_once() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;
    harness.engine.initialize_discovery(60).await.unwrap();

    harness.transport.fail_writes.store(true, Ordering::SeqCst);
    harness
        .bridge
        .send_control(json!({
            "command": "start",
            "wellUid": "W1",
            "wellboreUid": "B1",
            "logUid": "L1",
        }))
        .await;
    wait_until(|| !harness.bridge.published_on("etp/stream/response").is_empty()).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let responses = harness.bridge.published_on("etp/stream/response");
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["error"], json!(true));
    assert!(responses[0]["reason"].as_str().unwrap().contains("write failed"));
}

#[tokio::test]
async fn stop_command_is_accepted_but_does_nothing() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;
    harness.engine.initialize_discovery(60).await.unwrap();
    let frames_before = harness.transport.written().len();

    harness
        .bridge
        .send_control(json!({
            "command": "stop",
            "wellUid": "W1",
            "wellboreUid": "B1",
            "logUid": "L1",
        }))
        .await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(harness.transport.written().len(), frames_before);
    assert!(harness.bridge.published_on("etp/stream/response").is_empty());
}

// ---------------------------------------------------------------------------
// Store writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn write_log_data_builds_one_put_object_with_row_entries() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;

    let rows = vec![
        vec![("Time".to_string(), "0".to_string()), ("GR".to_string(), "55".to_string())],
        vec![("Time".to_string(), "60".to_string()), ("GR".to_string(), "57".to_string())],
    ];
    harness
        .engine
        .write_log_data_to_store("W1", "B1", "L1", &rows)
        .await
        .unwrap();

    let puts = harness.frames_for(4, 2);
    assert_eq!(puts.len(), 1);
    let data: Vec<u8> = puts[0]["body"]["PutObject"]["dataObject"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap() as u8)
        .collect();
    let document = String::from_utf8(data).unwrap();
    assert_eq!(document.matches("<logData>").count(), 2);
    assert_eq!(document.matches("<mnemonicList>Time,GR</mnemonicList>").count(), 2);
    assert_eq!(
        puts[0]["body"]["PutObject"]["dataObject"]["resource"]["contentType"],
        json!("application/x-witsml+xml;version=1.4.1.1;type=log")
    );
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connection_loss_fires_callback_and_blocks_further_sends() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;

    harness.transport.drop_connection("socket reset").await;
    wait_until(|| harness.disconnected.load(Ordering::SeqCst)).await;

    let result = harness.engine.start_stream_for_log_uri(L1_URI).await;
    assert!(matches!(result, Err(BridgeError::NotConnected)));
}

#[tokio::test]
async fn start_stream_rejects_malformed_uri_before_sending() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;
    let frames_before = harness.transport.written().len();

    let result = harness
        .engine
        .start_stream_for_log_uri("eml://witsml14/well")
        .await;
    assert!(matches!(result, Err(BridgeError::MalformedUri(_))));
    assert_eq!(harness.transport.written().len(), frames_before);
}

#[tokio::test]
async fn stop_stream_is_explicitly_unsupported() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;

    let result = harness.engine.stop_stream_for_log_uri(L1_URI).await;
    assert!(matches!(result, Err(BridgeError::NotSupported(_))));
}

#[tokio::test]
async fn message_ids_stay_strictly_increasing_across_operations() {
    let harness = Harness::new(BridgeConfig::default());
    harness.open_session().await;
    harness.engine.initialize_discovery(60).await.unwrap();
    harness.engine.start_stream_for_log_uri(L1_URI).await.unwrap();

    let ids: Vec<i64> = harness
        .transport
        .written()
        .iter()
        .map(|frame| frame["header"]["messageId"].as_i64().unwrap())
        .collect();
    let expected: Vec<i64> = (1..=ids.len() as i64).collect();
    assert_eq!(ids, expected);
}
