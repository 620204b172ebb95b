//! WebSocket session with the controller.

use log::{debug, error, info};
use serde_json::{Map, Value};

use crate::config::ControllerConfig;
use crate::errors::Error;
use crate::history::{MessageHistory, MessageType};
use crate::protocol::{Action, RequestEnvelope, Response};
use crate::runtime::{self, Connector, Instant, MessageSocket, Mutex, WsConnector};
use crate::token::TokenGenerator;

type Result<T> = std::result::Result<T, Error>;

struct Channel {
    socket: Option<Box<dyn MessageSocket>>,
    request_id: u64,
    last_send: Option<Instant>,
}

/// A connection to one controller endpoint.
///
/// The session owns the socket and hands it to one request at a time. Callers that arrive
/// while a request is in flight wait their turn, and consecutive sends are spaced by at least
/// [`ControllerConfig::min_request_interval`]. A lost connection is reopened on the next
/// request.
///
/// Failures never propagate: [`Session::connect`] returns `false` and
/// [`Session::send_request`] returns [`Response::empty`]. The reason is logged and kept in
/// the message history.
///
/// # Example
///
/// ```no_run
/// use amaran_lights_rs::{ControllerConfig, Session};
///
/// # async fn run() {
/// let session = Session::new(ControllerConfig::new("192.168.1.20", 12345, "c2VjcmV0"));
/// let devices = session.get_device_list().await;
/// if devices.is_empty() {
///     eprintln!("controller unavailable");
/// }
/// # }
/// ```
pub struct Session {
    config: ControllerConfig,
    tokens: TokenGenerator,
    connector: Box<dyn Connector>,
    channel: Mutex<Channel>,
    history: Mutex<MessageHistory>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Client id sent with every request.
    pub const CLIENT_ID: u64 = 1;

    pub fn new(config: ControllerConfig) -> Self {
        Self::with_connector(config, WsConnector)
    }

    /// Create a session that opens its sockets through `connector`.
    pub fn with_connector(config: ControllerConfig, connector: impl Connector + 'static) -> Self {
        Session {
            tokens: TokenGenerator::new(&config.api_key),
            config,
            connector: Box::new(connector),
            channel: Mutex::new(Channel {
                socket: None,
                request_id: 1,
                last_send: None,
            }),
            history: Mutex::new(MessageHistory::new()),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Open the connection, replacing any existing one.
    pub async fn connect(&self) -> bool {
        let mut channel = self.channel.lock().await;
        self.open(&mut channel).await
    }

    pub async fn is_connected(&self) -> bool {
        self.channel.lock().await.socket.is_some()
    }

    /// The id the next request will carry.
    pub async fn next_request_id(&self) -> u64 {
        self.channel.lock().await.request_id
    }

    /// Close the connection. The next request reopens it.
    pub async fn close(&self) {
        let socket = self.channel.lock().await.socket.take();
        if let Some(mut socket) = socket {
            if let Err(e) = socket.close().await {
                debug!("Error while closing controller connection: {e}");
            }
            info!("Disconnected from {}:{}", self.config.host, self.config.port);
        }
    }

    /// Send one request and wait for its reply.
    ///
    /// `node_id` and `args` are left out of the envelope when absent or empty. Returns the
    /// empty response if the controller cannot be reached, the token cannot be generated or
    /// the exchange fails; in the last case the connection is dropped.
    pub async fn send_request(
        &self,
        action: impl AsRef<str>,
        node_id: Option<&str>,
        args: Option<Map<String, Value>>,
    ) -> Response {
        let action = action.as_ref();
        let mut channel = self.channel.lock().await;

        if channel.socket.is_none() && !self.open(&mut channel).await {
            return Response::empty();
        }

        if let Some(last) = channel.last_send {
            let elapsed = last.elapsed();
            if elapsed < self.config.min_request_interval {
                runtime::sleep(self.config.min_request_interval - elapsed).await;
            }
        }

        let token = self.tokens.generate();
        if token.is_empty() {
            error!("Cannot send {action}: no valid token");
            self.history
                .lock()
                .await
                .record_error(&format!("{action}: token generation failed"));
            return Response::empty();
        }

        let envelope =
            RequestEnvelope::new(Self::CLIENT_ID, channel.request_id, action, token, node_id, args);

        channel.last_send = Some(Instant::now());
        match self.exchange(&mut channel, &envelope).await {
            Ok(response) => response,
            Err(e) => {
                error!("Request {action} failed, dropping connection: {e}");
                channel.socket = None;
                self.history
                    .lock()
                    .await
                    .record_error(&format!("{action}: {e}"));
                Response::empty()
            }
        }
    }

    pub async fn get_device_list(&self) -> Response {
        self.send_request(Action::GetDeviceList, None, None).await
    }

    pub async fn get_node_config(&self, node_id: &str) -> Response {
        self.send_request(Action::GetNodeConfig, Some(node_id), None)
            .await
    }

    pub async fn get_quickshot_list(&self) -> Response {
        self.send_request(Action::GetQuickshotList, None, None).await
    }

    pub async fn get_preset_list(&self) -> Response {
        self.send_request(Action::GetPresetList, None, None).await
    }

    pub async fn history(&self) -> MessageHistory {
        self.history.lock().await.clone()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    async fn open(&self, channel: &mut Channel) -> bool {
        let (host, port) = (self.config.host.as_str(), self.config.port);
        match self.connector.connect(host, port).await {
            Ok(socket) => {
                if let Some(mut old) = channel.socket.replace(socket) {
                    if let Err(e) = old.close().await {
                        debug!("Error while closing previous controller connection: {e}");
                    }
                }
                info!("Connected to controller at {host}:{port}");
                true
            }
            Err(e) => {
                error!("Failed to connect to controller at {host}:{port}: {e}");
                self.history
                    .lock()
                    .await
                    .record_error(&format!("connect: {e}"));
                false
            }
        }
    }

    async fn exchange(&self, channel: &mut Channel, envelope: &RequestEnvelope) -> Result<Response> {
        let message = serde_json::to_value(envelope).map_err(Error::JsonDump)?;
        let text = message.to_string();
        let socket = channel.socket.as_mut().ok_or(Error::Closed)?;

        debug!("Sending {} (request {})", envelope.action, envelope.request_id);
        self.history
            .lock()
            .await
            .record(MessageType::Send, &envelope.action, &message);
        socket.send_text(text).await?;
        channel.request_id += 1;

        let timeout = self.config.receive_timeout;
        let reply = runtime::timeout(timeout, socket.recv_text())
            .await
            .map_err(|_| Error::Timeout(timeout))??;
        debug!("Received reply to {}: {reply}", envelope.action);

        let value: Value = serde_json::from_str(&reply).map_err(Error::JsonLoad)?;
        self.history
            .lock()
            .await
            .record(MessageType::Receive, &envelope.action, &value);
        match value {
            Value::Object(map) => Ok(Response::from(map)),
            other => Err(Error::UnexpectedResponse(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures::{SinkExt, StreamExt};
    use serde_json::json;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    use super::*;
    use crate::testing::{self, MockController, Reply};

    fn session(controller: &MockController) -> Session {
        Session::with_connector(testing::config(), controller.connector())
    }

    #[tokio::test]
    async fn test_connects_lazily_and_returns_reply() {
        let controller = MockController::echo();
        let session = session(&controller);
        assert!(!session.is_connected().await);

        let resp = session.get_device_list().await;

        assert_eq!(resp.data(), Some(&json!(1)));
        assert_eq!(controller.connects(), 1);
        assert!(session.is_connected().await);
        let sent = controller.sent();
        assert_eq!(sent[0]["version"], 2);
        assert_eq!(sent[0]["type"], "request");
        assert_eq!(sent[0]["client_id"], 1);
        assert_eq!(sent[0]["action"], "get_device_list");
        assert!(!sent[0]["token"].as_str().unwrap().is_empty());
        assert!(sent[0].get("node_id").is_none());
    }

    #[tokio::test]
    async fn test_connect_replaces_existing_socket() {
        let controller = MockController::echo();
        let session = session(&controller);
        controller.fail_close(true);

        assert!(session.connect().await);
        assert!(session.connect().await);

        assert_eq!(controller.connects(), 2);
        assert_eq!(controller.closes(), 1);
        assert!(session.is_connected().await);
        assert_eq!(session.get_device_list().await.data(), Some(&json!(1)));
        assert_eq!(controller.connects(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_paced_and_numbered() {
        let controller = MockController::echo();
        let session = Arc::new(session(&controller));

        let tasks: Vec<_> = (0..4)
            .map(|i| {
                let session = session.clone();
                tokio::spawn(async move {
                    session
                        .send_request(Action::GetIntensity, Some(&format!("node-{i}")), None)
                        .await
                })
            })
            .collect();
        for task in tasks {
            assert!(!task.await.unwrap().is_empty());
        }

        let ids: Vec<u64> = controller
            .sent()
            .iter()
            .map(|v| v["request_id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(session.next_request_id().await, 5);

        // recorded by the socket, slightly after the session's own send stamp
        let times = controller.send_times();
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(199));
        }
    }

    #[tokio::test]
    async fn test_transport_fault_drops_socket_and_reconnects() {
        let controller = MockController::new(|req| {
            if req["request_id"] == 1 {
                Reply::Drop
            } else {
                Reply::Json(json!({"data": "ok"}))
            }
        });
        let session = session(&controller);

        assert!(session.get_preset_list().await.is_empty());
        assert!(!session.is_connected().await);
        assert!(session.history().await.last_error().is_some());

        let resp = session.get_preset_list().await;
        assert_eq!(resp.data(), Some(&json!("ok")));
        assert_eq!(controller.connects(), 2);
    }

    #[tokio::test]
    async fn test_non_object_reply_is_a_fault() {
        let controller = MockController::new(|_| Reply::Raw("[1, 2]".to_string()));
        let session = session(&controller);

        assert!(session.get_device_list().await.is_empty());
        assert!(!session.is_connected().await);
    }

    #[tokio::test]
    async fn test_receive_timeout_is_a_fault() {
        let controller = MockController::new(|_| Reply::Silent);
        let config = testing::config().with_receive_timeout(Duration::from_millis(50));
        let session = Session::with_connector(config, controller.connector());

        assert!(session.get_device_list().await.is_empty());
        assert!(!session.is_connected().await);
        assert_eq!(session.next_request_id().await, 2);
    }

    #[tokio::test]
    async fn test_invalid_secret_sends_nothing() {
        let controller = MockController::echo();
        let config = ControllerConfig::new("controller.test", 12345, "c2hvcnQ=");
        let session = Session::with_connector(config, controller.connector());

        assert!(session.get_device_list().await.is_empty());
        assert!(controller.sent().is_empty());
        assert_eq!(session.next_request_id().await, 1);
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let controller = MockController::echo();
        controller.refuse_connections(true);
        let session = session(&controller);

        assert!(!session.connect().await);
        assert!(session.get_device_list().await.is_empty());
        assert!(controller.sent().is_empty());
    }

    #[tokio::test]
    async fn test_history_hides_token() {
        let controller = MockController::echo();
        let session = session(&controller);
        session.get_node_config("node-7").await;

        let history = session.history().await;
        let sent = history.last(MessageType::Send, "get_node_config").unwrap();
        assert_eq!(sent.message["node_id"], "node-7");
        assert!(sent.message.get("token").is_none());
        assert!(history.last(MessageType::Receive, "get_node_config").is_some());

        session.clear_history().await;
        assert!(session.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let session = Session::new(ControllerConfig::new("127.0.0.1", port, testing::SECRET));
        assert!(!session.connect().await);
        assert!(session.get_device_list().await.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_over_websocket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            while let Some(Ok(msg)) = ws.next().await {
                if let Message::Text(text) = msg {
                    let req: Value = serde_json::from_str(text.as_str()).unwrap();
                    let reply = json!({
                        "request_id": req["request_id"],
                        "data": {"node_id": req["node_id"], "intensity": 500},
                    });
                    ws.send(Message::Text(reply.to_string().into())).await.unwrap();
                }
            }
        });

        let session = Session::new(ControllerConfig::new("127.0.0.1", port, testing::SECRET));
        assert!(session.connect().await);
        let resp = session
            .send_request(Action::GetIntensity, Some("node-1"), None)
            .await;

        assert_eq!(resp.get("request_id"), Some(&json!(1)));
        assert_eq!(resp.data().unwrap()["node_id"], "node-1");

        session.close().await;
        assert!(!session.is_connected().await);
        server.await.unwrap();
    }
}
