//! Push listener - Socket.IO subscription to the honeypot's live events.
//!
//! Speaks just enough Engine.IO/Socket.IO over a WebSocket to join the
//! default namespace, answer pings and receive `face_update` and
//! `activity_update`. Every received event is forwarded immediately, in
//! arrival order. Lifecycle is reported as transport signals; reconnecting
//! with backoff is done here so the connection monitor only has to reflect.

use crate::config::{PushConfig, ServerConfig};
use crate::event::{DashEvent, TransportSignal};
use futures_util::{SinkExt, StreamExt};
use rassh_shared::socketio::{self, Packet};
use rassh_shared::{PushEvent, RasshError};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// Server or network closed the channel
    Dropped,
    /// The controller queue is gone, stop for good
    QueueClosed,
}

#[derive(Debug, Clone)]
pub struct PushListener {
    url: String,
    reconnect_min: Duration,
    reconnect_max: Duration,
}

impl PushListener {
    pub fn new(url: impl Into<String>, reconnect_min: Duration, reconnect_max: Duration) -> Self {
        Self {
            url: url.into(),
            reconnect_min,
            reconnect_max: reconnect_max.max(reconnect_min),
        }
    }

    pub fn from_config(server: &ServerConfig, push: &PushConfig) -> Result<Self, RasshError> {
        let url = socketio::websocket_url(&server.base_url, &server.socket_path)?;
        Ok(Self::new(
            url,
            Duration::from_millis(push.reconnect_delay_ms),
            Duration::from_millis(push.reconnect_delay_max_ms),
        ))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Subscribe; events go to `tx` until the handle is dropped or unsubscribed
    pub fn spawn(self, tx: mpsc::Sender<DashEvent>) -> PushHandle {
        PushHandle {
            task: tokio::spawn(self.run(tx)),
        }
    }

    async fn run(self, tx: mpsc::Sender<DashEvent>) {
        let mut delay = self.reconnect_min;

        loop {
            match connect_async(self.url.as_str()).await {
                Ok((socket, _response)) => {
                    debug!(url = %self.url, "WebSocket open");
                    let (end, joined) = session(socket, &tx).await;
                    if joined {
                        delay = self.reconnect_min;
                        if tx.send(DashEvent::Transport(TransportSignal::Lost)).await.is_err() {
                            return;
                        }
                    }
                    if end == SessionEnd::QueueClosed {
                        return;
                    }
                }
                Err(e) => {
                    debug!(url = %self.url, error = %e, "Push channel connect failed");
                }
            }

            if tx.is_closed() {
                return;
            }
            sleep(delay).await;
            delay = (delay * 2).min(self.reconnect_max);
        }
    }
}

/// Subscription handle
pub struct PushHandle {
    task: JoinHandle<()>,
}

impl PushHandle {
    /// Stop listening and drop the connection
    pub fn unsubscribe(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Longest silence tolerated once the server has announced its heartbeat
fn heartbeat_deadline(ping_interval: u64, ping_timeout: u64) -> Option<Duration> {
    match ping_interval.saturating_add(ping_timeout) {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    }
}

/// Drive one WebSocket connection. Returns how it ended and whether the
/// namespace was joined (i.e. a `Established` signal was sent).
///
/// After the open packet every read must arrive within
/// `pingInterval + pingTimeout`; a silent server counts as gone.
async fn session(mut socket: Socket, tx: &mpsc::Sender<DashEvent>) -> (SessionEnd, bool) {
    let mut joined = false;
    let mut deadline: Option<Duration> = None;

    loop {
        let next = match deadline {
            Some(limit) => match timeout(limit, socket.next()).await {
                Ok(next) => next,
                Err(_) => {
                    warn!(silent_ms = limit.as_millis() as u64, "Push channel heartbeat missed");
                    break;
                }
            },
            None => socket.next().await,
        };
        let Some(message) = next else {
            break;
        };

        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "Push channel read error");
                break;
            }
        };

        let packet = match socketio::decode(&text) {
            Ok(packet) => packet,
            Err(e) => {
                warn!(error = %e, "Discarding undecodable frame");
                continue;
            }
        };

        let forwarded = match packet {
            Packet::Open(info) => {
                debug!(sid = %info.sid, ping_interval = info.ping_interval, "Engine.IO open");
                deadline = heartbeat_deadline(info.ping_interval, info.ping_timeout);
                if socket.send(Message::Text(socketio::connect_frame())).await.is_err() {
                    break;
                }
                None
            }
            Packet::Ping(payload) => {
                if socket.send(Message::Text(socketio::pong_frame(&payload))).await.is_err() {
                    break;
                }
                None
            }
            Packet::Connect { namespace } => {
                info!(namespace = %namespace, "Subscribed to honeypot events");
                joined = true;
                Some(DashEvent::Transport(TransportSignal::Established))
            }
            Packet::Disconnect { .. } | Packet::Close => break,
            Packet::ConnectError { message, .. } => {
                warn!(message = %message, "Honeypot refused subscription");
                break;
            }
            Packet::Event { name, payload, .. } => match PushEvent::from_event(&name, payload) {
                Ok(Some(PushEvent::Face(update))) => Some(DashEvent::Face(update)),
                Ok(Some(PushEvent::Activity(record))) => Some(DashEvent::Activity(record)),
                Ok(None) => {
                    debug!(event = %name, "Ignoring event");
                    None
                }
                Err(e) => {
                    warn!(error = %e, "Discarding malformed push event");
                    None
                }
            },
            Packet::Pong(_) | Packet::Noop | Packet::Unsupported(_) => None,
        };

        if let Some(event) = forwarded {
            if tx.send(event).await.is_err() {
                return (SessionEnd::QueueClosed, joined);
            }
        }
    }

    (SessionEnd::Dropped, joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_url_from_config() {
        let server = ServerConfig::default();
        let listener = PushListener::from_config(&server, &PushConfig::default()).unwrap();
        assert_eq!(
            listener.url(),
            "ws://127.0.0.1:8080/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn test_heartbeat_deadline() {
        assert_eq!(
            heartbeat_deadline(25_000, 20_000),
            Some(Duration::from_millis(45_000))
        );
        assert_eq!(heartbeat_deadline(0, 0), None);
    }

    #[test]
    fn test_backoff_cap_never_below_floor() {
        let listener = PushListener::new(
            "ws://localhost",
            Duration::from_secs(3),
            Duration::from_secs(1),
        );
        assert_eq!(listener.reconnect_max, Duration::from_secs(3));
    }
}
