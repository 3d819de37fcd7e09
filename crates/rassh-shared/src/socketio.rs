//! Minimal Socket.IO (protocol v5) over Engine.IO (v4) text-frame codec.
//!
//! Only what a read-only subscriber needs: the open handshake, ping/pong,
//! namespace connect/disconnect and event packets. Binary attachments are
//! not used by the honeypot and decode as [`Packet::Unsupported`].

use crate::error::RasshError;
use serde::Deserialize;
use serde_json::Value;

/// Engine.IO protocol revision requested in the handshake URL
pub const ENGINE_IO_VERSION: u8 = 4;

/// Handshake parameters sent by the server in the Engine.IO open packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInfo {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

/// A decoded text frame
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Engine.IO open (`0{...}`)
    Open(OpenInfo),
    /// Engine.IO close (`1`)
    Close,
    /// Engine.IO ping (`2`), payload must be echoed in the pong
    Ping(String),
    /// Engine.IO pong (`3`)
    Pong(String),
    /// Engine.IO noop (`6`)
    Noop,
    /// Socket.IO namespace connected (`40`)
    Connect { namespace: String },
    /// Socket.IO namespace disconnected (`41`)
    Disconnect { namespace: String },
    /// Socket.IO event (`42["name", payload]`)
    Event {
        namespace: String,
        name: String,
        payload: Value,
    },
    /// Socket.IO connect refused (`44{...}`)
    ConnectError { namespace: String, message: String },
    /// Anything this subscriber does not act on
    Unsupported(String),
}

/// Frame the client sends to join the default namespace
pub fn connect_frame() -> String {
    "40".to_string()
}

/// Reply to an Engine.IO ping
pub fn pong_frame(payload: &str) -> String {
    format!("3{}", payload)
}

/// Build the WebSocket URL for a dashboard base URL
///
/// `http://host:8080` becomes `ws://host:8080/socket.io/?EIO=4&transport=websocket`.
pub fn websocket_url(base_url: &str, socket_path: &str) -> Result<String, RasshError> {
    let base = base_url.trim_end_matches('/');
    let rest = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_string()
    } else {
        return Err(RasshError::Frame(format!(
            "unsupported URL scheme in '{}'",
            base_url
        )));
    };

    let path = format!("/{}", socket_path.trim_matches('/'));
    Ok(format!(
        "{}{}/?EIO={}&transport=websocket",
        rest, path, ENGINE_IO_VERSION
    ))
}

/// Decode one text frame
pub fn decode(frame: &str) -> Result<Packet, RasshError> {
    let mut chars = frame.chars();
    let kind = chars
        .next()
        .ok_or_else(|| RasshError::Frame("empty frame".to_string()))?;
    let body = chars.as_str();

    match kind {
        '0' => {
            let info: OpenInfo = serde_json::from_str(body)
                .map_err(|e| RasshError::Frame(format!("bad open packet: {}", e)))?;
            Ok(Packet::Open(info))
        }
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping(body.to_string())),
        '3' => Ok(Packet::Pong(body.to_string())),
        '4' => decode_socket_packet(body),
        '6' => Ok(Packet::Noop),
        _ => Ok(Packet::Unsupported(frame.to_string())),
    }
}

fn decode_socket_packet(body: &str) -> Result<Packet, RasshError> {
    let mut chars = body.chars();
    let kind = chars
        .next()
        .ok_or_else(|| RasshError::Frame("empty socket.io packet".to_string()))?;
    let mut rest = chars.as_str();

    let mut namespace = "/".to_string();
    if rest.starts_with('/') {
        let end = rest.find(',').unwrap_or(rest.len());
        namespace = rest[..end].to_string();
        rest = rest.get(end + 1..).unwrap_or("");
    }

    // Ack ids are irrelevant to a subscriber that never acknowledges
    let data = rest.trim_start_matches(|c: char| c.is_ascii_digit());

    match kind {
        '0' => Ok(Packet::Connect { namespace }),
        '1' => Ok(Packet::Disconnect { namespace }),
        '2' => {
            let value: Value = serde_json::from_str(data)
                .map_err(|e| RasshError::Frame(format!("bad event packet: {}", e)))?;
            let mut items = match value {
                Value::Array(items) if !items.is_empty() => items.into_iter(),
                _ => return Err(RasshError::Frame("event packet is not a list".to_string())),
            };
            let name = match items.next() {
                Some(Value::String(name)) => name,
                _ => return Err(RasshError::Frame("event name is not a string".to_string())),
            };
            let payload = items.next().unwrap_or(Value::Null);
            Ok(Packet::Event {
                namespace,
                name,
                payload,
            })
        }
        '4' => {
            let message = serde_json::from_str::<Value>(data)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| data.to_string());
            Ok(Packet::ConnectError { namespace, message })
        }
        _ => Ok(Packet::Unsupported(format!("4{}", body))),
    }
}
