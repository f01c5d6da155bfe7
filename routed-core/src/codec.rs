//
// Copyright (c) The routed Contributors
//
// SPDX-License-Identifier: MIT
//

//! Message codec: the tagged textual envelope used on the protocol port,
//! and the untagged `INTENT` message used on the control port.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CodecError;
use crate::types::{Lsa, NodeId};

/// A decoded protocol-port message (HELLO or LSA). Any other `type` value,
/// including the wire-legal but functionally unused `ACK`, decodes to
/// `Unknown` and is dropped silently by the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    Hello { from: NodeId },
    Lsa(Lsa),
    Unknown(String),
}

#[derive(Deserialize, Serialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    payload: Value,
}

#[derive(Deserialize, Serialize)]
struct HelloPayload {
    from: NodeId,
}

impl Message {
    /// Decodes one datagram received on the protocol port.
    pub fn decode(bytes: &[u8]) -> Result<Message, CodecError> {
        let envelope: Envelope = serde_json::from_slice(bytes)
            .map_err(|e| CodecError::Envelope(e.to_string()))?;
        match envelope.kind.as_str() {
            "HELLO" => {
                let payload: HelloPayload =
                    serde_json::from_value(envelope.payload)
                        .map_err(|e| CodecError::Payload(e.to_string()))?;
                Ok(Message::Hello { from: payload.from })
            }
            "LSA" => {
                // The LSA payload is a JSON object serialized as a string
                // inside the envelope, per the wire format.
                let raw: String = serde_json::from_value(envelope.payload)
                    .map_err(|e| CodecError::Payload(e.to_string()))?;
                let lsa: Lsa = serde_json::from_str(&raw)
                    .map_err(|e| CodecError::Payload(e.to_string()))?;
                Ok(Message::Lsa(lsa))
            }
            other => Ok(Message::Unknown(other.to_owned())),
        }
    }

    /// Encodes this message for transmission on the protocol port.
    pub fn encode(&self) -> Vec<u8> {
        let envelope = match self {
            Message::Hello { from } => Envelope {
                kind: "HELLO".to_owned(),
                payload: serde_json::to_value(HelloPayload { from: from.clone() })
                    .expect("HELLO payload always serializes"),
            },
            Message::Lsa(lsa) => {
                let raw = serde_json::to_string(lsa)
                    .expect("LSA always serializes");
                Envelope {
                    kind: "LSA".to_owned(),
                    payload: Value::String(raw),
                }
            }
            Message::Unknown(kind) => Envelope {
                kind: kind.clone(),
                payload: Value::Null,
            },
        };
        serde_json::to_vec(&envelope).expect("envelope always serializes")
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::Hello { .. } => "HELLO",
            Message::Lsa(_) => "LSA",
            Message::Unknown(_) => "UNKNOWN",
        }
    }
}

/// An `INTENT` message received on the (separate) control port. Unlike
/// protocol messages this is sent bare, with no `{type, payload}` envelope
/// around it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IntentMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub src: String,
    pub dst: String,
    pub max_latency: Option<u32>,
    pub min_bandwidth: Option<u32>,
}

impl IntentMessage {
    pub fn decode(bytes: &[u8]) -> Result<IntentMessage, CodecError> {
        serde_json::from_slice(bytes)
            .map_err(|e| CodecError::Payload(e.to_string()))
    }

    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("intent message always serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LinkEntry, LinkMetrics, StubLink};

    #[test]
    fn hello_round_trips() {
        let msg = Message::Hello {
            from: NodeId::new("r1"),
        };
        let bytes = msg.encode();
        assert_eq!(Message::decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn lsa_round_trips() {
        let mut lsa = Lsa::new(NodeId::new("r1"), 7);
        lsa.links.insert(
            "r2".to_owned(),
            LinkEntry::Peer(LinkMetrics {
                cost: 1,
                latency: 5,
                bandwidth: 100,
                up: true,
            }),
        );
        lsa.links.insert(
            "10.0.1.0/24".to_owned(),
            LinkEntry::Stub(StubLink::new(1)),
        );
        let msg = Message::Lsa(lsa.clone());
        let bytes = msg.encode();
        match Message::decode(&bytes).unwrap() {
            Message::Lsa(decoded) => assert_eq!(decoded, lsa),
            other => panic!("expected LSA, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_dropped_not_erred() {
        let bytes = br#"{"type":"ACK","payload":null}"#;
        match Message::decode(bytes).unwrap() {
            Message::Unknown(kind) => assert_eq!(kind, "ACK"),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn malformed_datagram_is_an_error() {
        assert!(Message::decode(b"not json").is_err());
    }

    #[test]
    fn intent_has_no_envelope() {
        let bytes = br#"{"type":"INTENT","src":"pc1","dst":"pc5","max_latency":12,"min_bandwidth":null}"#;
        let intent = IntentMessage::decode(bytes).unwrap();
        assert_eq!(intent.src, "pc1");
        assert_eq!(intent.dst, "pc5");
        assert_eq!(intent.max_latency, Some(12));
        assert_eq!(intent.min_bandwidth, None);
    }
}
