#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use gmail_extract::RawMessage;
use serde_json::{Value, json};

/// URL-safe base64, as the provider delivers body data
pub fn encode(text: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(text)
}

pub fn text_part(mime_type: &str, text: &str) -> Value {
    json!({
        "mimeType": mime_type,
        "filename": "",
        "body": { "size": text.len(), "data": encode(text) }
    })
}

pub fn attachment_part(filename: &str, mime_type: &str, attachment_id: &str) -> Value {
    json!({
        "mimeType": mime_type,
        "filename": filename,
        "body": { "size": 1024, "attachmentId": attachment_id }
    })
}

pub fn message(headers: Value, parts: Value) -> RawMessage {
    RawMessage::from_value(json!({
        "id": "18c2f0a1b2c3d4e5",
        "threadId": "18c2f0a1b2c3d4e5",
        "labelIds": ["INBOX", "UNREAD"],
        "internalDate": "1700000000000",
        "payload": {
            "mimeType": "multipart/mixed",
            "headers": headers,
            "parts": parts
        }
    }))
    .unwrap()
}
