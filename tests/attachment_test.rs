mod common;

use common::{attachment_part, encode, message, text_part};
use gmail_extract::*;
use serde_json::json;
use std::cell::RefCell;

type FetchResult = std::result::Result<Option<String>, BoxError>;

fn mixed_message() -> RawMessage {
    message(
        json!([{"name": "Subject", "value": "Invoices"}]),
        json!([
            text_part("text/plain", "See attached"),
            attachment_part("invoice.pdf", "application/pdf", "att-1"),
            attachment_part("archive.zip", "application/zip", "att-2"),
            {
                "mimeType": "multipart/mixed",
                "parts": [attachment_part("scan.png", "image/png", "att-3")]
            },
        ]),
    )
}

#[test]
fn test_is_allowed() {
    assert!(is_allowed("image/png; charset=binary"));
    assert!(!is_allowed("application/zip"));
    assert!(!is_allowed(""));
}

#[test]
fn test_is_allowed_table() {
    for content_type in [
        "image/png",
        "image/jpeg",
        "image/jpg",
        "image/webp",
        "application/pdf",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "application/xml",
        "text/xml",
    ] {
        assert!(is_allowed(content_type), "{content_type} should be allowed");
    }

    for content_type in ["text/plain", "text/html", "image/gif", ";", "   ", "pdf"] {
        assert!(!is_allowed(content_type), "{content_type} should be rejected");
    }
}

#[test]
fn test_is_allowed_ignores_parameters_and_case() {
    assert!(is_allowed("  application/pdf ; name=\"a.pdf\""));
    assert!(is_allowed("IMAGE/PNG"));
}

#[test]
fn test_extension_for() {
    assert_eq!(extension_for("image/jpeg"), Some("jpeg"));
    assert_eq!(
        extension_for("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        Some("xlsx")
    );
    assert_eq!(extension_for("text/xml"), Some("xml"));
    assert_eq!(extension_for("application/zip"), None);
}

#[test]
fn test_attachment_refs() {
    let refs = attachment_refs(&mixed_message()).unwrap();

    let ids: Vec<_> = refs.iter().map(|r| r.attachment_id.as_str()).collect();
    assert_eq!(ids, vec!["att-1", "att-3"]);

    assert_eq!(refs[0].part, "1");
    assert_eq!(refs[0].filename, "invoice.pdf");
    assert_eq!(refs[0].extension, "pdf");
    assert_eq!(refs[1].part, "3.0");
    assert_eq!(refs[1].mime_type, "image/png");
}

#[test]
fn test_attachment_refs_without_parts() {
    let raw = RawMessage::from_value(json!({"id": "1", "payload": {"mimeType": "text/plain"}}))
        .unwrap();
    assert!(attachment_refs(&raw).unwrap().is_empty());
    assert!(attachment_refs(&RawMessage::default()).unwrap().is_empty());
}

#[test]
fn test_attachment_refs_missing_body() {
    let raw = message(
        json!([]),
        json!([{"mimeType": "application/pdf", "filename": "a.pdf"}]),
    );

    let err = attachment_refs(&raw).unwrap_err();
    assert!(matches!(err, ExtractError::MissingKey(key) if key == "parts[0].body"));
}

#[test]
fn test_collect_attachments() {
    let requested = RefCell::new(Vec::new());
    let source = |message_id: &str, attachment_id: &str| -> FetchResult {
        requested
            .borrow_mut()
            .push(format!("{message_id}/{attachment_id}"));
        Ok(Some(encode(format!("bytes of {attachment_id}"))))
    };

    let blobs =
        collect_attachments(&mixed_message(), &source, &AttachmentOptions::default()).unwrap();

    assert_eq!(
        blobs,
        vec![b"bytes of att-1".to_vec(), b"bytes of att-3".to_vec()]
    );
    assert_eq!(
        *requested.borrow(),
        vec!["18c2f0a1b2c3d4e5/att-1", "18c2f0a1b2c3d4e5/att-3"]
    );
}

#[test]
fn test_collect_attachments_limit() {
    let source = |_: &str, id: &str| -> FetchResult { Ok(Some(encode(id))) };

    let blobs =
        collect_attachments(&mixed_message(), &source, &AttachmentOptions::with_limit(1)).unwrap();
    assert_eq!(blobs, vec![b"att-1".to_vec()]);

    let unlimited =
        collect_attachments(&mixed_message(), &source, &AttachmentOptions::with_limit(0)).unwrap();
    assert_eq!(unlimited.len(), 2);
}

#[test]
fn test_collect_attachments_skips_missing_data() {
    let source = |_: &str, id: &str| -> FetchResult {
        if id == "att-1" {
            Ok(None)
        } else {
            Ok(Some(encode(id)))
        }
    };

    let blobs =
        collect_attachments(&mixed_message(), &source, &AttachmentOptions::default()).unwrap();
    assert_eq!(blobs, vec![b"att-3".to_vec()]);
}

#[test]
fn test_collect_attachments_source_error() {
    let source = |_: &str, _: &str| -> FetchResult { Err("quota exceeded".into()) };

    let err =
        collect_attachments(&mixed_message(), &source, &AttachmentOptions::default()).unwrap_err();

    assert!(matches!(&err, ExtractError::Source { attachment_id, .. } if attachment_id == "att-1"));
    assert!(err.to_string().contains("quota exceeded"));
}

#[test]
fn test_collect_attachments_bad_data() {
    let source = |_: &str, _: &str| -> FetchResult { Ok(Some("***".to_string())) };

    let err =
        collect_attachments(&mixed_message(), &source, &AttachmentOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::Encoding { part, .. } if part == "1"));
}

#[test]
fn test_collect_attachments_needs_message_id() {
    let mut raw = mixed_message();
    raw.id = None;
    let source = |_: &str, id: &str| -> FetchResult { Ok(Some(encode(id))) };

    let err = collect_attachments(&raw, &source, &AttachmentOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::MissingKey(key) if key == "id"));
}

#[test]
fn test_attachment_options_deserialize() {
    let options: AttachmentOptions = serde_json::from_value(json!({"limit": 3})).unwrap();
    assert_eq!(options, AttachmentOptions::with_limit(3));

    let options: AttachmentOptions = serde_json::from_value(json!({})).unwrap();
    assert_eq!(options.limit, None);
}
