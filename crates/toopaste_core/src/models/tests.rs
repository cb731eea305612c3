//! Model-level unit tests.

use super::paste::*;
use chrono::Utc;

#[test]
fn visibility_parse_defaults_to_public() {
    assert_eq!(Visibility::parse(Some("private")), Visibility::Private);
    assert_eq!(Visibility::parse(Some(" PRIVATE ")), Visibility::Private);
    assert_eq!(Visibility::parse(Some("public")), Visibility::Public);
    assert_eq!(Visibility::parse(Some("hidden")), Visibility::Public);
    assert_eq!(Visibility::parse(None), Visibility::Public);
}

#[test]
fn create_request_accepts_json_numbers_and_bools() {
    let req: CreatePasteRequest = serde_json::from_str(
        r#"{"body":"x","expires_in":3,"expires_unit":"days","announce":true}"#,
    )
    .expect("json request");
    assert_eq!(req.expires_in, Some(LooseValue::Number(3)));
    assert_eq!(req.expires_in.as_ref().map(LooseValue::as_text).as_deref(), Some("3"));
    assert!(req.wants_announcement());
}

#[test]
fn create_request_accepts_text_flags() {
    let req: CreatePasteRequest =
        serde_json::from_str(r#"{"body":"x","expires_in":" 7 ","announce":"on"}"#)
            .expect("json request");
    assert_eq!(req.expires_in.as_ref().map(LooseValue::as_text).as_deref(), Some("7"));
    assert!(req.wants_announcement());

    let quiet: CreatePasteRequest =
        serde_json::from_str(r#"{"body":"x","announce":"off"}"#).expect("json request");
    assert!(!quiet.wants_announcement());
}

#[test]
fn missing_body_deserializes_as_empty() {
    let req: CreatePasteRequest = serde_json::from_str(r#"{"title":"t"}"#).expect("json");
    assert!(req.body.is_empty());
}

#[test]
fn paste_survives_storage_encoding() {
    let mut paste = NewPaste {
        title: "t".to_string(),
        language: "source.rust".to_string(),
        author: "a".to_string(),
        visibility: Visibility::Private,
        body: "fn main() {}".to_string(),
        expires_at: None,
    }
    .into_paste("ab12".to_string(), Utc::now());
    paste.expires_at = Some(paste.created_at);

    let bytes = bincode::serialize(&paste).expect("encode");
    let decoded: Paste = bincode::deserialize(&bytes).expect("decode");
    assert_eq!(decoded, paste);
}

#[test]
fn visibility_serializes_lowercase() {
    assert_eq!(
        serde_json::to_string(&Visibility::Private).expect("json"),
        "\"private\""
    );
}
