use super::*;
use serde_json::json;

// =============================================================================
// Brief / depth
// =============================================================================

#[test]
fn depth_in_range_is_kept() {
    for depth in 1..=3 {
        assert_eq!(i64::from(clamp_depth(depth)), depth);
    }
}

#[test]
fn depth_out_of_range_is_clamped() {
    assert_eq!(clamp_depth(0), MIN_DEPTH);
    assert_eq!(clamp_depth(-7), MIN_DEPTH);
    assert_eq!(clamp_depth(4), MAX_DEPTH);
    assert_eq!(clamp_depth(i64::MAX), MAX_DEPTH);
}

#[test]
fn blank_brief_detected() {
    assert!(Brief::new("   \n\t", 2).is_blank());
    assert!(!Brief::new(" tool ", 2).is_blank());
}

#[test]
fn brief_serializes_as_generate_payload() {
    let body = serde_json::to_value(Brief::new("AI tool", 3)).unwrap();
    assert_eq!(body, json!({ "brief": "AI tool", "depth": 3 }));
}

// =============================================================================
// GenerationResult
// =============================================================================

#[test]
fn generation_result_preserves_backend_order() {
    let result = GenerationResult::from_value(json!({
        "PRD": "p",
        "Landing Page": "l",
        "FAQ": "f",
        "Video Script": "v",
    }))
    .unwrap();
    let names: Vec<&str> = result.names().collect();
    assert_eq!(names, KNOWN_SECTIONS);
}

#[test]
fn generation_result_renders_non_string_values() {
    let result = GenerationResult::from_value(json!({ "FAQ": ["a", "b"], "PRD": null })).unwrap();
    assert_eq!(result.get("FAQ").as_deref(), Some(r#"["a","b"]"#));
    assert_eq!(result.get("PRD").as_deref(), Some(""));
    assert!(result.get("Landing Page").is_none());
}

#[test]
fn generation_result_rejects_non_object() {
    let err = GenerationResult::from_value(json!(["PRD"])).unwrap_err();
    assert!(matches!(err, BackendError::Parse(msg) if msg.contains("array")));
}

// =============================================================================
// History
// =============================================================================

#[test]
fn parse_history_full_entry() {
    let body = json!([{
        "id": 7,
        "brief": "AI tool",
        "created_at": "2024-05-01T10:00:00",
        "documents": { "PRD": "prd text" }
    }])
    .to_string();
    let entries = parse_history(&body).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].display_id(), "7");
    assert_eq!(entries[0].display_brief(), "AI tool");
    assert_eq!(entries[0].display_created_at(), "2024-05-01T10:00:00");
    assert_eq!(entries[0].documents.get("PRD").as_deref(), Some("prd text"));
}

#[test]
fn parse_history_missing_fields_default() {
    let entries = parse_history(r#"[{}, {"brief": null, "documents": null}]"#).unwrap();
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert_eq!(entry.display_brief(), "—");
        assert_eq!(entry.display_created_at(), "");
        assert!(entry.documents.is_empty());
        assert_eq!(entry.display_id(), "");
    }
}

#[test]
fn parse_history_keeps_order() {
    let entries = parse_history(r#"[{"id":"b"},{"id":"a"}]"#).unwrap();
    let ids: Vec<String> = entries.iter().map(HistoryEntry::display_id).collect();
    assert_eq!(ids, ["b", "a"]);
}

#[test]
fn parse_history_null_is_empty() {
    assert!(parse_history("null").unwrap().is_empty());
}

#[test]
fn parse_history_rejects_object_body() {
    let err = parse_history(r#"{"detail":"nope"}"#).unwrap_err();
    assert!(matches!(err, BackendError::Parse(_)));
}

#[test]
fn parse_history_numeric_timestamp_is_text() {
    let entries = parse_history(r#"[{"created_at": 1714557600}]"#).unwrap();
    assert_eq!(entries[0].display_created_at(), "1714557600");
}

// =============================================================================
// BackendError
// =============================================================================

#[test]
fn unavailable_classification() {
    assert!(BackendError::Unavailable("refused".into()).is_unavailable());
    assert!(!BackendError::Rejected { status: 400, message: "bad".into() }.is_unavailable());
    assert!(!BackendError::MissingToken.is_unavailable());
}

#[test]
fn rejected_user_message_is_backend_message() {
    let err = BackendError::Rejected { status: 401, message: "Invalid credentials".into() };
    assert_eq!(err.user_message(), "Invalid credentials");
}
