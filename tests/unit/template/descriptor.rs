use crate::template::{
    descriptor::{TemplateDescriptor, coerce_number, coerce_text},
    load::{load_template, template_path},
};
use crate::ThumbError;
use serde_json::json;

#[test]
fn unknown_fields_are_ignored() {
    let d = TemplateDescriptor::from_json_str(
        r##"{ "name": "x", "colors": { "title": "#fff", "glow": 3 }, "extra": [1, 2] }"##,
    )
    .unwrap();
    assert_eq!(d.colors.title.as_deref(), Some("#fff"));
}

#[test]
fn non_object_document_is_empty_template() {
    let d = TemplateDescriptor::from_value(json!([1, 2, 3])).unwrap();
    assert!(d.colors.title.is_none());
    assert!(d.layout.padding.is_none());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = TemplateDescriptor::from_json_str("{ nope").unwrap_err();
    assert!(matches!(err, ThumbError::Serde(_)));
}

#[test]
fn gradient_accepts_a_bare_string() {
    let d = TemplateDescriptor::from_value(json!({ "colors": { "backgroundGradient": "#000" } }))
        .unwrap();
    assert_eq!(
        d.colors.background_gradient,
        Some(vec!["#000".to_owned()])
    );
}

#[test]
fn coercions_follow_loose_typing() {
    assert_eq!(coerce_number(&json!(12)), Some(12.0));
    assert_eq!(coerce_number(&json!(" 1.5 ")), Some(1.5));
    assert_eq!(coerce_number(&json!("abc")), None);
    assert_eq!(coerce_number(&json!(null)), None);
    assert_eq!(coerce_text(&json!(7)).as_deref(), Some("7"));
    assert_eq!(coerce_text(&json!({})), None);
}

#[test]
fn load_template_reports_missing_file_with_path() {
    let root = std::env::temp_dir().join(format!("thumbkit-tpl-missing-{}", std::process::id()));
    let err = load_template(&root, "nope").unwrap_err();
    assert!(matches!(err, ThumbError::Config(_)));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn load_template_reads_file() {
    let root = std::env::temp_dir().join(format!("thumbkit-tpl-ok-{}", std::process::id()));
    let path = template_path(&root, "bold");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{ "layout": { "padding": 40 } }"#).unwrap();
    let d = load_template(&root, "bold").unwrap();
    assert_eq!(d.layout.padding, Some(40.0));

    std::fs::write(&path, "{").unwrap();
    let err = load_template(&root, "bold").unwrap_err();
    assert!(matches!(err, ThumbError::Serde(_)));
    let _ = std::fs::remove_dir_all(&root);
}
