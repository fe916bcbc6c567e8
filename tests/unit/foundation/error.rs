use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(ThumbError::input("x").to_string().contains("input error:"));
    assert!(ThumbError::config("x").to_string().contains("config error:"));
    assert!(
        ThumbError::resource("x")
            .to_string()
            .contains("resource error:")
    );
    assert!(ThumbError::render("x").to_string().contains("render error:"));
    assert!(
        ThumbError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ThumbError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: ThumbError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, ThumbError::Serde(_)));
}
