use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BannerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(BannerError::render("x").to_string().contains("render error:"));
    assert!(BannerError::encode("x").to_string().contains("encode error:"));
    assert!(
        BannerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BannerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn asset_errors_name_their_path() {
    let err = AssetLoadError::Decode {
        path: PathBuf::from("backgrounds/one.jpg"),
        reason: "truncated".to_string(),
    };
    assert_eq!(err.path(), std::path::Path::new("backgrounds/one.jpg"));
    let wrapped = BannerError::from(err);
    let msg = wrapped.to_string();
    assert!(msg.contains("asset error:"));
    assert!(msg.contains("backgrounds/one.jpg"));
    assert!(msg.contains("truncated"));
}
