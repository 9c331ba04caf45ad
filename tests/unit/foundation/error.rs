use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SoftGlError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SoftGlError::upload("x")
            .to_string()
            .contains("upload error:")
    );
    assert!(
        SoftGlError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SoftGlError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
