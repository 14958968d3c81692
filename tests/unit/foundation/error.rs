use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PosterError::asset_load("x")
            .to_string()
            .contains("asset load error:")
    );
    assert!(PosterError::fetch("x").to_string().contains("fetch error:"));
    assert!(PosterError::decode("x").to_string().contains("decode error:"));
    assert!(PosterError::render("x").to_string().contains("render error:"));
    assert!(PosterError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn kind_tags_match_variants() {
    assert_eq!(PosterError::asset_load("x").kind(), "asset_load");
    assert_eq!(PosterError::fetch("x").kind(), "fetch");
    assert_eq!(PosterError::decode("x").kind(), "decode");
    assert_eq!(PosterError::render("x").kind(), "render");
    assert_eq!(PosterError::encode("x").kind(), "encode");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PosterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), "other");
}
