use std::fs;

use anyhow::Result;
use vitrine_config::{ConfigError, VitrineConfig};

#[test]
fn loads_overrides_from_toml_file() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("vitrine.toml");
    fs::write(
        &path,
        r#"
        [animation]
        default_duration_ms = 450.0
        default_easing = "ease-in-out"

        [slider]
        auto_slide_interval_ms = 3000

        [demo]
        page = "landing.html"
        viewport_width = 900
        "#,
    )?;

    let config = VitrineConfig::load_from_file(&path)?;
    assert_eq!(config.animation.default_duration_ms, 450.0);
    assert_eq!(config.animation.default_easing, "ease-in-out");
    assert_eq!(config.slider.auto_slide_interval_ms, 3000);
    assert_eq!(config.slider.resize_debounce_ms, 250);
    assert_eq!(
        config.demo.page.as_deref(),
        Some(std::path::Path::new("landing.html"))
    );
    assert_eq!(config.demo.viewport_width, 900);
    assert_eq!(config.demo.viewport_height, 800);
    Ok(())
}

#[test]
fn missing_file_reports_read_error() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let err = VitrineConfig::load_from_file(temp.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    Ok(())
}

#[test]
fn malformed_file_reports_parse_error() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("vitrine.toml");
    fs::write(&path, "[slider]\ndesktop_slides = \"many\"\n")?;

    let err = VitrineConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("vitrine.toml"));
    Ok(())
}
