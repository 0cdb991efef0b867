use degrader::{DegraderConfig, DegraderError};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "video": {{ "width": 352, "height": 288, "bitrate": 64000 }}, "output": {{ "emit_filler": false }} }}"#
    )
    .unwrap();

    let config = DegraderConfig::load_from_file(file.path()).unwrap();

    assert_eq!(config.video.width, 352);
    assert_eq!(config.video.height, 288);
    assert_eq!(config.video.bitrate, 64_000);
    assert_eq!(config.video.fps, 25);
    assert!(!config.output.emit_filler);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file() {
    let result = DegraderConfig::load_from_file("/path/that/does/not/exist.json".as_ref());
    assert!(matches!(result, Err(DegraderError::Config(_))));
}

#[test]
fn test_empty_object_gives_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{}}").unwrap();

    let config = DegraderConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config, DegraderConfig::default());
}

#[test]
fn test_invalid_values_fail_validation() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "video": {{ "width": 321 }} }}"#).unwrap();

    let config = DegraderConfig::load_from_file(file.path()).unwrap();
    assert!(config.validate().is_err());
}
