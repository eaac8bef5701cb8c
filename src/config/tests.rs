use std::io::Write;

use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.endpoints.admin_url = Some("https://old.example/admin".to_string());
    raw.logging.level = Some("info".to_string());

    let overrides = ConfigOverrides {
        admin_url: Some("https://api.example/admin".to_string()),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(
        settings.endpoints.admin_url().expect("admin url").as_str(),
        "https://api.example/admin"
    );
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn upload_limit_defaults_to_5_mib() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.uploads.max_bytes.get(), 5 * 1024 * 1024);
}

#[test]
fn zero_upload_limit_is_rejected() {
    let mut raw = RawSettings::default();
    raw.uploads.max_bytes = Some(0);
    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "uploads.max_bytes",
            ..
        }
    ));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ConfigOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn invalid_log_level_names_the_key() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());
    let err = Settings::from_raw(raw).unwrap_err();
    assert!(err.to_string().contains("logging.level"));
}

#[test]
fn endpoints_must_be_http_urls() {
    let mut raw = RawSettings::default();
    raw.endpoints.upload_url = Some("ftp://files.example/upload".to_string());
    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "endpoints.upload_url",
            ..
        }
    ));

    let mut raw = RawSettings::default();
    raw.endpoints.catalog_url = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("blank is unset");
    assert!(matches!(
        settings.endpoints.catalog_url(),
        Err(LoadError::Missing("endpoints.catalog_url"))
    ));
}

#[test]
fn key_file_override_wins_over_default() {
    let mut raw = RawSettings::default();
    let overrides = ConfigOverrides {
        key_file: Some(PathBuf::from("/tmp/vitrina-key")),
        ..Default::default()
    };
    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.session.key_file, PathBuf::from("/tmp/vitrina-key"));
}

#[test]
fn explicit_config_file_is_layered() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tempfile");
    writeln!(
        file,
        "[endpoints]\nadmin_url = \"https://fn.example/admin\"\n\n[uploads]\nmax_bytes = 1024"
    )
    .expect("write config");

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        upload_max_bytes: Some(2048),
        ..Default::default()
    };
    let settings = load(&overrides).expect("load");

    assert_eq!(
        settings.endpoints.admin_url().expect("admin url").as_str(),
        "https://fn.example/admin"
    );
    assert_eq!(settings.uploads.max_bytes.get(), 2048);
}
