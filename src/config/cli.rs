use std::path::PathBuf;

use clap::{Args, ValueHint, builder::BoolishValueParser};

/// Flags that override file and environment configuration.
#[derive(Debug, Args, Default, Clone)]
pub struct ConfigOverrides {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "VITRINA_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub config_file: Option<PathBuf>,

    /// Override the admin endpoint URL.
    #[arg(long = "admin-url", value_name = "URL", global = true)]
    pub admin_url: Option<String>,

    /// Override the image upload endpoint URL.
    #[arg(long = "upload-url", value_name = "URL", global = true)]
    pub upload_url: Option<String>,

    /// Override the public catalog endpoint URL.
    #[arg(long = "catalog-url", value_name = "URL", global = true)]
    pub catalog_url: Option<String>,

    /// Override the stock notification endpoint URL.
    #[arg(long = "notify-url", value_name = "URL", global = true)]
    pub notify_url: Option<String>,

    /// Override where the admin key is remembered between runs.
    #[arg(
        long = "key-file",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub key_file: Option<PathBuf>,

    /// Override the client-side upload size ceiling in bytes.
    #[arg(long = "upload-max-bytes", value_name = "BYTES", global = true)]
    pub upload_max_bytes: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}
