use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

/// Default request body ceiling (20MB); multipart uploads larger than this are rejected.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub uploads: UploadSettings,
    /// Directory served for any path not matched by an API route.
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Missing keys do not stop startup; each generation call fails instead.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        Ok(GatewayConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
                model: get_env("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
            },
            uploads: UploadSettings {
                dir: get_env("UPLOAD_DIR", Some("uploads"), is_prod)?.into(),
                max_bytes: parse_max_upload_bytes(&get_env(
                    "MAX_UPLOAD_BYTES",
                    Some(&DEFAULT_MAX_UPLOAD_BYTES.to_string()),
                    is_prod,
                )?)?,
            },
            static_dir: get_env("STATIC_DIR", Some("public"), is_prod)?.into(),
        })
    }
}

fn parse_max_upload_bytes(raw: &str) -> Result<usize, AppError> {
    raw.trim().parse().map_err(|e: std::num::ParseIntError| {
        AppError::ConfigError(anyhow::anyhow!(
            "MAX_UPLOAD_BYTES must be a byte count, got {:?}: {}",
            raw,
            e
        ))
    })
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            gemini: GeminiSettings {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
                api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            },
            uploads: UploadSettings {
                dir: PathBuf::from("uploads"),
                max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            static_dir: PathBuf::from("public"),
        }
    }
}
