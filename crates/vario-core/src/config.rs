//! Configuration module
//!
//! All configuration is read from the environment once at startup and
//! treated as immutable afterwards. Components receive the parts they
//! need explicitly; nothing reads the environment after boot.

use std::env;
use std::path::PathBuf;

const DEFAULT_SERVER_PORT: u16 = 80;
const DEFAULT_MAXIMUM_UPLOAD_SIZE: u64 = 10_000_000;
const DEFAULT_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png";
const DEFAULT_RESIZE_RESOLUTIONS: &str = "2048,1024,300";

/// Storage backend selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Local,
}

/// Remote store settings. Which fields are required depends on the backend;
/// `Config::validate` enforces that at startup.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub local_path: Option<String>,
    pub local_base_url: Option<String>,
}

/// Service configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Maximum accepted upload size in bytes. Enforced both against the
    /// declared Content-Length and against the actual streamed byte count.
    pub max_upload_size: u64,
    /// Lowercased, trimmed content-type allow-set. Never empty.
    pub allowed_content_types: Vec<String>,
    /// Square bounding sizes to derive, in configured order. Never empty.
    pub resize_resolutions: Vec<u32>,
    /// Directory holding staged artifacts for the duration of a request.
    pub staging_path: PathBuf,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                anyhow::anyhow!(
                    "SERVER_PORT is invalid, must be in the range 0 to 65535 (inclusive)"
                )
            })?,
            Err(_) => DEFAULT_SERVER_PORT,
        };

        let max_upload_size = match env::var("MAXIMUM_UPLOAD_SIZE") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("MAXIMUM_UPLOAD_SIZE is invalid, must be > 0"))?,
            Err(_) => DEFAULT_MAXIMUM_UPLOAD_SIZE,
        };

        let allowed_content_types = parse_content_types(
            &env::var("ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_CONTENT_TYPES.to_string()),
        );

        let resize_resolutions = parse_resolutions(
            &env::var("RESIZE_RESOLUTIONS")
                .unwrap_or_else(|_| DEFAULT_RESIZE_RESOLUTIONS.to_string()),
        )?;

        let staging_path = env::var("STAGING_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join("vario-staging"));

        let backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => StorageBackend::S3,
            "local" => StorageBackend::Local,
            other => {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND is invalid: '{}' (expected 's3' or 'local')",
                    other
                ))
            }
        };

        let storage = StorageConfig {
            backend,
            s3_bucket: env::var("S3_BUCKET").or_else(|_| env::var("AWS_BUCKET")).ok(),
            s3_region: env::var("S3_REGION").or_else(|_| env::var("AWS_REGION")).ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
            aws_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
            local_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
        };

        let config = Config {
            server_port,
            max_upload_size,
            allowed_content_types,
            resize_resolutions,
            staging_path,
            storage,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_upload_size == 0 {
            return Err(anyhow::anyhow!("MAXIMUM_UPLOAD_SIZE is invalid, must be > 0"));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must include at least one content type"
            ));
        }

        if self.resize_resolutions.is_empty() {
            return Err(anyhow::anyhow!(
                "RESIZE_RESOLUTIONS must include at least one resolution"
            ));
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using the S3 storage backend"
                    ));
                }
                if self.storage.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using the S3 storage backend"
                    ));
                }
                if self.storage.aws_access_key_id.is_none()
                    || self.storage.aws_secret_access_key.is_none()
                {
                    return Err(anyhow::anyhow!(
                        "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set when using the S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using the local storage backend"
                    ));
                }
                if self.storage.local_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using the local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Value of the `Accept` header advertised on every response.
    pub fn accept_header(&self) -> String {
        self.allowed_content_types.join(", ")
    }

    /// Membership check against the allow-set, case-insensitive and trimmed.
    pub fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let normalized = content_type.trim().to_lowercase();
        if normalized.is_empty() {
            return false;
        }
        self.allowed_content_types.contains(&normalized)
    }
}

fn parse_content_types(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_resolutions(raw: &str) -> Result<Vec<u32>, anyhow::Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let value = s
                .parse::<u32>()
                .map_err(|_| anyhow::anyhow!("RESIZE_RESOLUTIONS entry is invalid: '{}'", s))?;
            if value == 0 {
                return Err(anyhow::anyhow!("RESIZE_RESOLUTIONS entries must be > 0"));
            }
            Ok(value)
        })
        .collect()
}

/// File extension for a content type, derived from the subtype
/// (`image/png` → `png`). Returns `None` when no subtype is present.
pub fn extension_for(content_type: &str) -> Option<&str> {
    let subtype = content_type.trim().split('/').nth(1)?;
    let subtype = subtype.split(';').next().unwrap_or(subtype).trim();
    if subtype.is_empty() {
        None
    } else {
        Some(subtype)
    }
}

/// Human-readable byte count for startup logging (decimal units).
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = ((bytes as f64).ln() / 1000f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1000f64.powi(exponent as i32);

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent])
}
