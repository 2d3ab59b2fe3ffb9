use std::env;

pub const DEFAULT_EXAMS_TABLE: &str = "Exams";
pub const DEFAULT_UPLOADS_BUCKET: &str = "exams-bucket";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub exams_table: String,
    pub uploads_bucket: String,
    pub jwt_secret: Option<String>,
    /// SSM parameter holding the signing secret when `jwt_secret` is unset.
    pub jwt_secret_param: Option<String>,
    pub notification_queue_url: Option<String>,
    pub cleanup_retention_days: Option<u32>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let cleanup_retention_days = match get("CLEANUP_RETENTION_DAYS") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u32>()
                    .map_err(|e| format!("CLEANUP_RETENTION_DAYS: {}", e))?,
            ),
            None => None,
        };

        Ok(Self {
            exams_table: get("EXAMS_TABLE").unwrap_or_else(|| DEFAULT_EXAMS_TABLE.to_string()),
            uploads_bucket: get("UPLOADS_BUCKET")
                .unwrap_or_else(|| DEFAULT_UPLOADS_BUCKET.to_string()),
            jwt_secret: get("JWT_SECRET"),
            jwt_secret_param: get("JWT_SECRET_PARAM"),
            notification_queue_url: get("NOTIFICATION_QUEUE_URL"),
            cleanup_retention_days,
        })
    }
}
