use aws_sdk_ssm::Client as SsmClient;
use tracing::info;

use super::config::AppConfig;
use crate::errors::ExamError;

/// Resolves the token signing secret: `JWT_SECRET` first, then the SSM
/// SecureString named by `JWT_SECRET_PARAM`.
///
/// # Errors
///
/// Returns `Config` if neither source is configured or the parameter is empty,
/// and `StoreFailure` if SSM cannot be read.
pub async fn resolve_jwt_secret(config: &AppConfig) -> Result<String, ExamError> {
    if let Some(secret) = &config.jwt_secret {
        return Ok(secret.clone());
    }

    let Some(name) = &config.jwt_secret_param else {
        return Err(ExamError::Config(
            "JWT_SECRET or JWT_SECRET_PARAM must be set".to_string(),
        ));
    };

    let shared = aws_config::from_env().load().await;
    let client = SsmClient::new(&shared);

    info!(parameter = %name, "Loading signing secret from SSM");
    let resp = client
        .get_parameter()
        .name(name)
        .with_decryption(true)
        .send()
        .await?;

    resp.parameter()
        .and_then(|p| p.value())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ExamError::Config(format!("SSM parameter {name} has no value")))
}
