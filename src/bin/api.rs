use std::sync::Arc;

use exams::api::{self, ApiContext};
use exams::core::config::AppConfig;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    exams::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let ctx = Arc::new(ApiContext::from_config(&config).await.map_err(|e| {
        error!("Failed to initialize API context: {}", e);
        Error::from(e)
    })?);

    run(service_fn(move |event: LambdaEvent<Value>| {
        let ctx = Arc::clone(&ctx);
        async move { api::handler(&ctx, event).await }
    }))
    .await
}
