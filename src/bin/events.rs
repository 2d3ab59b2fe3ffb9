// Lambda bootstrap entry point for the stream, queue and schedule triggers

use std::sync::Arc;

use exams::core::config::AppConfig;
use exams::events::{self, EventsContext};
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
    let ctx = Arc::new(EventsContext::from_config(&config).await);

    run(service_fn(move |event: LambdaEvent<Value>| {
        let ctx = Arc::clone(&ctx);
        async move { events::handler(&ctx, event).await }
    }))
    .await
}
