//! AWS Lambda entry point for fitmymacros-pdfreader.
//!
//! Startup loads the completion settings from SSM Parameter Store and binds
//! pdfium. Either failing aborts the process before the first event is
//! accepted; after that every event is answered with an envelope.

use anyhow::{Context, Result};
use fitmymacros_pdfreader::parameters::SsmParameterStore;
use fitmymacros_pdfreader::{CompletionConfig, MenuSuggester, ParameterNames, PdfiumExtractor};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // CloudWatch stamps each line already; colours only add escape codes.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .without_time()
        .init();

    let suggester = Arc::new(bootstrap().await?);
    info!("Initialization complete, waiting for events");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let suggester = Arc::clone(&suggester);
        async move {
            let (payload, context) = event.into_parts();
            info!(request_id = %context.request_id, "Handling invocation");
            Ok::<_, lambda_runtime::Error>(suggester.handle(payload).await)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!("Lambda runtime stopped: {e}"))
}

/// Initialization phase: configuration and PDF engine, both mandatory.
async fn bootstrap() -> Result<MenuSuggester> {
    let store = SsmParameterStore::from_env().await;
    let config = CompletionConfig::load(&store, &ParameterNames::default())
        .await
        .context("Failed to load completion configuration from Parameter Store")?;

    let extractor = tokio::task::spawn_blocking(PdfiumExtractor::bind)
        .await
        .context("PDF engine binding task panicked")?
        .context("Failed to bind PDF engine")?;

    Ok(MenuSuggester::with_openai(Arc::new(extractor), config))
}
