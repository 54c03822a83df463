//! Local driver for fitmymacros-pdfreader.
//!
//! Builds the same invocation payload the Lambda receives from a PDF on disk
//! and a few flags, runs it through the handler, and prints the envelope.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use fitmymacros_pdfreader::config::DEFAULT_ENDPOINT;
use fitmymacros_pdfreader::{
    CompletionConfig, HandlerResponse, MenuSuggester, NutritionTargets, PdfiumExtractor, Prompt,
    TextExtractor,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Ask for lunch options matching 600 kcal / 40 g protein / 50 g carbs / 15 g fat
  pdfreader menu.pdf --meal-time lunch --target-energy 600 --protein 40 --carbs 50 --fat 15

  # Print the Lambda payload instead of calling the API (for `aws lambda invoke`)
  pdfreader menu.pdf --meal-time dinner --target-energy 800 --protein 50 --carbs 70 --fat 25 \
      --payload-only > payload.json

  # Inspect the prompt that would be sent
  pdfreader menu.pdf --meal-time breakfast --target-energy 400 --protein 25 --carbs 40 --fat 10 \
      --prompt-only

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          Bearer credential for the completion endpoint
  PDFREADER_MODEL         Model ID
  PDFREADER_ENDPOINT      Chat-completions URL (any OpenAI-compatible server)
  PDFIUM_LIB_PATH         Path to an existing libpdfium (skips auto-download)
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory
"#;

/// Suggest menu options matching nutritional targets.
#[derive(Parser, Debug)]
#[command(
    name = "pdfreader",
    version,
    about = "Suggest restaurant menu options that match nutritional targets",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Menu PDF file.
    input: PathBuf,

    /// Meal time label (breakfast, lunch, dinner, snack, …).
    #[arg(long)]
    meal_time: String,

    /// Target energy for the meal.
    #[arg(long, allow_hyphen_values = true)]
    target_energy: i64,

    /// Target protein.
    #[arg(long, allow_hyphen_values = true)]
    protein: i64,

    /// Target carbohydrates.
    #[arg(long, allow_hyphen_values = true)]
    carbs: i64,

    /// Target fat.
    #[arg(long, allow_hyphen_values = true)]
    fat: i64,

    /// Energy unit label.
    #[arg(long, default_value = "kcal")]
    energy_unit: String,

    /// Weight unit label used for protein, carbs and fat.
    #[arg(long, default_value = "g")]
    weight_unit: String,

    /// Completion model ID.
    #[arg(long, env = "PDFREADER_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// API key for the completion endpoint.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat-completions endpoint URL.
    #[arg(long, env = "PDFREADER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDFREADER_TEMPERATURE", default_value_t = 0.7)]
    temperature: f64,

    /// Max output tokens.
    #[arg(long, env = "PDFREADER_MAX_TOKENS", default_value_t = 1024)]
    max_tokens: u32,

    /// Print the Lambda invocation payload and exit.
    #[arg(long, conflicts_with = "prompt_only")]
    payload_only: bool,

    /// Extract the menu, print the prompt and exit (no API call).
    #[arg(long)]
    prompt_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFREADER_VERBOSE")]
    verbose: bool,

    /// Suppress everything except the result.
    #[arg(short, long, env = "PDFREADER_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let pdf = tokio::fs::read(&cli.input)
        .await
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    // ── Payload-only mode ────────────────────────────────────────────────
    if cli.payload_only {
        let payload = build_payload(&cli, &pdf);
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("Failed to serialise payload")?
        );
        return Ok(());
    }

    let extractor = tokio::task::spawn_blocking(PdfiumExtractor::bind)
        .await
        .context("PDF engine binding task panicked")?
        .context("Failed to bind PDF engine")?;

    // ── Prompt-only mode ─────────────────────────────────────────────────
    if cli.prompt_only {
        let prompt = prompt_for(&extractor, &cli, pdf).await?;
        println!("--- system ---\n{}\n--- user ---\n{}", prompt.system, prompt.user);
        return Ok(());
    }

    let config = build_config(&cli)?;
    let suggester = MenuSuggester::with_openai(Arc::new(extractor), config);
    let payload = build_payload(&cli, &pdf);

    let spinner = (!cli.quiet).then(|| waiting_spinner(&cli.input));
    let response = suggester.handle(payload).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to serialise response")?
    );

    match &response {
        HandlerResponse::Success(_) => {
            if !cli.quiet {
                eprintln!("{} suggestions received", green("✔"));
            }
            Ok(())
        }
        HandlerResponse::Failure(message) => {
            eprintln!("{} {}", red("✘"), message);
            std::process::exit(1);
        }
    }
}

/// Build the invocation payload exactly as API Gateway would deliver it.
fn build_payload(cli: &Cli, pdf: &[u8]) -> Value {
    let body = json!({
        "pdf": STANDARD.encode(pdf),
        "mealTime": cli.meal_time,
        "protein": cli.protein.to_string(),
        "carbs": cli.carbs.to_string(),
        "fat": cli.fat.to_string(),
        "targetEnergy": cli.target_energy.to_string(),
        "energyUnit": cli.energy_unit,
        "weightUnit": cli.weight_unit,
    });
    json!({ "body": body.to_string() })
}

/// Map CLI args to `CompletionConfig`.
fn build_config(cli: &Cli) -> Result<CompletionConfig> {
    let Some(api_key) = cli.api_key.as_deref() else {
        bail!("An API key is required: pass --api-key or set OPENAI_API_KEY");
    };
    CompletionConfig::builder()
        .endpoint(&cli.endpoint)
        .model(&cli.model)
        .api_key(api_key)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .build()
        .context("Invalid configuration")
}

async fn prompt_for(extractor: &PdfiumExtractor, cli: &Cli, pdf: Vec<u8>) -> Result<Prompt> {
    let extractor = extractor.clone();
    let menu_text = tokio::task::spawn_blocking(move || extractor.extract_text(&pdf))
        .await
        .context("Extraction task panicked")?
        .context("Failed to extract menu text")?;

    let targets = NutritionTargets {
        meal_time: cli.meal_time.clone(),
        protein: cli.protein,
        carbs: cli.carbs,
        fat: cli.fat,
        target_energy: cli.target_energy,
        energy_unit: cli.energy_unit.clone(),
        weight_unit: cli.weight_unit.clone(),
    };
    Ok(Prompt::for_request(&menu_text, &targets))
}

fn waiting_spinner(input: &Path) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(format!(
        "Reading {} and asking the model… {}",
        input.display(),
        dim("(single request)")
    ));
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
