//! Finsight advisor - line-oriented inference boundary
//!
//! Accepts a single JSON-encoded user profile as an argument and writes
//! exactly one JSON response document to stdout. Logs go to stderr so stdout
//! stays parseable, and the process exits 0 even when the embedded result
//! carries an error.
//!
//! # Usage
//! ```sh
//! finsight '{"age": 28, "income": 65000, "account_balance": 15000, ...}'
//! ```

use clap::Parser;
use finsight::application::advisor::AdvisorService;
use finsight::config::Config;
use finsight::interfaces::request::ProfileRequest;
use finsight::interfaces::response::{AdvisorResponse, ErrorResponse};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-encoded user profile
    profile: String,

    /// Path to the trained model artifact (overrides MODEL_PATH)
    #[arg(long)]
    model_path: Option<PathBuf>,
}

fn main() {
    dotenvy::dotenv().ok();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let args = Args::parse();
    let model_path = args
        .model_path
        .unwrap_or_else(|| Config::from_env().model_path);

    let document = match serde_json::from_str::<ProfileRequest>(&args.profile) {
        Ok(request) => {
            let advisor = AdvisorService::from_artifact_path(&model_path);
            info!("Advisor ready: {}", advisor.is_ready());
            let response = AdvisorResponse::from(advisor.insights(&request));
            serde_json::to_value(&response)
        }
        Err(e) => serde_json::to_value(ErrorResponse {
            error: format!("invalid profile payload: {e}"),
        }),
    };

    match document {
        Ok(json) => println!("{json}"),
        Err(e) => println!(
            "{}",
            serde_json::json!({ "error": format!("failed to serialize response: {e}") })
        ),
    }
}
