use std::env;
use std::path::PathBuf;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "data/model/financial_model.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let model_path =
            env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());
        Self {
            model_path: PathBuf::from(model_path),
        }
    }
}
