//! Runtime configuration from environment variables (and `.env`).

use std::path::PathBuf;

use anyhow::{bail, Context};

/// Default cap on points per pressure sweep.
pub const DEFAULT_MAX_CURVE_POINTS: usize = 500;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub schema_path: PathBuf,
    pub model_path: PathBuf,
    pub max_curve_points: usize,
    pub cors: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let schema_path: PathBuf = lookup("HYDRATE_SCHEMA_PATH")
            .unwrap_or_else(|| "data/data_sample.json".to_string())
            .into();
        let model_path: PathBuf = lookup("HYDRATE_MODEL_PATH")
            .unwrap_or_else(|| "data/hydrate_model.json".to_string())
            .into();

        let max_curve_points = match lookup("HYDRATE_MAX_CURVE_POINTS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("HYDRATE_MAX_CURVE_POINTS is not a number: {raw:?}"))?,
            None => DEFAULT_MAX_CURVE_POINTS,
        };
        if max_curve_points < 2 {
            bail!("HYDRATE_MAX_CURVE_POINTS must be at least 2");
        }

        let cors = match lookup("HYDRATE_CORS").as_deref().map(str::trim) {
            None | Some("") => true,
            Some("1" | "true" | "yes" | "on") => true,
            Some("0" | "false" | "no" | "off") => false,
            Some(other) => bail!("HYDRATE_CORS must be a boolean, got {other:?}"),
        };

        Ok(Self {
            bind_addr,
            schema_path,
            model_path,
            max_curve_points,
            cors,
        })
    }
}
