use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::domain::ProductionPlan;
use crate::planner::{SolverBackend, StrategyKind};
use crate::telemetry::LogFormat;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "STEEL__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub plan: ProductionPlan,
    pub planning: PlanningConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningConfig {
    pub strategy: StrategyKind,
    /// LP backend; `cbc` and `glpk` need the `external-solver` feature
    #[serde(default)]
    pub solver: SolverBackend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub log_format: LogFormat,
    /// Extra week lengths to re-solve at after the main plan
    #[serde(default)]
    pub sweep_hours: Vec<f64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Built-in defaults, then the TOML file (if it exists), then `STEEL__` env vars.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let cfg = Config::load_from("does/not/exist.toml").unwrap();
        assert_eq!(cfg.plan, ProductionPlan::steel_mill());
        assert_eq!(cfg.planning.strategy, StrategyKind::Lp);
        assert_eq!(cfg.planning.solver, SolverBackend::Minilp);
        assert_eq!(cfg.output.format, OutputFormat::Text);
        assert!(cfg.output.sweep_hours.is_empty());
    }

    #[test]
    fn test_toml_overrides_plan() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[plan]
available_hours = 35.0

[[plan.products]]
name = "plates"
price = 29.0
rate = 160.0
demand = 3500.0
commitment = 100.0

[planning]
strategy = "ratio"
solver = "glpk"

[output]
format = "json"
log_format = "json"
sweep_hours = [20.0, 40.0]
"#
        )
        .unwrap();

        let cfg = Config::load_from(file.path()).unwrap();
        assert_eq!(cfg.plan.available_hours, 35.0);
        assert_eq!(cfg.plan.products.len(), 1);
        assert_eq!(cfg.plan.products[0].commitment, 100.0);
        assert_eq!(cfg.planning.strategy, StrategyKind::Ratio);
        assert_eq!(cfg.planning.solver, SolverBackend::Glpk);
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert_eq!(cfg.output.log_format, LogFormat::Json);
        assert_eq!(cfg.output.sweep_hours, vec![20.0, 40.0]);
    }
}
