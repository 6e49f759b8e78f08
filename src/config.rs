use crate::constants::{DEFAULT_SCALE, DEFAULT_SHIFT, DEFAULT_SOLUTION_THRESHOLD};
use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration, all sections optional in the TOML file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub solver: SolverConfig,
    pub render: RenderConfig,
}

/// Where the round/day datasets live
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    pub root: PathBuf,
    pub round: u32,
    pub day: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            round: 2,
            day: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SolverConfig {
    pub solution_threshold: f64,
    pub time_limit_s: Option<f64>,
    pub log_solver: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solution_threshold: DEFAULT_SOLUTION_THRESHOLD,
            time_limit_s: None,
            log_solver: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub x_scale: f64,
    pub y_scale: f64,
    pub x_shift: f64,
    pub y_shift: f64,
    pub draw_labels: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            x_scale: DEFAULT_SCALE,
            y_scale: DEFAULT_SCALE,
            x_shift: DEFAULT_SHIFT,
            y_shift: DEFAULT_SHIFT,
            draw_labels: true,
        }
    }
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlannerError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            PlannerError::Config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data.round == 0 || self.data.day == 0 {
            return Err(PlannerError::Config(
                "round and day ids start at 1".to_string(),
            ));
        }

        let threshold = self.solver.solution_threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(PlannerError::Config(format!(
                "solution_threshold must be strictly between 0 and 1, got {}",
                threshold
            )));
        }

        if let Some(limit) = self.solver.time_limit_s
            && limit <= 0.0
        {
            return Err(PlannerError::Config(format!(
                "time_limit_s must be positive, got {}",
                limit
            )));
        }

        if self.render.x_scale <= 0.0 || self.render.y_scale <= 0.0 {
            return Err(PlannerError::Config(format!(
                "render scales must be positive, got ({}, {})",
                self.render.x_scale, self.render.y_scale
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.root, PathBuf::from("data"));
        assert_eq!(config.data.round, 2);
        assert_eq!(config.data.day, 5);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [data]
            round = 3

            [solver]
            time_limit_s = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.data.round, 3);
        assert_eq!(config.data.day, 5);
        assert_eq!(config.solver.time_limit_s, Some(60.0));
        assert_eq!(config.solver.solution_threshold, 0.5);
        assert_eq!(config.render.x_scale, 1.42);
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        let mut config = Config::default();
        config.solver.solution_threshold = 1.0;
        assert!(matches!(config.validate(), Err(PlannerError::Config(_))));

        config.solver.solution_threshold = 0.0;
        assert!(matches!(config.validate(), Err(PlannerError::Config(_))));
    }

    #[test]
    fn rejects_non_positive_scale() {
        let mut config = Config::default();
        config.render.x_scale = 0.0;
        assert!(matches!(config.validate(), Err(PlannerError::Config(_))));
    }

    #[test]
    fn load_from_file_surfaces_parse_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"[solver]\nsolution_threshold = \"high\"\n")
            .unwrap();

        assert!(matches!(
            Config::load_from_file(&path),
            Err(PlannerError::Config(_))
        ));
    }
}
