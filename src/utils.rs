use std::path::Path;

use algebra::Grading;
use anyhow::Context;
use fp::prime::{ValidPrime, TWO};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// The parameters of a resolution computation.
///
/// Every object handed to the resolution engine must be defined over `prime`. The resolution is
/// computed for `filtration_max` stages, and stage `n` only looks at gradings whose primary
/// component is at most `grade_limit.primary + n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub prime: ValidPrime,
    pub filtration_max: u32,
    pub grade_limit: Grading,
    /// How far past `grade_limit` the free comodules built by [`crate::resolve`] extend.
    pub element_margin: i32,
    /// Check the structural invariants of every intermediate object. This is slow.
    pub verify: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prime: TWO,
            filtration_max: 20,
            grade_limit: Grading::new(63, 0),
            element_margin: 2,
            verify: cfg!(debug_assertions),
        }
    }
}

impl Config {
    /// Read a config from a json file. Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(json: Value) -> anyhow::Result<Self> {
        serde_json::from_value(json).context("Invalid config")
    }

    /// The truncation used for the free comodules built while resolving.
    pub fn element_limit(&self) -> Grading {
        self.grade_limit + Grading::new(self.element_margin, 0)
    }

    /// The truncation used at stage `n` of the resolution.
    pub fn stage_limit(&self, n: u32) -> Grading {
        self.grade_limit + Grading::new(n as i32, 0)
    }
}

/// Install a `tracing` subscriber printing to stderr. The filter is read from `RUST_LOG` and
/// defaults to `info`.
pub fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;
    Ok(())
}

/// The name of the `n`th generator added while resolving a single stage: `a` through `z`, then
/// `a1`, `b1` and so on.
pub fn generator_name(n: usize) -> String {
    let letter = char::from(b'a' + (n % 26) as u8);
    match n / 26 {
        0 => letter.to_string(),
        round => format!("{letter}{round}"),
    }
}

pub fn ascii_num(n: usize) -> char {
    match n {
        0 => ' ',
        1 => '·',
        2 => ':',
        3 => '∴',
        4 => '⁘',
        5 => '⁙',
        6 => '⠿',
        7 => '⡿',
        8 => '⣿',
        9 => '9',
        _ => '*',
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use serde_json::json;

    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::from_json(json!({ "prime": 3, "filtration_max": 5 })).unwrap();
        assert_eq!(config.prime, 3);
        assert_eq!(config.filtration_max, 5);
        assert_eq!(config.grade_limit, Grading::new(63, 0));
        assert_eq!(config.element_limit(), Grading::new(65, 0));
        assert_eq!(config.stage_limit(4), Grading::new(67, 0));
    }

    #[test]
    fn config_round_trip() {
        let config = Config {
            grade_limit: Grading::new(10, 1),
            verify: true,
            ..Config::default()
        };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(
            json,
            json!({
                "prime": 2,
                "filtration_max": 20,
                "grade_limit": [10, 1],
                "element_margin": 2,
                "verify": true
            })
        );
        assert_eq!(Config::from_json(json).unwrap(), config);
    }

    #[test]
    fn config_rejects_composite_prime() {
        let err = Config::from_json(json!({ "prime": 4 })).unwrap_err();
        assert!(format!("{err:#}").starts_with("Invalid config"));
    }

    #[test]
    fn config_missing_file() {
        let err = Config::from_json_file("/nonexistent/config.json").unwrap_err();
        expect!["Failed to read config file /nonexistent/config.json"].assert_eq(&err.to_string());
    }

    #[test]
    fn logging_installs_once() {
        assert!(init_logging().is_ok());
        assert!(init_logging().is_err());
    }

    #[test]
    fn generator_names() {
        let names: Vec<_> = [0, 1, 25, 26, 53].into_iter().map(generator_name).collect();
        assert_eq!(names, ["a", "b", "z", "a1", "b2"]);
    }
}
