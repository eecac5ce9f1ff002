use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::game::{INITIAL_COUNTRIES, MAX_COUNTRIES, MIN_COUNTRIES};

/// World generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub country_count: usize,
    pub map_width: f64,
    pub map_height: f64,
    pub min_separation: f64,
    pub seed: Option<u64>,
    pub ai_enabled: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            country_count: INITIAL_COUNTRIES,
            map_width: 800.0,
            map_height: 600.0,
            min_separation: 80.0,
            seed: None,
            ai_enabled: true,
        }
    }
}

impl SimulationConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(source)
            .context("シミュレーション設定の YAML を解析できませんでした")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)
            .context("シミュレーション設定の JSON を解析できませんでした")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.json` file as JSON and anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("設定ファイル {} を読み込めませんでした", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        }
        .with_context(|| format!("設定ファイル {} が不正です", path.display()))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (MIN_COUNTRIES..=MAX_COUNTRIES).contains(&self.country_count),
            "国の数は {} から {} の範囲で指定してください (指定値: {})",
            MIN_COUNTRIES,
            MAX_COUNTRIES,
            self.country_count
        );
        ensure!(
            self.map_width.is_finite() && self.map_height.is_finite(),
            "マップサイズは有限値で指定してください"
        );
        ensure!(
            self.map_width > 100.0 && self.map_height > 100.0,
            "マップサイズが小さすぎます ({}x{})",
            self.map_width,
            self.map_height
        );
        ensure!(
            self.min_separation.is_finite() && self.min_separation >= 0.0,
            "国同士の最小距離は 0 以上で指定してください"
        );
        Ok(())
    }
}
