use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

const DEFAULT_CONFIG: &str = include_str!("../../dock-layout.default.toml");

/// Tolerance below which a merge weight counts as zero.
pub const DEFAULT_WEIGHT_EPSILON: f64 = 1e-9;

pub fn config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dock-layout")
        .join("config.toml")
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: ReconcileSettings,
}

/// Tunables for snapshot building, projection and weight correction.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ReconcileSettings {
    #[serde(default = "default_weight_epsilon")]
    pub weight_epsilon: f64,
    #[serde(default = "default_split_weight")]
    pub default_split_weight: f64,
    #[serde(default)]
    pub default_resize_weight: f64,
    #[serde(default)]
    pub debug_trees: bool,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            weight_epsilon: default_weight_epsilon(),
            default_split_weight: default_split_weight(),
            default_resize_weight: 0.0,
            debug_trees: false,
        }
    }
}

impl ReconcileSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.weight_epsilon.is_finite() || self.weight_epsilon < 0.0 {
            issues.push(format!(
                "weight_epsilon must be a non-negative number, got {}",
                self.weight_epsilon
            ));
        }

        if !self.default_split_weight.is_finite() || self.default_split_weight <= 0.0 {
            issues.push(format!(
                "default_split_weight must be positive, got {}",
                self.default_split_weight
            ));
        }

        if !(0.0..=1.0).contains(&self.default_resize_weight) {
            issues.push(format!(
                "default_resize_weight must be within [0, 1], got {}",
                self.default_resize_weight
            ));
        }

        issues
    }
}

fn default_weight_epsilon() -> f64 { DEFAULT_WEIGHT_EPSILON }

fn default_split_weight() -> f64 { 0.5 }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn builtin() -> anyhow::Result<Config> { Self::parse(DEFAULT_CONFIG) }

    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    /// Sets a single value addressed by a dot-separated key, e.g.
    /// `settings.weight_epsilon`. The result is re-checked through serde so
    /// an invalid key or value leaves the config untouched.
    pub fn set(&mut self, key: &str, value: Value) -> anyhow::Result<()> {
        let mut cfg_val = serde_json::to_value(&*self)?;
        let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
        let Some((last, path)) = parts.split_last() else {
            bail!("Empty config key provided");
        };

        let mut cur = &mut cfg_val;
        for part in path {
            let Some(obj) = cur.as_object_mut() else {
                bail!("Invalid config path: {key}");
            };
            cur = obj.entry(part.to_string()).or_insert_with(|| serde_json::json!({}));
        }
        let Some(obj) = cur.as_object_mut() else {
            bail!("Invalid config path: {key}");
        };
        obj.insert(last.to_string(), value.clone());

        let updated = match serde_json::from_value::<Config>(cfg_val) {
            Ok(updated) => updated,
            Err(e) => bail!("Failed to deserialize config after setting '{key}': {e}"),
        };
        let issues = updated.validate();
        if !issues.is_empty() {
            bail!("Invalid value for '{key}': {}", issues.join("; "));
        }
        *self = updated;
        info!("Updated {} to {}", key, value);
        Ok(())
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        match toml::from_str::<Config>(buf) {
            Ok(config) => {
                let issues = config.validate();
                if !issues.is_empty() {
                    bail!("Invalid config: {}", issues.join("; "));
                }
                Ok(config)
            }
            Err(e) => {
                let msg = e.to_string();
                match Self::extract_unknown_field(&msg).and_then(|u| Self::suggest_field(&u)) {
                    Some(suggestion) => bail!("{msg}\nDid you mean `{suggestion}`?"),
                    None => bail!("{msg}"),
                }
            }
        }
    }

    fn extract_unknown_field(err: &str) -> Option<String> {
        let needle = "unknown field `";
        let start = err.find(needle)? + needle.len();
        let rest = &err[start..];
        let end = rest.find('`')?;
        Some(rest[..end].to_string())
    }

    fn suggest_field(unknown: &str) -> Option<&'static str> {
        const KNOWN: &[&str] = &[
            "settings",
            "weight_epsilon",
            "default_split_weight",
            "default_resize_weight",
            "debug_trees",
        ];
        KNOWN
            .iter()
            .map(|known| (Self::levenshtein(unknown, known), *known))
            .filter(|(dist, _)| *dist <= 3)
            .min_by_key(|(dist, _)| *dist)
            .map(|(_, known)| known)
    }

    fn levenshtein(a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let mut prev: Vec<usize> = (0..=b.len()).collect();
        for i in 1..=a.len() {
            let mut cur = vec![i; b.len() + 1];
            for j in 1..=b.len() {
                let cost = usize::from(a[i - 1] != b[j - 1]);
                cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
            }
            prev = cur;
        }
        prev[b.len()]
    }
}
