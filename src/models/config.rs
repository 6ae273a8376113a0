use crate::assets::AssetLoader;
use crate::services::DEFAULT_RENDER_CACHE_CAPACITY;
use color_walk::{
    NeighborPolicy, ScanOrder, WalkConfig, WalkOptions, DEFAULT_SIMILARITY_TOLERANCE,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Canvas definitions by name
    #[serde(default)]
    pub canvases: BTreeMap<String, CanvasConfig>,

    /// Canvas used by the `walk` command when none is named
    #[serde(default = "default_canvas")]
    pub default_canvas: Option<String>,

    /// Re-compress rendered PNGs with oxipng
    #[serde(default)]
    pub optimize_png: bool,

    /// Pinned-seed renders kept in memory; the oldest is evicted first
    #[serde(default = "default_render_cache_capacity")]
    pub render_cache_capacity: usize,
}

fn default_render_cache_capacity() -> usize {
    DEFAULT_RENDER_CACHE_CAPACITY
}

fn default_canvas() -> Option<String> {
    Some("default".to_string())
}

/// Configuration for one canvas
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,

    /// Samples per color channel
    #[serde(default = "default_levels")]
    pub levels: u32,

    /// Palette entries sampled per color choice
    #[serde(default = "default_tolerance")]
    pub similarity_tolerance: usize,

    #[serde(default)]
    pub neighbor_policy: NeighborPolicySetting,

    #[serde(default)]
    pub scan_order: ScanOrderSetting,

    /// Fixed seed; requests without a seed use this one
    #[serde(default)]
    pub seed: Option<u64>,

    /// Paints per streamed batch
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_levels() -> u32 {
    32
}

fn default_tolerance() -> usize {
    DEFAULT_SIMILARITY_TOLERANCE
}

fn default_chunk_size() -> usize {
    1024
}

/// `neighbor_policy` as written in config.yaml
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NeighborPolicySetting {
    #[default]
    Random,
    First,
}

impl From<NeighborPolicySetting> for NeighborPolicy {
    fn from(setting: NeighborPolicySetting) -> Self {
        match setting {
            NeighborPolicySetting::Random => NeighborPolicy::Random,
            NeighborPolicySetting::First => NeighborPolicy::First,
        }
    }
}

/// `scan_order` as written in config.yaml
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ScanOrderSetting {
    #[default]
    ColumnMajor,
    RowMajor,
}

impl From<ScanOrderSetting> for ScanOrder {
    fn from(setting: ScanOrderSetting) -> Self {
        match setting {
            ScanOrderSetting::ColumnMajor => ScanOrder::ColumnMajor,
            ScanOrderSetting::RowMajor => ScanOrder::RowMajor,
        }
    }
}

impl CanvasConfig {
    /// Walk parameters for this canvas with the given seed
    pub fn walk_config(&self, seed: u64) -> WalkConfig {
        let options = WalkOptions::new()
            .similarity_tolerance(self.similarity_tolerance)
            .neighbor_policy(self.neighbor_policy.into())
            .scan_order(self.scan_order.into());
        WalkConfig::new(self.width, self.height, self.levels)
            .seed(seed)
            .options(options)
    }

    /// Number of cells on the canvas
    pub fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(canvases = config.canvases.len(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Get a canvas by name
    pub fn canvas(&self, name: &str) -> Option<&CanvasConfig> {
        self.canvases.get(name)
    }

    /// Get the default canvas with its name
    pub fn default_canvas(&self) -> Option<(&str, &CanvasConfig)> {
        let name = self.default_canvas.as_deref()?;
        self.canvases
            .get_key_value(name)
            .map(|(name, canvas)| (name.as_str(), canvas))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut canvases = BTreeMap::new();
        canvases.insert(
            "default".to_string(),
            CanvasConfig {
                width: 256,
                height: 128,
                levels: default_levels(),
                similarity_tolerance: default_tolerance(),
                neighbor_policy: NeighborPolicySetting::Random,
                scan_order: ScanOrderSetting::ColumnMajor,
                seed: None,
                chunk_size: default_chunk_size(),
            },
        );

        Self {
            canvases,
            default_canvas: default_canvas(),
            optimize_png: false,
            render_cache_capacity: default_render_cache_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.default_canvas, Some("default".to_string()));
        let (name, canvas) = config.default_canvas().unwrap();
        assert_eq!(name, "default");
        assert_eq!((canvas.width, canvas.height, canvas.levels), (256, 128, 32));
        assert_eq!(canvas.similarity_tolerance, 500);
        assert_eq!(canvas.chunk_size, 1024);
        assert!(canvas.walk_config(0).validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_canvas_uses_defaults() {
        let yaml = r#"
canvases:
  strip:
    width: 64
    height: 512
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        let canvas = config.canvas("strip").unwrap();

        assert_eq!(canvas.levels, 32);
        assert_eq!(canvas.similarity_tolerance, 500);
        assert_eq!(canvas.neighbor_policy, NeighborPolicySetting::Random);
        assert_eq!(canvas.scan_order, ScanOrderSetting::ColumnMajor);
        assert_eq!(canvas.seed, None);
        assert!(!config.optimize_png);
        assert_eq!(config.render_cache_capacity, 64);
        assert_eq!(config.default_canvas, Some("default".to_string()));
        assert!(config.default_canvas().is_none());
    }

    #[test]
    fn test_parse_kebab_case_settings() {
        let yaml = r#"
canvases:
  tiny:
    width: 4
    height: 2
    levels: 2
    neighbor_policy: first
    scan_order: row-major
    seed: 9
    chunk_size: 3
default_canvas: tiny
optimize_png: true
render_cache_capacity: 5
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        let (name, canvas) = config.default_canvas().unwrap();
        assert_eq!(name, "tiny");
        assert!(config.optimize_png);
        assert_eq!(config.render_cache_capacity, 5);
        assert_eq!(canvas.neighbor_policy, NeighborPolicySetting::First);
        assert_eq!(canvas.scan_order, ScanOrderSetting::RowMajor);
        assert_eq!(canvas.chunk_size, 3);

        let walk = canvas.walk_config(canvas.seed.unwrap());
        assert_eq!(walk.seed, Some(9));
        assert_eq!(walk.options.neighbor_policy, NeighborPolicy::First);
        assert_eq!(walk.options.scan_order, ScanOrder::RowMajor);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let yaml = r#"
canvases:
  bad:
    width: 4
    height: 2
    neighbor_policy: sideways
"#;
        assert!(AppConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_embedded_config_parses() {
        let config = AppConfig::load_from_assets(&AssetLoader::new(None));
        for name in ["default", "small", "tiny"] {
            let canvas = config.canvas(name).unwrap();
            assert!(
                canvas.walk_config(0).validate().is_ok(),
                "embedded canvas {name} is invalid"
            );
        }
    }

    #[test]
    fn test_unparseable_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "canvases: [not, a, map").unwrap();

        let config = AppConfig::load_from_assets(&AssetLoader::new(Some(path)));
        assert_eq!(config.canvases.len(), 1);
        assert!(config.canvas("default").is_some());
    }
}
