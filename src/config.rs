use std::path::PathBuf;

use dirs::home_dir;
use log::error;
use serde::{Deserialize, Serialize};

use crate::engine::control_points::ControlPointLabels;
use crate::map::coordinates::WGS84Coordinate;

/// Runtime configuration. Every field falls back to the built-in default, so
/// a config file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  /// Lower camera zoom bound.
  #[serde(default = "default_min_zoom")]
  pub min_zoom: f32,
  /// Upper camera zoom bound.
  #[serde(default = "default_max_zoom")]
  pub max_zoom: f32,
  /// Zoom forced after marker rebuilds.
  #[serde(default = "default_overview_zoom")]
  pub overview_zoom: f32,
  #[serde(default = "default_zoom")]
  pub default_zoom: f32,
  #[serde(default = "default_center")]
  pub default_center: WGS84Coordinate,
  #[serde(default)]
  pub labels: ControlPointLabels,
}

fn default_min_zoom() -> f32 {
  3.0
}

fn default_max_zoom() -> f32 {
  18.0
}

fn default_overview_zoom() -> f32 {
  3.0
}

fn default_zoom() -> f32 {
  3.0
}

fn default_center() -> WGS84Coordinate {
  WGS84Coordinate::new(61.598_56, 111.255_11)
}

impl Default for Config {
  fn default() -> Self {
    Self {
      min_zoom: default_min_zoom(),
      max_zoom: default_max_zoom(),
      overview_zoom: default_overview_zoom(),
      default_zoom: default_zoom(),
      default_center: default_center(),
      labels: ControlPointLabels::default(),
    }
  }
}

impl Config {
  #[must_use]
  pub fn new() -> Self {
    Self::from_file().unwrap_or_default()
  }

  fn from_file() -> Option<Self> {
    let config_path = std::env::var("TRACKVAS_CONFIG")
      .ok()
      .map(PathBuf::from)
      .or_else(|| home_dir().map(|p| p.join(".config").join("trackvas")))?;
    let config_path = config_path.join("config.json");

    serde_json::from_str(&std::fs::read_to_string(&config_path).ok()?)
      .inspect_err(|e| error!("Failed to read config file: {e}"))
      .ok()
  }
}
