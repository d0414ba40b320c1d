use serde::{Deserialize, Serialize};

use crate::map::features::{ControlPointKind, LayerSpec, MarkerIcon};
use crate::track::{BoundaryPoint, ControlPointPair};

const TOOLTIP_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Localized captions for the boundary markers, provided by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPointLabels {
  pub entry_point: String,
  pub exit_point: String,
}

impl Default for ControlPointLabels {
  fn default() -> Self {
    Self {
      entry_point: "Entry point".to_string(),
      exit_point: "Exit point".to_string(),
    }
  }
}

/// Builds the paired boundary markers for a validated control-point pair.
#[must_use]
pub fn build_markers(pair: &ControlPointPair, labels: &ControlPointLabels) -> [LayerSpec; 2] {
  [
    marker(&pair.entry, ControlPointKind::Entry, &labels.entry_point),
    marker(&pair.exit, ControlPointKind::Exit, &labels.exit_point),
  ]
}

fn marker(point: &BoundaryPoint, kind: ControlPointKind, caption: &str) -> LayerSpec {
  LayerSpec::Marker {
    position: point.coordinate,
    icon: MarkerIcon::ControlPoint {
      kind,
      tooltip: tooltip(caption, point),
    },
  }
}

/// `"{caption} {type }{name}, DD.MM.YYYY HH:mm:ss"`. The timestamp clause is
/// omitted entirely when the date is absent; no placeholder is rendered.
fn tooltip(caption: &str, point: &BoundaryPoint) -> String {
  let kind = point
    .kind
    .as_deref()
    .map(|k| format!("{k} "))
    .unwrap_or_default();
  let date = point
    .timestamp
    .map(|t| format!(", {}", t.format(TOOLTIP_DATE_FORMAT)))
    .unwrap_or_default();
  format!("{caption} {kind}{}{date}", point.name)
}
