use serde::Serialize;

use super::coordinates::WGS84Coordinate;

/// Default radius of a circle-rendered track point.
pub const POINT_RADIUS: f32 = 8.0;
/// Radius of the currently selected track point.
pub const SELECTED_POINT_RADIUS: f32 = 12.0;

static ALL_COLORS: [TrackColor; 4] = [
  TrackColor::Green,
  TrackColor::Orange,
  TrackColor::Yellow,
  TrackColor::Red,
];

/// Classification color of a track point and the segment it originates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Default)]
pub enum TrackColor {
  #[default]
  Green,
  Orange,
  Yellow,
  Red,
}

impl TrackColor {
  #[must_use]
  pub fn hex(self) -> &'static str {
    match self {
      TrackColor::Green => "#27AE60",
      TrackColor::Orange => "#F2994A",
      TrackColor::Yellow => "#fff100",
      TrackColor::Red => "#EB5757",
    }
  }

  #[must_use]
  pub fn all() -> &'static [TrackColor] {
    &ALL_COLORS
  }
}

/// How the canvas draws a circle-rendered point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum PointRenderer {
  /// The canvas's stock circle marker.
  DefaultCircle,
  /// The custom six-point badge used for regular telemetry dots.
  SixPointBadge,
}

/// One polyline segment between two chronologically adjacent samples.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LineSegment {
  pub from: WGS84Coordinate,
  pub to: WGS84Coordinate,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ControlPointKind {
  Entry,
  Exit,
}

/// Icon content of a marker layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MarkerIcon {
  /// Vehicle pin: base pin, vehicle-type badge, registration number and flag.
  Vehicle {
    type_asset: Option<&'static str>,
    reg_number: String,
    flag_key: String,
  },
  /// Latch event pin along a track.
  LatchPin { asset: &'static str },
  /// Boundary waypoint marker with its tooltip text.
  ControlPoint {
    kind: ControlPointKind,
    tooltip: String,
  },
}

/// A renderable layer description handed to the canvas. The canvas owns the
/// resulting layer; the engine only keeps the returned handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LayerSpec {
  Marker {
    position: WGS84Coordinate,
    icon: MarkerIcon,
  },
  CirclePoint {
    position: WGS84Coordinate,
    color: TrackColor,
    radius: f32,
    renderer: PointRenderer,
  },
  PolyLine {
    color: TrackColor,
    segments: Vec<LineSegment>,
  },
  Popup {
    position: WGS84Coordinate,
    content: String,
  },
}
