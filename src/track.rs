use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::map::{
  coordinates::{RawCoordinate, WGS84Coordinate},
  features::TrackColor,
};

/// Sequential classification of a telemetry stream.
pub mod classifier;
/// Turns classified points into renderable feature groups.
pub mod geometry;

/// One timestamped telemetry sample with position and status flags.
/// Ordering within a track is chronological and significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
  pub telemetry_id: i64,
  #[serde(default)]
  pub serial_number: String,
  #[serde(default)]
  pub coordinates: RawCoordinate,
  #[serde(default)]
  pub with_violation: bool,
  #[serde(default)]
  pub route_deviation: bool,
  #[serde(default)]
  pub battery_warn: bool,
  #[serde(default)]
  pub event_code: Option<String>,
}

impl TrackPoint {
  #[must_use]
  pub fn coordinate(&self) -> Option<WGS84Coordinate> {
    self.coordinates.validated()
  }

  /// The discrete latch event carried by this sample, if its event code is
  /// one of the recognized ones.
  #[must_use]
  pub fn latch_event(&self) -> Option<LatchEvent> {
    self.event_code.as_deref().and_then(|c| c.parse().ok())
  }
}

/// The recognized discrete events that render as an icon marker instead of a
/// plain dot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatchEvent {
  LatchExtracted,
  LatchInstalled,
}

impl LatchEvent {
  #[must_use]
  pub fn code(self) -> &'static str {
    match self {
      LatchEvent::LatchExtracted => "latch_extracted",
      LatchEvent::LatchInstalled => "latch_installed",
    }
  }
}

impl FromStr for LatchEvent {
  type Err = ();
  fn from_str(input: &str) -> Result<LatchEvent, Self::Err> {
    match input {
      "latch_extracted" => Ok(LatchEvent::LatchExtracted),
      "latch_installed" => Ok(LatchEvent::LatchInstalled),
      _ => Err(()),
    }
  }
}

/// Whether a classified point renders as a plain dot or an icon marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum PointKind {
  Dot,
  Marker,
}

/// A track point together with its classification. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPoint {
  pub telemetry_id: i64,
  pub serial_number: String,
  pub coordinate: Option<WGS84Coordinate>,
  pub color: TrackColor,
  pub kind: PointKind,
  pub event: Option<LatchEvent>,
  pub with_violation: bool,
  pub battery_warn: bool,
}

/// A monitored vehicle snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
  pub cargo_bay_id: i64,
  #[serde(default)]
  pub reg_number: String,
  #[serde(default)]
  pub vehicle_type_code: String,
  #[serde(default)]
  pub customer_country_code: u16,
  pub telemetry: VehicleTelemetry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleTelemetry {
  pub id: i64,
  #[serde(default)]
  pub coordinate: RawCoordinate,
}

impl Vehicle {
  #[must_use]
  pub fn coordinate(&self) -> Option<WGS84Coordinate> {
    self.telemetry.coordinate.validated()
  }
}

/// A boundary waypoint as it arrives from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
  #[serde(default)]
  pub name: String,
  #[serde(default, rename = "type")]
  pub kind: Option<String>,
  #[serde(default)]
  pub coordinate: RawCoordinate,
}

/// Raw control-point data. Either side may be missing; only
/// [`ControlPointInput::validate`] produces a renderable pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlPointInput {
  #[serde(default)]
  pub entry_point: Option<Waypoint>,
  #[serde(default)]
  pub exit_point: Option<Waypoint>,
  #[serde(default)]
  pub order_active_date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub order_deactivated_date: Option<DateTime<Utc>>,
}

impl ControlPointInput {
  /// A pair with only one side present, or with an unplaceable coordinate on
  /// either side, is invalid and must not render.
  #[must_use]
  pub fn validate(&self) -> Option<ControlPointPair> {
    let entry = BoundaryPoint::from_waypoint(self.entry_point.as_ref()?, self.order_active_date)?;
    let exit =
      BoundaryPoint::from_waypoint(self.exit_point.as_ref()?, self.order_deactivated_date)?;
    Some(ControlPointPair { entry, exit })
  }
}

/// A validated boundary waypoint with the timestamp shown in its tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryPoint {
  pub name: String,
  pub kind: Option<String>,
  pub coordinate: WGS84Coordinate,
  pub timestamp: Option<DateTime<Utc>>,
}

impl BoundaryPoint {
  fn from_waypoint(waypoint: &Waypoint, timestamp: Option<DateTime<Utc>>) -> Option<Self> {
    Some(Self {
      name: waypoint.name.clone(),
      kind: waypoint.kind.clone(),
      coordinate: waypoint.coordinate.validated()?,
      timestamp,
    })
  }
}

/// Entry and exit waypoints bounding a monitored segment of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPointPair {
  pub entry: BoundaryPoint,
  pub exit: BoundaryPoint,
}

/// One track of a multi-track update, with its boundary waypoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiTrackEntry {
  #[serde(default)]
  pub points: Vec<TrackPoint>,
  #[serde(default)]
  pub control_points: Option<ControlPointInput>,
}
