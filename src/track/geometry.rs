use itertools::Itertools;
use log::debug;

use crate::map::{
  coordinates::WGS84Coordinate,
  features::{LineSegment, TrackColor},
};

use super::ClassifiedPoint;

/// Line segments of one classification color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBucket {
  pub color: TrackColor,
  pub segments: Vec<LineSegment>,
}

/// A placeable point feature with the metadata downstream rendering and
/// click handling need.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFeature {
  pub position: WGS84Coordinate,
  pub point: ClassifiedPoint,
}

/// The renderable feature groups of one track: four color-keyed segment
/// buckets plus the normal and danger point collections.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackGeometry {
  pub lines: Vec<ColorBucket>,
  pub normal: Vec<PointFeature>,
  pub danger: Vec<PointFeature>,
}

impl TrackGeometry {
  #[must_use]
  pub fn segment_count(&self) -> usize {
    self.lines.iter().map(|b| b.segments.len()).sum()
  }

  #[must_use]
  pub fn point_count(&self) -> usize {
    self.normal.len() + self.danger.len()
  }
}

/// Pure transform from a classified sequence to feature groups. Each adjacent
/// pair contributes one segment colored by its origin point; the last point
/// originates nothing. Points without a placeable coordinate are skipped and
/// contribute no segment either; the pass never aborts.
#[must_use]
pub fn build(points: &[ClassifiedPoint]) -> TrackGeometry {
  let mut lines: Vec<ColorBucket> = TrackColor::all()
    .iter()
    .map(|&color| ColorBucket {
      color,
      segments: Vec::new(),
    })
    .collect();
  let mut normal = Vec::new();
  let mut danger = Vec::new();

  for (origin, next) in points.iter().tuple_windows() {
    let (Some(from), Some(to)) = (origin.coordinate, next.coordinate) else {
      continue;
    };
    if let Some(bucket) = lines.iter_mut().find(|b| b.color == origin.color) {
      bucket.segments.push(LineSegment { from, to });
    }
  }

  for point in points {
    let Some(position) = point.coordinate else {
      debug!(
        "skipping unplaceable track point, telemetry id {}",
        point.telemetry_id
      );
      continue;
    };
    let feature = PointFeature {
      position,
      point: point.clone(),
    };
    if point.color == TrackColor::Red {
      danger.push(feature);
    } else {
      normal.push(feature);
    }
  }

  TrackGeometry {
    lines,
    normal,
    danger,
  }
}
