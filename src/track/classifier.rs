use crate::map::features::TrackColor;

use super::{ClassifiedPoint, PointKind, TrackPoint};

/// Classifies an ordered telemetry sequence. Returns the classified points
/// together with the final deviation latch, which callers discard; each call
/// starts a fresh pass.
///
/// Per point, the first matching rule wins:
/// 1. an active violation is always red,
/// 2. the first route deviation of the pass is red and latches,
/// 3. a battery warning is yellow,
/// 4. any further route deviation is orange,
/// 5. everything else is green.
///
/// The latch never re-arms within a pass, so one excursion alerts once and
/// later deviation samples demote to orange.
#[must_use]
pub fn classify(points: &[TrackPoint]) -> (Vec<ClassifiedPoint>, bool) {
  let mut deviation_latched = false;
  let mut classified = Vec::with_capacity(points.len());

  for point in points {
    let color = if point.with_violation {
      TrackColor::Red
    } else if !deviation_latched && point.route_deviation {
      deviation_latched = true;
      TrackColor::Red
    } else if point.battery_warn {
      TrackColor::Yellow
    } else if point.route_deviation {
      TrackColor::Orange
    } else {
      TrackColor::Green
    };

    let event = point.latch_event();
    classified.push(ClassifiedPoint {
      telemetry_id: point.telemetry_id,
      serial_number: point.serial_number.clone(),
      coordinate: point.coordinate(),
      color,
      kind: if event.is_some() {
        PointKind::Marker
      } else {
        PointKind::Dot
      },
      event,
      with_violation: point.with_violation,
      battery_warn: point.battery_warn,
    });
  }

  (classified, deviation_latched)
}
