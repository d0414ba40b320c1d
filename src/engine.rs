/// Boundary waypoint markers with formatted activation timestamps.
pub mod control_points;
/// Pin and flag asset selection.
pub mod icons;
/// Owns the rendered layer registry and rebuilds it on input changes.
pub mod lifecycle;
/// Tracks the single selected point and its popup.
pub mod popup;

pub use lifecycle::{InputChange, TrackMap};
