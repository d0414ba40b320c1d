use trackvas::config::Config;
use trackvas::engine::icons::NullCountryResolver;
use trackvas::engine::popup::PlainPopupRenderer;
use trackvas::map::canvas::HeadlessCanvas;
use trackvas::map::coordinates::RawCoordinate;
use trackvas::map::features::{LayerSpec, TrackColor};
use trackvas::track::{
  ControlPointInput, MultiTrackEntry, TrackPoint, Vehicle, VehicleTelemetry, Waypoint,
};
use trackvas::{MapCanvas, TrackMap};

fn engine_with_canvas() -> TrackMap<HeadlessCanvas> {
  let mut map = TrackMap::new(
    Config::default(),
    Box::new(PlainPopupRenderer),
    Box::new(NullCountryResolver),
  );
  map.attach_canvas(HeadlessCanvas::new());
  map
}

fn track_point(id: i64, lat: f32, deviation: bool) -> TrackPoint {
  TrackPoint {
    telemetry_id: id,
    serial_number: format!("SN-{id}"),
    coordinates: RawCoordinate::new(lat, 10.0),
    with_violation: false,
    route_deviation: deviation,
    battery_warn: false,
    event_code: None,
  }
}

fn vehicle(id: i64, lat: f32, lon: f32) -> Vehicle {
  Vehicle {
    cargo_bay_id: id,
    reg_number: format!("AB {id:04}"),
    vehicle_type_code: "tractor".to_string(),
    customer_country_code: 643,
    telemetry: VehicleTelemetry {
      id,
      coordinate: RawCoordinate::new(lat, lon),
    },
  }
}

fn waypoint(name: &str, lat: f32, lon: f32) -> Waypoint {
  Waypoint {
    name: name.to_string(),
    kind: None,
    coordinate: RawCoordinate::new(lat, lon),
  }
}

fn complete_pair() -> ControlPointInput {
  ControlPointInput {
    entry_point: Some(waypoint("Entry A", 55.0, 37.0)),
    exit_point: Some(waypoint("Exit B", 56.0, 38.0)),
    order_active_date: None,
    order_deactivated_date: None,
  }
}

#[test]
fn vehicles_rebuild_markers_and_camera() {
  let mut map = engine_with_canvas();
  map.set_vehicles(&[vehicle(1, 55.0, 37.0), vehicle(2, 59.9, 30.3)]);

  assert_eq!(map.marker_count(), 2);
  let bounds = map.standard_bounds().expect("fleet bounds cached");
  assert!(bounds.is_valid());

  let canvas = map.canvas().unwrap();
  assert_eq!(canvas.fit_count(), 1);
  let fitted = canvas.fitted_bounds().unwrap();
  assert!((fitted.south() - 55.0).abs() < 1e-4);
  assert!((fitted.north() - 59.9).abs() < 1e-4);
  assert!((fitted.west() - 30.3).abs() < 1e-4);
  assert!((fitted.east() - 37.0).abs() < 1e-4);
  assert!((canvas.zoom() - 3.0).abs() < f32::EPSILON);
}

#[test]
fn single_vehicle_fits_nothing_and_caches_no_bounds() {
  let mut map = engine_with_canvas();
  map.set_vehicles(&[vehicle(1, 55.0, 37.0)]);

  assert_eq!(map.marker_count(), 1);
  assert!(map.standard_bounds().is_none());
  let canvas = map.canvas().unwrap();
  assert_eq!(canvas.fit_count(), 0);
  assert!((canvas.zoom() - 3.0).abs() < f32::EPSILON);
}

#[test]
fn empty_vehicle_list_only_removes_markers() {
  let mut map = engine_with_canvas();
  map.set_vehicles(&[vehicle(1, 55.0, 37.0), vehicle(2, 59.9, 30.3)]);
  let fits_before = map.canvas().unwrap().fit_count();

  map.set_vehicles(&[]);
  assert_eq!(map.marker_count(), 0);
  // No new markers and no camera fit attempted.
  assert_eq!(map.canvas().unwrap().fit_count(), fits_before);
}

#[test]
fn vehicles_without_position_get_no_marker() {
  let mut map = engine_with_canvas();
  let mut broken = vehicle(3, 55.0, 37.0);
  broken.telemetry.coordinate = RawCoordinate {
    lat: None,
    lon: Some(37.0),
  };
  map.set_vehicles(&[vehicle(1, 55.0, 37.0), broken]);
  assert_eq!(map.marker_count(), 1);
}

#[test]
fn track_rebuild_keeps_point_layer_invariant() {
  let mut map = engine_with_canvas();
  let track: Vec<_> = (0..4).map(|i| track_point(i, 50.0 + i as f32, false)).collect();
  map.set_track(&track);

  assert_eq!(map.point_layer_count(), 4);
  // All green, so a single polyline layer carries the three segments.
  assert_eq!(map.line_layer_count(), 1);
  let canvas = map.canvas().unwrap();
  let segment_count: usize = canvas
    .layers()
    .filter_map(|(_, spec)| match spec {
      LayerSpec::PolyLine { segments, .. } => Some(segments.len()),
      _ => None,
    })
    .sum();
  assert_eq!(segment_count, 3);
}

#[test]
fn first_deviation_renders_red_then_orange() {
  let mut map = engine_with_canvas();
  map.set_track(&[track_point(1, 50.0, true), track_point(2, 51.0, true)]);

  assert_eq!(map.point_layer_count(), 2);
  let canvas = map.canvas().unwrap();

  let point_colors: Vec<TrackColor> = canvas
    .layers()
    .filter_map(|(_, spec)| match spec {
      LayerSpec::CirclePoint { color, .. } => Some(*color),
      _ => None,
    })
    .collect();
  assert!(point_colors.contains(&TrackColor::Red));
  assert!(point_colors.contains(&TrackColor::Orange));

  // The single segment is colored by its origin point.
  let line_colors: Vec<TrackColor> = canvas
    .layers()
    .filter_map(|(_, spec)| match spec {
      LayerSpec::PolyLine { color, segments } if !segments.is_empty() => Some(*color),
      _ => None,
    })
    .collect();
  assert_eq!(line_colors, vec![TrackColor::Red]);
}

#[test]
fn empty_track_removes_only_point_layers() {
  let mut map = engine_with_canvas();
  map.set_track(&[track_point(1, 50.0, false), track_point(2, 51.0, false)]);
  assert_eq!(map.point_layer_count(), 2);
  let lines_before = map.line_layer_count();

  map.set_track(&[]);
  assert_eq!(map.point_layer_count(), 0);
  assert_eq!(map.line_layer_count(), lines_before);

  // A second empty update is a no-op, not an error.
  map.set_track(&[]);
  assert_eq!(map.point_layer_count(), 0);
}

#[test]
fn track_rebuild_is_idempotent() {
  let mut map = engine_with_canvas();
  let track = vec![track_point(1, 50.0, false), track_point(2, 51.0, true)];

  map.set_track(&track);
  let points = map.point_layer_count();
  let lines = map.line_layer_count();
  let canvas_layers = map.canvas().unwrap().layer_count();

  map.set_track(&track);
  assert_eq!(map.point_layer_count(), points);
  assert_eq!(map.line_layer_count(), lines);
  assert_eq!(map.canvas().unwrap().layer_count(), canvas_layers);
}

#[test]
fn vehicle_rebuild_supersedes_track_layers() {
  let mut map = engine_with_canvas();
  map.set_track(&[track_point(1, 50.0, false), track_point(2, 51.0, false)]);
  map.set_control_points(Some(&complete_pair()));
  map.set_vehicles(&[vehicle(1, 55.0, 37.0)]);

  assert_eq!(map.point_layer_count(), 0);
  assert_eq!(map.line_layer_count(), 0);
  assert_eq!(map.control_point_count(), 0);
  assert_eq!(map.marker_count(), 1);
}

#[test]
fn incomplete_pair_tears_down_control_and_line_layers() {
  let mut map = engine_with_canvas();
  map.set_track(&[track_point(1, 50.0, false), track_point(2, 51.0, false)]);
  map.set_control_points(Some(&complete_pair()));
  assert_eq!(map.control_point_count(), 2);

  let one_sided = ControlPointInput {
    entry_point: Some(waypoint("Entry A", 55.0, 37.0)),
    ..ControlPointInput::default()
  };
  map.set_control_points(Some(&one_sided));
  assert_eq!(map.control_point_count(), 0);
  assert_eq!(map.line_layer_count(), 0);
  // Point layers survive an incomplete pair.
  assert_eq!(map.point_layer_count(), 2);
}

#[test]
fn control_points_reset_camera_only_without_a_track() {
  let mut map = engine_with_canvas();
  map.set_track(&[track_point(1, 50.0, false), track_point(2, 51.0, false)]);
  for _ in 0..4 {
    map.zoom_in();
  }
  let zoomed = map.canvas().unwrap().zoom();
  assert!(zoomed > 3.0);

  // With a track displayed the camera stays put.
  map.set_control_points(Some(&complete_pair()));
  assert_eq!(map.control_point_count(), 2);
  assert!((map.canvas().unwrap().zoom() - zoomed).abs() < f32::EPSILON);
  assert_eq!(map.point_layer_count(), 2);

  // Without one, the overview zoom is forced and points are dropped.
  map.set_track(&[]);
  map.set_control_points(Some(&complete_pair()));
  assert!((map.canvas().unwrap().zoom() - 3.0).abs() < f32::EPSILON);
  assert_eq!(map.point_layer_count(), 0);
}

#[test]
fn control_points_with_missing_input_remove_layers() {
  let mut map = engine_with_canvas();
  map.set_control_points(Some(&complete_pair()));
  assert_eq!(map.control_point_count(), 2);

  map.set_control_points(None);
  assert_eq!(map.control_point_count(), 0);
}

#[test]
fn multi_track_renders_the_union_after_one_teardown() {
  let mut map = engine_with_canvas();
  map.set_vehicles(&[vehicle(1, 55.0, 37.0), vehicle(2, 59.9, 30.3)]);

  let entries = vec![
    MultiTrackEntry {
      points: vec![track_point(1, 50.0, false), track_point(2, 51.0, false)],
      control_points: Some(complete_pair()),
    },
    MultiTrackEntry {
      points: vec![track_point(3, 60.0, true)],
      control_points: None,
    },
  ];
  map.set_multi_tracks(&entries);

  assert_eq!(map.marker_count(), 0);
  assert_eq!(map.point_layer_count(), 3);
  assert_eq!(map.control_point_count(), 2);
}

#[test]
fn zoom_clamps_at_both_bounds() {
  let mut map = engine_with_canvas();

  // Starts at the lower bound; zooming out is a no-op.
  map.zoom_out();
  assert!((map.canvas().unwrap().zoom() - 3.0).abs() < f32::EPSILON);

  for _ in 0..40 {
    map.zoom_in();
  }
  assert!((map.canvas().unwrap().zoom() - 18.0).abs() < f32::EPSILON);
  map.zoom_in();
  assert!((map.canvas().unwrap().zoom() - 18.0).abs() < f32::EPSILON);

  map.zoom_out();
  assert!(map.canvas().unwrap().zoom() < 18.0);
}

#[test]
fn unplaceable_track_points_are_skipped() {
  let mut map = engine_with_canvas();
  let mut broken = track_point(2, 51.0, false);
  broken.coordinates = RawCoordinate {
    lat: Some(200.0),
    lon: Some(10.0),
  };
  map.set_track(&[track_point(1, 50.0, false), broken, track_point(3, 52.0, false)]);

  assert_eq!(map.point_layer_count(), 2);
}
