use log::{debug, error};

use crate::config::Config;
use crate::map::{
  canvas::{CanvasError, CanvasEvent, LayerId, MapCanvas},
  coordinates::{GeoBounds, WGS84Coordinate},
  features::{LayerSpec, MarkerIcon, POINT_RADIUS, PointRenderer},
};
use crate::track::{
  ControlPointInput, ControlPointPair, MultiTrackEntry, PointKind, TrackPoint, Vehicle, classifier,
  geometry,
};

use super::control_points;
use super::icons::{self, CountryCodeResolver};
use super::popup::{PopupContentRenderer, PopupCoordinator, PopupRequest};

/// An input-prop change, delivered by the hosting layer. Each change triggers
/// exactly one rebuild of its layer category.
#[derive(Debug, Clone, PartialEq)]
pub enum InputChange {
  Vehicles(Vec<Vehicle>),
  Track(Vec<TrackPoint>),
  ControlPoints(Option<ControlPointInput>),
  MultiTracks(Vec<MultiTrackEntry>),
}

#[derive(Debug)]
struct VehicleMarker {
  id: LayerId,
  coordinate: WGS84Coordinate,
  telemetry_id: i64,
}

#[derive(Debug)]
struct PointLayer {
  id: LayerId,
  telemetry_id: i64,
  kind: PointKind,
}

/// Every layer handle the engine has created and not yet removed, grouped
/// into independently rebuildable sets.
#[derive(Debug, Default)]
struct LayerRegistry {
  markers: Vec<VehicleMarker>,
  normal_points: Vec<PointLayer>,
  danger_points: Vec<PointLayer>,
  lines: Vec<LayerId>,
  control_points: Vec<LayerId>,
}

struct ClickTarget {
  telemetry_id: i64,
  circle: Option<LayerId>,
}

impl LayerRegistry {
  fn click_target(&self, layer: LayerId) -> Option<ClickTarget> {
    if let Some(marker) = self.markers.iter().find(|m| m.id == layer) {
      return Some(ClickTarget {
        telemetry_id: marker.telemetry_id,
        circle: None,
      });
    }
    self
      .normal_points
      .iter()
      .chain(&self.danger_points)
      .find(|p| p.id == layer)
      .map(|p| ClickTarget {
        telemetry_id: p.telemetry_id,
        // Only plain dots enlarge; latch markers carry no radius.
        circle: (p.kind == PointKind::Dot).then_some(p.id),
      })
  }
}

/// The core engine: owns the layer registry, rebuilds it on input changes and
/// keeps the camera consistent. The hosting layer injects the canvas and
/// forwards prop changes and canvas callbacks; everything runs synchronously
/// on the caller's thread.
pub struct TrackMap<C: MapCanvas> {
  canvas: Option<C>,
  config: Config,
  popup_renderer: Box<dyn PopupContentRenderer>,
  country_resolver: Box<dyn CountryCodeResolver>,
  order_id: Option<i64>,
  selected_order_id: Option<i64>,
  layers: LayerRegistry,
  popups: PopupCoordinator,
  standard_bounds: Option<GeoBounds>,
  track_displayed: bool,
}

impl<C: MapCanvas> TrackMap<C> {
  #[must_use]
  pub fn new(
    config: Config,
    popup_renderer: Box<dyn PopupContentRenderer>,
    country_resolver: Box<dyn CountryCodeResolver>,
  ) -> Self {
    Self {
      canvas: None,
      config,
      popup_renderer,
      country_resolver,
      order_id: None,
      selected_order_id: None,
      layers: LayerRegistry::default(),
      popups: PopupCoordinator::new(),
      standard_bounds: None,
      track_displayed: false,
    }
  }

  #[must_use]
  pub fn with_order(mut self, order_id: Option<i64>, selected_order_id: Option<i64>) -> Self {
    self.order_id = order_id;
    self.selected_order_id = selected_order_id;
    self
  }

  /// Hands the rendering surface to the engine and moves the camera to the
  /// configured start view.
  pub fn attach_canvas(&mut self, mut canvas: C) {
    canvas.set_view(self.config.default_center, self.config.default_zoom);
    self.canvas = Some(canvas);
  }

  #[must_use]
  pub fn canvas(&self) -> Option<&C> {
    self.canvas.as_ref()
  }

  /// Bounding box over the last multi-vehicle snapshot, if one was cached.
  #[must_use]
  pub fn standard_bounds(&self) -> Option<GeoBounds> {
    self.standard_bounds
  }

  #[must_use]
  pub fn point_layer_count(&self) -> usize {
    self.layers.normal_points.len() + self.layers.danger_points.len()
  }

  #[must_use]
  pub fn line_layer_count(&self) -> usize {
    self.layers.lines.len()
  }

  #[must_use]
  pub fn marker_count(&self) -> usize {
    self.layers.markers.len()
  }

  #[must_use]
  pub fn control_point_count(&self) -> usize {
    self.layers.control_points.len()
  }

  pub fn on_input_changed(&mut self, change: InputChange) {
    match change {
      InputChange::Vehicles(vehicles) => self.set_vehicles(&vehicles),
      InputChange::Track(points) => self.set_track(&points),
      InputChange::ControlPoints(input) => self.set_control_points(input.as_ref()),
      InputChange::MultiTracks(entries) => self.set_multi_tracks(&entries),
    }
  }

  pub fn on_canvas_event(&mut self, event: CanvasEvent) {
    match event {
      CanvasEvent::Click { layer, position } => self.handle_click(layer, position),
      CanvasEvent::PopupClosed => {
        if let Some(canvas) = self.canvas.as_mut() {
          self.popups.close(canvas);
        }
      }
      CanvasEvent::FullscreenChanged { fullscreen } => {
        debug!("canvas fullscreen changed: {fullscreen}");
      }
    }
  }

  /// Rebuilds the vehicle marker set. An empty snapshot only removes the
  /// markers; a non-empty one supersedes every other layer category, caches
  /// the fleet bounding box (two or more vehicles), re-adds the markers and
  /// finishes by fitting the camera and forcing the overview zoom.
  pub fn set_vehicles(&mut self, vehicles: &[Vehicle]) {
    if vehicles.is_empty() {
      self.remove_vehicle_markers();
      return;
    }

    self.remove_point_layers();
    self.remove_vehicle_markers();
    self.remove_lines();
    self.remove_control_points();
    self.remove_popup_layer();

    if vehicles.len() > 1 {
      self.standard_bounds = Some(GeoBounds::from_iterator(
        vehicles.iter().filter_map(Vehicle::coordinate),
      ));
    }
    if let Err(e) = self.add_vehicle_markers(vehicles) {
      error!("vehicle marker rebuild failed: {e}");
    }
    self.fit_all_markers();
    if let Some(canvas) = self.canvas.as_mut() {
      canvas.set_zoom(self.config.overview_zoom);
    }
  }

  /// Rebuilds the track layers. An empty track removes only the point
  /// layers, leaving lines and control points for context.
  pub fn set_track(&mut self, points: &[TrackPoint]) {
    if points.is_empty() {
      self.remove_point_layers();
      self.track_displayed = false;
      return;
    }

    self.remove_vehicle_markers();
    self.remove_point_layers();
    self.remove_lines();
    self.remove_popup_layer();
    if let Err(e) = self.add_track_layers(points) {
      error!("track rebuild failed: {e}");
    }
    self.track_displayed = true;
  }

  /// Renders the boundary pair when both sides validate; otherwise tears the
  /// control-point and line layers down. While no track is displayed a valid
  /// pair also resets the camera to the overview.
  pub fn set_control_points(&mut self, input: Option<&ControlPointInput>) {
    match input.and_then(ControlPointInput::validate) {
      Some(pair) => {
        self.remove_control_points();
        if let Err(e) = self.add_control_point_markers(&pair) {
          error!("control point rebuild failed: {e}");
        }
        if !self.track_displayed {
          self.remove_point_layers();
          self.fit_all_markers();
          if let Some(canvas) = self.canvas.as_mut() {
            canvas.set_zoom(self.config.overview_zoom);
          }
        }
      }
      None => {
        self.remove_control_points();
        self.remove_lines();
      }
    }
  }

  /// Renders several tracks at once: one teardown, then every entry appends
  /// its track layers and boundary markers.
  pub fn set_multi_tracks(&mut self, entries: &[MultiTrackEntry]) {
    self.remove_vehicle_markers();
    self.remove_point_layers();
    self.remove_lines();
    self.remove_control_points();
    self.remove_popup_layer();

    for entry in entries {
      if let Err(e) = self.add_track_layers(&entry.points) {
        error!("multi-track rebuild failed: {e}");
      }
      if let Some(pair) = entry
        .control_points
        .as_ref()
        .and_then(ControlPointInput::validate)
      {
        if let Err(e) = self.add_control_point_markers(&pair) {
          error!("control point rebuild failed: {e}");
        }
      }
    }
  }

  /// Fits the camera to the current vehicle markers. A single marker has a
  /// degenerate bounding box and triggers no fit.
  pub fn fit_all_markers(&mut self) {
    let Some(canvas) = self.canvas.as_mut() else {
      return;
    };
    if self.layers.markers.len() > 1 {
      let bounds = GeoBounds::from_iterator(self.layers.markers.iter().map(|m| m.coordinate));
      canvas.fit_bounds(bounds);
    }
  }

  pub fn zoom_in(&mut self) {
    let Some(canvas) = self.canvas.as_mut() else {
      return;
    };
    if canvas.zoom() >= self.config.max_zoom {
      return;
    }
    canvas.zoom_in();
  }

  pub fn zoom_out(&mut self) {
    let Some(canvas) = self.canvas.as_mut() else {
      return;
    };
    if canvas.zoom() <= self.config.min_zoom {
      return;
    }
    canvas.zoom_out();
  }

  fn handle_click(&mut self, layer: LayerId, position: WGS84Coordinate) {
    let Some(target) = self.layers.click_target(layer) else {
      return;
    };
    let content = self.popup_renderer.render(&PopupRequest {
      telemetry_id: target.telemetry_id,
      order_id: self.order_id,
      selected_order_id: self.selected_order_id,
    });
    let Some(canvas) = self.canvas.as_mut() else {
      return;
    };
    if let Err(e) = self
      .popups
      .select(canvas, target.telemetry_id, target.circle, position, content)
    {
      error!("failed to open popup: {e}");
    }
  }

  fn add_vehicle_markers(&mut self, vehicles: &[Vehicle]) -> Result<(), CanvasError> {
    let Some(canvas) = self.canvas.as_mut() else {
      return Ok(());
    };
    for vehicle in vehicles {
      let Some(position) = vehicle.coordinate() else {
        debug!(
          "skipping vehicle {} without a placeable position",
          vehicle.cargo_bay_id
        );
        continue;
      };
      let icon = MarkerIcon::Vehicle {
        type_asset: icons::vehicle_type_asset(&vehicle.vehicle_type_code),
        reg_number: vehicle.reg_number.clone(),
        flag_key: icons::flag_key(
          self.country_resolver.as_ref(),
          vehicle.customer_country_code,
        ),
      };
      let id = canvas.add_layer(LayerSpec::Marker { position, icon })?;
      self.layers.markers.push(VehicleMarker {
        id,
        coordinate: position,
        telemetry_id: vehicle.telemetry.id,
      });
    }
    Ok(())
  }

  fn add_track_layers(&mut self, points: &[TrackPoint]) -> Result<(), CanvasError> {
    let Some(canvas) = self.canvas.as_mut() else {
      return Ok(());
    };
    let (classified, _) = classifier::classify(points);
    let track_geometry = geometry::build(&classified);

    for bucket in track_geometry.lines {
      if bucket.segments.is_empty() {
        continue;
      }
      let id = canvas.add_layer(LayerSpec::PolyLine {
        color: bucket.color,
        segments: bucket.segments,
      })?;
      self.layers.lines.push(id);
    }

    for feature in &track_geometry.normal {
      let id = if let (PointKind::Marker, Some(event)) = (feature.point.kind, feature.point.event)
      {
        canvas.add_layer(LayerSpec::Marker {
          position: feature.position,
          icon: MarkerIcon::LatchPin {
            asset: icons::latch_pin_asset(event, icons::marker_suffix(&feature.point)),
          },
        })?
      } else {
        canvas.add_layer(LayerSpec::CirclePoint {
          position: feature.position,
          color: feature.point.color,
          radius: POINT_RADIUS,
          renderer: PointRenderer::SixPointBadge,
        })?
      };
      self.layers.normal_points.push(PointLayer {
        id,
        telemetry_id: feature.point.telemetry_id,
        kind: feature.point.kind,
      });
    }

    for feature in &track_geometry.danger {
      // Danger points render through the stock circle renderer even when
      // they carry a latch event.
      let id = canvas.add_layer(LayerSpec::CirclePoint {
        position: feature.position,
        color: feature.point.color,
        radius: POINT_RADIUS,
        renderer: PointRenderer::DefaultCircle,
      })?;
      self.layers.danger_points.push(PointLayer {
        id,
        telemetry_id: feature.point.telemetry_id,
        kind: feature.point.kind,
      });
    }

    Ok(())
  }

  fn add_control_point_markers(&mut self, pair: &ControlPointPair) -> Result<(), CanvasError> {
    let Some(canvas) = self.canvas.as_mut() else {
      return Ok(());
    };
    for spec in control_points::build_markers(pair, &self.config.labels) {
      let id = canvas.add_layer(spec)?;
      self.layers.control_points.push(id);
    }
    Ok(())
  }

  fn remove_vehicle_markers(&mut self) {
    let Some(canvas) = self.canvas.as_mut() else {
      return;
    };
    for marker in self.layers.markers.drain(..) {
      canvas.remove_layer(marker.id);
    }
  }

  fn remove_point_layers(&mut self) {
    let Some(canvas) = self.canvas.as_mut() else {
      return;
    };
    for point in self.layers.normal_points.drain(..) {
      canvas.remove_layer(point.id);
    }
    for point in self.layers.danger_points.drain(..) {
      canvas.remove_layer(point.id);
    }
  }

  fn remove_lines(&mut self) {
    let Some(canvas) = self.canvas.as_mut() else {
      return;
    };
    for id in self.layers.lines.drain(..) {
      canvas.remove_layer(id);
    }
  }

  fn remove_control_points(&mut self) {
    let Some(canvas) = self.canvas.as_mut() else {
      return;
    };
    for id in self.layers.control_points.drain(..) {
      canvas.remove_layer(id);
    }
  }

  fn remove_popup_layer(&mut self) {
    if let Some(canvas) = self.canvas.as_mut() {
      self.popups.remove_popup_layer(canvas);
    }
  }
}
