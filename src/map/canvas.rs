use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::{
  coordinates::{GeoBounds, WGS84Coordinate},
  features::LayerSpec,
};

/// Opaque handle to a layer owned by the canvas.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayerId(pub u64);

#[derive(Error, Debug)]
pub enum CanvasError {
  #[error("canvas rejected layer: {0}")]
  Rejected(String),
}

/// Callbacks originating from the canvas, delivered by the hosting layer.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
  Click {
    layer: LayerId,
    position: WGS84Coordinate,
  },
  PopupClosed,
  FullscreenChanged {
    fullscreen: bool,
  },
}

/// The rendering surface the engine draws onto. Implementations wrap a real
/// map widget; the engine only ever talks to this interface.
pub trait MapCanvas {
  fn add_layer(&mut self, layer: LayerSpec) -> Result<LayerId, CanvasError>;
  /// Removing an unknown or already removed layer is a no-op.
  fn remove_layer(&mut self, layer: LayerId);
  /// Resizes a circle-rendered point. Unknown handles are ignored.
  fn set_point_radius(&mut self, layer: LayerId, radius: f32);
  fn fit_bounds(&mut self, bounds: GeoBounds);
  fn set_view(&mut self, center: WGS84Coordinate, zoom: f32);
  fn set_zoom(&mut self, zoom: f32);
  fn zoom(&self) -> f32;
  fn zoom_in(&mut self);
  fn zoom_out(&mut self);
}

const HEADLESS_ZOOM_STEP: f32 = 0.5;

/// An in-memory canvas. Keeps real layer and camera bookkeeping so the engine
/// can be driven end to end without a map widget; used by tests and trackcat.
#[derive(Debug, Default)]
pub struct HeadlessCanvas {
  layers: BTreeMap<LayerId, LayerSpec>,
  next_id: u64,
  zoom: f32,
  center: Option<WGS84Coordinate>,
  fitted_bounds: Option<GeoBounds>,
  fit_count: usize,
  radius_ops: Vec<(LayerId, f32)>,
}

impl HeadlessCanvas {
  #[must_use]
  pub fn new() -> Self {
    Self {
      zoom: 3.0,
      ..Self::default()
    }
  }

  #[must_use]
  pub fn layer(&self, id: LayerId) -> Option<&LayerSpec> {
    self.layers.get(&id)
  }

  pub fn layers(&self) -> impl Iterator<Item = (LayerId, &LayerSpec)> {
    self.layers.iter().map(|(id, spec)| (*id, spec))
  }

  #[must_use]
  pub fn layer_count(&self) -> usize {
    self.layers.len()
  }

  #[must_use]
  pub fn center(&self) -> Option<WGS84Coordinate> {
    self.center
  }

  #[must_use]
  pub fn fitted_bounds(&self) -> Option<GeoBounds> {
    self.fitted_bounds
  }

  #[must_use]
  pub fn fit_count(&self) -> usize {
    self.fit_count
  }

  /// Every `set_point_radius` call in order, including ones that targeted a
  /// layer that was already removed.
  #[must_use]
  pub fn radius_ops(&self) -> &[(LayerId, f32)] {
    &self.radius_ops
  }
}

impl MapCanvas for HeadlessCanvas {
  fn add_layer(&mut self, layer: LayerSpec) -> Result<LayerId, CanvasError> {
    let id = LayerId(self.next_id);
    self.next_id += 1;
    self.layers.insert(id, layer);
    Ok(id)
  }

  fn remove_layer(&mut self, layer: LayerId) {
    self.layers.remove(&layer);
  }

  fn set_point_radius(&mut self, layer: LayerId, radius: f32) {
    self.radius_ops.push((layer, radius));
    if let Some(LayerSpec::CirclePoint { radius: r, .. }) = self.layers.get_mut(&layer) {
      *r = radius;
    }
  }

  fn fit_bounds(&mut self, bounds: GeoBounds) {
    self.fit_count += 1;
    self.fitted_bounds = Some(bounds);
    self.center = Some(bounds.center());
  }

  fn set_view(&mut self, center: WGS84Coordinate, zoom: f32) {
    self.center = Some(center);
    self.zoom = zoom;
  }

  fn set_zoom(&mut self, zoom: f32) {
    self.zoom = zoom;
  }

  fn zoom(&self) -> f32 {
    self.zoom
  }

  fn zoom_in(&mut self) {
    self.zoom += HEADLESS_ZOOM_STEP;
  }

  fn zoom_out(&mut self) {
    self.zoom -= HEADLESS_ZOOM_STEP;
  }
}
