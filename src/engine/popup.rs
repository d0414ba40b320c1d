use crate::map::{
  canvas::{CanvasError, LayerId, MapCanvas},
  coordinates::WGS84Coordinate,
  features::{LayerSpec, POINT_RADIUS, SELECTED_POINT_RADIUS},
};

/// Input for the external popup content collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupRequest {
  pub telemetry_id: i64,
  pub order_id: Option<i64>,
  pub selected_order_id: Option<i64>,
}

/// Produces the popup body for a selected point. External collaborator.
pub trait PopupContentRenderer {
  fn render(&self, request: &PopupRequest) -> String;
}

/// Minimal renderer used by tests and the trackcat binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainPopupRenderer;

impl PopupContentRenderer for PlainPopupRenderer {
  fn render(&self, request: &PopupRequest) -> String {
    format!("Telemetry #{}", request.telemetry_id)
  }
}

#[derive(Debug, Clone, PartialEq)]
enum SelectionState {
  Idle,
  Selected {
    telemetry_id: i64,
    /// The enlarged circle layer; latch markers carry no radius.
    circle: Option<LayerId>,
    /// Cleared when a rebuild tears the popup down while the selection
    /// stays put.
    popup: Option<LayerId>,
  },
}

/// Tracks the single selected point: its enlarged circle and open popup.
/// A rebuild may remove the popup layer, but the circle radius is only ever
/// restored through the close transition.
#[derive(Debug)]
pub struct PopupCoordinator {
  state: SelectionState,
}

impl Default for PopupCoordinator {
  fn default() -> Self {
    Self::new()
  }
}

impl PopupCoordinator {
  #[must_use]
  pub fn new() -> Self {
    Self {
      state: SelectionState::Idle,
    }
  }

  #[must_use]
  pub fn selected_telemetry(&self) -> Option<i64> {
    match &self.state {
      SelectionState::Idle => None,
      SelectionState::Selected { telemetry_id, .. } => Some(*telemetry_id),
    }
  }

  /// Replaces the selection wholesale: the previous popup closes (restoring
  /// its circle), the new circle is enlarged and a popup opens at the click
  /// location.
  pub fn select<C: MapCanvas>(
    &mut self,
    canvas: &mut C,
    telemetry_id: i64,
    circle: Option<LayerId>,
    position: WGS84Coordinate,
    content: String,
  ) -> Result<(), CanvasError> {
    self.close(canvas);

    if let Some(id) = circle {
      canvas.set_point_radius(id, SELECTED_POINT_RADIUS);
    }
    let popup = canvas.add_layer(LayerSpec::Popup { position, content })?;
    self.state = SelectionState::Selected {
      telemetry_id,
      circle,
      popup: Some(popup),
    };
    Ok(())
  }

  /// Close transition: removes the popup, restores the circle radius and
  /// returns to idle.
  pub fn close<C: MapCanvas>(&mut self, canvas: &mut C) {
    if let SelectionState::Selected { circle, popup, .. } =
      std::mem::replace(&mut self.state, SelectionState::Idle)
    {
      if let Some(id) = popup {
        canvas.remove_layer(id);
      }
      if let Some(id) = circle {
        canvas.set_point_radius(id, POINT_RADIUS);
      }
    }
  }

  /// Rebuild teardown: removes the open popup layer only. The selection and
  /// its enlarged radius stay until the canvas reports the close.
  pub fn remove_popup_layer<C: MapCanvas>(&mut self, canvas: &mut C) {
    if let SelectionState::Selected { popup, .. } = &mut self.state {
      if let Some(id) = popup.take() {
        canvas.remove_layer(id);
      }
    }
  }
}
