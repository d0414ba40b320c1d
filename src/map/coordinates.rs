use serde::{Deserialize, Serialize};

/// The standard WGS84 coordinate system.
#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct WGS84Coordinate {
  #[serde(alias = "latitude")]
  pub lat: f32,
  #[serde(alias = "longitude")]
  pub lon: f32,
}

impl WGS84Coordinate {
  #[must_use]
  pub fn new(lat: f32, lon: f32) -> Self {
    Self { lat, lon }
  }

  #[must_use]
  pub fn is_valid(&self) -> bool {
    -90.0 < self.lat && self.lat < 90.0 && -180.0 < self.lon && self.lon < 180.0
  }
}

impl Eq for WGS84Coordinate {}

/// A coordinate as it arrives from telemetry. Either side may be missing or
/// out of range; [`RawCoordinate::validated`] is the single place that decides
/// whether a sample can be placed on the map.
#[derive(Debug, Default, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct RawCoordinate {
  #[serde(default)]
  pub lat: Option<f32>,
  #[serde(default)]
  pub lon: Option<f32>,
}

impl RawCoordinate {
  #[must_use]
  pub fn new(lat: f32, lon: f32) -> Self {
    Self {
      lat: Some(lat),
      lon: Some(lon),
    }
  }

  #[must_use]
  pub fn validated(&self) -> Option<WGS84Coordinate> {
    let coord = WGS84Coordinate {
      lat: self.lat?,
      lon: self.lon?,
    };
    coord.is_valid().then_some(coord)
  }
}

impl From<WGS84Coordinate> for RawCoordinate {
  fn from(coord: WGS84Coordinate) -> Self {
    Self::new(coord.lat, coord.lon)
  }
}

/// A geographic bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
  max_lat: f32,
  min_lat: f32,
  max_lon: f32,
  min_lon: f32,
}

impl Default for GeoBounds {
  fn default() -> Self {
    Self::get_invalid()
  }
}

impl GeoBounds {
  #[must_use]
  pub fn get_invalid() -> Self {
    Self {
      max_lat: f32::MIN,
      min_lat: f32::MAX,
      max_lon: f32::MIN,
      min_lon: f32::MAX,
    }
  }

  pub fn from_iterator<I: IntoIterator<Item = WGS84Coordinate>>(positions: I) -> Self {
    let mut bounds = Self::get_invalid();
    positions
      .into_iter()
      .for_each(|pos| bounds.add_coordinate(pos));
    bounds
  }

  pub fn add_coordinate(&mut self, coord: WGS84Coordinate) {
    self.min_lat = self.min_lat.min(coord.lat);
    self.max_lat = self.max_lat.max(coord.lat);
    self.min_lon = self.min_lon.min(coord.lon);
    self.max_lon = self.max_lon.max(coord.lon);
  }

  #[must_use]
  pub fn is_valid(&self) -> bool {
    self.min_lat <= self.max_lat
      && self.min_lon <= self.max_lon
      && self.min_lat >= -90.0
      && self.max_lat <= 90.0
      && self.min_lon >= -180.0
      && self.max_lon <= 180.0
  }

  #[must_use]
  pub fn center(&self) -> WGS84Coordinate {
    WGS84Coordinate {
      lat: f32::midpoint(self.max_lat, self.min_lat),
      lon: f32::midpoint(self.max_lon, self.min_lon),
    }
  }

  #[must_use]
  pub fn south(&self) -> f32 {
    self.min_lat
  }

  #[must_use]
  pub fn north(&self) -> f32 {
    self.max_lat
  }

  #[must_use]
  pub fn west(&self) -> f32 {
    self.min_lon
  }

  #[must_use]
  pub fn east(&self) -> f32 {
    self.max_lon
  }

  #[must_use]
  pub fn contains(&self, coord: WGS84Coordinate) -> bool {
    self.min_lat <= coord.lat
      && coord.lat <= self.max_lat
      && self.min_lon <= coord.lon
      && coord.lon <= self.max_lon
  }
}
