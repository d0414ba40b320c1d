use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::track::{ClassifiedPoint, LatchEvent};

/// Flag icon key used when a country code cannot be resolved.
pub const FALLBACK_FLAG: &str = "empty";

/// Track pin assets by icon key.
static PIN_ASSETS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
  HashMap::from([
    ("green", "pin-green.svg"),
    ("orange", "pin-orange.svg"),
    ("red", "pin-red.svg"),
    ("latch_installed", "latch_installed.svg"),
    ("latch_extracted", "latch_extracted.svg"),
    ("latch_installed_yellow", "latch_installed_yellow.svg"),
    ("latch_extracted_yellow", "latch_extracted_yellow.svg"),
    ("latch_installed_red", "latch_installed_red.svg"),
    ("latch_extracted_red", "latch_extracted_red.svg"),
  ])
});

/// Vehicle-type badge assets by type code.
static VEHICLE_TYPE_ASSETS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
  HashMap::from([
    ("autotrack", "order-type-autotrack.png"),
    ("container", "order-type-container.png"),
    ("covered_wagon", "order-type-covered_wagon.png"),
    ("main_vehicle", "order-type-main_vehicle.png"),
    ("semi_wagon", "order-type-semi_wagon.png"),
    ("tank", "order-type-tank.png"),
    ("tractor", "order-type-tractor.png"),
    ("trailer_semi_trailer", "order-type-trailer_semi_trailer.png"),
  ])
});

#[must_use]
pub fn vehicle_type_asset(type_code: &str) -> Option<&'static str> {
  VEHICLE_TYPE_ASSETS.get(type_code).copied()
}

/// Pin variant suffix for a latch marker. Only the default and yellow
/// variants are selectable; the red pin assets stay registered but have no
/// reachable selection path.
#[must_use]
pub fn marker_suffix(point: &ClassifiedPoint) -> &'static str {
  if !point.with_violation && point.battery_warn {
    "_yellow"
  } else {
    ""
  }
}

#[must_use]
pub fn latch_pin_asset(event: LatchEvent, suffix: &str) -> &'static str {
  let key = format!("{}{suffix}", event.code());
  PIN_ASSETS
    .get(key.as_str())
    .copied()
    .unwrap_or("pin-green.svg")
}

/// Resolves a numeric country code to its two-letter code. External
/// collaborator; resolution failure degrades to [`FALLBACK_FLAG`].
pub trait CountryCodeResolver {
  fn numeric_to_alpha2(&self, code: u16) -> Option<String>;
}

/// Resolver that knows no countries; every lookup falls back.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCountryResolver;

impl CountryCodeResolver for NullCountryResolver {
  fn numeric_to_alpha2(&self, _code: u16) -> Option<String> {
    None
  }
}

#[must_use]
pub fn flag_key(resolver: &dyn CountryCodeResolver, code: u16) -> String {
  resolver
    .numeric_to_alpha2(code)
    .map_or_else(|| FALLBACK_FLAG.to_string(), |alpha2| alpha2.to_lowercase())
}
