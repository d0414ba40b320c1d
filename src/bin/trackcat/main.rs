use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::de::DeserializeOwned;

use trackvas::config::Config;
use trackvas::engine::icons::NullCountryResolver;
use trackvas::engine::popup::PlainPopupRenderer;
use trackvas::map::canvas::HeadlessCanvas;
use trackvas::track::{ControlPointInput, TrackPoint, Vehicle};
use trackvas::{InputChange, MapCanvas, TrackMap};

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// Telemetry track file: a JSON array of track points.
  track: Option<PathBuf>,

  /// Vehicle snapshot file: a JSON array of vehicles.
  #[arg(short, long)]
  vehicles: Option<PathBuf>,

  /// Control point file: a JSON object with entry and exit waypoints.
  #[arg(short, long)]
  control_points: Option<PathBuf>,

  /// Dumps the resulting layers as JSON instead of a summary.
  #[arg(short, long)]
  json: bool,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
  let data = std::fs::read_to_string(path)
    .with_context(|| format!("reading {}", path.display()))?;
  serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
  env_logger::init();
  let args = Args::parse();

  let mut map = TrackMap::new(
    Config::new(),
    Box::new(PlainPopupRenderer),
    Box::new(NullCountryResolver),
  );
  map.attach_canvas(HeadlessCanvas::new());

  if let Some(path) = &args.vehicles {
    let vehicles: Vec<Vehicle> = read_json(path)?;
    map.on_input_changed(InputChange::Vehicles(vehicles));
  }
  if let Some(path) = &args.track {
    let points: Vec<TrackPoint> = read_json(path)?;
    map.on_input_changed(InputChange::Track(points));
  }
  if let Some(path) = &args.control_points {
    let input: ControlPointInput = read_json(path)?;
    map.on_input_changed(InputChange::ControlPoints(Some(input)));
  }

  let canvas = map.canvas().expect("canvas was attached");
  if args.json {
    let layers: Vec<_> = canvas.layers().map(|(_, spec)| spec).collect();
    println!("{}", serde_json::to_string_pretty(&layers)?);
  } else {
    println!(
      "{} markers, {} point layers, {} line layers, {} control points",
      map.marker_count(),
      map.point_layer_count(),
      map.line_layer_count(),
      map.control_point_count(),
    );
    println!("camera: zoom {}", canvas.zoom());
    if let Some(center) = canvas.center() {
      println!("center: {:.5}, {:.5}", center.lat, center.lon);
    }
  }

  Ok(())
}
