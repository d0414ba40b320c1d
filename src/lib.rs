pub mod config;
pub mod engine;
pub mod map;
pub mod track;

pub use engine::lifecycle::{InputChange, TrackMap};
pub use map::canvas::{CanvasEvent, MapCanvas};
