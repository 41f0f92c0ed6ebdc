pub mod camera;
pub mod interval;
pub mod movement;

pub use camera::{Camera, CameraLimits};
pub use interval::IntervalTicker;
pub use movement::PanDriver;
