mod look;
mod plugin;
mod rig;

pub use look::*;
pub use plugin::CameraPlugin;
pub use rig::*;
