mod gate;
pub mod input;
mod movement;
mod plugin;
mod probes;
mod state;

pub use gate::{GateDecision, LedgeGate};
pub use input::{LookInput, MoveInput};
pub use movement::update_grounded_state;
pub use plugin::{spawn_player, PlayerPlugin};
pub use probes::{
    sample_ledge_probes, LedgeProbes, LedgeSampleTimer, PROBE_CENTER, PROBE_LEFT, PROBE_RIGHT,
};
pub use state::*;
