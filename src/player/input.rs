use bevy::ecs::observer::On;
use bevy::prelude::{Component, Deref, DerefMut, EntityEvent, Query, Vec2};
use bevy_enhanced_input::prelude::*;

use super::probes::LedgeSampleTimer;

/// Move in a direction (WASD)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct MoveAction;

/// Look around (mouse delta)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct LookAction;

/// Jump action
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct JumpAction;

/// Stores the current movement input vector
#[derive(Component, Default, Deref, DerefMut)]
pub struct MoveInput(pub Vec2);

/// Stores the current look input delta
#[derive(Component, Default, Deref, DerefMut)]
pub struct LookInput(pub Vec2);

/// Stores whether jump was pressed this frame
#[derive(Component, Default)]
pub struct JumpPressed(pub bool);

/// System to handle move input via observer
pub fn handle_move_input(trigger: On<Fire<MoveAction>>, mut query: Query<&mut MoveInput>) {
    if let Ok(mut move_input) = query.get_mut(trigger.event_target()) {
        move_input.0 = trigger.value;
    }
}

/// Resumes the ledge sampler clock on the move-press edge.
///
/// Resuming rather than restarting preserves the sampling phase across a
/// brief input release.
pub fn handle_move_start(
    trigger: On<Start<MoveAction>>,
    mut query: Query<&mut LedgeSampleTimer>,
) {
    if let Ok(mut timer) = query.get_mut(trigger.event_target()) {
        timer.resume();
    }
}

/// Clears move input and pauses the sampler clock when all movement keys
/// are released.
pub fn handle_move_end(
    trigger: On<Complete<MoveAction>>,
    mut query: Query<(&mut MoveInput, &mut LedgeSampleTimer)>,
) {
    if let Ok((mut move_input, mut timer)) = query.get_mut(trigger.event_target()) {
        move_input.0 = Vec2::ZERO;
        timer.pause();
    }
}

/// System to handle look input via observer
pub fn handle_look_input(trigger: On<Fire<LookAction>>, mut query: Query<&mut LookInput>) {
    if let Ok(mut look_input) = query.get_mut(trigger.event_target()) {
        look_input.0 = trigger.value;
    }
}

/// Handle jump press
pub fn handle_jump_start(trigger: On<Start<JumpAction>>, mut query: Query<&mut JumpPressed>) {
    if let Ok(mut jump) = query.get_mut(trigger.event_target()) {
        jump.0 = true;
    }
}

/// Clears look input each frame
pub fn clear_look_input(mut query: Query<&mut LookInput>) {
    for mut look in &mut query {
        look.0 = Vec2::ZERO;
    }
}
