use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::gate::LedgeGate;
use super::input::{
    clear_look_input, handle_jump_start, handle_look_input, handle_move_end, handle_move_input,
    handle_move_start, JumpAction, JumpPressed, LookAction, LookInput, MoveAction, MoveInput,
};
use super::movement::*;
use super::probes::{sample_ledge_probes, LedgeProbes, LedgeSampleTimer};
use super::state::*;
use crate::physics::GameLayer;

/// Plugin for the third-person player controller
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EnhancedInputPlugin);

        // Register input context for player
        app.add_input_context::<Player>();

        // Input observers
        app.add_observer(handle_move_input);
        app.add_observer(handle_move_start);
        app.add_observer(handle_move_end);
        app.add_observer(handle_look_input);
        app.add_observer(handle_jump_start);

        app.add_systems(PostStartup, check_input_wiring);

        // Fixed update systems for physics
        app.add_systems(
            FixedUpdate,
            (
                update_grounded_state,
                sample_ledge_probes,
                handle_jump,
                apply_movement,
                apply_gravity,
                apply_velocity,
            )
                .chain(),
        );

        // Clear look input at end of frame
        app.add_systems(Last, clear_look_input);
    }
}

/// Startup diagnostic: the controller is driven entirely through the
/// enhanced-input observers, so a missing player or a player spawned
/// without its input state means input events go nowhere. Broken wiring is
/// fatal to input handling only, so just log it.
fn check_input_wiring(query: Query<Has<MoveInput>, With<Player>>) {
    let players = query.iter().count();
    let missing_input = query.iter().filter(|has_input| !has_input).count();
    if let Some(message) = wiring_error(players, missing_input) {
        error!("{message}");
    }
}

fn wiring_error(players: usize, missing_input: usize) -> Option<String> {
    if players == 0 {
        Some("no player entity at startup; input is not wired (spawn one with spawn_player())".into())
    } else if missing_input > 0 {
        Some(format!(
            "{missing_input} player entity(ies) have no move-input state; input events will be dropped"
        ))
    } else {
        None
    }
}

/// Spawns the player body with probes, gate, sampler clock, and input
/// bindings, plus the third-person camera rig. Returns the body entity.
pub fn spawn_player(
    commands: &mut Commands,
    config: PlayerConfig,
    position: Vec3,
) -> Entity {
    crate::camera::spawn_camera_rig(commands, position);

    let capsule_height = config.stand_height - config.radius * 2.0;

    commands
        .spawn((
            Player,
            config,
            PlayerVelocity::default(),
            LedgeProbes::from_config(&config),
            LedgeGate::new(config.fall_threshold, config.blocked_input_scale),
            LedgeSampleTimer::new(config.sample_period),
        ))
        .insert((
            // Input state
            MoveInput::default(),
            LookInput::default(),
            JumpPressed::default(),
        ))
        .insert((
            // Physics - Dynamic body with locked rotation, let Avian handle collisions
            RigidBody::Dynamic,
            Collider::capsule(config.radius, capsule_height),
            CollisionLayers::new(GameLayer::Player, [GameLayer::World]),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            TranslationInterpolation,
            Friction::new(0.0),
            Restitution::new(0.0),
            GravityScale(0.0), // We handle gravity ourselves for more control
        ))
        .insert((
            // Transform
            Transform::from_translation(position),
            Visibility::default(),
        ))
        .insert(
            // Input bindings
            actions!(Player[
                (
                    Action::<MoveAction>::new(),
                    bindings![
                        (KeyCode::KeyW, SwizzleAxis::YXZ),
                        (KeyCode::KeyS, SwizzleAxis::YXZ, Negate::all()),
                        KeyCode::KeyD,
                        (KeyCode::KeyA, Negate::all()),
                    ],
                ),
                (
                    Action::<LookAction>::new(),
                    bindings![
                        Binding::mouse_motion(),
                    ],
                ),
                (
                    Action::<JumpAction>::new(),
                    bindings![KeyCode::Space, GamepadButton::South],
                ),
            ]),
        )
        .id()
}
