use avian3d::prelude::*;
use bevy::prelude::*;

use super::gate::LedgeGate;
use super::input::{JumpPressed, MoveInput};
use super::state::*;
use crate::camera::CameraYaw;
use crate::physics::GameLayer;

/// Updates grounded state via raycast
pub fn update_grounded_state(
    mut commands: Commands,
    spatial_query: SpatialQuery,
    query: Query<(Entity, &Transform, &PlayerConfig, &PlayerVelocity, Has<Grounded>)>,
) {
    for (entity, transform, config, velocity, was_grounded) in &query {
        // Raycast from center of capsule downward
        let ray_origin = transform.translation;
        let ground_check_dist = config.stand_height / 2.0 + 0.1;

        let filter = SpatialQueryFilter::default().with_mask(GameLayer::World);

        let hit = spatial_query.cast_ray(
            ray_origin,
            Dir3::NEG_Y,
            ground_check_dist,
            true,
            &filter,
        );

        let is_grounded = hit.is_some() && velocity.y < 1.0;

        if is_grounded && !was_grounded {
            commands.entity(entity).insert(Grounded);
        } else if !is_grounded && was_grounded {
            commands.entity(entity).remove::<Grounded>();
        }
    }
}

/// Rotates `current` toward a target yaw by at most `max_step` radians,
/// taking the shortest way around.
pub fn rotate_yaw_towards(current: Quat, target_yaw: f32, max_step: f32) -> Quat {
    let (current_yaw, ..) = current.to_euler(EulerRot::YXZ);
    let diff = (target_yaw - current_yaw).rem_euclid(std::f32::consts::TAU);
    let shortest = if diff > std::f32::consts::PI {
        diff - std::f32::consts::TAU
    } else {
        diff
    };
    let step = shortest.clamp(-max_step, max_step);
    Quat::from_rotation_y(current_yaw + step)
}

/// Applies movement input, scaled by the ledge gate, and turns the body
/// toward the input direction.
///
/// The forward/right basis comes from the camera yaw (the control
/// rotation). Only translation is gated: the gate's multiplier shrinks the
/// target velocity, while the yaw interpolation always runs at full rate so
/// a blocked character can still turn in place away from the edge.
pub fn apply_movement(
    mut query: Query<(
        &MoveInput,
        &PlayerConfig,
        &LedgeGate,
        &mut PlayerVelocity,
        &mut Transform,
        Has<Grounded>,
    )>,
    yaw_query: Query<&Transform, (With<CameraYaw>, Without<MoveInput>)>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    let Ok(yaw_transform) = yaw_query.single() else {
        return;
    };

    for (input, config, gate, mut velocity, mut transform, grounded) in &mut query {
        let forward = yaw_transform.forward().as_vec3();
        let right = yaw_transform.right().as_vec3();

        // Flatten to horizontal
        let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        let right = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();

        let move_dir = (forward * input.y + right * input.x).normalize_or_zero();

        // Translation is scaled by the gate; rotation below is not.
        let target = move_dir * config.walk_speed * gate.input_scale;
        let current = Vec3::new(velocity.x, 0.0, velocity.z);

        let accel = if input.length_squared() > 0.01 {
            if grounded {
                config.ground_accel
            } else {
                config.air_accel
            }
        } else {
            config.ground_friction
        };

        let new_vel = current.move_towards(target, accel * dt);
        velocity.x = new_vel.x;
        velocity.z = new_vel.z;

        // Face the raw input direction at a capped turn rate.
        if move_dir.length_squared() > 0.01 {
            let target_yaw = f32::atan2(-move_dir.x, -move_dir.z);
            transform.rotation =
                rotate_yaw_towards(transform.rotation, target_yaw, config.turn_rate * dt);
        }
    }
}

/// Launches a jump on press when grounded
pub fn handle_jump(
    mut commands: Commands,
    mut query: Query<(
        Entity,
        &PlayerConfig,
        &mut PlayerVelocity,
        &mut JumpPressed,
        Has<Grounded>,
    )>,
) {
    for (entity, config, mut velocity, mut jump_pressed, grounded) in &mut query {
        // Reset vertical velocity when grounded (so gravity doesn't accumulate)
        if grounded && velocity.y < 0.0 {
            velocity.y = 0.0;
        }

        if jump_pressed.0 {
            jump_pressed.0 = false;
            if grounded {
                velocity.y = config.jump_velocity;
                commands.entity(entity).remove::<Grounded>();
            }
        }
    }
}

/// Applies gravity when not grounded
pub fn apply_gravity(
    mut query: Query<&mut PlayerVelocity, Without<Grounded>>,
    gravity: Res<Gravity>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    for mut velocity in &mut query {
        velocity.0 += gravity.0 * dt;
    }
}

/// Syncs PlayerVelocity to Avian's LinearVelocity
pub fn apply_velocity(
    mut query: Query<(&PlayerVelocity, &mut LinearVelocity, Has<Grounded>), With<Player>>,
) {
    for (player_vel, mut lin_vel, grounded) in &mut query {
        lin_vel.x = player_vel.x;
        lin_vel.z = player_vel.z;
        lin_vel.y = if grounded {
            // Slight downward bias keeps the body seated on the ground
            player_vel.y.min(-0.5)
        } else {
            player_vel.y
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraYaw;
    use bevy::ecs::system::RunSystemOnce;
    use std::f32::consts::{FRAC_PI_2, PI};
    use std::time::Duration;

    fn yaw_of(rotation: Quat) -> f32 {
        rotation.to_euler(EulerRot::YXZ).0
    }

    #[test]
    fn yaw_step_is_clamped_to_max_rate() {
        let current = Quat::IDENTITY;
        let next = rotate_yaw_towards(current, FRAC_PI_2, 0.1);
        assert!((yaw_of(next) - 0.1).abs() < 1e-5);
    }

    #[test]
    fn yaw_reaches_target_without_overshoot() {
        let mut rotation = Quat::IDENTITY;
        for _ in 0..32 {
            rotation = rotate_yaw_towards(rotation, FRAC_PI_2, 0.1);
        }
        assert!((yaw_of(rotation) - FRAC_PI_2).abs() < 1e-4);
    }

    fn movement_world(gate: LedgeGate, input: Vec2) -> (World, Entity) {
        let mut world = World::new();
        let mut time: Time = Time::default();
        time.advance_by(Duration::from_secs_f32(0.02));
        world.insert_resource(time);
        world.spawn((CameraYaw, Transform::IDENTITY));
        let player = world
            .spawn((
                MoveInput(input),
                PlayerConfig::default(),
                gate,
                PlayerVelocity::default(),
                Transform::IDENTITY,
                Grounded,
            ))
            .id();
        (world, player)
    }

    #[test]
    fn clear_gate_passes_input_through_at_full_magnitude() {
        let gate = LedgeGate::new(1.7, 1e-5);
        let (mut world, player) = movement_world(gate, Vec2::new(1.0, 0.0));

        world.run_system_once(apply_movement).unwrap();

        let velocity = world.get::<PlayerVelocity>(player).unwrap();
        // One tick of ground acceleration toward full walk speed.
        assert!((velocity.x - 50.0 * 0.02).abs() < 1e-4);
        assert_eq!(velocity.z, 0.0);
    }

    #[test]
    fn blocked_gate_scales_translation_but_not_rotation() {
        let mut gate = LedgeGate::new(1.7, 1e-5);
        gate.evaluate([3.0, 0.1, 0.1], false);
        assert!(gate.is_blocked());
        let (mut world, player) = movement_world(gate, Vec2::new(1.0, 0.0));

        world.run_system_once(apply_movement).unwrap();

        let velocity = world.get::<PlayerVelocity>(player).unwrap();
        assert!(velocity.0.length() < 1e-3, "translation not gated");

        // Yaw still turns toward the input direction at full rate.
        let rotation = world.get::<Transform>(player).unwrap().rotation;
        assert!(rotation.angle_between(Quat::IDENTITY) > 0.1);
    }

    #[test]
    fn yaw_takes_the_short_way_across_the_wrap() {
        // From just below +pi toward just above -pi: one small positive
        // step through the wrap, not a near-full turn the other way.
        let current = Quat::from_rotation_y(PI - 0.05);
        let next = rotate_yaw_towards(current, -PI + 0.05, 0.2);
        let moved = (yaw_of(next) - yaw_of(current)).rem_euclid(std::f32::consts::TAU);
        assert!(moved < 0.11, "moved {moved} radians the long way");
    }
}
