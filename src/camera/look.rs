use bevy::prelude::*;

use crate::player::{LookInput, Player};

use super::{CameraConfig, CameraPitch, CameraYaw, PitchAngle};

/// Applies mouse look rotation to the orbit rig
pub fn apply_mouse_look(
    player_query: Query<&LookInput, With<Player>>,
    mut yaw_query: Query<&mut Transform, (With<CameraYaw>, Without<CameraPitch>)>,
    mut pitch_query: Query<(&mut Transform, &mut PitchAngle, &CameraConfig), With<CameraPitch>>,
) {
    let Ok(look_input) = player_query.single() else {
        return;
    };

    // The config lives on the pitch pivot; both axes share its sensitivity.
    let Ok((mut pitch_transform, mut pitch_angle, config)) = pitch_query.single_mut() else {
        return;
    };

    // Apply yaw (horizontal rotation)
    if let Ok(mut yaw_transform) = yaw_query.single_mut() {
        yaw_transform.rotate_y(-look_input.x * config.sensitivity);
    }

    // Apply pitch (vertical rotation)
    pitch_angle.0 -= look_input.y * config.sensitivity;
    pitch_angle.0 = pitch_angle.0.clamp(config.min_pitch, config.max_pitch);

    pitch_transform.rotation = Quat::from_rotation_x(pitch_angle.0);
}

/// Syncs the yaw pivot position to follow the player
pub fn sync_camera_to_player(
    player_query: Query<&Transform, With<Player>>,
    mut yaw_query: Query<&mut Transform, (With<CameraYaw>, Without<Player>)>,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };

    if let Ok(mut yaw_transform) = yaw_query.single_mut() {
        yaw_transform.translation = player_transform.translation;
    }
}
