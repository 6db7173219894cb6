use bevy::prelude::*;

/// Marker for the yaw (horizontal rotation) pivot entity
#[derive(Component)]
pub struct CameraYaw;

/// Marker for the pitch (vertical rotation) pivot entity
#[derive(Component)]
pub struct CameraPitch;

/// Marker for the boom-mounted follow camera
#[derive(Component, Default)]
pub struct FollowCamera;

/// Camera configuration
#[derive(Component, Clone)]
pub struct CameraConfig {
    /// Mouse sensitivity
    pub sensitivity: f32,
    /// Maximum pitch angle (looking up)
    pub max_pitch: f32,
    /// Minimum pitch angle (looking down)
    pub min_pitch: f32,
    /// Boom arm length behind the character
    pub boom_length: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.003,
            max_pitch: 60.0_f32.to_radians(),
            min_pitch: -75.0_f32.to_radians(),
            boom_length: 4.0,
        }
    }
}

/// Current pitch angle in radians
#[derive(Component, Default, Deref, DerefMut)]
pub struct PitchAngle(pub f32);

/// Spawns the orbit rig: yaw pivot -> pitch pivot -> camera at the end of
/// the boom, looking back at the pivot. The yaw pivot follows the player;
/// the body itself never rotates with the camera.
pub fn spawn_camera_rig(commands: &mut Commands, position: Vec3) -> Entity {
    let config = CameraConfig::default();
    let boom_length = config.boom_length;

    let yaw_entity = commands
        .spawn((
            CameraYaw,
            Transform::from_translation(position),
            Visibility::default(),
        ))
        .id();

    let pitch_entity = commands
        .spawn((
            CameraPitch,
            PitchAngle::default(),
            config,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    // Camera sits at the end of the boom; +Z keeps it behind the pivot
    // and facing it.
    let camera_entity = commands
        .spawn((
            FollowCamera,
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: 70.0_f32.to_radians(),
                ..default()
            }),
            Transform::from_translation(Vec3::new(0.0, 0.0, boom_length)),
        ))
        .id();

    commands.entity(yaw_entity).add_child(pitch_entity);
    commands.entity(pitch_entity).add_child(camera_entity);

    yaw_entity
}
