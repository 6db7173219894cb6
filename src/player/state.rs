use bevy::prelude::*;

/// Marker component for the player entity (also used as input context)
#[derive(Component, Default)]
pub struct Player;

/// Player movement and ledge-detection configuration
#[derive(Component, Clone, Copy)]
pub struct PlayerConfig {
    /// Walking speed in m/s
    pub walk_speed: f32,
    /// Ground acceleration
    pub ground_accel: f32,
    /// Ground friction/deceleration
    pub ground_friction: f32,
    /// Air acceleration (reduced control)
    pub air_accel: f32,
    /// Jump impulse velocity
    pub jump_velocity: f32,
    /// Maximum yaw rate in rad/s when turning toward the move direction
    pub turn_rate: f32,
    /// Standing collider height
    pub stand_height: f32,
    /// Collider radius
    pub radius: f32,
    /// Lateral offset of the left/right ledge probes from the root
    pub probe_side_offset: f32,
    /// Forward offset of the left/right ledge probes from the root
    pub probe_forward_offset: f32,
    /// How far below the vertical center the probe mounts sit
    pub probe_mount_drop: f32,
    /// Extra forward nudge for the center probe
    pub probe_center_lead: f32,
    /// Downward cast length per probe
    pub probe_cast_length: f32,
    /// Drop distance at which ground ahead counts as a ledge
    pub fall_threshold: f32,
    /// Movement-input multiplier while blocked at a ledge
    pub blocked_input_scale: f32,
    /// Period of the ledge sampling clock in seconds
    pub sample_period: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            ground_accel: 50.0,
            ground_friction: 40.0,
            air_accel: 15.0,
            jump_velocity: 7.0,
            turn_rate: 8.7, // ~500 deg/s
            stand_height: 1.8,
            radius: 0.4,
            probe_side_offset: 0.4,
            probe_forward_offset: 0.4,
            probe_mount_drop: 0.8,
            probe_center_lead: 0.2,
            probe_cast_length: 10.0,
            fall_threshold: 1.7,
            blocked_input_scale: 1e-5,
            sample_period: 0.01,
        }
    }
}

/// Current player velocity
#[derive(Component, Default, Deref, DerefMut)]
pub struct PlayerVelocity(pub Vec3);

/// Marker: player is on the ground
#[derive(Component)]
#[component(storage = "SparseSet")]
pub struct Grounded;
