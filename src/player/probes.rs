use std::time::Duration;

use avian3d::prelude::*;
use bevy::prelude::*;

use super::gate::{GateDecision, LedgeGate};
use super::state::*;
use crate::physics::GameLayer;

/// Probe indices into [`LedgeProbes::drops`]. The identity is for
/// readability only; all three feed the same decision.
pub const PROBE_LEFT: usize = 0;
pub const PROBE_RIGHT: usize = 1;
pub const PROBE_CENTER: usize = 2;

/// Three downward ground probes mounted on the character.
///
/// The left and right probes hang below the character's vertical center,
/// offset forward and to either side; they rotate rigidly with the body.
/// The center probe starts at the midpoint of the two side mounts, nudged
/// further forward so it samples ground slightly ahead of the body.
#[derive(Component, Debug, Clone)]
pub struct LedgeProbes {
    /// Lateral distance from the root to each side mount.
    pub side_offset: f32,
    /// Forward distance from the root to the side mounts.
    pub forward_offset: f32,
    /// How far below the vertical center the mounts sit.
    pub mount_drop: f32,
    /// Extra forward nudge applied to the center probe.
    pub center_lead: f32,
    /// Downward cast length per probe.
    pub cast_length: f32,
    /// Last drop measurement per probe (left, right, center). A missed
    /// cast records `f32::INFINITY`: no ground within range is treated as
    /// an unbounded drop rather than a stale reading.
    pub drops: [f32; 3],
}

impl LedgeProbes {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            side_offset: config.probe_side_offset,
            forward_offset: config.probe_forward_offset,
            mount_drop: config.probe_mount_drop,
            center_lead: config.probe_center_lead,
            cast_length: config.probe_cast_length,
            drops: [0.0; 3],
        }
    }

    /// World-space cast origins for the current pose, in
    /// left/right/center order.
    pub fn origins(&self, transform: &Transform) -> [Vec3; 3] {
        let forward = transform.forward().as_vec3();
        let right = transform.right().as_vec3();
        let base = transform.translation + forward * self.forward_offset
            - Vec3::Y * self.mount_drop;

        let left = base - right * self.side_offset;
        let right_mount = base + right * self.side_offset;
        let center = (left + right_mount) * 0.5 + forward * self.center_lead;

        [left, right_mount, center]
    }

    /// Records one cast result. `distance` is the hit distance along the
    /// downward ray, which for a vertical ray equals the drop from mount
    /// height to the impact point.
    pub fn record(&mut self, probe: usize, distance: Option<f32>) {
        self.drops[probe] = distance.unwrap_or(f32::INFINITY);
    }
}

/// Repeating sampler clock, one per character.
///
/// Spawned paused; move-input press resumes it and release pauses it.
/// Pausing preserves the elapsed phase, so a brief input flicker neither
/// restarts the period nor re-fires the start edge.
#[derive(Component, Debug)]
pub struct LedgeSampleTimer(Timer);

impl LedgeSampleTimer {
    pub fn new(period: f32) -> Self {
        let mut timer = Timer::from_seconds(period, TimerMode::Repeating);
        timer.pause();
        Self(timer)
    }

    pub fn resume(&mut self) {
        self.0.unpause();
    }

    pub fn pause(&mut self) {
        self.0.pause();
    }

    pub fn is_paused(&self) -> bool {
        self.0.is_paused()
    }

    pub fn tick(&mut self, delta: Duration) {
        self.0.tick(delta);
    }

    pub fn just_finished(&self) -> bool {
        self.0.just_finished()
    }
}

/// Casts the three ledge probes whenever the sampler clock fires and feeds
/// the result through the gate.
///
/// Casts go straight down on the world layer, which excludes the character
/// itself. The gate applies its side effect once per transition; the only
/// external effect, zeroing in-flight velocity on a fresh block, happens
/// here at the moment the transition is detected.
pub fn sample_ledge_probes(
    spatial_query: SpatialQuery,
    mut query: Query<(
        &Transform,
        &mut LedgeProbes,
        &mut LedgeSampleTimer,
        &mut LedgeGate,
        &mut PlayerVelocity,
        &mut LinearVelocity,
        Has<Grounded>,
    )>,
    time: Res<Time>,
) {
    let filter = SpatialQueryFilter::default().with_mask(GameLayer::World);

    for (transform, mut probes, mut timer, mut gate, mut velocity, mut lin_vel, grounded) in
        &mut query
    {
        timer.tick(time.delta());
        if !timer.just_finished() {
            continue;
        }

        let origins = probes.origins(transform);
        let cast_length = probes.cast_length;
        for (probe, origin) in origins.into_iter().enumerate() {
            let hit = spatial_query.cast_ray(origin, Dir3::NEG_Y, cast_length, true, &filter);
            probes.record(probe, hit.map(|h| h.distance));
        }

        if gate.evaluate(probes.drops, !grounded) == Some(GateDecision::Blocked) {
            // Stop immediately, once per blocked edge.
            velocity.0 = Vec3::ZERO;
            lin_vel.0 = Vec3::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn probes() -> LedgeProbes {
        LedgeProbes {
            side_offset: 0.4,
            forward_offset: 0.4,
            mount_drop: 0.8,
            center_lead: 0.2,
            cast_length: 10.0,
            drops: [0.0; 3],
        }
    }

    #[test]
    fn origins_at_identity_pose() {
        let probes = probes();
        let transform = Transform::IDENTITY;
        let [left, right, center] = probes.origins(&transform);

        // Bevy forward is -Z, right is +X.
        assert!((left - Vec3::new(-0.4, -0.8, -0.4)).length() < 1e-6);
        assert!((right - Vec3::new(0.4, -0.8, -0.4)).length() < 1e-6);
        assert!((center - Vec3::new(0.0, -0.8, -0.6)).length() < 1e-6);
    }

    #[test]
    fn center_is_midpoint_plus_lead() {
        let probes = probes();
        let transform =
            Transform::from_translation(Vec3::new(3.0, 1.0, -2.0));
        let [left, right, center] = probes.origins(&transform);

        let midpoint = (left + right) * 0.5;
        let lead = center - midpoint;
        assert!((lead.length() - probes.center_lead).abs() < 1e-6);
        assert!(lead.dot(transform.forward().as_vec3()) > 0.0);
    }

    #[test]
    fn mounts_rotate_with_the_body() {
        let probes = probes();
        let transform = Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2));
        let [left, right, center] = probes.origins(&transform);

        // Facing -X after a quarter turn; right becomes -Z.
        assert!((left - Vec3::new(-0.4, -0.8, 0.4)).length() < 1e-5);
        assert!((right - Vec3::new(-0.4, -0.8, -0.4)).length() < 1e-5);
        assert!((center - Vec3::new(-0.6, -0.8, 0.0)).length() < 1e-5);
    }

    #[test]
    fn mounts_stay_below_center_regardless_of_yaw() {
        let probes = probes();
        for yaw in [0.0_f32, 0.7, 2.1, -1.3] {
            let transform = Transform::from_rotation(Quat::from_rotation_y(yaw))
                .with_translation(Vec3::new(1.0, 5.0, 2.0));
            for origin in probes.origins(&transform) {
                assert!((origin.y - (5.0 - probes.mount_drop)).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn miss_records_unbounded_drop() {
        let mut probes = probes();
        probes.record(PROBE_LEFT, Some(0.5));
        probes.record(PROBE_RIGHT, None);
        assert_eq!(probes.drops[PROBE_LEFT], 0.5);
        assert_eq!(probes.drops[PROBE_RIGHT], f32::INFINITY);
        // A later hit replaces the sentinel.
        probes.record(PROBE_RIGHT, Some(0.6));
        assert_eq!(probes.drops[PROBE_RIGHT], 0.6);
    }

    #[test]
    fn sampler_clock_spawns_paused_and_resumes_in_phase() {
        let mut timer = LedgeSampleTimer::new(0.01);
        assert!(timer.is_paused());

        timer.tick(Duration::from_millis(100));
        assert!(!timer.just_finished());

        // 6 ms into the period, then pause.
        timer.resume();
        timer.tick(Duration::from_millis(6));
        assert!(!timer.just_finished());
        timer.pause();
        timer.tick(Duration::from_millis(100));
        assert!(!timer.just_finished());

        // Resume: only the remaining 4 ms are needed.
        timer.resume();
        timer.tick(Duration::from_millis(4));
        assert!(timer.just_finished());
    }
}
