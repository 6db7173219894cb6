use bevy::prelude::*;

/// Outcome of one probe evaluation.
///
/// `Airborne` and `Clear` both leave movement unrestricted, but they are
/// distinct states so that landing next to an edge re-fires the blocked
/// transition instead of being swallowed as "already applied".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Normal ground ahead; movement unrestricted.
    Clear,
    /// A probe found a drop at or beyond the threshold; forward progress halted.
    Blocked,
    /// Character is falling or jumping; probes are ignored.
    Airborne,
}

/// Edge-triggered gate that scales translational input near ledges.
///
/// The gate consumes the three probe drops plus the airborne flag each
/// sampling tick and maintains a single movement-scale multiplier. Side
/// effects fire exactly once per transition: repeated ticks in the same
/// decision are no-ops, so the velocity stop is not re-issued every tick
/// while standing at an edge.
#[derive(Component, Debug, Clone)]
pub struct LedgeGate {
    /// Last decision whose side effect was applied.
    pub decision: GateDecision,
    /// Multiplier applied to movement input. Always either 1.0 or
    /// `blocked_scale`, never an intermediate value.
    pub input_scale: f32,
    /// Drop distance at which ground ahead counts as a ledge.
    pub threshold: f32,
    /// Near-zero multiplier used while blocked.
    pub blocked_scale: f32,
}

impl LedgeGate {
    pub fn new(threshold: f32, blocked_scale: f32) -> Self {
        Self {
            decision: GateDecision::Clear,
            input_scale: 1.0,
            threshold,
            blocked_scale,
        }
    }

    /// Evaluates one sample and applies its side effect if the decision
    /// changed. Returns the new decision on a transition, `None` otherwise.
    ///
    /// The caller is responsible for the one external side effect of a
    /// `Blocked` transition: zeroing the character's in-flight velocity.
    pub fn evaluate(&mut self, drops: [f32; 3], airborne: bool) -> Option<GateDecision> {
        let candidate = if airborne {
            GateDecision::Airborne
        } else if drops.iter().any(|drop| *drop >= self.threshold) {
            GateDecision::Blocked
        } else {
            GateDecision::Clear
        };

        if candidate == self.decision {
            return None;
        }

        self.input_scale = match candidate {
            GateDecision::Blocked => self.blocked_scale,
            GateDecision::Clear | GateDecision::Airborne => 1.0,
        };
        self.decision = candidate;
        Some(candidate)
    }

    pub fn is_blocked(&self) -> bool {
        self.decision == GateDecision::Blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> LedgeGate {
        // Raw centimeter tunings from the reference character; the gate
        // itself is unit-agnostic.
        LedgeGate::new(170.0, 1e-5)
    }

    #[test]
    fn shallow_drops_stay_clear() {
        let mut gate = gate();
        assert_eq!(gate.evaluate([50.0, 60.0, 55.0], false), None);
        assert_eq!(gate.decision, GateDecision::Clear);
        assert_eq!(gate.input_scale, 1.0);
    }

    #[test]
    fn deep_left_drop_blocks() {
        let mut gate = gate();
        assert_eq!(
            gate.evaluate([200.0, 60.0, 55.0], false),
            Some(GateDecision::Blocked)
        );
        assert!(gate.is_blocked());
        assert!(gate.input_scale < 1e-4);
    }

    #[test]
    fn any_single_probe_at_threshold_blocks() {
        for i in 0..3 {
            let mut gate = gate();
            let mut drops = [50.0, 50.0, 50.0];
            drops[i] = 170.0;
            assert_eq!(gate.evaluate(drops, false), Some(GateDecision::Blocked));
        }
    }

    #[test]
    fn airborne_overrides_deep_drops() {
        let mut gate = gate();
        assert_eq!(
            gate.evaluate([200.0, 60.0, 55.0], true),
            Some(GateDecision::Airborne)
        );
        assert_eq!(gate.input_scale, 1.0);
        assert!(!gate.is_blocked());
    }

    #[test]
    fn blocked_side_effect_fires_once_per_edge() {
        let mut gate = gate();
        let deep = [200.0, 60.0, 55.0];
        assert_eq!(gate.evaluate(deep, false), Some(GateDecision::Blocked));
        // Condition persists: no re-trigger.
        assert_eq!(gate.evaluate(deep, false), None);
        assert_eq!(gate.evaluate(deep, false), None);
        // Stepping back arms the clear edge exactly once.
        let shallow = [50.0, 60.0, 55.0];
        assert_eq!(gate.evaluate(shallow, false), Some(GateDecision::Clear));
        assert_eq!(gate.evaluate(shallow, false), None);
        assert_eq!(gate.input_scale, 1.0);
    }

    #[test]
    fn landing_next_to_edge_reblocks() {
        let mut gate = gate();
        let deep = [200.0, 60.0, 55.0];
        assert_eq!(gate.evaluate(deep, false), Some(GateDecision::Blocked));
        // Jump: airborne clears the gate.
        assert_eq!(gate.evaluate(deep, true), Some(GateDecision::Airborne));
        assert_eq!(gate.input_scale, 1.0);
        // Land still facing the drop: the block must fire again.
        assert_eq!(gate.evaluate(deep, false), Some(GateDecision::Blocked));
    }

    #[test]
    fn missed_cast_counts_as_unbounded_drop() {
        let mut gate = gate();
        assert_eq!(
            gate.evaluate([50.0, f32::INFINITY, 55.0], false),
            Some(GateDecision::Blocked)
        );
    }

    #[test]
    fn scale_is_always_one_of_the_two_constants() {
        let mut gate = gate();
        let sequences = [
            ([50.0, 50.0, 50.0], false),
            ([200.0, 50.0, 50.0], false),
            ([200.0, 50.0, 50.0], true),
            ([169.9, 50.0, 50.0], false),
            ([170.0, 50.0, 50.0], false),
        ];
        for (drops, airborne) in sequences {
            gate.evaluate(drops, airborne);
            assert!(gate.input_scale == 1.0 || gate.input_scale == gate.blocked_scale);
        }
    }
}
