//! Single-axis damped harmonic oscillator.
//!
//! The model is `a = -(k·(x - target) + c·v) / m`, integrated with
//! semi-implicit Euler (velocity first, then position) at one fixed frame
//! step per call.  Convergence is physics-driven: the spring reports
//! `finished` once both velocity and displacement drop below their rest
//! thresholds, with an elapsed-time cap as a backstop against tunings
//! that would never settle.

/// Tuning parameters for one spring.
#[derive(Debug, Clone, Copy)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub mass: f64,
    pub damping: f64,
    /// Rest position the spring pulls toward.
    pub target: f64,
    /// Snap to the target the first time the position crosses it.
    pub overshoot_clamping: bool,
    pub rest_speed_threshold: f64,
    pub rest_displacement_threshold: f64,
    /// Simulated seconds after which the spring is forced to rest.
    pub max_settle_secs: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            mass: 1.0,
            damping: 10.0,
            target: 0.0,
            overshoot_clamping: false,
            rest_speed_threshold: 0.001,
            rest_displacement_threshold: 0.001,
            max_settle_secs: 10.0,
        }
    }
}

/// Mutable integration state for one axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpringState {
    pub position: f64,
    pub velocity: f64,
    /// Set once the simulation has converged; cleared by the caller when
    /// a new episode begins.
    pub finished: bool,
    /// Simulated seconds since the spring was armed.
    pub elapsed: f64,
}

impl SpringState {
    /// Advance the simulation by one frame step of `dt` seconds.
    pub fn step(&mut self, config: &SpringConfig, dt: f64) {
        if self.finished || dt <= 0.0 {
            return;
        }

        let side_before = self.position - config.target;

        let accel = -(config.stiffness * (self.position - config.target)
            + config.damping * self.velocity)
            / config.mass;
        self.velocity += accel * dt;
        self.position += self.velocity * dt;
        self.elapsed += dt;

        let side_after = self.position - config.target;

        if config.overshoot_clamping && side_before * side_after < 0.0 {
            // Crossed the target — pin it there and kill the bounce.
            self.position = config.target;
            self.velocity = 0.0;
        }

        let displacement = self.position - config.target;
        let at_rest = self.velocity.abs() < config.rest_speed_threshold
            && displacement.abs() < config.rest_displacement_threshold;

        if at_rest || self.elapsed >= config.max_settle_secs {
            self.position = config.target;
            self.velocity = 0.0;
            self.finished = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn config_toward(target: f64) -> SpringConfig {
        SpringConfig {
            target,
            ..SpringConfig::default()
        }
    }

    #[test]
    fn converges_within_two_hundred_frames() {
        let config = config_toward(500.0);
        let mut state = SpringState::default();

        let mut finished_at = None;
        for frame in 0..250 {
            state.step(&config, DT);
            if state.finished {
                finished_at = Some(frame);
                break;
            }
        }

        let frame = finished_at.expect("spring never settled");
        assert!(frame <= 200, "settled too slowly: frame {frame}");
        assert!((state.position - 500.0).abs() < config.rest_displacement_threshold);
    }

    #[test]
    fn approach_is_bounded_and_decaying() {
        // Default tuning is underdamped (damping ratio 0.5), so the position
        // overshoots once before settling; the error envelope must still
        // shrink frame-block over frame-block.
        let config = config_toward(500.0);
        let mut state = SpringState::default();

        let mut early_max = 0.0f64;
        let mut late_max = 0.0f64;
        for frame in 0..180 {
            state.step(&config, DT);
            let err = (state.position - 500.0).abs();
            assert!(state.position.is_finite());
            assert!(err < 600.0, "diverged at frame {frame}");
            if frame < 60 {
                early_max = early_max.max(err);
            } else if frame >= 120 {
                late_max = late_max.max(err);
            }
        }
        assert!(late_max < early_max * 0.05, "envelope not decaying: early {early_max}, late {late_max}");
    }

    #[test]
    fn rises_monotonically_until_first_crossing() {
        let config = config_toward(500.0);
        let mut state = SpringState::default();

        let mut prev = 0.0;
        for _ in 0..600 {
            state.step(&config, DT);
            if state.position >= 500.0 {
                break;
            }
            assert!(state.position >= prev, "retreated before reaching the target");
            prev = state.position;
        }
    }

    #[test]
    fn overshoot_clamping_pins_at_target() {
        let config = SpringConfig {
            overshoot_clamping: true,
            ..config_toward(500.0)
        };
        let mut state = SpringState::default();

        for _ in 0..600 {
            state.step(&config, DT);
            assert!(state.position <= 500.0 + 1e-9);
            if state.finished {
                break;
            }
        }
        assert!(state.finished);
        assert_eq!(state.position, 500.0);
    }

    #[test]
    fn settle_cap_forces_rest() {
        // Zero damping never meets the rest thresholds on its own.
        let config = SpringConfig {
            damping: 0.0,
            max_settle_secs: 1.0,
            ..config_toward(100.0)
        };
        let mut state = SpringState::default();

        for _ in 0..90 {
            state.step(&config, DT);
        }
        assert!(state.finished, "cap did not trigger");
        assert_eq!(state.position, 100.0);
    }

    #[test]
    fn finished_spring_stays_put() {
        let config = config_toward(0.0);
        let mut state = SpringState {
            position: 0.0,
            velocity: 0.0,
            finished: true,
            elapsed: 3.0,
        };
        state.step(&config, DT);
        assert_eq!(state.position, 0.0);
        assert_eq!(state.elapsed, 3.0);
    }
}
