//! Noise injection over per-agent tuples.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::InjectionError;
use super::spec::InjectionSpec;

/// Applies an [`InjectionSpec`] to observation or action tuples.
///
/// The tuple is a slice with one entry per agent. Each call returns a fresh
/// tuple; the input is never touched, so trajectory logs that hold earlier
/// tuples stay correct.
///
/// Every targeted element receives its own draw from `U[-delta, delta]`, so
/// noise is independent across agents, elements, and calls. In action mode
/// each perturbed agent is clamped to `[-bound_i, bound_i]`.
#[derive(Debug, Clone)]
pub struct Injector {
    spec: InjectionSpec,
    control_bounds: Vec<f64>,
    rng: StdRng,
}

impl Injector {
    /// Creates an injector with its own seeded noise stream.
    ///
    /// # Arguments
    ///
    /// * `spec` - Mode, targets and magnitude
    /// * `control_bounds` - Per-agent control range limit `u_range`; only read
    ///   in action mode
    /// * `seed` - Seed for the noise stream
    ///
    /// # Errors
    ///
    /// In action mode, every targeted agent needs a finite, non-negative bound.
    pub fn new(
        spec: InjectionSpec,
        control_bounds: &[f64],
        seed: u64,
    ) -> Result<Self, InjectionError> {
        if spec.mode().is_action_target() {
            for &agent in spec.targets() {
                let bound = *control_bounds
                    .get(agent)
                    .ok_or(InjectionError::MissingControlBound(agent))?;
                if !bound.is_finite() || bound < 0.0 {
                    return Err(InjectionError::InvalidControlBound { agent, bound });
                }
            }
        }
        Ok(Self {
            spec,
            control_bounds: control_bounds.to_vec(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Creates an injector whose seed is drawn from `rng`.
    pub fn from_rng<R: Rng>(
        spec: InjectionSpec,
        control_bounds: &[f64],
        rng: &mut R,
    ) -> Result<Self, InjectionError> {
        Self::new(spec, control_bounds, rng.gen())
    }

    pub fn spec(&self) -> &InjectionSpec {
        &self.spec
    }

    /// Returns a perturbed copy of `values`.
    ///
    /// # Errors
    ///
    /// * [`InjectionError::InvalidTargetSet`] if more agents are targeted than
    ///   the tuple holds
    /// * [`InjectionError::TargetOutOfRange`] if a target index has no slot
    ///
    /// Both are checked before any noise is drawn.
    pub fn inject(&mut self, values: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, InjectionError> {
        let slots = values.len();
        let targets = self.spec.targets();
        if targets.len() > slots {
            return Err(InjectionError::InvalidTargetSet {
                targets: targets.len(),
                slots,
            });
        }
        if let Some(&index) = targets.iter().next_back() {
            if index >= slots {
                return Err(InjectionError::TargetOutOfRange { index, slots });
            }
        }

        let mut perturbed = values.to_vec();
        let delta = self.spec.magnitude();
        if delta == 0.0 {
            return Ok(perturbed);
        }

        // Scaled unit draws stay finite for any finite delta.
        let unit = Uniform::new_inclusive(-1.0_f64, 1.0);
        let clamp = self.spec.mode().is_action_target();
        for &agent in targets {
            let bound = self.control_bounds.get(agent).copied();
            for x in perturbed[agent].iter_mut() {
                *x += delta * unit.sample(&mut self.rng);
                if clamp {
                    if let Some(b) = bound {
                        *x = x.clamp(-b, b);
                    }
                }
            }
        }
        Ok(perturbed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injection::InjectMode;

    fn tuple() -> Vec<Vec<f64>> {
        vec![vec![0.1, -0.2, 0.3], vec![1.5, 2.5], vec![-4.0]]
    }

    #[test]
    fn untouched_entries_are_bit_identical() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [1], 0.5).unwrap();
        let mut injector = Injector::new(spec, &[], 7).unwrap();
        let input = tuple();
        for _ in 0..50 {
            let out = injector.inject(&input).unwrap();
            assert_eq!(out[0].len(), input[0].len());
            for (a, b) in out[0].iter().zip(&input[0]) {
                assert_eq!(a.to_bits(), b.to_bits());
            }
            for (a, b) in out[2].iter().zip(&input[2]) {
                assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }

    #[test]
    fn observation_noise_is_bounded_by_magnitude() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [0, 2], 0.25).unwrap();
        let mut injector = Injector::new(spec, &[], 11).unwrap();
        let input = tuple();
        for _ in 0..200 {
            let out = injector.inject(&input).unwrap();
            for agent in [0, 2] {
                for (a, b) in out[agent].iter().zip(&input[agent]) {
                    assert!((a - b).abs() <= 0.25 + 1e-12);
                }
            }
        }
    }

    #[test]
    fn action_noise_is_clamped_to_bounds() {
        let spec = InjectionSpec::new(InjectMode::ActionNoise, [0, 1], 5.0).unwrap();
        let bounds = [1.0, 0.5, 2.0];
        let mut injector = Injector::new(spec, &bounds, 3).unwrap();
        let input = vec![vec![0.9, -0.9], vec![0.4, 0.0], vec![3.0]];
        for _ in 0..500 {
            let out = injector.inject(&input).unwrap();
            for agent in [0, 1] {
                for x in &out[agent] {
                    assert!(*x >= -bounds[agent] && *x <= bounds[agent]);
                }
            }
            // not targeted, so left outside its bound
            assert_eq!(out[2], vec![3.0]);
        }
    }

    #[test]
    fn largest_finite_magnitude_is_drawn() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [0], f64::MAX).unwrap();
        let mut injector = Injector::new(spec, &[], 13).unwrap();
        for _ in 0..50 {
            let out = injector.inject(&[vec![0.0; 4]]).unwrap();
            assert!(out[0].iter().all(|x| x.is_finite()));
        }

        let spec = InjectionSpec::new(InjectMode::ActionNoise, [0], f64::MAX).unwrap();
        let mut injector = Injector::new(spec, &[0.5], 13).unwrap();
        let out = injector.inject(&[vec![0.0; 4]]).unwrap();
        assert!(out[0].iter().all(|x| (-0.5..=0.5).contains(x)));
    }

    #[test]
    fn zero_magnitude_is_identity() {
        for mode in [InjectMode::ObservationNoise, InjectMode::ActionNoise] {
            let spec = InjectionSpec::new(mode, [0, 1, 2], 0.0).unwrap();
            let mut injector = Injector::new(spec, &[0.1, 0.1, 0.1], 5).unwrap();
            let input = tuple();
            assert_eq!(injector.inject(&input).unwrap(), input);
        }
    }

    #[test]
    fn too_many_targets_is_invalid() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [0, 1, 2], 0.1).unwrap();
        let mut injector = Injector::new(spec, &[], 1).unwrap();
        let err = injector.inject(&[vec![0.0], vec![0.0]]).unwrap_err();
        assert_eq!(
            err,
            InjectionError::InvalidTargetSet {
                targets: 3,
                slots: 2
            }
        );
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [4], 0.1).unwrap();
        let mut injector = Injector::new(spec, &[], 1).unwrap();
        let err = injector.inject(&tuple()).unwrap_err();
        assert_eq!(err, InjectionError::TargetOutOfRange { index: 4, slots: 3 });
    }

    #[test]
    fn action_mode_requires_bounds() {
        let spec = InjectionSpec::new(InjectMode::ActionNoise, [0, 3], 0.1).unwrap();
        let err = Injector::new(spec, &[1.0, 1.0], 1).unwrap_err();
        assert_eq!(err, InjectionError::MissingControlBound(3));
    }

    #[test]
    fn observation_mode_ignores_bounds() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [5], 0.1).unwrap();
        assert!(Injector::new(spec, &[], 1).is_ok());
    }

    #[test]
    fn input_is_not_mutated() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [0], 1.0).unwrap();
        let mut injector = Injector::new(spec, &[], 9).unwrap();
        let input = tuple();
        let snapshot = input.clone();
        let out = injector.inject(&input).unwrap();
        assert_eq!(input, snapshot);
        assert_ne!(out[0], input[0]);
    }

    #[test]
    fn same_seed_gives_same_noise() {
        let spec = InjectionSpec::new(InjectMode::ObservationNoise, [0], 1.0).unwrap();
        let mut a = Injector::new(spec.clone(), &[], 42).unwrap();
        let mut b = Injector::new(spec, &[], 42).unwrap();
        let input = tuple();
        assert_eq!(a.inject(&input).unwrap(), b.inject(&input).unwrap());
    }
}
