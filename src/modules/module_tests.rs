//! Scenario tests for the PWM modules
//!
//! Each module is driven the way a host simulator would drive it: a fixed or
//! irregular time step, parameters changed while running, and module
//! outputs wired into each other.

use super::*;
use crate::output::PwmOutputs;
use crate::timing::phase_offset_from_degrees;

fn is_on(v: f64) -> bool {
    v > 0.5
}

/// Circular distance from `a` forward to `b`, in cycles
fn cycle_delta(a: f64, b: f64) -> f64 {
    (b - a).rem_euclid(1.0)
}

// =============================================================================
// PART 1: Complementary pair
// =============================================================================

mod complementary_pair_tests {
    use super::*;

    /// Outside the dead band exactly one channel is on; inside both are off
    #[test]
    fn test_outputs_are_complements() {
        let mut pwm = ComplementaryPwm::new(ComplementaryParams::default()).unwrap();
        let dt = 10e-9;

        for i in 1..=5000 {
            let out = pwm.step(i as f64 * dt, false);
            let pair = pwm.compare_pair();
            let (a, b) = (is_on(out.pwm_a), is_on(out.pwm_b));

            assert!(!(a && b), "shoot-through at step {}", i);
            if out.counter < pair.lag || out.counter > pair.lead {
                assert!(a ^ b, "step {}: counter {} outside [{}, {}] but a={} b={}", i, out.counter, pair.lag, pair.lead, a, b);
            } else if out.counter > pair.lag && out.counter < pair.lead {
                assert!(!a && !b, "step {}: counter {} inside dead band", i, out.counter);
            }
        }
    }

    /// Channel A on-time equals duty minus half the dead band
    #[test]
    fn test_on_time_tracks_duty() {
        for duty in [0.1, 0.35, 0.5, 0.8] {
            let mut pwm = ComplementaryPwm::new(ComplementaryParams {
                duty,
                ..ComplementaryParams::default()
            })
            .unwrap();

            let n = 10_000;
            let on_a = (1..=n)
                .filter(|&i| is_on(pwm.step(i as f64 * 10e-9, false).pwm_a))
                .count();
            let lag = pwm.compare_pair().lag;
            let ratio = on_a as f64 / n as f64;
            assert!((ratio - lag).abs() < 2e-3, "duty {}: on-time {} vs lag {}", duty, ratio, lag);
        }
    }

    /// Moving the duty every few steps never overlaps the pair
    #[test]
    fn test_no_shoot_through_under_duty_sweep() {
        let mut pwm = ComplementaryPwm::new(ComplementaryParams::default()).unwrap();
        for i in 1..=20_000 {
            if i % 7 == 0 {
                let duty = 0.5 + 0.5 * (i as f64 * 1e-3).sin();
                pwm.set_duty(duty);
            }
            let out = pwm.step(i as f64 * 13e-9, false);
            assert!(!(is_on(out.pwm_a) && is_on(out.pwm_b)), "shoot-through at step {}", i);
        }
    }
}

// =============================================================================
// PART 2: Carrier continuity through the module
// =============================================================================

mod continuity_tests {
    use super::*;

    #[test]
    fn test_two_boundaries_per_two_periods() {
        let f = 100e3;
        let mut pwm = ComplementaryPwm::new(ComplementaryParams::default()).unwrap();
        let dt = 1.0 / f / 1000.0;
        let syncs = (0..=2000)
            .filter(|&i| pwm.step((i as f64 + 0.5) * dt, false).period_sync)
            .count();
        assert_eq!(syncs, 2);
    }

    /// 90° at 100 kHz lands within one transitional cycle, without jumps
    #[test]
    fn test_phase_shift_is_continuous() {
        let f = 100e3;
        let dt = 10e-9;
        let mut reference = ComplementaryPwm::new(ComplementaryParams::default()).unwrap();
        let mut shifted = ComplementaryPwm::new(ComplementaryParams::default()).unwrap();

        let mut prev = shifted.carrier_state().accumulated_counter;
        let max_step = dt * f / 0.75 + 1e-9;
        let mut syncs_after_request = 0;

        for i in 1..=6000 {
            let t = i as f64 * dt;
            if i == 1500 {
                assert!(shifted.set_phase_offset(phase_offset_from_degrees(90.0, f)));
            }
            reference.step(t, false);
            let out = shifted.step(t, false);

            let acc = shifted.carrier_state().accumulated_counter;
            let moved = cycle_delta(prev, acc);
            assert!(moved <= max_step, "step {}: jumped {} cycles", i, moved);
            prev = acc;

            if i > 1500 && out.period_sync {
                syncs_after_request += 1;
            }
        }

        // Boundary at 20 µs starts the 7.5 µs cycle, nominal resumes at 27.5 µs
        assert!(syncs_after_request >= 2);
        let lead = cycle_delta(
            reference.carrier_state().accumulated_counter,
            shifted.carrier_state().accumulated_counter,
        );
        assert!((lead - 0.25).abs() < 2e-3, "realized shift {}", lead);
        assert!((shifted.carrier_state().cumulative_phase_applied_s - 2.5e-6).abs() < 1e-12);
        assert_eq!(shifted.carrier_state().current_frequency_hz, f);
    }

    #[test]
    fn test_frequency_change_waits_for_period_sync() {
        let mut pwm = ComplementaryPwm::new(ComplementaryParams::default()).unwrap();
        let dt = 10e-9;
        let mut swapped_at = None;

        for i in 1..=3000 {
            if i == 300 {
                assert!(pwm.set_frequency(50e3));
            }
            let out = pwm.step((i as f64 + 0.5) * dt, false);
            let state = pwm.carrier_state();

            if swapped_at.is_none() {
                if out.period_sync && i > 300 {
                    assert_eq!(state.current_frequency_hz, 50e3);
                    swapped_at = Some(i);
                } else {
                    assert_eq!(state.current_frequency_hz, 100e3, "swapped early at step {}", i);
                }
            }
        }
        // First 100 kHz boundary after the request is at 10 µs
        assert_eq!(swapped_at, Some(1000));
    }

    #[test]
    fn test_time_regression() {
        let mut pwm = ComplementaryPwm::new(ComplementaryParams {
            frequency_hz: 1.0,
            dead_time_s: 0.0,
            ..ComplementaryParams::default()
        })
        .unwrap();

        let counters: Vec<f64> = [0.0, 0.5, 0.3, 0.6]
            .iter()
            .map(|&t| pwm.step(t, false).counter)
            .collect();

        assert_eq!(counters[0], 0.0);
        assert!((counters[1] - 1.0).abs() < 1e-12);
        assert_eq!(counters[2], counters[1]);
        assert!((counters[3] - 0.4).abs() < 1e-12);
        assert_eq!(pwm.carrier_state().last_time_s, 0.6);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut pwm = ComplementaryPwm::new(ComplementaryParams::default()).unwrap();
        pwm.set_phase_offset(1e-6);
        let run = |pwm: &mut ComplementaryPwm| -> Vec<PwmOutputs> {
            (1..=3000).map(|i| pwm.step(i as f64 * 17e-9, false)).collect()
        };

        run(&mut pwm);
        pwm.reset();
        let once = (pwm.carrier_state(), pwm.outputs(), pwm.compare_pair());
        pwm.reset();
        assert_eq!((pwm.carrier_state(), pwm.outputs(), pwm.compare_pair()), once);

        let first = run(&mut pwm);
        pwm.reset();
        assert_eq!(run(&mut pwm), first);
    }
}

// =============================================================================
// PART 3: Master / slave and host routines
// =============================================================================

mod system_tests {
    use super::*;

    /// A slave fed the master's previous period pulse restarts on it
    #[test]
    fn test_slave_follows_master_sync() {
        let f = 250e3;
        let dt = 20e-9;
        let mut master = ComplementaryPwm::new(ComplementaryParams {
            frequency_hz: f,
            ..ComplementaryParams::default()
        })
        .unwrap();
        let mut slave = ComplementaryPwm::new(ComplementaryParams {
            frequency_hz: f,
            phase_offset_s: phase_offset_from_degrees(30.0, f),
            sync_enabled: true,
            ..ComplementaryParams::default()
        })
        .unwrap();

        let mut master_prev = PwmOutputs::cleared(&Default::default());
        let (mut master_syncs, mut slave_syncs) = (0, 0);

        for i in 1..=10_000 {
            let t = i as f64 * dt;
            let out = slave.step(t, master_prev.period_sync);
            if master_prev.period_sync {
                assert!(out.period_sync);
                assert_eq!(out.counter, 0.0);
            }
            slave_syncs += out.period_sync as usize;

            master_prev = master.step(t, false);
            master_syncs += master_prev.period_sync as usize;
        }

        // Once locked, the slave's own wrap coincides with the sync pulse
        assert!(master_syncs >= 49);
        assert!((slave_syncs as i64 - master_syncs as i64).abs() <= 1);
    }

    /// Control loop clocked at 50 kHz, duty written to a 250 kHz stage
    /// half a clock period after each sample
    #[test]
    fn test_delayed_duty_update() {
        let mut clock = ComplementaryPwm::new(ComplementaryParams {
            frequency_hz: 50e3,
            dead_time_s: 0.0,
            ..ComplementaryParams::default()
        })
        .unwrap();

        let f = 250e3;
        let mut stage = ComplementaryPwm::new(ComplementaryParams {
            frequency_hz: f,
            dead_time_s: 100e-9,
            phase_offset_s: phase_offset_from_degrees(30.0, f),
            ..ComplementaryParams::default()
        })
        .unwrap();

        let delay = 0.5 / 50e3;
        let dt = 20e-9;
        let mut prev_clk = false;
        let mut pending: Option<(f64, f64)> = None;
        let mut edges = 0;
        let mut applied = Vec::new();

        for i in 1..=10_000 {
            let t = (i as f64 + 0.5) * dt;
            let clk = clock.step(t, false).period_sync;
            if clk && !prev_clk {
                edges += 1;
                let sampled = 0.5 + 0.3 * (t * 2e4).sin();
                pending = Some((t, sampled));
            }
            prev_clk = clk;

            if let Some((calc_time, duty)) = pending {
                if t - calc_time >= delay {
                    assert!(stage.update_parameters(ParameterUpdate {
                        duty: Some(duty),
                        ..ParameterUpdate::default()
                    }));
                    applied.push((t - calc_time, duty));
                    pending = None;
                }
            }

            let out = stage.step(t, false);
            assert!(!(is_on(out.pwm_a) && is_on(out.pwm_b)));
        }

        // 200 µs: clock edges at 20, 40, ... 200 µs; the last one never ripens
        assert_eq!(edges, 10);
        assert_eq!(applied.len(), 9);
        for (waited, duty) in applied {
            assert!(waited >= delay && waited < delay + dt * 1.5);
            assert!((0.0..=1.0).contains(&duty));
        }
    }
}
