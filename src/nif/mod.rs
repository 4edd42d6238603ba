//! NIF interface for Elixir
//!
//! Exposes the PWM modules to the BEAM. Stateful modules live in a global
//! instance slab and are addressed by `u64` handles; the basic module is
//! evaluated one-shot. Host structs are converted to engine types here and
//! nowhere else.

use rustler::{Atom, Env, NifResult, NifStruct, NifUnitEnum};

use crate::actions::ActionMode;
use crate::carriers::CarrierShape;
use crate::compare::DeadTime;
use crate::error::ConfigError;
use crate::modules::{
    BasicOutputs, BasicParams, BasicPwm, ComplementaryParams, ComplementaryPwm, EnhancedParams,
    EnhancedPwm, ParameterUpdate,
};
use crate::output::PwmOutputs;
use crate::slab::InstanceSlab;
use crate::traits::CountDirection;

/// Maximum number of live instances
pub const MAX_INSTANCES: usize = 1024;

lazy_static::lazy_static! {
    static ref INSTANCES: InstanceSlab<Instance> = InstanceSlab::new(MAX_INSTANCES);
}

mod atoms {
    rustler::atoms! {
        ok,
        slab_full,
        instance_not_found,
        wrong_instance_kind,
    }
}

// ============================================================================
// Host-facing types
// ============================================================================

#[derive(NifUnitEnum, Debug, Clone, Copy, PartialEq)]
pub enum NifCarrierShape {
    CenterAligned,
    SawtoothUp,
    SawtoothDown,
}

impl From<NifCarrierShape> for CarrierShape {
    fn from(shape: NifCarrierShape) -> Self {
        match shape {
            NifCarrierShape::CenterAligned => CarrierShape::CenterAligned,
            NifCarrierShape::SawtoothUp => CarrierShape::SawtoothUp,
            NifCarrierShape::SawtoothDown => CarrierShape::SawtoothDown,
        }
    }
}

#[derive(NifUnitEnum, Debug, Clone, Copy, PartialEq)]
pub enum NifActionMode {
    ActiveBelow,
    ActiveAbove,
}

impl From<NifActionMode> for ActionMode {
    fn from(mode: NifActionMode) -> Self {
        match mode {
            NifActionMode::ActiveBelow => ActionMode::ActiveBelow,
            NifActionMode::ActiveAbove => ActionMode::ActiveAbove,
        }
    }
}

#[derive(NifUnitEnum, Debug, Clone, Copy, PartialEq)]
pub enum NifDirection {
    Up,
    Down,
}

impl From<CountDirection> for NifDirection {
    fn from(direction: CountDirection) -> Self {
        match direction {
            CountDirection::Up => NifDirection::Up,
            CountDirection::Down => NifDirection::Down,
        }
    }
}

#[derive(NifStruct, Debug, Clone, Copy)]
#[module = "PowerStage.Pwm.BasicConfig"]
pub struct BasicConfig {
    pub frequency_hz: f64,
    pub shape: NifCarrierShape,
    pub gate_on_v: f64,
    pub gate_off_v: f64,
}

impl From<BasicConfig> for BasicParams {
    fn from(c: BasicConfig) -> Self {
        BasicParams {
            frequency_hz: c.frequency_hz,
            shape: c.shape.into(),
            gate_on_v: c.gate_on_v,
            gate_off_v: c.gate_off_v,
        }
    }
}

#[derive(NifStruct, Debug, Clone, Copy)]
#[module = "PowerStage.Pwm.EnhancedConfig"]
pub struct EnhancedConfig {
    pub frequency_hz: f64,
    pub phase_offset_s: f64,
    pub dead_time_rising_s: f64,
    pub dead_time_falling_s: f64,
    pub mode_a: NifActionMode,
    pub mode_b: NifActionMode,
    pub sync_enabled: bool,
    pub gate_on_v: f64,
    pub gate_off_v: f64,
}

impl From<EnhancedConfig> for EnhancedParams {
    fn from(c: EnhancedConfig) -> Self {
        EnhancedParams {
            frequency_hz: c.frequency_hz,
            phase_offset_s: c.phase_offset_s,
            dead_time: DeadTime {
                rising_s: c.dead_time_rising_s,
                falling_s: c.dead_time_falling_s,
            },
            mode_a: c.mode_a.into(),
            mode_b: c.mode_b.into(),
            sync_enabled: c.sync_enabled,
            gate_on_v: c.gate_on_v,
            gate_off_v: c.gate_off_v,
        }
    }
}

#[derive(NifStruct, Debug, Clone, Copy)]
#[module = "PowerStage.Pwm.ComplementaryConfig"]
pub struct ComplementaryConfig {
    pub frequency_hz: f64,
    pub phase_offset_s: f64,
    pub dead_time_s: f64,
    pub duty: f64,
    pub sync_enabled: bool,
    pub gate_on_v: f64,
    pub gate_off_v: f64,
    pub mode_a: NifActionMode,
    pub mode_b: NifActionMode,
}

impl From<ComplementaryConfig> for ComplementaryParams {
    fn from(c: ComplementaryConfig) -> Self {
        ComplementaryParams {
            frequency_hz: c.frequency_hz,
            phase_offset_s: c.phase_offset_s,
            dead_time_s: c.dead_time_s,
            duty: c.duty,
            sync_enabled: c.sync_enabled,
            gate_on_v: c.gate_on_v,
            gate_off_v: c.gate_off_v,
            mode_a: c.mode_a.into(),
            mode_b: c.mode_b.into(),
        }
    }
}

/// Runtime update; nil fields keep the current value
#[derive(NifStruct, Debug, Clone, Copy, Default)]
#[module = "PowerStage.Pwm.Update"]
pub struct UpdateConfig {
    pub frequency_hz: Option<f64>,
    pub dead_time_s: Option<f64>,
    pub phase_offset_s: Option<f64>,
    pub duty: Option<f64>,
}

impl From<UpdateConfig> for ParameterUpdate {
    fn from(c: UpdateConfig) -> Self {
        ParameterUpdate {
            frequency_hz: c.frequency_hz,
            dead_time_s: c.dead_time_s,
            phase_offset_s: c.phase_offset_s,
            duty: c.duty,
        }
    }
}

#[derive(NifStruct, Debug, Clone, Copy)]
#[module = "PowerStage.Pwm.BasicOutputs"]
pub struct BasicResult {
    pub pwm: f64,
    pub sawtooth_up: f64,
    pub center_aligned: f64,
    pub sawtooth_down: f64,
    pub clk_out: bool,
}

impl From<BasicOutputs> for BasicResult {
    fn from(o: BasicOutputs) -> Self {
        BasicResult {
            pwm: o.pwm,
            sawtooth_up: o.sawtooth_up,
            center_aligned: o.center_aligned,
            sawtooth_down: o.sawtooth_down,
            clk_out: o.clk_out,
        }
    }
}

#[derive(NifStruct, Debug, Clone, Copy)]
#[module = "PowerStage.Pwm.Outputs"]
pub struct OutputsResult {
    pub pwm_a: f64,
    pub pwm_b: f64,
    pub counter: f64,
    pub direction: NifDirection,
    pub period_sync: bool,
}

impl From<PwmOutputs> for OutputsResult {
    fn from(o: PwmOutputs) -> Self {
        OutputsResult {
            pwm_a: o.pwm_a,
            pwm_b: o.pwm_b,
            counter: o.counter,
            direction: o.direction.into(),
            period_sync: o.period_sync,
        }
    }
}

/// Carrier and compare diagnostics of a complementary instance
#[derive(NifStruct, Debug, Clone, Copy)]
#[module = "PowerStage.Pwm.CarrierState"]
pub struct StateResult {
    pub current_frequency_hz: f64,
    pub pending_frequency_hz: f64,
    pub frequency_change_pending: bool,
    pub cumulative_phase_applied_s: f64,
    pub last_time_s: f64,
    pub accumulated_counter: f64,
    pub previous_counter: f64,
    pub cmp_lead: f64,
    pub cmp_lag: f64,
}

impl From<&ComplementaryPwm> for StateResult {
    fn from(pwm: &ComplementaryPwm) -> Self {
        let s = pwm.carrier_state();
        let pair = pwm.compare_pair();
        StateResult {
            current_frequency_hz: s.current_frequency_hz,
            pending_frequency_hz: s.pending_frequency_hz,
            frequency_change_pending: s.frequency_change_pending,
            cumulative_phase_applied_s: s.cumulative_phase_applied_s,
            last_time_s: s.last_time_s,
            accumulated_counter: s.accumulated_counter,
            previous_counter: s.previous_counter,
            cmp_lead: pair.lead,
            cmp_lag: pair.lag,
        }
    }
}

// ============================================================================
// Instance storage
// ============================================================================

/// A stateful module owned by the slab
pub enum Instance {
    Enhanced(EnhancedPwm),
    Complementary(ComplementaryPwm),
}

impl Instance {
    fn reset(&mut self) {
        match self {
            Instance::Enhanced(pwm) => pwm.reset(),
            Instance::Complementary(pwm) => pwm.reset(),
        }
    }
}

fn config_error(env: Env, e: ConfigError) -> rustler::Error {
    log::debug!("instance rejected: {}", e);
    match Atom::from_str(env, e.code()) {
        Ok(atom) => rustler::Error::Term(Box::new(atom)),
        Err(err) => err,
    }
}

fn not_found() -> rustler::Error {
    rustler::Error::Term(Box::new(atoms::instance_not_found()))
}

fn wrong_kind() -> rustler::Error {
    rustler::Error::Term(Box::new(atoms::wrong_instance_kind()))
}

fn store(instance: Instance) -> NifResult<(Atom, u64)> {
    match INSTANCES.insert(instance) {
        Some(handle) => Ok((atoms::ok(), handle)),
        None => Err(rustler::Error::Term(Box::new(atoms::slab_full()))),
    }
}

/// Resolve a handle to a complementary instance and run `f` on it
fn with_complementary<R>(handle: u64, f: impl FnOnce(&mut ComplementaryPwm) -> R) -> NifResult<R> {
    INSTANCES
        .with_mut(handle, |instance| match instance {
            Instance::Complementary(pwm) => Ok(f(pwm)),
            Instance::Enhanced(_) => Err(wrong_kind()),
        })
        .ok_or_else(not_found)?
}

// ============================================================================
// NIFs
// ============================================================================

/// Evaluates a basic PWM at one instant.
#[rustler::nif]
fn basic_step(
    env: Env,
    params: BasicConfig,
    time: f64,
    duty: f64,
    phase: f64,
) -> NifResult<(Atom, BasicResult)> {
    let mut pwm = BasicPwm::new(params.into()).map_err(|e| config_error(env, e))?;
    Ok((atoms::ok(), pwm.step(time, duty, phase).into()))
}

/// Creates an enhanced PWM and returns its handle.
#[rustler::nif]
fn enhanced_new(env: Env, params: EnhancedConfig) -> NifResult<(Atom, u64)> {
    let pwm = EnhancedPwm::new(params.into()).map_err(|e| config_error(env, e))?;
    store(Instance::Enhanced(pwm))
}

#[rustler::nif]
fn enhanced_step(
    handle: u64,
    time: f64,
    cmpa: f64,
    cmpb: f64,
    sync_in: bool,
) -> NifResult<(Atom, OutputsResult)> {
    let outputs = INSTANCES
        .with_mut(handle, |instance| match instance {
            Instance::Enhanced(pwm) => Ok(pwm.step(time, cmpa, cmpb, sync_in)),
            Instance::Complementary(_) => Err(wrong_kind()),
        })
        .ok_or_else(not_found)??;

    Ok((atoms::ok(), outputs.into()))
}

/// Creates a complementary PWM and returns its handle.
#[rustler::nif]
fn complementary_new(env: Env, params: ComplementaryConfig) -> NifResult<(Atom, u64)> {
    let pwm = ComplementaryPwm::new(params.into()).map_err(|e| config_error(env, e))?;
    store(Instance::Complementary(pwm))
}

#[rustler::nif]
fn complementary_step(handle: u64, time: f64, sync_in: bool) -> NifResult<(Atom, OutputsResult)> {
    let outputs = with_complementary(handle, |pwm| pwm.step(time, sync_in))?;
    Ok((atoms::ok(), outputs.into()))
}

/// Applies a runtime update. Returns whether every provided field was accepted.
#[rustler::nif]
fn complementary_update(handle: u64, update: UpdateConfig) -> NifResult<(Atom, bool)> {
    let accepted = with_complementary(handle, |pwm| pwm.update_parameters(update.into()))?;
    Ok((atoms::ok(), accepted))
}

/// Gets carrier and compare state for debugging/telemetry.
#[rustler::nif]
fn complementary_state(handle: u64) -> NifResult<(Atom, StateResult)> {
    let state = with_complementary(handle, |pwm| StateResult::from(&*pwm))?;
    Ok((atoms::ok(), state))
}

#[rustler::nif]
fn reset(handle: u64) -> NifResult<Atom> {
    INSTANCES
        .with_mut(handle, Instance::reset)
        .ok_or_else(not_found)?;
    Ok(atoms::ok())
}

/// Destroys an instance and frees its slab slot.
#[rustler::nif]
fn destroy(handle: u64) -> NifResult<Atom> {
    INSTANCES.remove(handle);
    Ok(atoms::ok())
}

/// Returns the number of live instances.
#[rustler::nif]
fn instance_count() -> NifResult<u64> {
    Ok(INSTANCES.count() as u64)
}
