//! Core carrier traits for the PWM engine
//!
//! These traits define timing behavior, not modules or outputs.

mod carrier;

pub use carrier::{Carrier, CarrierSample, CountDirection};
