//! Time-driven motion for the ship's nacelles and the engine status machine
use nalgebra::Vector3;
use std::f32::consts::FRAC_PI_2;
use std::f64::consts::TAU;
use std::fmt;

/// Main nacelle bank while the engines are on
pub const BANK_ON: f32 = 1.2;
/// Main nacelle bank while the engines are off
pub const BANK_OFF: f32 = FRAC_PI_2;

/// Front nacelle spin rate, radians per second
pub const FRONT_SPIN_RATE: f64 = 25.0;

/// Engine state. Transitions are driven by the main nacelle bank angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Off,
    TransitionOn,
    On,
    TransitionOff,
}

impl Status {
    /// Reverse direction; mid-transition requests turn around immediately
    pub fn toggled(self) -> Self {
        match self {
            Status::Off | Status::TransitionOff => Status::TransitionOn,
            Status::On | Status::TransitionOn => Status::TransitionOff,
        }
    }

    pub fn is_transitioning(self) -> bool {
        matches!(self, Status::TransitionOn | Status::TransitionOff)
    }

    /// Bank of the right main nacelle at rest in this state
    pub fn resting_bank(self) -> f32 {
        match self {
            Status::On | Status::TransitionOff => BANK_ON,
            Status::Off | Status::TransitionOn => BANK_OFF,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Off => "off",
            Status::TransitionOn => "powering up",
            Status::On => "on",
            Status::TransitionOff => "powering down",
        };
        f.write_str(label)
    }
}

/// Advance the status machine by `delta` seconds.
///
/// `bank` is the right main nacelle's current bank. Powering down raises it
/// toward [`BANK_OFF`], powering up lowers it toward [`BANK_ON`]; reaching
/// the limit clamps the angle and settles the state. Steady states leave the
/// angle untouched.
pub fn step_status(status: Status, bank: f32, delta: f32) -> (Status, f32) {
    match status {
        Status::TransitionOff => {
            let bank = bank + delta;
            if bank > BANK_OFF {
                (Status::Off, BANK_OFF)
            } else {
                (status, bank)
            }
        }
        Status::TransitionOn => {
            let bank = bank - delta;
            if bank < BANK_ON {
                (Status::On, BANK_ON)
            } else {
                (status, bank)
            }
        }
        Status::Off | Status::On => (status, bank),
    }
}

/// Bank of the front-left nacelle at absolute time `t`; the right one spins
/// the other way.
///
/// The angle is `25 t` reduced to one turn. The reduction happens in `f64`
/// so the spin stays smooth however long the demo runs.
pub fn front_nacelle_bank(t: f64) -> f32 {
    (FRONT_SPIN_RATE * t).rem_euclid(TAU) as f32
}

/// Shared "engine vibration" offset applied to both main nacelles
pub fn vibration_offset(t: f64) -> Vector3<f32> {
    Vector3::new(
        ((10.0 * t).sin() / 40.0) as f32,
        ((20.0 * t).sin() / 40.0) as f32,
        ((30.0 * t).sin() / 40.0) as f32,
    )
}
