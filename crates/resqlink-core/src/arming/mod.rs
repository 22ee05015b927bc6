mod controller;
mod countdown;

pub use controller::{ArmingController, ArmingState};
pub use countdown::{COUNTDOWN_TICKS, TICK_PERIOD};
