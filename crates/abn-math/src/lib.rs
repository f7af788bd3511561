//! A/B/n math utilities.

pub mod math;

pub use math::beta::*;
pub use math::gamma::{gamma_p, gamma_q};
pub use math::normal::*;
pub use math::stable::*;
