//! Record constraint validation.

pub mod checks;
pub mod issue;

pub use checks::{MAX_COORDINATE_X, MAX_IMPACT_SPEED, MIN_COORDINATE_Y, validate};
pub use issue::{Issue, Violations};
