pub mod calculator;
pub mod inputs;
pub mod projection;
pub mod sanity;
pub mod savings;

pub use calculator::{calculate, RoiOutputs};
pub use inputs::RoiInputs;
pub use sanity::{sanity_check, SanityCheckInput, SanityResult};
