// Monte-Carlo validation of the CRC31 single-bit correction over a noisy channel
//
// GENERATE -> ENCODE -> TRANSMIT(+NOISE) -> DECODE -> VERIFY -> CORRECT -> ACCOUNT

pub mod stats;
pub mod sweep;
pub mod trial;

pub use stats::TrialCounters;
pub use sweep::{LevelReport, NoiseLadder, Sweep, SweepConfig, SweepReport};
pub use trial::{TrialOutcome, generate, receive, run_trial};
