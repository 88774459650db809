use tracing::trace;

use crate::channel::{Channel, RandomSource};
use crate::fec::{Signature, SyndromeTable};

/// What happened to one signature on its way through the channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Bit errors after hard decision, before any correction
    pub bit_errors: u32,
    /// Residue of the received signature
    pub syndrome: u32,
    /// Bit flipped by the single correction attempt
    pub corrected_bit: Option<u16>,
    /// Residue left after the correction attempt
    pub final_syndrome: u32,
    /// Bit errors still present after the correction attempt
    pub residual_bit_errors: u32,
}

impl TrialOutcome {
    /// Checksum is zero after the correction attempt
    pub fn is_good(&self) -> bool {
        self.final_syndrome == 0
    }

    /// A correction was applied and the checksum became zero
    pub fn is_fixed(&self) -> bool {
        self.corrected_bit.is_some() && self.final_syndrome == 0
    }

    pub fn is_bad(&self) -> bool {
        self.final_syndrome != 0
    }

    /// Checksum reached zero through a correction that left the data wrong
    pub fn is_false_correction(&self) -> bool {
        self.is_fixed() && self.residual_bit_errors > 0
    }

    /// Damaged signature whose checksum came out zero without any correction
    pub fn is_undetected(&self) -> bool {
        self.syndrome == 0 && self.bit_errors > 0
    }
}

/// GENERATE: random payload with its CRC embedded
pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Signature {
    Signature::random(rng)
}

/// VERIFY, CORRECT and classify a received signature
///
/// At most one bit is flipped; the attempt is never repeated.
pub fn receive(
    tx: &Signature,
    mut decoded: Signature,
    table: &SyndromeTable,
) -> TrialOutcome {
    let bit_errors = tx.bit_errors(&decoded);
    let syndrome = decoded.check_crc();

    let mut final_syndrome = syndrome;
    let corrected_bit = table.correct(&mut decoded, syndrome);
    if let Some(bit) = corrected_bit {
        final_syndrome ^= table.syndrome(bit as usize);
    }

    let outcome = TrialOutcome {
        bit_errors,
        syndrome,
        corrected_bit,
        final_syndrome,
        residual_bit_errors: tx.bit_errors(&decoded),
    };
    trace!(
        "Trial: syndrome={:08X} bit_errors={} corrected={:?} final={:08X}",
        syndrome, bit_errors, corrected_bit, final_syndrome
    );
    outcome
}

/// Run one full trial: generate, transmit through `channel`, decode and correct
pub fn run_trial<R: RandomSource + ?Sized>(
    rng: &mut R,
    channel: &Channel,
    table: &SyndromeTable,
) -> TrialOutcome {
    let tx = generate(rng);
    let decoded = channel.transmit(&tx, rng);
    receive(&tx, decoded, table)
}
