use std::error::Error;
use std::fmt;

use tracing::{debug, info};

use super::crc31::CRC31_POLYNOMIAL;
use super::signature::{SIGN_BITS, Signature};

/// One row of the sorted lookup table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyndromeEntry {
    pub syndrome: u32,
    pub bit: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyndromeTableError {
    /// The probe signature does not check to zero
    ReferenceNotClean { residue: u32 },
    /// A single-bit flip left the checksum at zero
    ZeroSyndrome { bit: u16 },
    /// Two bit positions share a syndrome, so the code cannot correct them
    DuplicateSyndrome {
        syndrome: u32,
        first_bit: u16,
        second_bit: u16,
    },
}

impl fmt::Display for SyndromeTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReferenceNotClean { residue } => write!(
                f,
                "reference signature has non-zero residue {:08X}",
                residue
            ),
            Self::ZeroSyndrome { bit } => {
                write!(f, "flipping bit {} is not detected by the CRC", bit)
            }
            Self::DuplicateSyndrome {
                syndrome,
                first_bit,
                second_bit,
            } => write!(
                f,
                "bits {} and {} share syndrome {:08X}",
                first_bit, second_bit, syndrome
            ),
        }
    }
}

impl Error for SyndromeTableError {}

/// Maps single-bit errors to their CRC syndromes and back
///
/// `by_bit[p]` is the residue left by flipping bit `p` of a clean signature;
/// `sorted` holds the same values keyed by syndrome for binary search.
/// Built once and never mutated, so it can be shared freely between workers.
#[derive(Debug, Clone)]
pub struct SyndromeTable {
    by_bit: Vec<u32>,
    sorted: Vec<SyndromeEntry>,
}

impl SyndromeTable {
    /// Returned by [`find_bit`](Self::find_bit) when no single bit explains a syndrome
    pub const NOT_FOUND: u16 = u16::MAX;

    /// Build the table from the all-zero signature
    pub fn new() -> Result<Self, SyndromeTableError> {
        let mut reference = Signature::zeroed();
        reference.embed_crc();
        Self::build(&reference)
    }

    /// Build the table by probing every bit of a clean `reference`
    pub fn build(reference: &Signature) -> Result<Self, SyndromeTableError> {
        let residue = reference.check_crc();
        if residue != 0 {
            return Err(SyndromeTableError::ReferenceNotClean { residue });
        }

        let mut probe = *reference;
        let mut by_bit = Vec::with_capacity(SIGN_BITS);
        for bit in 0..SIGN_BITS {
            probe.flip_bit(bit);
            let syndrome = probe.check_crc();
            probe.flip_bit(bit);

            if syndrome == 0 {
                return Err(SyndromeTableError::ZeroSyndrome { bit: bit as u16 });
            }
            by_bit.push(syndrome);
        }
        debug_assert_eq!(&probe, reference);

        let mut sorted: Vec<SyndromeEntry> = by_bit
            .iter()
            .enumerate()
            .map(|(bit, &syndrome)| SyndromeEntry {
                syndrome,
                bit: bit as u16,
            })
            .collect();
        sorted.sort_unstable_by_key(|entry| entry.syndrome);

        if let Some(pair) = sorted
            .windows(2)
            .find(|pair| pair[0].syndrome == pair[1].syndrome)
        {
            return Err(SyndromeTableError::DuplicateSyndrome {
                syndrome: pair[0].syndrome,
                first_bit: pair[0].bit.min(pair[1].bit),
                second_bit: pair[0].bit.max(pair[1].bit),
            });
        }

        info!(
            "Syndrome table built: {} bits, polynomial {:08X}, syndromes {:08X}..{:08X}",
            SIGN_BITS,
            CRC31_POLYNOMIAL,
            sorted[0].syndrome,
            sorted[sorted.len() - 1].syndrome
        );

        Ok(Self { by_bit, sorted })
    }

    /// Syndrome produced by flipping `bit` alone
    pub fn syndrome(&self, bit: usize) -> u32 {
        self.by_bit[bit]
    }

    /// All entries ordered by syndrome value
    pub fn entries(&self) -> &[SyndromeEntry] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.by_bit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_bit.is_empty()
    }

    /// Bit position whose flip yields `syndrome`, if any
    pub fn locate(&self, syndrome: u32) -> Option<u16> {
        self.sorted
            .binary_search_by_key(&syndrome, |entry| entry.syndrome)
            .ok()
            .map(|idx| self.sorted[idx].bit)
    }

    /// Like [`locate`](Self::locate) but returns [`NOT_FOUND`](Self::NOT_FOUND) on a miss
    pub fn find_bit(&self, syndrome: u32) -> u16 {
        self.locate(syndrome)
            .unwrap_or(Self::NOT_FOUND)
    }

    /// Try to fix a single bit error in place
    ///
    /// Returns the flipped bit, or `None` when `syndrome` is zero or
    /// matches no single-bit error.
    pub fn correct(&self, sign: &mut Signature, syndrome: u32) -> Option<u16> {
        if syndrome == 0 {
            return None;
        }
        let bit = self.locate(syndrome)?;
        debug!("Syndrome {:08X} => bit {}", syndrome, bit);
        sign.flip_bit(bit as usize);
        Some(bit)
    }
}
