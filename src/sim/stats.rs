use serde::Serialize;
use std::fmt;

use super::trial::TrialOutcome;
use crate::fec::SIGN_BITS;

/// Aggregated trial counters for one noise level
///
/// Workers keep their own copy and the results are combined with
/// [`merge`](Self::merge), so nothing here is shared between threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TrialCounters {
    pub trials: u64,
    pub good_crc: u64,
    pub bad_crc: u64,
    pub fixed_crc: u64,
    pub false_corrections: u64,
    pub undetected: u64,
    /// Bit errors seen before correction, summed over all trials
    pub bit_errors: u64,
}

impl TrialCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        self.bit_errors += outcome.bit_errors as u64;
        if outcome.is_good() {
            self.good_crc += 1;
        } else {
            self.bad_crc += 1;
        }
        if outcome.is_fixed() {
            self.fixed_crc += 1;
        }
        if outcome.is_false_correction() {
            self.false_corrections += 1;
        }
        if outcome.is_undetected() {
            self.undetected += 1;
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            trials: self.trials + other.trials,
            good_crc: self.good_crc + other.good_crc,
            bad_crc: self.bad_crc + other.bad_crc,
            fixed_crc: self.fixed_crc + other.fixed_crc,
            false_corrections: self.false_corrections + other.false_corrections,
            undetected: self.undetected + other.undetected,
            bit_errors: self.bit_errors + other.bit_errors,
        }
    }

    /// Raw channel bit error rate
    pub fn bit_error_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.bit_errors as f64 / (self.trials as f64 * SIGN_BITS as f64)
    }

    /// Fraction of signatures still failing the CRC after correction
    pub fn residual_frame_error_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.bad_crc as f64 / self.trials as f64
    }
}

impl FromIterator<TrialOutcome> for TrialCounters {
    fn from_iter<I: IntoIterator<Item = TrialOutcome>>(iter: I) -> Self {
        let mut counters = Self::new();
        for outcome in iter {
            counters.record(&outcome);
        }
        counters
    }
}

impl fmt::Display for TrialCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "All:{:5} GoodCRC:{:5} Fixed:{:5} False:{:3} BitErr:{:6}",
            self.trials,
            self.good_crc,
            self.fixed_crc,
            self.false_corrections,
            self.bit_errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(
        bit_errors: u32,
        corrected: Option<u16>,
        final_syndrome: u32,
        residual: u32,
    ) -> TrialOutcome {
        TrialOutcome {
            bit_errors,
            syndrome: if bit_errors == 0 { 0 } else { 0xABCD },
            corrected_bit: corrected,
            final_syndrome,
            residual_bit_errors: residual,
        }
    }

    #[test]
    fn test_record() {
        let counters: TrialCounters = vec![
            outcome(0, None, 0, 0),
            outcome(1, Some(5), 0, 0),
            outcome(2, None, 0xABCD, 2),
            outcome(3, Some(9), 0, 4),
        ]
        .into_iter()
        .collect();

        assert_eq!(counters.trials, 4);
        assert_eq!(counters.good_crc, 3);
        assert_eq!(counters.bad_crc, 1);
        assert_eq!(counters.fixed_crc, 2);
        assert_eq!(counters.false_corrections, 1);
        assert_eq!(counters.bit_errors, 6);
        assert_eq!(counters.good_crc + counters.bad_crc, counters.trials);
    }

    #[test]
    fn test_merge() {
        let a: TrialCounters = vec![outcome(1, Some(1), 0, 0)].into_iter().collect();
        let b: TrialCounters = vec![outcome(2, None, 1, 2), outcome(0, None, 0, 0)]
            .into_iter()
            .collect();
        let merged = a.merge(b);
        assert_eq!(merged.trials, 3);
        assert_eq!(merged.bit_errors, 3);
        assert_eq!(merged.fixed_crc, 1);
        assert_eq!(merged.bad_crc, 1);
        assert_eq!(TrialCounters::new().merge(merged), merged);
    }

    #[test]
    fn test_rates() {
        assert_eq!(TrialCounters::new().bit_error_rate(), 0.0);
        let counters: TrialCounters =
            vec![outcome(544, None, 1, 544), outcome(0, None, 0, 0)]
                .into_iter()
                .collect();
        assert!((counters.bit_error_rate() - 0.5).abs() < 1e-12);
        assert!((counters.residual_frame_error_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let counters = TrialCounters {
            trials: 10000,
            good_crc: 9990,
            bad_crc: 10,
            fixed_crc: 120,
            false_corrections: 0,
            undetected: 0,
            bit_errors: 135,
        };
        assert_eq!(
            counters.to_string(),
            "All:10000 GoodCRC: 9990 Fixed:  120 False:  0 BitErr:   135"
        );
    }
}
