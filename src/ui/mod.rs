pub mod progress;

use crate::fec::{CRC31_POLYNOMIAL, SIGN_BITS, SIGN_BYTES};
use crate::sim::SweepReport;

pub fn print_banner() {
    println!(
        "CRC31-FEC: {} byte signature ({} bits), polynomial {:08X}",
        SIGN_BYTES, SIGN_BITS, CRC31_POLYNOMIAL
    );
}

/// One line per noise level, the format used by the sweep tool
pub fn format_report(report: &SweepReport) -> Vec<String> {
    report
        .levels
        .iter()
        .map(|level| level.to_string())
        .collect()
}

pub fn print_report(report: &SweepReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
    if report.interrupted {
        println!("(interrupted, {} levels completed)", report.levels.len());
    }
}
