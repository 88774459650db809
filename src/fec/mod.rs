// Forward error correction layer
// CRC31 over a fixed 544-bit signature, correcting any single flipped bit

pub mod crc31;
pub mod signature;
pub mod syndrome;

pub use crc31::CRC31_POLYNOMIAL;
pub use signature::{SIGN_BITS, SIGN_BYTES, Signature};
pub use syndrome::{SyndromeEntry, SyndromeTable, SyndromeTableError};
