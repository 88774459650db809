// CRC31 implementation used as a single-bit error correcting code
// Polynomial: 0xC1E52417 (Koopman's CRC-31 table)

pub const CRC31_POLYNOMIAL: u32 = 0xC1E52417;

/// Pass a single bit through the CRC polynomial
///
/// Shifts the register left, appends `bit` at the bottom and reduces by the
/// polynomial whenever bit 31 becomes set, so the result stays below 2^31.
pub fn pass_bit(crc: u32, bit: u8) -> u32 {
    let crc = (crc << 1) | (bit & 1) as u32;
    if (crc & 0x8000_0000) != 0 {
        crc ^ CRC31_POLYNOMIAL
    } else {
        crc
    }
}

/// Pass a byte through the CRC polynomial (MSB first)
pub fn pass_byte(mut crc: u32, byte: u8) -> u32 {
    for i in 0..8 {
        crc = pass_bit(crc, (byte >> (7 - i)) & 1);
    }
    crc
}

/// Pass a run of bytes through the CRC polynomial
pub fn pass_bytes(crc: u32, data: &[u8]) -> u32 {
    data.iter()
        .fold(crc, |crc, &byte| pass_byte(crc, byte))
}
