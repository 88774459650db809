// Fixed-layout signature with an embedded CRC31
//
// Layout (MSB first):
//   bytes 0..64   payload
//   byte  64      top bit payload, low 7 bits CRC[30:24]
//   bytes 65..68  CRC[23:0], big-endian

use std::fmt;

use super::crc31::{pass_bit, pass_byte, pass_bytes};
use crate::channel::noise::RandomSource;

/// Signature size in bytes
pub const SIGN_BYTES: usize = 64 + 4;

/// Signature size in bits
pub const SIGN_BITS: usize = SIGN_BYTES * 8;

/// Number of whole payload bytes before the mixed payload/CRC byte
pub const PAYLOAD_BYTES: usize = 64;

/// Payload bits, including the top bit of byte 64
pub const PAYLOAD_BITS: usize = PAYLOAD_BYTES * 8 + 1;

/// Width of the embedded checksum in bits
pub const CRC_BITS: usize = 31;

/// Compute the CRC over the payload bits and write it into the buffer
///
/// Returns the 31-bit checksum written.
pub fn embed_crc(sign: &mut [u8; SIGN_BYTES]) -> u32 {
    let mut crc = pass_bytes(0, &sign[..PAYLOAD_BYTES]);
    crc = pass_bit(crc, sign[PAYLOAD_BYTES] >> 7);
    for _ in 0..CRC_BITS {
        crc = pass_bit(crc, 0);
    }

    sign[64] = (sign[64] & 0x80) | (crc >> 24) as u8;
    sign[65] = (crc >> 16) as u8;
    sign[66] = (crc >> 8) as u8;
    sign[67] = crc as u8;
    crc
}

/// Run the whole buffer, checksum included, through the CRC
///
/// Zero for an intact signature, otherwise the syndrome of the damage.
pub fn check_crc(sign: &[u8; SIGN_BYTES]) -> u32 {
    sign.iter()
        .fold(0, |crc, &byte| pass_byte(crc, byte))
}

/// Invert bit `bit` of the buffer, bit 0 being the MSB of byte 0
pub fn flip_bit(sign: &mut [u8; SIGN_BYTES], bit: usize) {
    sign[bit >> 3] ^= 0x80 >> (bit & 7);
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGN_BYTES]);

impl Signature {
    pub fn zeroed() -> Self {
        Self([0u8; SIGN_BYTES])
    }

    pub fn from_bytes(bytes: [u8; SIGN_BYTES]) -> Self {
        Self(bytes)
    }

    /// Random payload with a valid CRC
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut sign = Self::zeroed();
        rng.fill_random_bytes(&mut sign.0);
        sign.embed_crc();
        sign
    }

    pub fn as_bytes(&self) -> &[u8; SIGN_BYTES] {
        &self.0
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8; SIGN_BYTES] {
        &mut self.0
    }

    pub fn into_bytes(self) -> [u8; SIGN_BYTES] {
        self.0
    }

    pub fn embed_crc(&mut self) -> u32 {
        embed_crc(&mut self.0)
    }

    pub fn check_crc(&self) -> u32 {
        check_crc(&self.0)
    }

    /// The checksum currently stored in the last 31 bits
    pub fn stored_crc(&self) -> u32 {
        (((self.0[64] & 0x7F) as u32) << 24)
            | ((self.0[65] as u32) << 16)
            | ((self.0[66] as u32) << 8)
            | self.0[67] as u32
    }

    pub fn flip_bit(&mut self, bit: usize) {
        flip_bit(&mut self.0, bit);
    }

    pub fn bit(&self, bit: usize) -> bool {
        (self.0[bit >> 3] & (0x80 >> (bit & 7))) != 0
    }

    /// Iterate over all bits, MSB of byte 0 first
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..SIGN_BITS).map(move |bit| self.bit(bit))
    }

    /// Count differing bits between two signatures
    pub fn bit_errors(&self, other: &Signature) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| (a ^ b).count_ones())
            .sum()
    }

    /// Parse 136 hex digits, whitespace ignored
    pub fn from_hex(text: &str) -> Result<Self, String> {
        let digits: Vec<u8> = text
            .bytes()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if digits.len() != SIGN_BYTES * 2 {
            return Err(format!(
                "Expected {} hex digits, got {}",
                SIGN_BYTES * 2,
                digits.len()
            ));
        }

        let mut bytes = [0u8; SIGN_BYTES];
        for (byte, pair) in bytes
            .iter_mut()
            .zip(digits.chunks_exact(2))
        {
            let pair = std::str::from_utf8(pair).map_err(|e| e.to_string())?;
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|e| format!("Invalid hex '{}': {}", pair, e))?;
        }
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        self.0
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl From<[u8; SIGN_BYTES]> for Signature {
    fn from(bytes: [u8; SIGN_BYTES]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ramp() -> Signature {
        let mut bytes = [0u8; SIGN_BYTES];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        Signature::from_bytes(bytes)
    }

    #[test]
    fn test_all_zero_payload() {
        let mut sign = Signature::zeroed();
        assert_eq!(sign.embed_crc(), 0);
        assert_eq!(sign.as_bytes()[67], 0x00);
        assert_eq!(sign.check_crc(), 0);
    }

    #[test]
    fn test_ramp_fixture() {
        let mut sign = ramp();
        let crc = sign.embed_crc();
        assert_eq!(crc, 0x2C8B_C44D);
        assert_eq!(&sign.as_bytes()[64..], &[0x2C, 0x8B, 0xC4, 0x4D]);
        assert_eq!(sign.stored_crc(), crc);
        assert_eq!(sign.check_crc(), 0);
    }

    #[test]
    fn test_payload_top_bit_preserved() {
        let mut sign = Signature::from_bytes([0xFF; SIGN_BYTES]);
        let crc = sign.embed_crc();
        assert_eq!(crc, 0x0ED2_2803);
        assert_eq!(&sign.as_bytes()[64..], &[0x8E, 0xD2, 0x28, 0x03]);
        assert!(sign.bit(PAYLOAD_BITS - 1));
    }

    #[test]
    fn test_embed_then_check_is_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let sign = Signature::random(&mut rng);
            assert_eq!(sign.check_crc(), 0, "sign={}", sign);
        }
    }

    #[test]
    fn test_flip_bit_msb_first() {
        let mut sign = Signature::zeroed();
        sign.flip_bit(0);
        assert_eq!(sign.as_bytes()[0], 0x80);
        sign.flip_bit(15);
        assert_eq!(sign.as_bytes()[1], 0x01);
        assert!(sign.bit(0) && sign.bit(15) && !sign.bit(1));
        sign.flip_bit(0);
        sign.flip_bit(15);
        assert_eq!(sign, Signature::zeroed());
    }

    #[test]
    fn test_bit_errors() {
        let a = ramp();
        let mut b = a;
        assert_eq!(a.bit_errors(&b), 0);
        b.flip_bit(3);
        b.flip_bit(100);
        b.flip_bit(543);
        assert_eq!(a.bit_errors(&b), 3);
    }

    #[test]
    fn test_bits_iterator() {
        let mut sign = Signature::zeroed();
        sign.flip_bit(9);
        let bits: Vec<bool> = sign.bits().collect();
        assert_eq!(bits.len(), SIGN_BITS);
        assert_eq!(bits.iter().filter(|&&b| b).count(), 1);
        assert!(bits[9]);
    }

    #[test]
    fn test_hex() {
        let mut bytes = [0u8; SIGN_BYTES];
        bytes[0] = 0xAB;
        bytes[67] = 0x01;
        let hex = Signature::from_bytes(bytes).to_hex();
        assert_eq!(hex.len(), SIGN_BYTES * 2);
        assert!(hex.starts_with("AB00"));
        assert!(hex.ends_with("0001"));
        assert_eq!(Signature::from_hex(&hex).unwrap().as_bytes(), &bytes);
    }

    #[test]
    fn test_from_hex_errors() {
        assert!(Signature::from_hex("ABCD").is_err());
        let bad = "ZZ".repeat(SIGN_BYTES);
        assert!(Signature::from_hex(&bad).is_err());
        let spaced = "00 ".repeat(SIGN_BYTES);
        assert_eq!(Signature::from_hex(&spaced).unwrap(), Signature::zeroed());
    }
}
