// Bipolar (BPSK-like) mapping between signature bits and channel samples
// One sample per bit, MSB of each byte first

use crate::fec::signature::{SIGN_BITS, SIGN_BYTES, Signature};

/// One real-valued sample per signature bit
pub type Samples = [f32; SIGN_BITS];

/// Map each bit to `+amplitude` (1) or `-amplitude` (0)
pub fn modulate(sign: &Signature, amplitude: f32) -> Samples {
    let mut samples = [0.0f32; SIGN_BITS];
    for (sample, bit) in samples.iter_mut().zip(sign.bits()) {
        *sample = if bit { amplitude } else { -amplitude };
    }
    samples
}

/// Hard-decision decode: a sample above zero is a 1
pub fn demodulate(samples: &Samples) -> Signature {
    let mut bytes = [0u8; SIGN_BYTES];
    for (byte, chunk) in bytes
        .iter_mut()
        .zip(samples.chunks_exact(8))
    {
        *byte = chunk
            .iter()
            .fold(0u8, |acc, &s| (acc << 1) | (s > 0.0) as u8);
    }
    Signature::from_bytes(bytes)
}
