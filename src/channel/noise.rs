use rand::Rng;
use rand::distr::Open01;
use std::f64::consts::PI;

/// Source of randomness for payloads and channel noise
///
/// Implemented for every `rand::Rng`, so tests can pass a seeded `StdRng`.
pub trait RandomSource {
    fn fill_random_bytes(&mut self, dest: &mut [u8]);

    /// Uniform value in the open interval (0, 1)
    fn uniform_open(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn fill_random_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest);
    }

    fn uniform_open(&mut self) -> f64 {
        self.sample(Open01)
    }
}

/// Two independent N(0, 1) samples via the Box-Muller transform
pub fn white_noise<R: RandomSource + ?Sized>(rng: &mut R) -> (f64, f64) {
    let power = (-2.0 * rng.uniform_open().ln()).sqrt();
    let phase = 2.0 * PI * rng.uniform_open();
    (power * phase.cos(), power * phase.sin())
}

/// Add zero-mean Gaussian noise with standard deviation `sigma`
///
/// Samples are filled in pairs; an odd tail uses the first of a fresh pair.
pub fn add_white_noise<R: RandomSource + ?Sized>(
    signal: &mut [f32],
    sigma: f64,
    rng: &mut R,
) {
    let mut pairs = signal.chunks_exact_mut(2);
    for pair in &mut pairs {
        let (i, q) = white_noise(rng);
        pair[0] += (sigma * i) as f32;
        pair[1] += (sigma * q) as f32;
    }
    if let [last] = pairs.into_remainder() {
        let (i, _) = white_noise(rng);
        *last += (sigma * i) as f32;
    }
}
