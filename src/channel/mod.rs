// Simulated baseband channel: bipolar mapping plus additive white Gaussian noise

pub mod bipolar;
pub mod noise;

pub use bipolar::{Samples, demodulate, modulate};
pub use noise::{RandomSource, add_white_noise};

use crate::fec::Signature;

/// Signal level and noise for one simulated link
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Channel {
    pub amplitude: f32,
    /// Standard deviation of the additive noise
    pub sigma: f64,
}

impl Channel {
    pub fn new(amplitude: f32, sigma: f64) -> Self {
        Self { amplitude, sigma }
    }

    /// Channel whose noise gives the requested SNR in dB
    pub fn from_snr_db(amplitude: f32, snr_db: f64) -> Self {
        Self {
            amplitude,
            sigma: amplitude as f64 / 10f64.powf(snr_db / 20.0),
        }
    }

    pub fn noiseless(amplitude: f32) -> Self {
        Self::new(amplitude, 0.0)
    }

    /// 20 * log10(amplitude / sigma)
    pub fn snr_db(&self) -> f64 {
        20.0 * (self.amplitude as f64 / self.sigma).log10()
    }

    /// Modulate, add noise and hard-decode one signature
    pub fn transmit<R: RandomSource + ?Sized>(
        &self,
        sign: &Signature,
        rng: &mut R,
    ) -> Signature {
        let mut samples = modulate(sign, self.amplitude);
        if self.sigma > 0.0 {
            add_white_noise(&mut samples, self.sigma, rng);
        }
        demodulate(&samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_snr_conversion() {
        let ch = Channel::from_snr_db(1.0, 20.0);
        assert!((ch.sigma - 0.1).abs() < 1e-12);
        assert!((ch.snr_db() - 20.0).abs() < 1e-9);
        assert!(Channel::noiseless(1.0).snr_db().is_infinite());
    }

    #[test]
    fn test_noiseless_transmit() {
        let mut rng = StdRng::seed_from_u64(1);
        let sign = Signature::random(&mut rng);
        assert_eq!(Channel::noiseless(1.0).transmit(&sign, &mut rng), sign);
    }

    #[test]
    fn test_heavy_noise_corrupts() {
        let mut rng = StdRng::seed_from_u64(2);
        let sign = Signature::random(&mut rng);
        let rx = Channel::new(1.0, 1.0).transmit(&sign, &mut rng);
        assert!(sign.bit_errors(&rx) > 0);
    }
}
