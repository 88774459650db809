use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use super::stats::TrialCounters;
use super::trial::run_trial;
use crate::channel::Channel;
use crate::fec::{CRC31_POLYNOMIAL, SIGN_BITS, SyndromeTable};
use crate::utils::consts::*;

/// Noise levels visited by a sweep
#[derive(Clone, Debug, PartialEq)]
pub enum NoiseLadder {
    /// `sigma = start * 10^(k * step_db / 20)` for as long as `sigma < stop`
    Geometric { start: f64, stop: f64, step_db: f64 },
    /// Explicit signal-to-noise ratios in dB
    SnrDb(Vec<f64>),
    /// Explicit noise standard deviations, zero allowed
    Sigma(Vec<f64>),
}

impl NoiseLadder {
    pub fn sigmas(&self, amplitude: f32) -> Vec<f64> {
        match self {
            Self::Geometric {
                start,
                stop,
                step_db,
            } => {
                let step = 10f64.powf(step_db / 20.0);
                (0..MAX_SWEEP_LEVELS as i32)
                    .map(|k| start * step.powi(k))
                    .take_while(|&sigma| sigma < *stop)
                    .collect()
            }
            Self::SnrDb(snrs) => snrs
                .iter()
                .map(|&snr| Channel::from_snr_db(amplitude, snr).sigma)
                .collect(),
            Self::Sigma(sigmas) => sigmas.clone(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            Self::Geometric {
                start,
                stop,
                step_db,
            } => {
                if !(start.is_finite() && *start > 0.0) {
                    return Err(format!("Noise start must be positive, got {}", start));
                }
                if !(stop.is_finite() && stop > start) {
                    return Err(format!(
                        "Noise stop ({}) must be above noise start ({})",
                        stop, start
                    ));
                }
                if !(step_db.is_finite() && *step_db > 0.0) {
                    return Err(format!("Noise step must be positive, got {} dB", step_db));
                }
                Ok(())
            }
            Self::SnrDb(snrs) => {
                if snrs.is_empty() {
                    return Err("No SNR levels given".to_string());
                }
                if let Some(snr) = snrs.iter().find(|s| !s.is_finite()) {
                    return Err(format!("Invalid SNR level: {}", snr));
                }
                Ok(())
            }
            Self::Sigma(sigmas) => {
                if sigmas.is_empty() {
                    return Err("No noise levels given".to_string());
                }
                if let Some(sigma) = sigmas
                    .iter()
                    .find(|s| !(s.is_finite() && **s >= 0.0))
                {
                    return Err(format!("Invalid noise level: {}", sigma));
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub amplitude: f32,
    pub ladder: NoiseLadder,
    pub trials_per_level: usize,
    /// Base seed; drawn from entropy when `None`
    pub seed: Option<u64>,
    /// Worker threads; rayon's global pool when `None`
    pub threads: Option<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_AMPLITUDE,
            ladder: NoiseLadder::Geometric {
                start: DEFAULT_NOISE_START,
                stop: DEFAULT_NOISE_STOP,
                step_db: DEFAULT_NOISE_STEP_DB,
            },
            trials_per_level: DEFAULT_TRIALS_PER_LEVEL,
            seed: None,
            threads: None,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.amplitude.is_finite() && self.amplitude > 0.0) {
            return Err(format!("Amplitude must be positive, got {}", self.amplitude));
        }
        if self.trials_per_level == 0 {
            return Err("Trials per level must be at least 1".to_string());
        }
        if self.threads == Some(0) {
            return Err("Thread count must be at least 1".to_string());
        }
        self.ladder.validate()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LevelReport {
    pub snr_db: f64,
    pub sigma: f64,
    pub counters: TrialCounters,
}

impl fmt::Display for LevelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:4.1}dB: {}", self.snr_db, self.counters)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SweepReport {
    pub polynomial: u32,
    pub sign_bits: usize,
    pub amplitude: f32,
    pub seed: u64,
    pub trials_per_level: usize,
    /// Set when the sweep was stopped before visiting every level
    pub interrupted: bool,
    pub levels: Vec<LevelReport>,
}

/// Runs batches of independent trials over a noise ladder
///
/// Each level is split into chunks of `TRIAL_CHUNK` trials. A chunk owns an
/// `StdRng` seeded from (seed, level, chunk), so counters depend only on the
/// seed and not on how many workers picked the chunks up.
pub struct Sweep<'a> {
    config: SweepConfig,
    seed: u64,
    table: &'a SyndromeTable,
    pool: Option<rayon::ThreadPool>,
}

impl<'a> Sweep<'a> {
    pub fn new(config: SweepConfig, table: &'a SyndromeTable) -> Result<Self, String> {
        config.validate()?;
        let seed = config
            .seed
            .unwrap_or_else(rand::random);
        let pool = match config.threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| format!("Thread pool error: {}", e))?,
            ),
            None => None,
        };

        info!(
            "Sweep: amplitude={} trials/level={} seed={} threads={}",
            config.amplitude,
            config.trials_per_level,
            seed,
            config
                .threads
                .map_or_else(|| "auto".to_string(), |t| t.to_string())
        );

        Ok(Self {
            config,
            seed,
            table,
            pool,
        })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn sigmas(&self) -> Vec<f64> {
        self.config
            .ladder
            .sigmas(self.config.amplitude)
    }

    pub fn total_trials(&self) -> u64 {
        (self.sigmas().len() * self.config.trials_per_level) as u64
    }

    /// Run all trials of one level; `progress` receives finished trial counts
    pub fn run_level(
        &self,
        level: usize,
        sigma: f64,
        progress: &(dyn Fn(u64) + Sync),
    ) -> LevelReport {
        let channel = Channel::new(self.config.amplitude, sigma);
        let trials = self.config.trials_per_level;
        let chunks = trials.div_ceil(TRIAL_CHUNK);
        let table = self.table;
        let seed = self.seed;

        let work = || {
            (0..chunks)
                .into_par_iter()
                .map(|chunk| {
                    let len = TRIAL_CHUNK.min(trials - chunk * TRIAL_CHUNK);
                    let mut rng = StdRng::seed_from_u64(chunk_seed(seed, level, chunk));
                    let counters: TrialCounters = (0..len)
                        .map(|_| run_trial(&mut rng, &channel, table))
                        .collect();
                    progress(len as u64);
                    counters
                })
                .reduce(TrialCounters::new, TrialCounters::merge)
        };
        let counters = match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        };

        let report = LevelReport {
            snr_db: channel.snr_db(),
            sigma,
            counters,
        };
        debug!("Level {}: sigma={:.4} {}", level, sigma, report);
        report
    }

    pub fn run(&self) -> SweepReport {
        self.run_with(&AtomicBool::new(false), &|_: u64| {}, &mut |_: &LevelReport| {})
    }

    /// Run every level, checking `stop` before starting each one
    ///
    /// `on_level` sees each level report as soon as it is complete.
    pub fn run_with(
        &self,
        stop: &AtomicBool,
        progress: &(dyn Fn(u64) + Sync),
        on_level: &mut dyn FnMut(&LevelReport),
    ) -> SweepReport {
        let sigmas = self.sigmas();
        let mut levels = Vec::with_capacity(sigmas.len());
        let mut interrupted = false;

        for (level, &sigma) in sigmas.iter().enumerate() {
            if stop.load(Ordering::SeqCst) {
                warn!(
                    "Sweep interrupted after {} of {} levels",
                    level,
                    sigmas.len()
                );
                interrupted = true;
                break;
            }
            let report = self.run_level(level, sigma, progress);
            on_level(&report);
            levels.push(report);
        }

        SweepReport {
            polynomial: CRC31_POLYNOMIAL,
            sign_bits: SIGN_BITS,
            amplitude: self.config.amplitude,
            seed: self.seed,
            trials_per_level: self.config.trials_per_level,
            interrupted,
            levels,
        }
    }
}

// splitmix64 finalizer over the (seed, level, chunk) triple
fn chunk_seed(seed: u64, level: usize, chunk: usize) -> u64 {
    let mut z = seed
        ^ (level as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (chunk as u64).wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
