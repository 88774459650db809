/// 日志级别（可被 RUST_LOG 覆盖）
pub const LOG_LEVEL: &str = "info";

// ============================================================================
// Simulation defaults
// ============================================================================

/// Bipolar signal amplitude
pub const DEFAULT_AMPLITUDE: f32 = 1.0;

/// First noise standard deviation of the sweep (20 dB at unit amplitude)
pub const DEFAULT_NOISE_START: f64 = 0.1;

/// Sweep stops before reaching this noise level
pub const DEFAULT_NOISE_STOP: f64 = 0.6;

/// Noise increase per level (dB)
pub const DEFAULT_NOISE_STEP_DB: f64 = 1.0;

/// Trials per noise level
pub const DEFAULT_TRIALS_PER_LEVEL: usize = 10_000;

/// Trials handed to one worker at a time
pub const TRIAL_CHUNK: usize = 256;

/// Upper bound on the length of a geometric noise ladder
pub const MAX_SWEEP_LEVELS: usize = 1000;

/// 进度更新间隔（毫秒）
pub const PROGRESS_UPDATE_INTERVAL_MS: u64 = 50;
