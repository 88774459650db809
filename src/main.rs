use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use crc31_fec::fec::{Signature, SyndromeTable};
use crc31_fec::sim::{LevelReport, NoiseLadder, Sweep, SweepConfig};
use crc31_fec::ui::progress::{ProgressManager, templates};
use crc31_fec::ui::{print_banner, print_report};
use crc31_fec::utils::consts::*;
use crc31_fec::utils::dump::write_report;
use crc31_fec::utils::logging::init_logging;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    sweep: SweepArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed the CRC into a hex signature (136 hex digits)
    Embed { hex: String },
    /// Check a hex signature and correct a single bit error
    Check { hex: String },
}

/// Noise sweep, the default action
#[derive(Args)]
struct SweepArgs {
    /// Trials per noise level
    #[arg(short, long, default_value_t = DEFAULT_TRIALS_PER_LEVEL)]
    trials: usize,

    /// Bipolar signal amplitude
    #[arg(short, long, default_value_t = DEFAULT_AMPLITUDE)]
    amplitude: f32,

    /// First noise standard deviation
    #[arg(long, default_value_t = DEFAULT_NOISE_START)]
    noise_start: f64,

    /// Stop before this noise standard deviation
    #[arg(long, default_value_t = DEFAULT_NOISE_STOP)]
    noise_stop: f64,

    /// Noise step between levels (dB)
    #[arg(long, default_value_t = DEFAULT_NOISE_STEP_DB)]
    step_db: f64,

    /// Explicit SNR levels in dB, comma separated; replaces the noise ladder
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    snr: Vec<f64>,

    /// Seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker threads
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Write the report as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl SweepArgs {
    fn to_config(&self) -> SweepConfig {
        let ladder = if self.snr.is_empty() {
            NoiseLadder::Geometric {
                start: self.noise_start,
                stop: self.noise_stop,
                step_db: self.step_db,
            }
        } else {
            NoiseLadder::SnrDb(self.snr.clone())
        };
        SweepConfig {
            amplitude: self.amplitude,
            ladder,
            trials_per_level: self.trials,
            seed: self.seed,
            threads: self.threads,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Embed { hex }) => embed(&hex),
        Some(Commands::Check { hex }) => check(&hex),
        None => sweep(&cli.sweep),
    }
}

fn embed(hex: &str) -> Result<(), Box<dyn Error>> {
    let mut sign = Signature::from_hex(hex)?;
    let crc = sign.embed_crc();
    println!("{} CRC={:08X}", sign, crc);
    Ok(())
}

fn check(hex: &str) -> Result<(), Box<dyn Error>> {
    let table = SyndromeTable::new()?;
    let mut sign = Signature::from_hex(hex)?;
    let syndrome = sign.check_crc();
    if syndrome == 0 {
        println!("OK");
        return Ok(());
    }

    match table.correct(&mut sign, syndrome) {
        Some(bit) => {
            println!("Syndrome {:08X}: fixed bit {}", syndrome, bit);
            println!("{}", sign);
        }
        None => {
            println!("Syndrome {:08X}: uncorrectable", syndrome);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn sweep(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    print_banner();
    let table = SyndromeTable::new()?;
    let sweep = Sweep::new(args.to_config(), &table)?;

    let stop = Arc::new(AtomicBool::new(false));
    let s = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        s.store(true, Ordering::SeqCst);
    }) {
        warn!("Error setting Ctrl-C handler: {}", e);
    }

    let report = if args.no_progress {
        sweep.run_with(&stop, &|_: u64| {}, &mut |_: &LevelReport| {})
    } else {
        let progress_manager = ProgressManager::new();
        progress_manager.create_bar(
            "sweep",
            sweep.total_trials(),
            templates::SWEEP,
            "",
        )?;
        let report = sweep.run_with(
            &stop,
            &|n: u64| {
                let _ = progress_manager.inc("sweep", n);
            },
            &mut |level: &LevelReport| {
                let _ = progress_manager
                    .set_message("sweep", &format!("{:4.1}dB done", level.snr_db));
            },
        );
        progress_manager.finish_all();
        report
    };
    print_report(&report);

    if let Some(path) = &args.json {
        write_report(path, &report)?;
    }
    info!("Sweep done: {} levels, seed {}", report.levels.len(), report.seed);
    Ok(())
}
