use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use crc31_fec::fec::SyndromeTable;
use crc31_fec::utils::dump::{SyndromeDump, write_json};
use crc31_fec::utils::logging::init_logging;

/// Print the sorted single-bit syndrome table
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Order by bit position instead of by syndrome
    #[arg(short, long)]
    by_bit: bool,

    /// Write the table as JSON instead of printing it
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();
    let table = SyndromeTable::new()?;

    if let Some(path) = &cli.json {
        write_json(path, &SyndromeDump::from(&table))?;
        return Ok(());
    }

    if cli.by_bit {
        for bit in 0..table.len() {
            println!("{:4}: {:08X}", bit, table.syndrome(bit));
        }
    } else {
        for (idx, entry) in table.entries().iter().enumerate() {
            println!("{:4}: {:08X}:{:4}", idx, entry.syndrome, entry.bit);
        }
    }
    Ok(())
}
