use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::fec::SyndromeTable;
use crate::sim::SweepReport;

#[derive(Serialize)]
pub struct SyndromeDump {
    pub polynomial: String,
    pub entries: Vec<SyndromeDumpEntry>,
}

#[derive(Serialize)]
pub struct SyndromeDumpEntry {
    pub syndrome: String,
    pub bit: u16,
}

impl From<&SyndromeTable> for SyndromeDump {
    fn from(table: &SyndromeTable) -> Self {
        Self {
            polynomial: format!("{:08X}", crate::fec::CRC31_POLYNOMIAL),
            entries: table
                .entries()
                .iter()
                .map(|e| SyndromeDumpEntry {
                    syndrome: format!("{:08X}", e.syndrome),
                    bit: e.bit,
                })
                .collect(),
        }
    }
}

/// Write any serializable value as pretty JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}

pub fn write_report(path: &Path, report: &SweepReport) -> std::io::Result<()> {
    write_json(path, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syndrome_dump_shape() {
        let table = SyndromeTable::new().unwrap();
        let dump = SyndromeDump::from(&table);
        assert_eq!(dump.polynomial, "C1E52417");
        assert_eq!(dump.entries.len(), table.len());

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["entries"][0]["syndrome"], "00000001");
        assert_eq!(json["entries"][0]["bit"], 543);
    }

    #[test]
    fn test_write_json() {
        let path = std::env::temp_dir().join(format!("crc31_dump_{}.json", std::process::id()));
        write_json(&path, &vec![1u32, 2, 3]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        let parsed: Vec<u32> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, vec![1, 2, 3]);
    }
}
