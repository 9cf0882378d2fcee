// src/output.rs
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Write `key,value` rows preceded by a UTC timestamp row
pub fn write_summary_to_csv<P: AsRef<Path>>(
    filename: P,
    summary_data: &[(&str, String)],
) -> io::Result<()> {
    let mut file = File::create(filename)?;
    write_summary(&mut file, summary_data)
}

pub fn write_summary<W: Write>(out: &mut W, summary_data: &[(&str, String)]) -> io::Result<()> {
    writeln!(
        out,
        "generated_at,{}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    for (key, value) in summary_data {
        writeln!(out, "{},{}", key, value)?;
    }
    Ok(())
}

/// Row-major `n x n` matrix as CSV lines
pub fn write_matrix<W: Write>(out: &mut W, matrix: &[f64], n: usize) -> io::Result<()> {
    for row in matrix.chunks(n.max(1)) {
        let line: Vec<String> = row.iter().map(|v| format!("{:.8}", v)).collect();
        writeln!(out, "{}", line.join(","))?;
    }
    Ok(())
}
