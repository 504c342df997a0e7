//! GPU query source and `nvidia-smi` CSV parsing

use std::fmt::Write as _;
use std::future::Future;
use std::io::ErrorKind;

use tokio::process::Command;

use crate::{Error, Result};

/// Fields requested from `nvidia-smi`, in output column order.
pub const QUERY_FIELDS: &str =
    "index,name,memory.used,memory.total,utilization.gpu,temperature.gpu";

/// Source of raw per-device CSV lines.
///
/// Each line holds: index, name, memory used (MB), memory total (MB),
/// utilization (%), temperature (C).
pub trait GpuSource: Send + Sync {
    /// Query current device state.
    fn query(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Queries devices by running `nvidia-smi`.
#[derive(Debug, Clone)]
pub struct NvidiaSmi {
    program: String,
}

impl NvidiaSmi {
    /// Use `nvidia-smi` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("nvidia-smi")
    }

    /// Use a specific executable.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NvidiaSmi {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuSource for NvidiaSmi {
    async fn query(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(format!("--query-gpu={QUERY_FIELDS}"))
            .arg("--format=csv,noheader,nounits")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::GpuQuery(format!(
                    "{} not found. Is NVIDIA driver installed?",
                    self.program
                )),
                _ => Error::GpuQuery(format!("Error querying {}: {e}", self.program)),
            })?;

        if !output.status.success() {
            return Err(Error::GpuQuery(format!(
                "Error querying {}: {} {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// One device line of query output.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuSample {
    /// Device index.
    pub index: String,
    /// Device name.
    pub name: String,
    /// Memory in use, MB.
    pub memory_used_mb: f64,
    /// Total memory, MB.
    pub memory_total_mb: f64,
    /// Utilization, percent (as reported).
    pub utilization: String,
    /// Temperature, Celsius (as reported).
    pub temperature: String,
}

impl GpuSample {
    /// Parse one CSV line. Lines with fewer than six fields or non-numeric
    /// memory columns yield `None`.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 6 {
            return None;
        }
        Some(Self {
            index: parts[0].to_string(),
            name: parts[1].to_string(),
            memory_used_mb: parts[2].parse().ok()?,
            memory_total_mb: parts[3].parse().ok()?,
            utilization: parts[4].to_string(),
            temperature: parts[5].to_string(),
        })
    }

    /// Memory in use as a percentage of total.
    #[must_use]
    pub fn memory_pct(&self) -> f64 {
        if self.memory_total_mb > 0.0 {
            self.memory_used_mb / self.memory_total_mb * 100.0
        } else {
            0.0
        }
    }
}

/// Parse every device line of a query result.
#[must_use]
pub fn parse_query_output(output: &str) -> Vec<GpuSample> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(GpuSample::parse_line)
        .collect()
}

/// Render one log entry for a query outcome.
#[must_use]
pub fn format_entry(timestamp: &str, outcome: &Result<String>) -> String {
    let rule = "=".repeat(80);
    let mut entry = format!("\n{rule}\n[{timestamp}]\n{rule}\n");

    let samples = match outcome {
        Ok(output) => parse_query_output(output),
        Err(Error::GpuQuery(message)) => {
            let _ = writeln!(entry, "{message}");
            return entry;
        }
        Err(e) => {
            let _ = writeln!(entry, "{e}");
            return entry;
        }
    };

    if samples.is_empty() {
        entry.push_str("No GPU information available\n");
        return entry;
    }

    for gpu in samples {
        let _ = writeln!(entry, "GPU {} ({}):", gpu.index, gpu.name);
        let _ = writeln!(
            entry,
            "  Memory: {} MB / {} MB ({:.1}%)",
            gpu.memory_used_mb,
            gpu.memory_total_mb,
            gpu.memory_pct()
        );
        let _ = writeln!(entry, "  GPU Util: {}%", gpu.utilization);
        let _ = writeln!(entry, "  Temp: {}°C", gpu.temperature);
    }
    entry
}
