//! GPU memory polling loop

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use tokio::time::Instant;
use tracing::info;

use super::query::{format_entry, GpuSource};
use super::shutdown::ShutdownToken;
use crate::config::MonitorConfig;
use crate::Result;

/// Samples between progress lines when a time budget is set.
const PROGRESS_EVERY: u64 = 10;

/// Runtime settings of a [`GpuMonitor`].
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    /// Time between samples.
    pub interval: Duration,
    /// Time budget; `None` runs until shutdown.
    pub duration: Option<Duration>,
    /// Log file entries are appended to.
    pub log_file: PathBuf,
    /// Also print every entry to stdout.
    pub echo: bool,
}

impl From<&MonitorConfig> for MonitorSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            interval: config.interval(),
            duration: config.duration(),
            log_file: config.log_file.clone(),
            echo: true,
        }
    }
}

/// Why a monitor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The time budget was used up.
    DurationElapsed,
    /// The shutdown token was cancelled.
    Shutdown,
}

/// Outcome of a monitoring session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSummary {
    /// Number of entries logged.
    pub samples: u64,
    /// Wall time spent.
    pub elapsed: Duration,
    /// What ended the session.
    pub reason: StopReason,
}

/// Periodically appends device memory usage to a log file.
#[derive(Debug)]
pub struct GpuMonitor<S> {
    source: S,
    settings: MonitorSettings,
}

impl<S: GpuSource> GpuMonitor<S> {
    /// Create a monitor over `source`.
    #[must_use]
    pub const fn new(source: S, settings: MonitorSettings) -> Self {
        Self { source, settings }
    }

    /// Get the monitor settings.
    #[must_use]
    pub const fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Run until the time budget is spent or `shutdown` is cancelled.
    ///
    /// The header is appended first and the footer last; the footer is
    /// written exactly once whichever way the loop ends.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be written.
    pub async fn run(&self, shutdown: &ShutdownToken) -> Result<MonitorSummary> {
        let log = self.settings.log_file.as_path();
        append(log, &self.header())?;

        let outcome = self.poll(log, shutdown).await;

        append(log, &footer())?;
        outcome
    }

    async fn poll(&self, log: &Path, shutdown: &ShutdownToken) -> Result<MonitorSummary> {
        let start = Instant::now();
        let end = self.settings.duration.and_then(|d| start.checked_add(d));
        let mut samples = 0u64;

        let reason = loop {
            if shutdown.is_cancelled() {
                break StopReason::Shutdown;
            }

            let outcome = tokio::select! {
                outcome = self.source.query() => outcome,
                () = shutdown.cancelled() => break StopReason::Shutdown,
            };
            let entry = format_entry(&timestamp(), &outcome);
            append(log, &entry)?;
            if self.settings.echo {
                println!("{entry}");
            }
            samples += 1;

            if let Some(end) = end {
                let now = Instant::now();
                if now >= end {
                    info!(
                        elapsed_hours = (now - start).as_secs_f64() / 3600.0,
                        samples,
                        "duration limit reached"
                    );
                    break StopReason::DurationElapsed;
                }
                if samples % PROGRESS_EVERY == 0 {
                    info!(
                        elapsed_hours = (now - start).as_secs_f64() / 3600.0,
                        remaining_hours = (end - now).as_secs_f64() / 3600.0,
                        "progress"
                    );
                }
            }

            tokio::select! {
                () = tokio::time::sleep(self.settings.interval) => {}
                () = shutdown.cancelled() => break StopReason::Shutdown,
            }
        };

        info!(samples, ?reason, "stopping GPU monitoring");
        Ok(MonitorSummary {
            samples,
            elapsed: start.elapsed(),
            reason,
        })
    }

    fn header(&self) -> String {
        let rule = "#".repeat(80);
        let mut header = format!(
            "\n{rule}\n# GPU Monitoring Started: {}\n# Interval: {} seconds\n",
            timestamp(),
            self.settings.interval.as_secs_f64()
        );
        if let Some(duration) = self.settings.duration {
            header.push_str(&format!(
                "# Duration: {} hours\n",
                duration.as_secs_f64() / 3600.0
            ));
        }
        header.push_str(&rule);
        header.push('\n');
        header
    }
}

fn footer() -> String {
    let rule = "#".repeat(80);
    format!("\n{rule}\n# GPU Monitoring Stopped: {}\n{rule}\n\n", timestamp())
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct FixedSource(&'static str);

    impl GpuSource for FixedSource {
        async fn query(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct MissingSource;

    impl GpuSource for MissingSource {
        async fn query(&self) -> Result<String> {
            Err(Error::GpuQuery(
                "nvidia-smi not found. Is NVIDIA driver installed?".to_string(),
            ))
        }
    }

    struct HungSource;

    impl GpuSource for HungSource {
        async fn query(&self) -> Result<String> {
            std::future::pending().await
        }
    }

    fn settings(dir: &tempfile::TempDir, interval_ms: u64, duration_ms: Option<u64>) -> MonitorSettings {
        MonitorSettings {
            interval: Duration::from_millis(interval_ms),
            duration: duration_ms.map(Duration::from_millis),
            log_file: dir.path().join("gpu.log"),
            echo: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_duration_budget_sample_count() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = GpuMonitor::new(
            FixedSource("0, GPU, 100, 1000, 5, 40"),
            settings(&dir, 20, Some(100)),
        );

        let summary = monitor.run(&ShutdownToken::new()).await.unwrap();

        assert_eq!(summary.reason, StopReason::DurationElapsed);
        assert!(summary.samples.abs_diff(5) <= 1, "samples = {}", summary.samples);

        let log = std::fs::read_to_string(dir.path().join("gpu.log")).unwrap();
        assert_eq!(log.matches("GPU Monitoring Started").count(), 1);
        assert_eq!(log.matches("GPU Monitoring Stopped").count(), 1);
        assert_eq!(log.matches("GPU 0 (GPU):").count() as u64, summary.samples);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_writes_footer_once() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = GpuMonitor::new(MissingSource, settings(&dir, 20, None));
        let token = ShutdownToken::new();

        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                token.cancel();
            })
        };

        let summary = monitor.run(&token).await.unwrap();
        canceller.await.unwrap();

        assert_eq!(summary.reason, StopReason::Shutdown);
        assert_eq!(summary.samples, 3);

        let log = std::fs::read_to_string(dir.path().join("gpu.log")).unwrap();
        assert_eq!(log.matches("GPU Monitoring Stopped").count(), 1);
        assert_eq!(log.matches("nvidia-smi not found").count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_hung_query() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = GpuMonitor::new(HungSource, settings(&dir, 20, None));
        let token = ShutdownToken::new();

        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                token.cancel();
            })
        };

        let summary = tokio::time::timeout(Duration::from_secs(60), monitor.run(&token))
            .await
            .expect("monitor stops on shutdown")
            .unwrap();
        canceller.await.unwrap();

        assert_eq!(summary.reason, StopReason::Shutdown);
        assert_eq!(summary.samples, 0);

        let log = std::fs::read_to_string(dir.path().join("gpu.log")).unwrap();
        assert_eq!(log.matches("GPU Monitoring Started").count(), 1);
        assert_eq!(log.matches("GPU Monitoring Stopped").count(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = GpuMonitor::new(FixedSource(""), settings(&dir, 1000, None));
        let token = ShutdownToken::new();
        token.cancel();

        let summary = monitor.run(&token).await.unwrap();
        assert_eq!(summary.samples, 0);

        let log = std::fs::read_to_string(dir.path().join("gpu.log")).unwrap();
        assert!(log.contains("# Interval: 1 seconds"));
        assert_eq!(log.matches("GPU Monitoring Stopped").count(), 1);
    }
}
