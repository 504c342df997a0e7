//! GPU memory monitor
//!
//! Polls a [`GpuSource`] at a fixed interval and appends one entry per sample
//! to a log file. The loop ends when its time budget runs out or when a
//! [`ShutdownToken`] is cancelled (SIGINT/SIGTERM via
//! [`spawn_signal_listener`]); both paths finish with the same footer.
//!
//! ```rust,no_run
//! use runscope::config::MonitorConfig;
//! use runscope::monitor::{spawn_signal_listener, GpuMonitor, NvidiaSmi, ShutdownToken};
//!
//! # async fn example() -> runscope::Result<()> {
//! let token = ShutdownToken::new();
//! spawn_signal_listener(token.clone());
//!
//! let monitor = GpuMonitor::new(NvidiaSmi::new(), (&MonitorConfig::default()).into());
//! let summary = monitor.run(&token).await?;
//! println!("{} samples", summary.samples);
//! # Ok(())
//! # }
//! ```

mod poller;
mod query;
mod shutdown;

pub use poller::{GpuMonitor, MonitorSettings, MonitorSummary, StopReason};
pub use query::{format_entry, parse_query_output, GpuSample, GpuSource, NvidiaSmi, QUERY_FIELDS};
pub use shutdown::{spawn_signal_listener, ShutdownToken};
