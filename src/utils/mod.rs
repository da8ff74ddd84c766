//! Utility functions for gwtree

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Once;
use serde::{Serialize, Deserialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use crate::Result;

static TRACING: Once = Once::new();

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`
///
/// Defaults to `info` when `RUST_LOG` is unset. Only the first call has an
/// effect, and an already installed global subscriber is left in place.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_filter(env_filter),
            )
            .try_init();
    });
}

/// Save object to JSON file
pub fn save_json<T: Serialize, P: AsRef<Path>>(obj: &T, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, obj)?;
    writer.flush()?;
    Ok(())
}

/// Load object from JSON file
pub fn load_json<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Timing utilities
pub mod timing {
    use std::time::Instant;

    /// Logs its lifetime at `info` level when dropped
    pub struct Timer {
        start: Instant,
        name: String,
    }

    impl Timer {
        /// Start new timer
        pub fn new(name: &str) -> Self {
            Timer {
                start: Instant::now(),
                name: name.to_string(),
            }
        }

        /// Get elapsed seconds
        pub fn elapsed(&self) -> f64 {
            self.start.elapsed().as_secs_f64()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            tracing::info!(timer = %self.name, seconds = self.elapsed(), "elapsed");
        }
    }
}
