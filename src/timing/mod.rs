use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::Result;

const RULE_WIDTH: usize = 50;

pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Runs `f` and returns its output together with the wall-clock time it took.
pub fn time<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let timer = Timer::start();
    let out = f();
    (out, timer.elapsed())
}

/// Plain-text log of how long each pipeline step took.
#[derive(Debug, Clone)]
pub struct RuntimeLog {
    path: PathBuf,
}

impl RuntimeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncates the log and writes the header banner.
    pub fn initialize(&self) -> Result<()> {
        self.ensure_parent()?;
        let mut file = fs::File::create(&self.path)?;
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(file, "{}", rule)?;
        writeln!(file, "DIMENSION REDUCTION VISUALIZER - RUNTIME LOG")?;
        writeln!(file, "{}", rule)?;
        writeln!(
            file,
            "Generated: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        Ok(())
    }

    /// Appends one entry, creating the file if needed.
    pub fn record(&self, operation: &str, elapsed: Duration) -> Result<()> {
        self.ensure_parent()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let seconds = elapsed.as_secs_f64();
        writeln!(file, "\n{}", operation)?;
        writeln!(file, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(file, "Time: {:.4} seconds", seconds)?;
        writeln!(file, "Time: {:.4} minutes", seconds / 60.0)?;

        log::info!("{} runtime: {:.4} seconds", operation, seconds);
        Ok(())
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
