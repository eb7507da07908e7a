//! Result sink: persists alive proxies as `address,port,country,organization` lines

use crate::proxy::models::AliveProxy;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Output file for alive proxies
#[derive(Debug, Clone)]
pub struct ResultSink {
    path: PathBuf,
}

impl ResultSink {
    /// Create or truncate the output file.
    ///
    /// Called once at startup so a run without survivors leaves an empty
    /// file behind instead of the previous run's results.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        File::create(&path)?;
        info!(path = %path.display(), "output file cleared");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `records` in the given order and sync them to disk.
    ///
    /// Only failing to open the file is an error. A line that fails to
    /// write is logged and skipped, and a failed sync is logged. Returns the
    /// number of lines written.
    pub fn write(&self, records: &[AliveProxy]) -> io::Result<usize> {
        let mut file = OpenOptions::new().append(true).create(true).open(&self.path)?;

        let mut written = 0;
        for record in records {
            // One unbuffered write per record, so an error belongs to it
            let line = format!("{}\n", record.to_record_line());
            match file.write_all(line.as_bytes()) {
                Ok(()) => written += 1,
                Err(e) => warn!(record = %record, error = %e, "failed to write record"),
            }
        }

        if let Err(e) = file.sync_all() {
            warn!(path = %self.path.display(), error = %e, "failed to sync output file");
        }

        Ok(written)
    }
}
