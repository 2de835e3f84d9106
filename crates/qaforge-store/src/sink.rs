//! Append-only JSONL output sink

use crate::StoreError;
use qaforge_domain::traits::RecordSink;
use qaforge_domain::ExtractionRecord;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const TAIL_SCAN_BLOCK: u64 = 8 * 1024;

/// JSONL file sink: one record per line, written and flushed per record
///
/// Each record is serialized into a single buffer and handed to the OS with
/// one `write_all`, so a process killed between records leaves only complete
/// lines behind. No deduplication happens here; every record carries its own
/// fresh id.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    file: File,
    fsync: bool,
    written: usize,
}

impl JsonlSink {
    /// Open `path` for appending, creating it and its parent directories
    ///
    /// An unterminated trailing line left by an interrupted earlier run is
    /// truncated away first.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            repair_tail(&path)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!("Opened output sink {}", path.display());

        Ok(Self {
            path,
            file,
            fsync: false,
            written: 0,
        })
    }

    /// Also `fsync` the file after every record
    pub fn with_fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this handle
    pub fn records_written(&self) -> usize {
        self.written
    }

    /// Append one record as a single line
    pub fn write_record(&mut self, record: &ExtractionRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        if self.fsync {
            self.file.sync_data()?;
        }

        self.written += 1;
        Ok(())
    }
}

impl RecordSink for JsonlSink {
    type Error = StoreError;

    fn append(&mut self, record: &ExtractionRecord) -> Result<(), StoreError> {
        self.write_record(record)
    }
}

/// Truncate a trailing partial line so the file ends on a newline
fn repair_tail(path: &Path) -> Result<(), StoreError> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(());
    }

    // Scan backwards for the last newline
    let mut end = len;
    let mut keep = 0;
    let mut block = vec![0u8; TAIL_SCAN_BLOCK as usize];
    while end > 0 {
        let start = end.saturating_sub(TAIL_SCAN_BLOCK);
        let size = (end - start) as usize;
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(&mut block[..size])?;
        if let Some(pos) = block[..size].iter().rposition(|&b| b == b'\n') {
            keep = start + pos as u64 + 1;
            break;
        }
        end = start;
    }

    warn!(
        "Output file {} ends with a partial line; truncating {} bytes",
        path.display(),
        len - keep
    );
    file.set_len(keep)?;
    file.sync_all()?;
    Ok(())
}
