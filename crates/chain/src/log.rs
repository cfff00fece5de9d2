// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Append-only chain files.
//!
//! One JSON object per line, in append order. A file is never rewritten,
//! truncated or reordered.
//!
//! # Durability
//! - Each record goes out as one `write_all` of the full line, newline
//!   included, followed by `sync_data`.
//! - Readers only accept newline-terminated lines. A trailing line without
//!   one is an append still in flight (or torn by a crash) and is skipped.
//! - Writers refuse to append behind such a line, since the new record would
//!   be glued onto the fragment.

use crate::error::{ChainError, Result};
use cyberspace_kernel::event::Event;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

fn encode_line(event: &Event) -> Result<Vec<u8>> {
    let mut line = serde_json::to_vec(event)?;
    line.push(b'\n');
    Ok(line)
}

/// Creates `path` holding only `genesis`. Fails with `AlreadyExists` if the
/// file is present, which makes creation race-free across processes.
pub fn create_log(path: &Path, genesis: &Event) -> Result<()> {
    let line = encode_line(genesis)?;
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(&line)?;
    file.sync_all()?;
    Ok(())
}

/// Appends one record. Only returns after the write is durable.
pub fn append_record(path: &Path, event: &Event) -> Result<()> {
    let line = encode_line(event)?;
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(&line)?;
    file.sync_data()?;
    Ok(())
}

/// Streaming reader over a chain file. Yields events in file order.
pub struct ChainLogReader {
    label: String,
    path: PathBuf,
    reader: BufReader<File>,
    line: u64,
    buf: String,
    done: bool,
    torn: Option<u64>,
}

impl ChainLogReader {
    pub fn open(label: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self {
            label: label.to_string(),
            path,
            reader: BufReader::new(file),
            line: 0,
            buf: String::new(),
            done: false,
            torn: None,
        })
    }

    /// Restarts from the first record.
    pub fn rewind(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line = 0;
        self.done = false;
        self.torn = None;
        Ok(())
    }

    /// 1-based line number of the record most recently returned.
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Line number of an unterminated tail, once the reader has reached it.
    pub fn torn_line(&self) -> Option<u64> {
        self.torn
    }
}

impl Iterator for ChainLogReader {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {
                    self.line += 1;
                    if !self.buf.ends_with('\n') {
                        warn!(path = %self.path.display(), line = self.line, "skipping unterminated trailing record");
                        self.torn = Some(self.line);
                        self.done = true;
                        return None;
                    }
                    let record = self.buf.trim();
                    if record.is_empty() {
                        continue;
                    }
                    let parsed = serde_json::from_str::<Event>(record).map_err(|e| ChainError::BrokenChain {
                        label: self.label.clone(),
                        line: self.line,
                        fault: format!("unreadable record: {e}"),
                    });
                    if parsed.is_err() {
                        self.done = true;
                    }
                    return Some(parsed);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
