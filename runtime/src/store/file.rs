//! File-backed store formats.
//!
//! Both formats are rewritten in full on every save: the new content goes to
//! a sibling `.tmp` file which is then renamed over the target.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Entries, StoreBackend};
use crate::error::{StoreError, StoreResult};
use crate::types::FaqResult;

/// `{"<url>": [{"question": .., "answer": ..}, ..], ..}`
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StoreBackend for JsonFileBackend {
    fn load(&self) -> StoreResult<Entries> {
        let Some(content) = read_if_exists(&self.path)? else {
            return Ok(Entries::new());
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, entries: &Entries) -> StoreResult<()> {
        write_atomic(&self.path, &serde_json::to_vec_pretty(entries)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Serialize, Deserialize)]
struct LineRecord {
    url: String,
    faqs: FaqResult,
}

/// One `{"url": .., "faqs": [..]}` record per line.
pub struct JsonLinesBackend {
    path: PathBuf,
}

impl JsonLinesBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StoreBackend for JsonLinesBackend {
    fn load(&self) -> StoreResult<Entries> {
        let mut entries = Entries::new();
        let Some(content) = read_if_exists(&self.path)? else {
            return Ok(entries);
        };
        for (i, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: LineRecord = serde_json::from_str(line)
                .map_err(|source| StoreError::Line { line: i + 1, source })?;
            entries.entry(record.url).or_insert(record.faqs);
        }
        Ok(entries)
    }

    fn save(&self, entries: &Entries) -> StoreResult<()> {
        let mut out = Vec::new();
        for (url, faqs) in entries {
            serde_json::to_writer(
                &mut out,
                &LineRecord {
                    url: url.clone(),
                    faqs: faqs.clone(),
                },
            )?;
            out.push(b'\n');
        }
        write_atomic(&self.path, &out)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn read_if_exists(path: &Path) -> StoreResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
