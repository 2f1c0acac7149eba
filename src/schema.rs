use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::{BufWriter, ErrorKind, Write},
    path::Path,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One database's worth of exported keys.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Dump {
    pub dump_start: DateTime<Utc>,

    pub dump_end: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<u32>,

    pub data: BTreeMap<String, String>,
}

/// What a data-file holds: a single [`Dump`], or one per database index when
/// several databases were exported together.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum DumpFile {
    Single(Dump),
    Multi(BTreeMap<u32, Dump>),
}

impl DumpFile {
    /// Picks the single-document shape for exactly one dump.
    pub fn from_dumps(mut dumps: Vec<Dump>) -> Self {
        if dumps.len() == 1 {
            return DumpFile::Single(dumps.remove(0));
        }
        DumpFile::Multi(
            dumps
                .into_iter()
                .map(|dump| (dump.db.unwrap_or_default(), dump))
                .collect(),
        )
    }

    /// Reads either shape. A top-level `dump_start` marks a single document, so
    /// errors inside it come back with the offending field and position.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let shape: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
        if shape.is_empty() {
            return Err(Error::Json(serde::de::Error::custom(
                "empty data-file, expected dump_start, dump_end and data",
            )));
        }
        if shape.contains_key("dump_start") {
            Ok(DumpFile::Single(serde_json::from_str(text)?))
        } else {
            Ok(DumpFile::Multi(serde_json::from_str(text)?))
        }
    }
}

pub fn load_file(path: &Path) -> Result<DumpFile, Error> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::DumpMissing(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    DumpFile::parse(&text)
}

/// Writes the data-file, refusing to replace anything already at `path`.
pub fn write_file(path: &Path, contents: &DumpFile) -> Result<(), Error> {
    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(Error::DestinationExists(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    fill_file(path, file, contents)
}

/// Serializes `contents` into the freshly created `path` through `writer`. On any
/// failure the half-written file is removed so a later export can retry.
fn fill_file(path: &Path, writer: impl Write, contents: &DumpFile) -> Result<(), Error> {
    let mut writer = BufWriter::new(writer);
    let written = serde_json::to_writer_pretty(&mut writer, contents)
        .map_err(Error::from)
        .and_then(|()| writer.flush().map_err(Error::from));
    drop(writer);

    if written.is_err() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial data-file");
        }
    }
    written
}

#[cfg(test)]
pub fn mock_dump(db: u32) -> Dump {
    let start = DateTime::parse_from_rfc3339("2023-05-04T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    Dump {
        dump_start: start,
        dump_end: start + chrono::Duration::seconds(2),
        db: Some(db),
        data: [
            ("user:1", "wendy"),
            ("user:2", "{\"name\":\"appleseed\"}"),
            ("session:9f2c", ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    }
}
