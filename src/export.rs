use std::{collections::BTreeMap, io::Write, path::Path};

use chrono::Utc;
use tabled::Tabled;
use tracing::{debug, info};

use crate::{
    error::Error,
    schema::{write_file, Dump, DumpFile},
    store::Store,
    target::Target,
};

/// Per-database line of the export report.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct Exported {
    pub db: u32,
    pub keys: usize,
    pub bytes: usize,
}

/// Reads every key starting with `pattern` out of one database.
pub fn export_database<S: Store>(
    store: &mut S,
    db: u32,
    pattern: &str,
    progress: &mut impl Write,
) -> Result<Dump, Error> {
    let keys = store.keys(&format!("{pattern}*"))?;
    debug!(db, count = keys.len(), "listed keys");

    let dump_start = Utc::now();
    let mut data = BTreeMap::new();
    let mut bytes = 0;
    for key in keys {
        if data.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }
        let Some(value) = store.get(&key)? else {
            return Err(Error::KeyVanished(key));
        };
        writeln!(progress, "Exporting key: {key} (len: {})", value.len())?;
        bytes += value.len();
        data.insert(key, value);
    }
    let dump_end = Utc::now();
    info!(db, keys = data.len(), bytes, "database exported");

    Ok(Dump {
        dump_start,
        dump_end,
        db: Some(db),
        data,
    })
}

/// Dumps every database of `target` into a new data-file at `file`.
///
/// Nothing is written until all databases have been read, so a failure part way
/// leaves no file behind.
pub fn export<S: Store>(
    mut open: impl FnMut(u32) -> Result<S, Error>,
    target: &Target,
    file: &Path,
    pattern: &str,
    progress: &mut impl Write,
) -> Result<Vec<Exported>, Error> {
    if file.exists() {
        return Err(Error::DestinationExists(file.to_path_buf()));
    }

    let mut dumps = Vec::with_capacity(target.databases.len());
    for &db in &target.databases {
        let mut store = open(db)?;
        dumps.push(export_database(&mut store, db, pattern, &mut *progress)?);
    }

    let report = dumps
        .iter()
        .map(|dump| Exported {
            db: dump.db.unwrap_or_default(),
            keys: dump.data.len(),
            bytes: dump.data.values().map(String::len).sum(),
        })
        .collect();

    write_file(file, &DumpFile::from_dumps(dumps))?;
    Ok(report)
}
