use std::{io::Write, path::Path};

use tracing::{info, warn};

use crate::{
    error::Error,
    schema::{load_file, Dump, DumpFile},
    store::Store,
    target::Target,
};

/// Writes every pair of `dump` into `store`, stopping at the first key that already
/// holds a non-empty value. Pairs written before that point stay written.
pub fn import_dump<S: Store>(
    store: &mut S,
    dump: &Dump,
    progress: &mut impl Write,
) -> Result<usize, Error> {
    for (key, value) in &dump.data {
        if store.get(key)?.is_some_and(|current| !current.is_empty()) {
            return Err(Error::KeyExists(key.clone()));
        }
        writeln!(progress, "Importing key: {key} (len: {})", value.len())?;
        store.set(key, value)?;
    }
    Ok(dump.data.len())
}

/// Loads the data-file at `file` and imports it into the single database of `target`.
pub fn import<S: Store>(
    open: impl FnOnce(u32) -> Result<S, Error>,
    target: &Target,
    file: &Path,
    progress: &mut impl Write,
) -> Result<usize, Error> {
    let [db] = target.databases[..] else {
        return Err(Error::MultiDatabaseTarget(target.databases.clone()));
    };

    let dump = match load_file(file)? {
        DumpFile::Single(dump) => dump,
        DumpFile::Multi(dumps) => {
            return Err(Error::MultiDatabaseDump(
                file.to_path_buf(),
                dumps.into_keys().collect(),
            ))
        }
    };
    if let Some(source) = dump.db.filter(|&source| source != db) {
        warn!(source, db, "importing into a different database than the dump came from");
    }

    let mut store = open(db)?;
    let count = import_dump(&mut store, &dump, progress)?;
    info!(db, count, "import finished");
    Ok(count)
}
