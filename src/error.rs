use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Store(#[from] redis::RedisError),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{} already exists. Aborting...", .0.display())]
    DestinationExists(PathBuf),
    #[error("{} does not exist", .0.display())]
    DumpMissing(PathBuf),
    #[error("Conflicting key: {0}\nAborting...")]
    DuplicateKey(String),
    #[error("Key {0} disappeared before it could be read.\nAborting...")]
    KeyVanished(String),
    #[error("Key {0} already exists.\nAborting...")]
    KeyExists(String),
    #[error("{} holds databases {1:?}; import one database at a time", .0.display())]
    MultiDatabaseDump(PathBuf, Vec<u32>),
    #[error("Import needs exactly one target database, got {0:?}")]
    MultiDatabaseTarget(Vec<u32>),
}
