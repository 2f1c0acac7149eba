use redis::{Commands, Connection, RedisResult};

use crate::target::Target;

/// The handful of key/value commands the mover needs.
pub trait Store {
    /// Key names matching a glob `pattern`.
    fn keys(&mut self, pattern: &str) -> RedisResult<Vec<String>>;

    /// The string value at `key`, `None` when it is missing.
    fn get(&mut self, key: &str) -> RedisResult<Option<String>>;

    /// Stores `value` at `key` with no expiry.
    fn set(&mut self, key: &str, value: &str) -> RedisResult<()>;
}

impl Store for Connection {
    fn keys(&mut self, pattern: &str) -> RedisResult<Vec<String>> {
        Commands::keys(self, pattern)
    }

    fn get(&mut self, key: &str) -> RedisResult<Option<String>> {
        Commands::get(self, key)
    }

    fn set(&mut self, key: &str, value: &str) -> RedisResult<()> {
        Commands::set(self, key, value)
    }
}

/// Opens a connection already switched to logical database `db`.
pub fn connect(target: &Target, db: u32) -> RedisResult<Connection> {
    tracing::debug!(%target, db, "connecting");
    redis::Client::open(target.connection_info(db)?)?.get_connection()
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use std::collections::BTreeMap;

    use redis::{ErrorKind, RedisError, RedisResult};

    use super::Store;

    /// In-process stand-in for one logical database. Only understands
    /// `prefix*` patterns, which is all the exporter sends.
    #[derive(Debug, Default, Clone)]
    pub struct MemoryStore {
        pub entries: BTreeMap<String, String>,
        /// Fail every command after this many have run.
        pub fail_after: Option<usize>,
        pub calls: usize,
    }

    impl MemoryStore {
        pub fn with<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
            MemoryStore {
                entries: entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                ..Default::default()
            }
        }

        fn tick(&mut self) -> RedisResult<()> {
            self.calls += 1;
            match self.fail_after {
                Some(limit) if self.calls > limit => Err(RedisError::from((
                    ErrorKind::IoError,
                    "connection reset",
                ))),
                _ => Ok(()),
            }
        }
    }

    impl Store for MemoryStore {
        fn keys(&mut self, pattern: &str) -> RedisResult<Vec<String>> {
            self.tick()?;
            let prefix = pattern.strip_suffix('*').unwrap_or(pattern);
            Ok(self
                .entries
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }

        fn get(&mut self, key: &str) -> RedisResult<Option<String>> {
            self.tick()?;
            Ok(self.entries.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> RedisResult<()> {
            self.tick()?;
            self.entries.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}
