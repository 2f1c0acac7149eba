use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;

/// Move string keys between a Redis instance and a JSON data-file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Export redis to file
    #[arg(long)]
    pub export: bool,

    /// Import file to redis
    #[arg(long)]
    pub import: bool,

    /// Path to data file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Key prefix to export
    #[arg(long)]
    pub pattern: Option<String>,

    /// Redis target: host:port[@db[,db...]]
    #[arg(long)]
    pub redis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Export {
        file: PathBuf,
        pattern: String,
        redis: String,
    },
    Import {
        file: PathBuf,
        redis: String,
    },
}

impl Cli {
    /// Checks the flag combination and picks the single operation to run.
    pub fn operation(self) -> Result<Operation, Error> {
        if self.export == self.import {
            return Err(Error::Usage(if self.export {
                "Need either export or import flag, not both".into()
            } else {
                "Need either export or import flag".into()
            }));
        }

        let Some(file) = self.file.filter(|f| !f.as_os_str().is_empty()) else {
            return Err(Error::Usage("Need data-file location".into()));
        };
        let Some(redis) = self.redis.filter(|r| !r.is_empty()) else {
            return Err(Error::Usage("Need redis url".into()));
        };

        if self.export {
            Ok(Operation::Export {
                file,
                pattern: self.pattern.unwrap_or_default(),
                redis,
            })
        } else {
            if self.pattern.is_some() {
                tracing::warn!("--pattern is ignored on import");
            }
            Ok(Operation::Import { file, redis })
        }
    }
}
