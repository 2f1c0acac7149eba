use std::{
    io::{self, BufRead, Write},
    process,
};

use clap::{error::ErrorKind, Parser};
use tabled::{settings::Style, Table};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Operation};
use error::Error;
use store::Store;
use target::Target;

mod cli;
mod confirm;
mod error;
mod export;
mod import;
mod schema;
mod store;
mod target;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            println!("{e}");
            process::exit(1)
        }
    };

    let result = run(
        args,
        io::stdin().lock(),
        &mut io::stdout(),
        |target: &Target, db| Ok(store::connect(target, db)?),
    );
    if let Err(e) = result {
        println!("{e}");
        process::exit(1)
    }
}

/// Runs one export or import. `input` feeds the confirmation prompt, `out` gets
/// every operator-facing line, and `open` connects to one database of the target.
fn run<S: Store>(
    args: Cli,
    input: impl BufRead,
    out: &mut impl Write,
    mut open: impl FnMut(&Target, u32) -> Result<S, Error>,
) -> Result<(), Error> {
    match args.operation()? {
        Operation::Export {
            file,
            pattern,
            redis,
        } => {
            let target = Target::parse(&redis);
            writeln!(
                out,
                "Exporting data from redis ({target}) to data-file ({})",
                file.display()
            )?;
            if !confirm::confirm(input, &mut *out)? {
                writeln!(out, "Aborting...")?;
                return Ok(());
            }

            let report = export::export(
                |db| open(&target, db),
                &target,
                &file,
                &pattern,
                &mut *out,
            )?;

            writeln!(out, "\n{}", Table::new(&report).with(Style::markdown()))?;
            let keys: usize = report.iter().map(|db| db.keys).sum();
            if target.is_multi() {
                writeln!(
                    out,
                    "\nExport done, {} databases exported ({keys} keys)",
                    report.len()
                )?;
            } else {
                writeln!(out, "\nExport done, {keys} keys exported")?;
            }
        }
        Operation::Import { file, redis } => {
            let target = Target::parse(&redis);
            if target.is_multi() {
                return Err(Error::MultiDatabaseTarget(target.databases));
            }
            writeln!(
                out,
                "Importing data from data-file ({}) to redis ({target})",
                file.display()
            )?;
            if !confirm::confirm(input, &mut *out)? {
                writeln!(out, "Aborting...")?;
                return Ok(());
            }

            let count = import::import(|db| open(&target, db), &target, &file, &mut *out)?;

            writeln!(out, "\nImport done, {count} keys imported")?;
        }
    }
    Ok(())
}
