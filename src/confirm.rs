use std::io::{self, BufRead, Write};

/// Asks `Continue? [y/N]` and blocks for one line. Only `y` (any case) confirms.
pub fn confirm(mut input: impl BufRead, mut output: impl Write) -> io::Result<bool> {
    write!(output, "Continue? [y/N] ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    writeln!(output)?;

    Ok(line.trim().eq_ignore_ascii_case("y"))
}
