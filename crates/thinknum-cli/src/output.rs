use std::io::{self, Write};

use serde::Serialize;

use crate::error::CliError;

pub fn render<T>(value: &T, pretty: bool) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let stdout = io::stdout();
    write_json(&mut stdout.lock(), value, pretty)
}

pub fn write_json<W, T>(writer: &mut W, value: &T, pretty: bool) -> Result<(), CliError>
where
    W: Write,
    T: Serialize + ?Sized,
{
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(writer, "{payload}")?;
    Ok(())
}
