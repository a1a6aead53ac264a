//! Report rendering module for tables and JSON artifacts.
//!
//! There are exactly two output media and they never change at runtime,
//! so the choice is a plain enum made once at startup and dispatched by
//! a single match. Table layout is written explicitly per record shape
//! via the `Tabular` trait; no runtime field inspection is involved, so
//! column order is checked at compile time.
use serde::Serialize;

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use crate::types::InventoryResult;

/// Output medium for a generated report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Output {
    /// An aligned, bordered table on stdout.
    Table,
    /// An indented JSON file in the working directory.
    Json,
}

/// Trait to represent a record which can be laid out as a table row.
///
/// Implementing this trait means that a slice of the record type can
/// be rendered by `table`. The `columns` output must line up with the
/// `HEADERS` labels, one cell per header.
pub trait Tabular {
    /// Column header labels for this record shape.
    const HEADERS: &'static [&'static str];

    /// Formats this record into one cell per column.
    fn columns(&self) -> Vec<String>;
}

/// Renders a record list to the selected output medium.
///
/// Table reports land on stdout; JSON reports land in `<service>.json`
/// inside the working directory. A failed file write is returned as an
/// error for the caller to surface, it never panics.
pub fn report<T>(records: &[T], service: &str, output: Output) -> InventoryResult<()>
where
    T: Tabular + Serialize,
{
    match output {
        Output::Table => {
            print!("{}", table(records));
            Ok(())
        }
        Output::Json => {
            let target = format!("{}.json", service);
            write_json(records, Path::new(&target))?;
            info!("Report saved to {}", target);
            Ok(())
        }
    }
}

/// Renders a record list as a bordered, left-aligned table.
pub fn table<T: Tabular>(records: &[T]) -> String {
    // buffer all rows up front so columns can be sized to fit
    let rows = records.iter().map(Tabular::columns).collect::<Vec<_>>();

    // seed the column widths from the header labels
    let mut widths = T::HEADERS
        .iter()
        .map(|header| header.len())
        .collect::<Vec<_>>();

    // then stretch each column to its widest cell
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            if cell.len() > widths[idx] {
                widths[idx] = cell.len();
            }
        }
    }

    // draw the horizontal border once, it's reused three times
    let mut border = String::from("+");
    for width in &widths {
        for _ in 0..width + 2 {
            border.push('-');
        }
        border.push('+');
    }

    let mut output = String::new();

    // border, header row, border
    output.push_str(&border);
    output.push('\n');
    draw_row(&mut output, &widths, T::HEADERS.iter().copied());
    output.push_str(&border);
    output.push('\n');

    // one line per record
    for row in &rows {
        draw_row(&mut output, &widths, row.iter().map(String::as_str));
    }

    // closing border
    output.push_str(&border);
    output.push('\n');
    output
}

/// Writes a record list as an indented JSON array to the target path.
pub fn write_json<T: Serialize>(records: &[T], target: &Path) -> InventoryResult<()> {
    let file = File::create(target)?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}

/// Draws a single padded table row into the output buffer.
fn draw_row<'a, I>(output: &mut String, widths: &[usize], cells: I)
where
    I: Iterator<Item = &'a str>,
{
    output.push('|');
    for (idx, cell) in cells.enumerate() {
        output.push(' ');
        output.push_str(cell);
        for _ in cell.len()..widths[idx] + 1 {
            output.push(' ');
        }
        output.push('|');
    }
    output.push('\n');
}

/// Formats an optional value, using an empty cell for `None`.
pub fn cell_opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Formats a list of values as a comma separated cell.
pub fn cell_list(values: &[String]) -> String {
    values.join(", ")
}

/// Formats a key/value mapping as a comma separated `k: v` cell.
///
/// The input is a `BTreeMap` rather than a `HashMap` so the rendered
/// order is stable across runs.
pub fn cell_map(values: &BTreeMap<String, String>) -> String {
    values
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}
