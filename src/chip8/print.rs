//! The pretty print implementation for the [`ChipSet`](super::ChipSet).
//!
//! This is the read-only introspection surface used by step-through
//! tooling and by the trace flag, it has no effect on emulation.

use std::fmt::{self, Write};

use num_traits::Unsigned;
use once_cell::sync::Lazy;

use super::ChipSet;
use crate::definitions::memory::opcodes;
use crate::opcode::Opcode;

/// how many cells a single dump row holds
const HEX_PRINT_STEP: usize = 8;

const INDENT: &str = "\t\t";

/// The row used in place of at least two all-zero opcode rows.
static ZERO_FILLER: Lazy<String> = Lazy::new(|| {
    let cell = format_cell(0u16);
    // the filler replaces the six cells between the first and the last one
    let width = (cell.len() + 1) * (HEX_PRINT_STEP - 2) - 1;
    let dots = "...";
    let pad = " ".repeat((width - dots.len()) / 2);
    format!("{} {}{}{} {}", cell, pad, dots, pad, cell)
});

/// will format a single unsigned value as a fixed width hex cell
fn format_cell<T>(data: T) -> String
where
    T: fmt::UpperHex + Unsigned + Copy,
{
    format!("{:#06X}", data)
}

/// will format the `from - to :` prefix of a dump row
fn format_range(line: &mut String, from: usize, to: usize) -> fmt::Result {
    write!(line, "{}{:#06X} - {:#06X} :", INDENT, from, to)
}

/// will pretty print a flat array of unsigned values, eight cells a row
fn hex_rows<T>(data: &[T]) -> Result<String, fmt::Error>
where
    T: fmt::UpperHex + Unsigned + Copy,
{
    let mut res = String::new();
    for from in (0..data.len()).step_by(HEX_PRINT_STEP) {
        let to = (from + HEX_PRINT_STEP - 1).min(data.len() - 1);
        format_range(&mut res, from, to)?;
        for entry in &data[from..=to] {
            res.push(' ');
            res.push_str(&format_cell(*entry));
        }
        res.push('\n');
    }
    res.truncate(res.trim_end().len());
    Ok(res)
}

/// will pretty print the keypad snapshot
fn bool_rows(data: &[bool]) -> Result<String, fmt::Error> {
    // padded to the hex cell width so the columns line up
    let cell = |val: bool| if val { "true  " } else { "false " };

    let mut res = String::new();
    for from in (0..data.len()).step_by(HEX_PRINT_STEP) {
        let to = (from + HEX_PRINT_STEP - 1).min(data.len() - 1);
        format_range(&mut res, from, to)?;
        for value in &data[from..=to] {
            res.push(' ');
            res.push_str(cell(*value));
        }
        res.truncate(res.trim_end().len());
        res.push('\n');
    }
    res.truncate(res.trim_end().len());
    Ok(res)
}

/// Will pretty print the whole ram as opcode rows, collapsing runs of
/// all-zero rows into a single filler row.
fn opcode_rows(memory: &[u8]) -> Result<String, fmt::Error> {
    struct Row {
        from: usize,
        to: usize,
        cells: Vec<Opcode>,
        only_null: bool,
    }

    let row_bytes = HEX_PRINT_STEP * opcodes::SIZE;
    let mut rows: Vec<Row> = Vec::with_capacity(memory.len() / row_bytes);

    for from in (0..memory.len()).step_by(row_bytes) {
        let to = (from + row_bytes - 1).min(memory.len() - 1);

        let cells: Vec<Opcode> = memory[from..=to]
            .chunks_exact(opcodes::SIZE)
            .map(|pair| Opcode::from_be_bytes([pair[0], pair[1]]))
            .collect();
        let only_null = cells.iter().all(|cell| *cell == 0);

        // merge neighbouring all-zero rows into one range
        if only_null {
            if let Some(last) = rows.last_mut() {
                if last.only_null {
                    last.to = to;
                    continue;
                }
            }
        }
        rows.push(Row {
            from,
            to,
            cells,
            only_null,
        });
    }

    let mut res = String::new();
    for row in rows {
        format_range(&mut res, row.from, row.to)?;
        res.push(' ');
        if row.only_null {
            res.push_str(&ZERO_FILLER);
        } else {
            for cell in row.cells {
                res.push_str(&format_cell(cell));
                res.push(' ');
            }
            res.truncate(res.trim_end().len());
        }
        res.push('\n');
    }
    res.truncate(res.trim_end().len());
    Ok(res)
}

impl fmt::Display for ChipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mem = opcode_rows(&self.memory)?;
        let reg = hex_rows(&self.registers)?;
        let sta = hex_rows(&self.stack)?;
        let key = bool_rows(self.keyboard.keys())?;

        write!(
            f,
            "Chipset {{\n\
                \tProgram Name :\n{ind}{}\n\
                \tOpcode :\n{ind}{}\n\
                \tProgram Counter :\n{ind}{}\n\
                \tIndex Register :\n{ind}{}\n\
                \tMemory :\n{}\n\
                \tKeypad :\n{}\n\
                \tStack :\n{}\n\
                \tRegister :\n{}\n\
            }}",
            self.name,
            format_cell(self.opcode),
            format_cell(self.program_counter),
            format_cell(self.index_register),
            mem,
            key,
            sta,
            reg,
            ind = INDENT,
        )
    }
}
