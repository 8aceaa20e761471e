#![forbid(unsafe_code)]

//! Tab-separated row codec shared by the copy and paste paths.
//!
//! Mode rows are `ID\tName\tMaxBottleNumber\tMaxUsedTips`; step rows are
//! `ID\tModeId\tTimer\tDestination\tSpeed\tType\tVolume`. The formatter and the
//! parsers use the same column order so a copied block pastes back unchanged.

use crate::ids::RecordId;
use crate::model::{Mode, Step};

pub const MODE_COLUMNS: usize = 4;
pub const STEP_COLUMNS: usize = 7;

/// A parsed mode row. The source identifier must be an integer but is otherwise
/// informational: pasted rows never keep the identifier they were copied with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeRow {
    pub source_id: RecordId,
    pub name: String,
    pub max_bottle_number: i32,
    pub max_used_tips: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRow {
    pub source_id: RecordId,
    pub mode_id: RecordId,
    pub timer: i32,
    pub destination: String,
    pub speed: i32,
    pub step_type: String,
    pub volume: i32,
}

/// Splits pasted text into rows. Both `\r` and `\n` separate rows and empty rows
/// are dropped, so CRLF and LF input behave the same.
pub fn split_rows(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n']).filter(|row| !row.is_empty())
}

/// Parses a mode row, or `None` when the row must be skipped.
pub fn parse_mode_row(row: &str) -> Option<ModeRow> {
    let columns = row.split('\t').collect::<Vec<_>>();
    if columns.len() < MODE_COLUMNS {
        return None;
    }
    Some(ModeRow {
        source_id: RecordId::from(parse_int(columns[0])?),
        name: columns[1].to_string(),
        max_bottle_number: parse_int(columns[2])?,
        max_used_tips: parse_int(columns[3])?,
    })
}

/// Parses a step row, or `None` when the row must be skipped.
pub fn parse_step_row(row: &str) -> Option<StepRow> {
    let columns = row.split('\t').collect::<Vec<_>>();
    if columns.len() < STEP_COLUMNS {
        return None;
    }
    Some(StepRow {
        source_id: RecordId::from(parse_int(columns[0])?),
        mode_id: RecordId::from(parse_int(columns[1])?),
        timer: parse_int(columns[2])?,
        destination: columns[3].to_string(),
        speed: parse_int(columns[4])?,
        step_type: columns[5].to_string(),
        volume: parse_int(columns[6])?,
    })
}

pub fn format_mode(mode: &Mode) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        mode.id, mode.name, mode.max_bottle_number, mode.max_used_tips
    )
}

pub fn format_step(step: &Step) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        step.id,
        step.mode_id,
        step.timer,
        step.destination,
        step.speed,
        step.step_type,
        step.volume
    )
}

/// Removes double quotes, which spreadsheet tools wrap around cells on paste.
pub fn strip_quotes(text: &str) -> String {
    text.replace('"', "")
}

// 32-bit, optional sign, surrounding whitespace allowed.
fn parse_int(cell: &str) -> Option<i32> {
    cell.trim().parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_rows_handles_crlf_and_blank_lines() {
        let rows = split_rows("a\r\nb\n\nc\r").collect::<Vec<_>>();
        assert_eq!(rows, vec!["a", "b", "c"]);
    }

    #[test]
    fn mode_row_requires_numeric_limits() {
        let row = parse_mode_row("5\tA\t10\t2").expect("valid row");
        assert_eq!(row.source_id, 5);
        assert_eq!(row.name, "A");
        assert_eq!(row.max_bottle_number, 10);
        assert_eq!(row.max_used_tips, 2);

        assert!(parse_mode_row("5\tA\tten\t2").is_none());
        assert!(parse_mode_row("5\tA\t10").is_none());
        assert!(parse_mode_row("5\tA\t10\t99999999999").is_none());
    }

    #[test]
    fn mode_row_requires_numeric_identifier() {
        let row = parse_mode_row(" 0 \t\t 3 \t-4").expect("valid row");
        assert_eq!(row.source_id, 0);
        assert_eq!(row.name, "");
        assert_eq!(row.max_bottle_number, 3);
        assert_eq!(row.max_used_tips, -4);

        assert!(parse_mode_row("\tA\t3\t4").is_none());
        assert!(parse_mode_row("ID\tName\t3\t4").is_none());
    }

    #[test]
    fn step_row_requires_every_numeric_column() {
        let row = parse_step_row("7\t1\t30\track\t5\tfill\t250").expect("valid row");
        assert_eq!(row.source_id, 7);
        assert_eq!(row.mode_id, 1);
        assert_eq!(row.destination, "rack");
        assert_eq!(row.step_type, "fill");
        assert_eq!(row.volume, 250);

        assert!(parse_step_row("x\t1\t30\track\t5\tfill\t250").is_none());
        assert!(parse_step_row("7\t1\t30\track\tfast\tfill\t250").is_none());
        assert!(parse_step_row("7\t1\t30\track\t5\tfill").is_none());
    }

    #[test]
    fn extra_columns_are_ignored() {
        let row = parse_step_row("7\t1\t30\t\t5\t\t250\textra").expect("valid row");
        assert_eq!(row.destination, "");
        assert_eq!(row.step_type, "");
    }

    #[test]
    fn formatted_rows_parse_back() {
        let step = Step::new(3, 2, 15, "plate A", 8, "mix", 40);
        let row = parse_step_row(&format_step(&step)).expect("formatted row parses");
        assert_eq!(row.mode_id, 2);
        assert_eq!(row.timer, 15);
        assert_eq!(row.destination, "plate A");
        assert_eq!(row.step_type, "mix");

        let mode = Mode::new(9, "Rinse", 4, 1);
        assert_eq!(format_mode(&mode), "9\tRinse\t4\t1");
    }

    #[test]
    fn strip_quotes_removes_every_double_quote() {
        assert_eq!(strip_quotes("\"a\"\tb\"c"), "a\tbc");
    }
}
