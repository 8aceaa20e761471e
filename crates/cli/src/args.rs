#![forbid(unsafe_code)]

use clap::{Args, Parser, Subcommand};
use de_core::{ModePatch, RecordId, StepPatch};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dataeditor", version, about = "Edit the Modes and Steps tables of a device database.")]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "DATAEDITOR_DB", default_value = "database.db")]
    pub db: PathBuf,

    /// Wait for Enter after every notification.
    #[arg(long, global = true, env = "DATAEDITOR_CONFIRM")]
    pub confirm: bool,

    /// Log store writes and registry decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the schema if the database has none.
    Init,
    /// Work with the Modes table.
    #[command(subcommand)]
    Modes(ModeCommand),
    /// Work with the Steps table.
    #[command(subcommand)]
    Steps(StepCommand),
    /// Register a user. The password is read from stdin.
    Signup { name: String },
    /// Check credentials. The password is read from stdin.
    Login { name: String },
}

#[derive(Subcommand, Debug)]
pub enum ModeCommand {
    /// Change fields of one mode.
    Set {
        id: RecordId,
        #[command(flatten)]
        fields: ModeFields,
    },
    #[command(flatten)]
    Rows(RowCommand),
}

#[derive(Subcommand, Debug)]
pub enum StepCommand {
    /// Change fields of one step.
    Set {
        id: RecordId,
        #[command(flatten)]
        fields: StepFields,
    },
    #[command(flatten)]
    Rows(RowCommand),
}

/// Commands shared by both tables.
#[derive(Subcommand, Debug)]
pub enum RowCommand {
    /// Print every record in id order.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Append a blank record.
    Add,
    Delete { id: RecordId },
    /// Write the selected records to stdout as tab-separated rows.
    Copy {
        #[arg(required = true)]
        ids: Vec<RecordId>,
    },
    /// Read tab-separated rows from stdin and merge them in.
    Paste {
        /// Row index to start overwriting at; appends when omitted.
        #[arg(long)]
        at: Option<usize>,
    },
}

#[derive(Args, Debug)]
pub struct ModeFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub max_bottle_number: Option<i32>,
    #[arg(long)]
    pub max_used_tips: Option<i32>,
}

impl From<ModeFields> for ModePatch {
    fn from(fields: ModeFields) -> Self {
        ModePatch {
            name: fields.name,
            max_bottle_number: fields.max_bottle_number,
            max_used_tips: fields.max_used_tips,
        }
    }
}

#[derive(Args, Debug)]
pub struct StepFields {
    #[arg(long)]
    pub mode_id: Option<RecordId>,
    #[arg(long)]
    pub timer: Option<i32>,
    #[arg(long)]
    pub destination: Option<String>,
    #[arg(long)]
    pub speed: Option<i32>,
    #[arg(long = "type")]
    pub step_type: Option<String>,
    #[arg(long)]
    pub volume: Option<i32>,
}

impl From<StepFields> for StepPatch {
    fn from(fields: StepFields) -> Self {
        StepPatch {
            mode_id: fields.mode_id,
            timer: fields.timer,
            destination: fields.destination,
            speed: fields.speed,
            step_type: fields.step_type,
            volume: fields.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn step_fields_become_a_patch() {
        let cli = Cli::try_parse_from([
            "dataeditor",
            "--db",
            "x.db",
            "steps",
            "set",
            "4",
            "--mode-id",
            "2",
            "--type",
            "Dispense",
        ])
        .expect("parse");
        let Command::Steps(StepCommand::Set { id, fields }) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(id, 4);
        let patch = StepPatch::from(fields);
        assert_eq!(patch.mode_id, Some(2));
        assert_eq!(patch.step_type.as_deref(), Some("Dispense"));
        assert_eq!(patch.timer, None);
    }

    #[test]
    fn copy_requires_ids() {
        assert!(Cli::try_parse_from(["dataeditor", "modes", "copy"]).is_err());
    }
}
