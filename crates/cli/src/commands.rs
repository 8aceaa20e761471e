#![forbid(unsafe_code)]

use crate::args::{Cli, Command, ModeCommand, RowCommand, StepCommand};
use crate::ports::{StdioClipboard, TerminalNotifier};
use anyhow::{Context, Result, bail};
use de_core::auth::{Authenticator, LoginOutcome, PASSWORD_RULES};
use de_core::{ModePatch, StepPatch, tsv};
use de_storage::SqliteStore;
use de_sync::{AddOutcome, EditorSession, ImportOutcome, ImportReport, PatchOutcome, RemoveOutcome};
use std::io::{self, BufRead};
use std::path::Path;
use std::process::ExitCode;

type Session = EditorSession<SqliteStore, TerminalNotifier, StdioClipboard>;

const MODE_HEADER: &str = "ID\tName\tMaxBottleNumber\tMaxUsedTips";
const STEP_HEADER: &str = "ID\tModeId\tTimer\tDestination\tSpeed\tType\tVolume";

pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Init => init(&cli.db),
        Command::Signup { name } => signup(&open_store(&cli.db)?, &name),
        Command::Login { name } => login(&open_store(&cli.db)?, &name),
        Command::Modes(command) => modes(&mut open_session(&cli.db, cli.confirm)?, command),
        Command::Steps(command) => steps(&mut open_session(&cli.db, cli.confirm)?, command),
    }
}

fn open_store(db: &Path) -> Result<SqliteStore> {
    SqliteStore::open(db).with_context(|| format!("failed to open database {}", db.display()))
}

fn open_session(db: &Path, confirm: bool) -> Result<Session> {
    let store = open_store(db)?;
    let session = EditorSession::open(store, TerminalNotifier::new(confirm), StdioClipboard)
        .context("failed to load records")?;
    Ok(session)
}

fn init(db: &Path) -> Result<ExitCode> {
    let existed = db.exists();
    let store = open_store(db)?;
    if existed {
        println!("{}: schema present", store.db_path().display());
    } else {
        println!("{}: created", store.db_path().display());
    }
    Ok(ExitCode::SUCCESS)
}

fn modes(session: &mut Session, command: ModeCommand) -> Result<ExitCode> {
    match command {
        ModeCommand::Set { id, fields } => patched(session.patch_mode(id, &ModePatch::from(fields))?),
        ModeCommand::Rows(RowCommand::List { json }) => {
            let records = session.modes().records();
            if json {
                println!("{}", serde_json::to_string_pretty(records)?);
            } else {
                println!("{MODE_HEADER}");
                records.iter().for_each(|mode| println!("{}", tsv::format_mode(mode)));
            }
            Ok(ExitCode::SUCCESS)
        }
        ModeCommand::Rows(RowCommand::Add) => {
            println!("{}", session.add_mode()?);
            Ok(ExitCode::SUCCESS)
        }
        ModeCommand::Rows(RowCommand::Delete { id }) => removed(session.delete_mode(id)?),
        ModeCommand::Rows(RowCommand::Copy { ids }) => {
            if !session.copy_modes(&ids) {
                bail!("no mode matches the given ids");
            }
            Ok(ExitCode::SUCCESS)
        }
        ModeCommand::Rows(RowCommand::Paste { at }) => {
            match session.paste_modes(at)? {
                Some(report) => summarize(&report),
                None => eprintln!("nothing to paste"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn steps(session: &mut Session, command: StepCommand) -> Result<ExitCode> {
    match command {
        StepCommand::Set { id, fields } => patched(session.patch_step(id, &StepPatch::from(fields))?),
        StepCommand::Rows(RowCommand::List { json }) => {
            let records = session.steps().records();
            if json {
                println!("{}", serde_json::to_string_pretty(records)?);
            } else {
                println!("{STEP_HEADER}");
                records.iter().for_each(|step| println!("{}", tsv::format_step(step)));
            }
            Ok(ExitCode::SUCCESS)
        }
        StepCommand::Rows(RowCommand::Add) => match session.add_step()? {
            AddOutcome::Added(id) => {
                println!("{id}");
                Ok(ExitCode::SUCCESS)
            }
            AddOutcome::Rejected(_) => Ok(ExitCode::FAILURE),
        },
        StepCommand::Rows(RowCommand::Delete { id }) => {
            session.delete_step(id)?;
            Ok(ExitCode::SUCCESS)
        }
        StepCommand::Rows(RowCommand::Copy { ids }) => {
            if !session.copy_steps(&ids) {
                bail!("no step matches the given ids");
            }
            Ok(ExitCode::SUCCESS)
        }
        StepCommand::Rows(RowCommand::Paste { at }) => match session.paste_steps(at)? {
            Some(ImportOutcome::Completed(report)) => {
                summarize(&report);
                Ok(ExitCode::SUCCESS)
            }
            Some(ImportOutcome::Blocked(_)) => Ok(ExitCode::FAILURE),
            None => {
                eprintln!("nothing to paste");
                Ok(ExitCode::SUCCESS)
            }
        },
    }
}

// Rejections have already reached the operator through the notifier.
fn patched(outcome: PatchOutcome) -> Result<ExitCode> {
    Ok(match outcome {
        PatchOutcome::Applied => ExitCode::SUCCESS,
        PatchOutcome::Unchanged => {
            eprintln!("no change");
            ExitCode::SUCCESS
        }
        PatchOutcome::Rejected(_) => ExitCode::FAILURE,
    })
}

fn removed(outcome: RemoveOutcome) -> Result<ExitCode> {
    Ok(match outcome {
        RemoveOutcome::Removed => ExitCode::SUCCESS,
        RemoveOutcome::Rejected(_) => ExitCode::FAILURE,
    })
}

fn summarize(report: &ImportReport) {
    eprintln!(
        "{} overwritten, {} appended, {} repaired, {} skipped",
        report.overwritten.len(),
        report.appended.len(),
        report.repairs.len(),
        report.skipped
    );
}

fn signup(store: &SqliteStore, name: &str) -> Result<ExitCode> {
    let password = read_password()?;
    if name.is_empty() || password.is_empty() {
        eprintln!("{}", LoginOutcome::InvalidInput.message());
        return Ok(ExitCode::FAILURE);
    }
    if !store.is_valid_password(&password) {
        eprintln!("{PASSWORD_RULES}");
        return Ok(ExitCode::FAILURE);
    }
    if !store.create_user(name, &password)? {
        eprintln!("User {name} already exists.");
        return Ok(ExitCode::FAILURE);
    }
    println!("registered {name}");
    Ok(ExitCode::SUCCESS)
}

fn login(store: &SqliteStore, name: &str) -> Result<ExitCode> {
    let password = read_password()?;
    let outcome = store.validate(name, &password)?;
    match outcome {
        LoginOutcome::Ok => {
            println!("{}", outcome.message());
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            eprintln!("{}", outcome.message());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn read_password() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
