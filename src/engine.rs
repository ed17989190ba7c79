use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Command, GenerateArgs, GroupArgs, TuningArgs};
use crate::config::GrouperConfig;
use crate::grouper::{ImageGrouper, POLL_INTERVAL};
use crate::ledger::LedgerFile;
use crate::orchestrator::BatchOrchestrator;
use crate::reporter::Reporter;
use crate::session::Session;

/// Files and output mode shared by every command.
pub struct Environment {
    pub session: PathBuf,
    pub ledger: PathBuf,
    pub json: bool,
}

impl From<&Cli> for Environment {
    fn from(cli: &Cli) -> Self {
        Self {
            session: cli.session.clone(),
            ledger: cli.ledger.clone(),
            json: cli.json,
        }
    }
}

/// Run the parsed command line and return the process exit code.
pub fn execute(cli: &Cli) -> Result<i32> {
    let env = Environment::from(cli);
    match &cli.command {
        Command::Group(args) => group(&env, args),
        Command::Undo(args) => undo(&env, args),
        Command::Generate(args) => generate(&env, args),
    }
}

pub fn group(env: &Environment, args: &GroupArgs) -> Result<i32> {
    let session = Session::load(&env.session).merged(Session {
        pool: args.pool.clone().unwrap_or_default(),
        horizontal: args.horizontal.clone().unwrap_or_default(),
        vertical: args.vertical.clone().unwrap_or_default(),
    });
    let code = with_ledger(env, args.tuning.config(), |grouper| {
        grouper.start_group(&session.pool, &session.horizontal, &session.vertical)
    })?;
    save_session(&session, &env.session);
    Ok(code)
}

pub fn undo(env: &Environment, args: &TuningArgs) -> Result<i32> {
    let session = Session::load(&env.session);
    let code = with_ledger(env, args.config(), |grouper| grouper.start_undo())?;
    save_session(&session, &env.session);
    Ok(code)
}

pub fn generate(env: &Environment, args: &GenerateArgs) -> Result<i32> {
    let session = Session::load(&env.session).merged(Session {
        pool: args.pool.clone().unwrap_or_default(),
        ..Session::default()
    });
    let mut config = GrouperConfig::default();
    config.test_images.count = args.count;

    let grouper = ImageGrouper::new(config);
    grouper.start_generate_test_images(&session.pool)?;
    let code = drive(&grouper, env.json);
    save_session(&session, &env.session);
    Ok(code)
}

/// Load the persisted ledger, run one operation, and write back whatever
/// is still outstanding.
fn with_ledger(
    env: &Environment,
    config: GrouperConfig,
    start: impl FnOnce(&ImageGrouper) -> Result<(), crate::error::GrouperError>,
) -> Result<i32> {
    let ledger_file = LedgerFile::new(&env.ledger);
    let ledger = ledger_file
        .load()
        .with_context(|| format!("failed to load undo ledger {}", env.ledger.display()))?;

    let grouper = ImageGrouper::from_orchestrator(BatchOrchestrator::new(config).with_ledger(ledger));
    start(&grouper)?;
    let code = drive(&grouper, env.json);

    ledger_file
        .save(&grouper.ledger())
        .with_context(|| format!("failed to save undo ledger {}", env.ledger.display()))?;
    Ok(code)
}

/// Poll the running operation to completion, rendering each event.
fn drive(grouper: &ImageGrouper, json: bool) -> i32 {
    let mut reporter = Reporter::new(json);
    grouper.wait(POLL_INTERVAL, |event| reporter.record(event));
    reporter.exit_code()
}

fn save_session(session: &Session, path: &Path) {
    if let Err(e) = session.save(path) {
        tracing::warn!(error = %e, "error saving session");
    }
}
