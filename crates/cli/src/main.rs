mod app;
mod commands;
mod persistence;

use crate::app::{ClientApp, Flow};
use crate::commands::parse_command;
use log::{error, info};
use std::io::{self, BufRead, Write};
use taskdraw_core::RngState;
use taskdraw_data::{load_catalog, AppConfig};
use taskdraw_store::open_store;

const USAGE: &str = "\
Task card terminal client

Usage: taskdraw-cli [--config PATH] [--db PATH] [--cards PATH] [--seed N] [--state PATH] [COMMAND...]

With a COMMAND it runs that single command and exits, otherwise it reads
commands from stdin. Type `help` for the command list.
";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print!("{USAGE}");
        return;
    }
    if let Err(err) = run(&args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let (config, rest) = AppConfig::resolve(args)?;
    let cards = load_catalog(config.cards.as_deref())?;
    let store = open_store(config.database.as_deref(), cards)?;
    let rng = match config.seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_entropy(),
    };
    info!("draw seed {}", rng.seed());
    let mut app = ClientApp::new(store, rng, config.state_path())?;
    app.restore()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !rest.is_empty() {
        run_line(&mut app, &rest.join(" "), &mut out)?;
        return Ok(());
    }

    if let Some(profile) = app.session().active_profile().profile() {
        writeln!(out, "acting as {}", profile.display_name)?;
    } else {
        writeln!(out, "no active profile: `profile <name>` to save completions")?;
    }
    let stdin = io::stdin();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if run_line(&mut app, &line, &mut out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

fn run_line(app: &mut ClientApp, line: &str, out: &mut dyn Write) -> io::Result<Flow> {
    match parse_command(line) {
        Ok(Some(command)) => app.execute(command, out),
        Ok(None) => Ok(Flow::Continue),
        Err(message) => {
            writeln!(out, "{message}")?;
            Ok(Flow::Continue)
        }
    }
}
