mod api;
mod server;

use anyhow::bail;
use log::error;
use taskdraw_data::{load_catalog, AppConfig};
use taskdraw_store::open_store;

const USAGE: &str = "\
Task card REST server

Usage: taskdraw-web [--config PATH] [--bind ADDR] [--workers N] [--db PATH] [--cards PATH]

Without --db everything is kept in memory and lost on exit.
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
    if !rest.is_empty() {
        bail!("unexpected arguments: {}", rest.join(" "));
    }
    let cards = load_catalog(config.cards.as_deref())?;
    let store = open_store(config.database.as_deref(), cards)?;
    server::serve(&config, store)
}
