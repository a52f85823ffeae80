mod app;
mod commands;
mod input;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .expect("failed to set Ctrl+C handler");

    let cli = Cli::parse();

    // symremap info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("symremap", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Rewrite {
            path,
            map,
            output,
            trusted,
            no_entry_point,
        } => commands::rewrite::run(
            path,
            map,
            output.as_deref(),
            commands::rewrite::RewriteFlags {
                trusted: *trusted,
                entry_point: !*no_entry_point,
            },
            &cli.global,
        ),
        Command::Documents { path, map } => {
            commands::documents::run(path, map.as_deref(), &cli.global)
        }
    }
}
