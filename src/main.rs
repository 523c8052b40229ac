use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;

use delink::api::errors::exit_code_for;
use delink::api::summary::render_text;
use delink::constants::{EXIT_FATAL, EXIT_OK, EXIT_USAGE};
use delink::logging::{FactsEmitter, JsonlFileSink, JsonlSink, StderrAudit};
use delink::types::{RunConfig, RunReport};
use delink::Delinker;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { EXIT_USAGE } else { EXIT_OK });
        }
    };
    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let facts: Box<dyn FactsEmitter> = match &cli.facts {
        Some(path) => Box::new(
            JsonlFileSink::open(path)
                .with_context(|| format!("cannot open facts file {}", path.display()))?,
        ),
        None => Box::new(JsonlSink),
    };
    let config = RunConfig::new(&cli.directory, cli.dry_run, cli.yes);
    let api = Delinker::new(facts, StderrAudit::new(cli.verbose), config);

    let (report, code) = match api.run() {
        Ok(report) => {
            let code = report.exit_code();
            (report, code)
        }
        Err(e) => (
            RunReport::aborted(&cli.directory, cli.dry_run, e.to_string()),
            exit_code_for(e.error_id()),
        ),
    };
    print_report(cli.json, &report)?;
    Ok(code)
}

fn print_report(json: bool, report: &RunReport) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render_text(report));
    }
    Ok(())
}
