mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    //  Logging (stderr; stdout carries reports)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();
    let cfg = config::AppConfig::load_or_default()?;

    match args.command {
        cli::Commands::Set(set_args) => cli::set::execute(&args.global, &cfg, set_args),
        cli::Commands::Apply(apply_args) => cli::apply::execute(&args.global, &cfg, apply_args),
        cli::Commands::Report(report_args) => cli::report::execute(&cfg, report_args),
        cli::Commands::Config(c) => cli::config_cmd::execute(c),
    }
}
