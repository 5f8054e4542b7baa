//! demoqa-e2e CLI: run the DemoQA form tests and prepare Allure results
//!
//! ## Usage
//!
//! ```bash
//! demoqa-e2e run                              # Both scenarios, headless
//! demoqa-e2e run --headed -s text-box         # One scenario, visible browser
//! demoqa-e2e prepare-report --environment qa  # Before `allure generate`
//! demoqa-e2e credentials save --username u --password p
//! ```

use clap::Parser;
use demoqa_e2e::SuiteConfig;
use demoqa_e2e_cli::{
    check_credentials, finish_run, prepare_report, run_suite, save_credentials, suite_config, Cli,
    CliResult, Commands, CredentialsSubcommand,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = e.to_string();
            if message.starts_with("Error") {
                eprintln!("{message}");
            } else {
                eprintln!("Error: {message}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Run(args) => {
            let config = suite_config(SuiteConfig::from_env(), &args);
            let reporter = run_suite(&config, &args).await?;
            finish_run(&reporter, &config.report.results_dir)
        }
        Commands::PrepareReport(args) => {
            prepare_report(SuiteConfig::from_env().report, &args).map(drop)
        }
        Commands::Credentials(args) => match args.command {
            CredentialsSubcommand::Save {
                username,
                password,
                file,
            } => save_credentials(&username, &password, &file),
            CredentialsSubcommand::Check { file } => check_credentials(&file).map(drop),
        },
    }
}
