//! demoqa-e2e CLI library
//!
//! Command definitions and handlers behind the `demoqa-e2e` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod error;
mod runner;

pub use commands::{
    Cli, Commands, CredentialsArgs, CredentialsSubcommand, PrepareReportArgs, RunArgs,
    ScenarioArg,
};
pub use error::{CliError, CliResult};
pub use runner::{
    check_credentials, finish_run, prepare_report, report_config, run_suite, save_credentials,
    suite_config,
};
