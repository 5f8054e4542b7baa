//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use demoqa_e2e::Scenario;
use std::path::PathBuf;

/// demoqa-e2e: browser tests for the DemoQA practice forms
#[derive(Parser, Debug)]
#[command(name = "demoqa-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scenarios in Chromium and write Allure results
    Run(RunArgs),

    /// Prepare the results directory for report generation
    PrepareReport(PrepareReportArgs),

    /// Store or check login credentials
    Credentials(CredentialsArgs),
}

/// Scenario selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioArg {
    /// Student Registration Form
    Registration,
    /// Text Box form
    TextBox,
}

impl From<ScenarioArg> for Scenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::Registration => Self::RegistrationForm,
            ScenarioArg::TextBox => Self::TextBox,
        }
    }
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Site root (overrides DEMOQA_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Directory for Allure result files
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Check every submitted field and report all mismatches
    #[arg(long)]
    pub collect_all: bool,

    /// Chromium binary (overrides CHROMIUM_PATH)
    #[arg(long)]
    pub chromium_path: Option<String>,

    /// Run only these scenarios (default: all)
    #[arg(short, long, value_enum)]
    pub scenario: Vec<ScenarioArg>,
}

impl RunArgs {
    /// Scenarios selected on the command line, all when none were named
    #[must_use]
    pub fn scenarios(&self) -> Vec<Scenario> {
        if self.scenario.is_empty() {
            Scenario::ALL.to_vec()
        } else {
            let mut picked: Vec<Scenario> = Vec::new();
            for s in self.scenario.iter().copied().map(Scenario::from) {
                if !picked.contains(&s) {
                    picked.push(s);
                }
            }
            picked
        }
    }
}

/// Arguments for the prepare-report command
#[derive(Parser, Debug)]
pub struct PrepareReportArgs {
    /// Results directory to prepare
    #[arg(long, default_value = "allure-results")]
    pub results_dir: PathBuf,

    /// Previous report whose history is carried over
    #[arg(long, default_value = "allure-report")]
    pub report_dir: PathBuf,

    /// Categories definition to copy
    #[arg(long, default_value = "report-utils/categories.json")]
    pub categories: PathBuf,

    /// Environment name written to environment.properties
    #[arg(long, env = "ENV")]
    pub environment: Option<String>,
}

/// Arguments for the credentials command
#[derive(Parser, Debug)]
pub struct CredentialsArgs {
    /// Credentials subcommand
    #[command(subcommand)]
    pub command: CredentialsSubcommand,
}

/// Credentials subcommands
#[derive(Subcommand, Debug)]
pub enum CredentialsSubcommand {
    /// Overwrite the credential file
    Save {
        /// Account user name
        #[arg(long)]
        username: String,
        /// Account password
        #[arg(long)]
        password: String,
        /// Credential file
        #[arg(long, default_value = ".env")]
        file: PathBuf,
    },
    /// Verify the credential file holds both keys
    Check {
        /// Credential file
        #[arg(long, default_value = ".env")]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::parse_from(["demoqa-e2e", "run"]);
            if let Commands::Run(args) = cli.command {
                assert!(!args.headed);
                assert!(!args.collect_all);
                assert_eq!(args.scenarios(), Scenario::ALL.to_vec());
            } else {
                panic!("expected Run command");
            }
        }

        #[test]
        fn test_parse_run_flags() {
            let cli = Cli::parse_from([
                "demoqa-e2e",
                "run",
                "--headed",
                "--collect-all",
                "--base-url",
                "http://localhost:3000",
                "-s",
                "text-box",
                "-s",
                "text-box",
            ]);
            if let Commands::Run(args) = cli.command {
                assert!(args.headed);
                assert!(args.collect_all);
                assert_eq!(args.base_url.as_deref(), Some("http://localhost:3000"));
                assert_eq!(args.scenarios(), vec![Scenario::TextBox]);
            } else {
                panic!("expected Run command");
            }
        }

        #[test]
        fn test_parse_prepare_report_defaults() {
            let cli = Cli::parse_from(["demoqa-e2e", "prepare-report"]);
            if let Commands::PrepareReport(args) = cli.command {
                assert_eq!(args.results_dir, PathBuf::from("allure-results"));
                assert_eq!(args.report_dir, PathBuf::from("allure-report"));
                assert_eq!(
                    args.categories,
                    PathBuf::from("report-utils/categories.json")
                );
            } else {
                panic!("expected PrepareReport command");
            }
        }

        #[test]
        fn test_parse_credentials_save() {
            let cli = Cli::parse_from([
                "demoqa-e2e",
                "credentials",
                "save",
                "--username",
                "maya",
                "--password",
                "s3cret",
            ]);
            match cli.command {
                Commands::Credentials(CredentialsArgs {
                    command: CredentialsSubcommand::Save { username, file, .. },
                }) => {
                    assert_eq!(username, "maya");
                    assert_eq!(file, PathBuf::from(".env"));
                }
                other => panic!("unexpected {other:?}"),
            }
        }

        #[test]
        fn test_save_requires_password() {
            assert!(
                Cli::try_parse_from(["demoqa-e2e", "credentials", "save", "--username", "u"])
                    .is_err()
            );
        }

        #[test]
        fn test_verbose_is_global() {
            let cli = Cli::parse_from(["demoqa-e2e", "prepare-report", "-vv"]);
            assert_eq!(cli.verbose, 2);
        }
    }
}
