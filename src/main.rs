use clap::Parser;
use debinsight::config::{
    Config, DEFAULT_JOBS, DEFAULT_TIMEOUT_SECS, DisplayOptions, TraversalOptions,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// debinsight collects package information by examining the dependencies
/// and reverse dependencies of packages installed on Debian (or Ubuntu and
/// derivative) systems. By default it prints the current state of a package
/// and all files the package installs.
///
/// TARGET can be either a package name or a file on the local system.
///
/// Examples:
///   debinsight openssl            # start with the installed openssl package
///   debinsight /usr/bin/openssl   # start with the package owning /usr/bin/openssl
#[derive(Parser, Debug)]
#[command(name = "debinsight", author, about, disable_version_flag = true)]
struct Cli {
    /// Package names or files to inspect
    #[arg(value_name = "TARGET")]
    targets: Vec<String>,

    /// Turn off color output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    /// Turn off output for dependencies
    #[arg(long)]
    no_depend: bool,

    /// Turn off output for reverse dependencies
    #[arg(long)]
    no_rdepend: bool,

    /// Turn off list of files
    #[arg(long)]
    no_files: bool,

    /// Follow the dependency graph (use with caution)
    #[arg(long)]
    follow_depend: bool,

    /// Follow the reverse dependency graph (use with caution)
    #[arg(long)]
    follow_rdepend: bool,

    /// Do not list reverse dependencies that are not installed
    #[arg(long)]
    drop_not_installed: bool,

    /// Dump the collected information as JSON into a file
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Maximum number of packages examined at the same time
    #[arg(long, value_name = "N", default_value_t = DEFAULT_JOBS)]
    jobs: usize,

    /// Seconds to wait for each dpkg-query/apt-cache call
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Show version and exit
    #[arg(short = 'v', long)]
    version: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            targets: self.targets,
            no_color: self.no_color,
            traversal: TraversalOptions {
                follow_depend: self.follow_depend,
                follow_rdepend: self.follow_rdepend,
                jobs: self.jobs,
            },
            display: DisplayOptions {
                no_depend: self.no_depend,
                no_rdepend: self.no_rdepend,
                no_files: self.no_files,
                drop_not_installed: self.drop_not_installed,
            },
            json: self.json,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// `--help` exits cleanly; every usage error exits with 1.
fn usage_exit_status(e: &clap::Error) -> u8 {
    if e.use_stderr() { 1 } else { 0 }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            return ExitCode::from(usage_exit_status(&e));
        }
    };

    if cli.version {
        println!("debinsight V{}", debinsight::VERSION);
        return ExitCode::SUCCESS;
    }

    if cli.targets.is_empty() {
        eprintln!("error: This tool needs at least one TARGET to operate.");
        eprintln!("\nFor more information, try '--help'.");
        return ExitCode::FAILURE;
    }

    let config = cli.into_config();
    match debinsight::app::run(&debinsight::runtime::RealRuntime, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
