//! Command-line argument parsing and merging with the config file.
//!
//! This module defines the command-line interface structure using the `clap`
//! crate, and resolves the options of a session from the arguments and the
//! optional config file.

use clap::Parser;
use ssm_edit_core::config::Config;
use ssm_edit_core::entry::Prefix;
use ssm_edit_core::retry::RetryPolicy;

/// Command-line arguments for the ssm-edit CLI tool.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use ssm_edit_cli::cli_args::Args;
///
/// let args = Args::parse_from(["ssm-edit", "--prefix", "/app/test", "--secure"]);
/// assert!(args.secure);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
#[allow(clippy::struct_excessive_bools)] // silence clippy's warning on this struct
pub struct Args {
    /// Parameter path prefix to browse, e.g. `/app/test`.
    ///
    /// Falls back to the config file, and is asked for interactively if
    /// neither provides one.
    #[arg(long, short = 'p')]
    pub prefix: Option<String>,

    /// Mask the values of SecureString parameters, in the list and while editing.
    #[arg(long, short = 's', action)]
    pub secure: bool,

    /// Print debug logging in addition to status messages.
    #[arg(long, short = 'd', action, conflicts_with = "quiet")]
    pub debug: bool,

    /// Only print errors and the values being edited, no status messages.
    #[arg(long, short = 'q', action)]
    pub quiet: bool,

    /// AWS region to use instead of the one from the environment or profile.
    #[arg(long)]
    pub region: Option<String>,

    /// AWS shared config profile to use.
    #[arg(long)]
    pub profile: Option<String>,

    /// Path to the config file YAML.
    ///
    /// If not provided, defaults to `~/.ssm-edit/config.yml`.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,
}

/// Everything a session needs, after merging arguments over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// `None` when the prefix still has to be asked for.
    pub prefix: Option<Prefix>,
    pub secure: bool,
    pub quiet: bool,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub retry: RetryPolicy,
}

impl Args {
    /// Default `env_logger` filter for the chosen verbosity.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Merges the arguments over `config`; arguments win where both are set.
    #[must_use]
    pub fn session_options(&self, config: &Config) -> SessionOptions {
        SessionOptions {
            prefix: self
                .prefix
                .as_deref()
                .or(config.prefix.as_deref())
                .map(Prefix::new),
            secure: self.secure || config.secure,
            quiet: self.quiet,
            region: self.region.clone().or_else(|| config.region.clone()),
            profile: self.profile.clone().or_else(|| config.profile.clone()),
            retry: RetryPolicy::from(&config.retry),
        }
    }
}
