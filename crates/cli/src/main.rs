use clap::Parser;
use log::debug;
use ssm_edit_cli::cli_args::Args;
use ssm_edit_cli::prompt::TerminalPrompt;
use ssm_edit_core::config;
use ssm_edit_core::edit_loop::{EditLoop, Settings};
use ssm_edit_core::entry::Prefix;
use ssm_edit_core::error::{Error, Result};
use ssm_edit_core::prompt::Prompt;
use ssm_edit_core::ssm::SsmStore;
use std::process::ExitCode;

fn init_logging(args: &Args) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();
}

/// Prefix from the arguments or config, otherwise asked for.
///
/// `Ok(None)` if the user cancelled the question.
fn resolve_prefix(prefix: Option<Prefix>, prompt: &mut TerminalPrompt) -> Result<Option<Prefix>> {
    if let Some(prefix) = prefix {
        return Ok(Some(prefix));
    }

    match prompt.read_line("Enter SSM parameter prefix", "", false) {
        Ok(raw) => Ok(Some(Prefix::new(&raw))),
        Err(Error::PromptCancelled) => Ok(None),
        Err(e) => Err(e),
    }
}

fn execute() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(&args);

    let config_path = config::get_config_path(&args.config_path);
    debug!("Config path: `{}`", config_path);
    let options = args.session_options(&config::load_config(&config_path)?);

    let mut prompt = TerminalPrompt::new();
    let Some(prefix) = resolve_prefix(options.prefix, &mut prompt)? else {
        return Ok(ExitCode::SUCCESS);
    };
    debug!("Using prefix `{prefix}`");

    let store = SsmStore::connect(options.region.as_deref(), options.profile.as_deref())?;

    let settings = Settings {
        prefix,
        secure: options.secure,
        quiet: options.quiet,
    };

    match EditLoop::new(store, prompt, settings, options.retry).run() {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // The edit loop has shown this one already
        Err(Error::Remote { .. }) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e),
    }
}

fn main() -> ExitCode {
    match execute() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
