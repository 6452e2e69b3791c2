//! ssm-edit CLI Library
//!
//! This crate provides the command-line interface for ssm-edit, a terminal
//! tool for browsing and editing remote parameter store entries. It handles
//! argument parsing and the interactive terminal prompt that hosts the edit
//! loop from `ssm-edit-core`.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing and merging with the config file
//! - [`prompt`]: Selection menu and line editor on the terminal
//!
//! # Examples
//!
//! The CLI binary (`ssm-edit`) can be used in several ways:
//!
//! ```bash
//! # Ask for the prefix interactively
//! ssm-edit
//!
//! # Browse a prefix, hiding SecureString values
//! ssm-edit --prefix /app/test --secure
//!
//! # Another region and profile, with debug logging
//! ssm-edit -p /app/prod --region eu-west-1 --profile prod --debug
//! ```

pub mod cli_args;
pub mod prompt;
