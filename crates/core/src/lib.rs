//! ssm-edit Core Library
//!
//! This crate provides the core functionality for ssm-edit, a terminal tool
//! for browsing and editing entries of a remote parameter store one prefix
//! at a time.
//!
//! # Key Features
//!
//! - **Remote Store Access**: Paginated listing and single-entry writes, with
//!   an AWS SSM Parameter Store backend and an in-memory one
//! - **Reconciliation**: The last local write is merged into every listing to
//!   hide read-after-write lag
//! - **Secure Mode**: Secret values are masked on screen
//! - **Bounded Retry**: Writes are retried a fixed number of times
//! - **Edit Loop**: The list/select/edit/persist state machine, driven through
//!   the [`prompt::Prompt`] trait so any terminal UI can host it
//!
//! # Examples
//!
//! Running the edit loop against an in-memory store:
//!
//! ```no_run
//! use ssm_edit_core::edit_loop::{EditLoop, Settings};
//! use ssm_edit_core::entry::Prefix;
//! use ssm_edit_core::memory::MemoryStore;
//! use ssm_edit_core::retry::RetryPolicy;
//! # use ssm_edit_core::prompt::{MenuItem, Prompt};
//! # struct Terminal;
//! # impl Prompt for Terminal {
//! #     fn select_one(&mut self, _: &str, _: &[MenuItem]) -> ssm_edit_core::error::Result<usize> { Ok(0) }
//! #     fn read_line(&mut self, _: &str, _: &str, _: bool) -> ssm_edit_core::error::Result<String> { Ok(String::new()) }
//! #     fn status(&mut self, _: &str) {}
//! #     fn report(&mut self, _: &str) {}
//! # }
//!
//! let settings = Settings {
//!     prefix: Prefix::new("/app/test"),
//!     secure: true,
//!     quiet: false,
//! };
//! let mut edit_loop = EditLoop::new(MemoryStore::new(), Terminal, settings, RetryPolicy::default());
//! edit_loop.run()?;
//! # Ok::<(), ssm_edit_core::error::Error>(())
//! ```

pub mod config;
pub mod edit_loop;
pub mod entry;
pub mod error;
pub mod format;
pub mod memory;
pub mod prompt;
pub mod reconcile;
pub mod retry;
pub mod ssm;
pub mod store;
