//! Interactive setup wizard
//!
//! Walks through the pyenv and Python install step, collects the project
//! form, then creates the project from the template. Flags prefill any
//! field and `--yes` accepts the defaults. Only built with the `tui` feature.

#[cfg(feature = "tui")]
mod prompts;

#[cfg(feature = "tui")]
pub use prompts::{run, CreateArgs};
