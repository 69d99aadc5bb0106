//! CLI argument surface of the generated host.
//!
//! The host is not an option parser: every token belongs to the wrapped
//! function unless the invocation classifier says otherwise. Clap's help and
//! version interception are disabled so `-h`/`--help` reach the classifier
//! and anything else is forwarded verbatim.

use clap::Parser;

/// A stand-alone packaged command.
#[derive(Debug, Parser)]
#[command(name = "packhost", disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Arguments forwarded to the wrapped function (or a single `help`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
