//! Entry point shaped like a generated host binary.
//!
//! A real packaged executable is rendered by the generator, which replaces
//! the constants below with the operator's script, function name, channel
//! token, and resource catalog. This binary carries a small demonstration
//! payload so the crate runs end to end on its own.

mod cli;

use clap::Parser;
use packhost::catalog::ResourceCatalog;
use packhost::host::{self, HostSpec};
use packhost::invocation;
use packhost::logging;

// Generator-rendered constants. Payloads are Base64 over UTF-16LE.
const SETUP: &str = "UwBlAHQALQBTAHQAcgBpAGMAdABNAG8AZABlACAALQBWAGUAcgBzAGkAbwBuACAATABhAHQAZQBzAHQA";
const SCRIPT: &str = "cABhAHIAYQBtACgAWwBQAGEAcgBhAG0AZQB0AGUAcgAoAFYAYQBsAHUAZQBGAHIAbwBtAFIAZQBtAGEAaQBuAGkAbgBnAEEAcgBnAHUAbQBlAG4AdABzACAAPQAgACQAdAByAHUAZQApAF0AWwBzAHQAcgBpAG4AZwBbAF0AXQAkAFIAZQBzAHQAKQAKAFcAcgBpAHQAZQAtAE8AdQB0AHAAdQB0ACAAIgBwAGEAYwBrAGgAbwBzAHQAIABkAGUAbQBvADoAIAAkAFIAZQBzAHQAIgA=";
const FUNCTION_NAME: &str = "Invoke-PackhostDemo";
const CHANNEL_TOKEN: &str = "demo-2f6d1c";

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    // The verbose flag gates every lifecycle log line, so it is evaluated
    // before anything else happens.
    logging::init(invocation::verbose_requested(&args.args));

    let spec = HostSpec::builder(FUNCTION_NAME)
        .setup(SETUP)
        .script(SCRIPT)
        .channel_token(CHANNEL_TOKEN)
        .catalog(ResourceCatalog::from_entries(&[(
            "Manifest",
            b"packhost demo resource\n",
        )]))
        .build();

    match host::run(spec, args.args).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
