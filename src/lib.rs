//! Packhost — the runtime host embedded in generated stand-alone script executables.
//!
//! A packaged executable carries an encoded setup block, an encoded script
//! body, a function name, and a resource catalog, all supplied by the
//! generator at build time. At run time this crate decodes the payload,
//! assembles the final script, resolves the external interpreter, serves the
//! resource catalog to the running script over a local IPC channel, and waits
//! for the interpreter subprocess to exit.
//!
//! # Quick start
//!
//! ```no_run
//! use packhost::host::{self, HostSpec};
//!
//! # async fn example() {
//! let spec = HostSpec::builder("Invoke-Packaged")
//!     .setup(packhost::codec::encode("Set-StrictMode -Version Latest"))
//!     .script(packhost::codec::encode("Write-Output hello"))
//!     .channel_token("demo-0001")
//!     .build();
//! let code = host::run(spec, vec![]).await.unwrap();
//! std::process::exit(code);
//! # }
//! ```

pub mod assembler;
pub mod catalog;
pub mod codec;
pub mod error;
pub mod host;
pub mod invocation;
pub mod launcher;
pub mod locator;
pub mod logging;
pub mod relay;
#[cfg(test)]
pub mod testsupport;
