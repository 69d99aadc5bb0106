//! Host orchestration.
//!
//! Ties the components together for one invocation of a generated
//! executable. All generator-embedded inputs live in an immutable
//! [`HostSpec`] built once at startup; nothing here reads ambient globals.
//!
//! Help path: classify → decode → assemble with a help tail → locate →
//! launch. Call path: the same, plus the resource relay spawned in the
//! background before the interpreter starts, so the script can request
//! resources as soon as it runs. The relay task is never joined; it dies
//! with the process.

use std::sync::Arc;

use crate::assembler::{self, Tail};
use crate::catalog::ResourceCatalog;
use crate::codec;
use crate::error::HostError;
use crate::invocation::Invocation;
use crate::launcher::{self, InterpreterSpec};
use crate::locator::InterpreterLocator;
use crate::relay::{channel_name, ResourceRelay};

/// Generator-embedded inputs for one packaged executable.
#[derive(Debug, Clone)]
pub struct HostSpec {
    /// Transport-safe encoded setup block, run before the function wrapper.
    pub setup: String,
    /// Transport-safe encoded script body, wrapped as the function.
    pub script: String,
    /// Name of the wrapped function.
    pub function_name: String,
    /// Interpreter filename and argument template.
    pub interpreter: InterpreterSpec,
    /// Build-time-unique token naming the relay channel.
    pub channel_token: String,
    /// Embedded resources served over the relay.
    pub catalog: ResourceCatalog,
    /// Whether call-path invocations start the relay. Generators emit `false`
    /// for payloads packaged without resources.
    pub relay_enabled: bool,
}

impl HostSpec {
    /// Start from the stock PowerShell template; generators override fields
    /// they render differently.
    pub fn builder(function_name: &str) -> HostSpecBuilder {
        HostSpecBuilder {
            spec: HostSpec {
                setup: String::new(),
                script: String::new(),
                function_name: function_name.to_string(),
                interpreter: InterpreterSpec::pwsh(),
                channel_token: String::new(),
                catalog: ResourceCatalog::new(),
                relay_enabled: true,
            },
        }
    }
}

/// Builder for [`HostSpec`], mirroring the fields the generator renders.
#[derive(Debug, Clone)]
pub struct HostSpecBuilder {
    spec: HostSpec,
}

impl HostSpecBuilder {
    pub fn setup(mut self, encoded: impl Into<String>) -> Self {
        self.spec.setup = encoded.into();
        self
    }

    pub fn script(mut self, encoded: impl Into<String>) -> Self {
        self.spec.script = encoded.into();
        self
    }

    pub fn interpreter(mut self, interpreter: InterpreterSpec) -> Self {
        self.spec.interpreter = interpreter;
        self
    }

    pub fn channel_token(mut self, token: impl Into<String>) -> Self {
        self.spec.channel_token = token.into();
        self
    }

    pub fn catalog(mut self, catalog: ResourceCatalog) -> Self {
        self.spec.catalog = catalog;
        self
    }

    pub fn relay_enabled(mut self, enabled: bool) -> Self {
        self.spec.relay_enabled = enabled;
        self
    }

    pub fn build(self) -> HostSpec {
        self.spec
    }
}

/// Run one host invocation and return the process exit code.
///
/// Decode and locate failures abort before any subprocess is spawned. A relay
/// bind failure is fatal to the relay task only: it is logged and the launch
/// proceeds.
pub async fn run(spec: HostSpec, args: Vec<String>) -> Result<i32, HostError> {
    let invocation = Invocation::classify(&args);

    let setup = codec::decode(&spec.setup)?;
    let body = codec::decode(&spec.script)?;
    let tail = match &invocation {
        Invocation::HelpRequest => Tail::help(&spec.function_name),
        Invocation::FunctionCall(forwarded) => Tail::call(&spec.function_name, forwarded),
    };
    let assembled = assembler::assemble(&setup, &spec.function_name, &body, &tail.render());

    if invocation.is_call() && spec.relay_enabled {
        let relay = ResourceRelay::new(Arc::new(spec.catalog.clone()), &spec.channel_token);
        let channel = channel_name(&spec.channel_token);
        tokio::spawn(async move {
            if let Err(e) = relay.serve().await {
                tracing::warn!(channel = %channel, "resource relay stopped: {e}");
            }
        });
    }

    // Resolved at most once per run; a generator-pinned path skips the search.
    let interpreter = match &spec.interpreter.fixed_path {
        Some(path) => path.clone(),
        None => InterpreterLocator::from_environment(&spec.interpreter.filename).locate()?,
    };
    tracing::debug!(path = %interpreter.display(), "resolved interpreter");

    let encoded = codec::encode(&assembled);
    let launch_args = spec.interpreter.render_args(&encoded);
    let status = launcher::launch(&interpreter, &launch_args).await?;
    Ok(launcher::exit_code(status))
}
