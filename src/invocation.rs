//! Invocation argument classification.
//!
//! A packaged executable has no option parser of its own: everything the
//! caller types is forwarded to the wrapped function, except the two host
//! concerns decided here. A single `help`/`-h`/`--help` token selects the
//! help path, and `-verbose` (anywhere in the list) enables diagnostic
//! logging. Classification looks at the full original argument list, so
//! `-verbose help` is still a function call.

/// Tokens that, alone, select the help path.
const HELP_TOKENS: [&str; 3] = ["help", "-h", "--help"];

/// Host diagnostic flag. Consumed: stripped before forwarding.
const VERBOSE_TOKEN: &str = "-verbose";

/// How one invocation of the generated executable was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Show the wrapped function's help. Never starts the relay.
    HelpRequest,
    /// Call the wrapped function with these forwarded arguments.
    FunctionCall(Vec<String>),
}

impl Invocation {
    /// Classify the caller's argument list exactly once.
    ///
    /// The help path requires the list to be exactly one help token; anything
    /// else, including an empty list, is a function call. `-verbose` counts
    /// toward that length check but is stripped from forwarded arguments.
    pub fn classify(args: &[String]) -> Self {
        if args.len() == 1 && is_help_token(&args[0]) {
            return Self::HelpRequest;
        }
        let forwarded = args
            .iter()
            .filter(|arg| !arg.eq_ignore_ascii_case(VERBOSE_TOKEN))
            .cloned()
            .collect();
        Self::FunctionCall(forwarded)
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Self::FunctionCall(_))
    }
}

/// Whether the caller asked for diagnostic logging.
///
/// Evaluated before any other lifecycle logging occurs.
pub fn verbose_requested(args: &[String]) -> bool {
    args.iter().any(|arg| arg.eq_ignore_ascii_case(VERBOSE_TOKEN))
}

fn is_help_token(arg: &str) -> bool {
    HELP_TOKENS
        .iter()
        .any(|token| arg.eq_ignore_ascii_case(token))
}
