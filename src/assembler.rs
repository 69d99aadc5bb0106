//! Script assembly.
//!
//! Builds the final script text handed to the interpreter: the decoded setup
//! block, the decoded body wrapped in a named function, and an invocation
//! tail. Newline placement is load-bearing; the target script's parsed
//! meaning changes if the framing shifts, so the concatenation below is
//! exact and nothing here touches I/O or encoded payloads.

/// The invocation tail appended after the function wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tail {
    /// Display the wrapped function's own help.
    Help { function_name: String },
    /// Call the wrapped function, forwarding arguments verbatim.
    Call {
        function_name: String,
        args: Vec<String>,
    },
}

impl Tail {
    pub fn help(function_name: &str) -> Self {
        Self::Help {
            function_name: function_name.to_string(),
        }
    }

    pub fn call(function_name: &str, args: &[String]) -> Self {
        Self::Call {
            function_name: function_name.to_string(),
            args: args.to_vec(),
        }
    }

    /// Render the tail as the final line(s) of the assembled script.
    pub fn render(&self) -> String {
        match self {
            Self::Help { function_name } => format!("Get-Help -Detailed {function_name}"),
            Self::Call {
                function_name,
                args,
            } => {
                if args.is_empty() {
                    function_name.clone()
                } else {
                    format!("{function_name} {}", args.join(" "))
                }
            }
        }
    }
}

/// Assemble the full script text.
///
/// Shape: setup, blank line, ` function <name>` wrapper with the body between
/// braces on their own lines, then the tail.
pub fn assemble(setup: &str, function_name: &str, body: &str, tail: &str) -> String {
    format!("{setup}\n\n function {function_name}\n{{\n{body}\n}}\n{tail}")
}
