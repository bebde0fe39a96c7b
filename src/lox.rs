//! The full pipeline, scan → parse → resolve → interpret, behind one call.
//!
//! A [`Lox`] session keeps its interpreter between runs so globals persist
//! (what a REPL needs), and hands the parser a fresh range of expression ids
//! each time so resolver entries from different runs never collide.

use std::io::Write;

use log::{debug, info};

use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;

/// Result of running one piece of source text.
#[derive(Debug)]
pub enum RunOutcome {
    /// The program ran to completion.
    Ok,

    /// Scanning, parsing, or resolution failed; nothing was executed.
    StaticError(Vec<LoxError>),

    /// Execution stopped at a runtime error.
    RuntimeError(LoxError),
}

impl RunOutcome {
    /// Process exit code a driver should use: 0, 65 (static), or 70 (runtime).
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Ok => 0,
            RunOutcome::StaticError(_) => 65,
            RunOutcome::RuntimeError(_) => 70,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, RunOutcome::Ok)
    }

    /// Every diagnostic carried by this outcome, in report order.
    pub fn errors(&self) -> Vec<&LoxError> {
        match self {
            RunOutcome::Ok => Vec::new(),
            RunOutcome::StaticError(errors) => errors.iter().collect(),
            RunOutcome::RuntimeError(error) => vec![error],
        }
    }
}

/// An interpreter session.
pub struct Lox {
    interpreter: Interpreter,
    next_id: usize,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    /// A session printing to stdout.
    pub fn new() -> Self {
        Self::from_interpreter(Interpreter::new())
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self::from_interpreter(Interpreter::with_output(out))
    }

    fn from_interpreter(interpreter: Interpreter) -> Self {
        Lox {
            interpreter,
            next_id: 0,
        }
    }

    /// Runs `source` to completion or to its first fatal error.
    pub fn run(&mut self, source: &str) -> RunOutcome {
        info!("Running {} bytes of source", source.len());

        let (tokens, mut errors) = scan_tokens(source);

        let mut parser = Parser::with_first_id(&tokens, self.next_id);
        let parsed = parser.parse();
        self.next_id = parser.next_id();

        let statements = match parsed {
            Ok(statements) if errors.is_empty() => statements,
            Ok(_) => return RunOutcome::StaticError(errors),
            Err(parse_errors) => {
                errors.extend(parse_errors);
                return RunOutcome::StaticError(errors);
            }
        };

        debug!("Parsed {} statements", statements.len());

        let locals = match Resolver::new().resolve(&statements) {
            Ok(locals) => locals,
            Err(resolve_errors) => return RunOutcome::StaticError(resolve_errors),
        };

        match self.interpreter.interpret(&statements, locals) {
            Ok(()) => {
                info!("Program executed successfully");
                RunOutcome::Ok
            }
            Err(e) => {
                debug!("Runtime error on line {:?}: {}", e.line(), e.message());
                RunOutcome::RuntimeError(e)
            }
        }
    }
}

/// Runs `source` in a fresh session printing to stdout.
pub fn run(source: &str) -> RunOutcome {
    Lox::new().run(source)
}
