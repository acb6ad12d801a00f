//! The read-invoke-print loop.

use std::future::Future;
use std::io::{BufRead, Write};

use tracing::warn;

use crate::error::{ErrorCategory, Result};
use crate::types::ModelMessage;

use super::render::render_message;

pub const PROMPT: &str = "You: ";
pub const EXIT_COMMAND: &str = "exit";

/// Read lines from `input`, run `invoke` on each, and print the returned
/// conversation to `output`.
///
/// Stops on `exit` (surrounding whitespace ignored) or end of input. A failed
/// invocation is reported and the loop moves on to the next line, except a
/// rejected credential, which is returned. Returns the number of invocations
/// made.
pub async fn run_loop<R, W, F, Fut>(mut input: R, output: &mut W, mut invoke: F) -> Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<ModelMessage>>>,
{
    let mut invocations = 0;
    let mut line = String::new();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }
        let text = line.trim();
        if text == EXIT_COMMAND {
            break;
        }

        invocations += 1;
        match invoke(text.to_string()).await {
            Ok(messages) => {
                for message in &messages {
                    writeln!(output, "{}", render_message(message))?;
                }
            }
            Err(e) if e.category() == ErrorCategory::Authentication => return Err(e),
            Err(e) => {
                warn!(error = %e, category = ?e.category(), "Invocation failed");
                writeln!(output, "Error: {e}")?;
            }
        }
    }

    Ok(invocations)
}
