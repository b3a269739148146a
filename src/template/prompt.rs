//! Interactive prompting for template variables.

use crate::Result;
use crate::config::resolver::{COMPUTED_KEYS, ResolvedContext};
use crate::template::registry::VariableRegistry;
use crate::template::validate::validate;
use std::io::{BufRead, Write};

/// Ask for every declared variable in prompt order.
///
/// The currently resolved value is offered as the default; an empty answer
/// or end of input keeps it. Answers failing the variable's pattern are
/// reported and asked again. Returns the number of values changed.
pub fn prompt_for_variables<R: BufRead, W: Write>(
    registry: &VariableRegistry,
    context: &mut ResolvedContext,
    input: &mut R,
    output: &mut W,
) -> Result<usize> {
    let mut changed = 0;
    for descriptor in registry.get_sorted() {
        if COMPUTED_KEYS.contains(&descriptor.name()) {
            continue;
        }
        let current = context
            .get(descriptor.name())
            .map(|e| e.raw.clone())
            .unwrap_or_default();

        loop {
            if current.is_empty() {
                write!(output, "{}: ", descriptor.label())?;
            } else {
                write!(output, "{} [{}]: ", descriptor.label(), current)?;
            }
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }
            let answer = line.trim();
            if answer.is_empty() || answer == current {
                break;
            }
            match validate(answer, descriptor) {
                Ok(()) => {
                    context.set_answer(descriptor.name(), answer);
                    changed += 1;
                    break;
                }
                Err(e) => writeln!(output, "  {}", e)?,
            }
        }
    }
    Ok(changed)
}
