//! Argument list rewriting.
//!
//! Turns the arguments of a matched classic call into the arguments of the
//! constraint-model call. The host's call-site is only read; the result is
//! a new list the host splices in.
//!
//! For a rule with insertion index `k` and consumed indices `C`, the output
//! is the original arguments in order, with the constraint placed before
//! original index `k` and every index in `C` left out. This is the same
//! list obtained by inserting at `k` and then removing the consumed
//! arguments highest index first.

use tracing::debug;

use crate::constraint::build_for_rule;
use crate::error::{ShiftError, ShiftResult};
use crate::rules::{ConstraintOperand, RewriteRule};
use crate::syntax::{Argument, ArgumentList, CallSite};

/// Produce the rewritten argument list for a call-site matched by `rule`.
///
/// Fails without producing anything if the call does not hold the
/// arguments the rule refers to.
pub fn rewrite(call: &CallSite, rule: &RewriteRule) -> ShiftResult<ArgumentList> {
    let len = call.args.len();
    let required = rule.required_count as usize;
    if len < required || rule.insertion_index > len {
        return Err(ShiftError::rewrite(
            rule.legacy_name,
            format!(
                "call has {} argument(s), rule needs {} with insertion at {}",
                len, required, rule.insertion_index
            ),
        ));
    }
    if let Some(&bad) = rule.consumed.iter().find(|&&i| i >= len) {
        return Err(ShiftError::rewrite(
            rule.legacy_name,
            format!("consumed argument {} is out of range", bad),
        ));
    }

    let mut slots: Vec<Option<Argument>> = call.args.iter().cloned().map(Some).collect();

    let operand = match rule.operand {
        ConstraintOperand::Argument(i) => {
            let arg = if rule.consumed.contains(&i) {
                slots.get_mut(i).and_then(Option::take)
            } else {
                call.args.get(i).cloned()
            };
            match arg {
                Some(arg) => Some(arg.expr),
                None => {
                    return Err(ShiftError::rewrite(
                        rule.legacy_name,
                        format!("operand argument {} is out of range", i),
                    ))
                }
            }
        }
        ConstraintOperand::None => None,
    };
    let constraint = build_for_rule(rule, operand)
        .ok_or_else(|| ShiftError::internal("constraint operand does not fit rule"))?;
    let mut constraint = Some(Argument::positional(constraint));

    let mut out = Vec::with_capacity(len + 1 - rule.consumed.len());
    for (index, slot) in slots.into_iter().enumerate() {
        if index == rule.insertion_index {
            out.extend(constraint.take());
        }
        if rule.consumed.contains(&index) {
            continue;
        }
        if let Some(arg) = slot {
            // Value arguments were named after the classic parameters.
            out.push(if index < required {
                arg.into_positional()
            } else {
                arg
            });
        }
    }
    out.extend(constraint.take());

    debug!(
        call = %call.call_id,
        rule = rule.legacy_name,
        before = len,
        after = out.len(),
        "rewrote argument list"
    );
    Ok(ArgumentList::new(out))
}
