//! Diagnostics and fixes for classic assertion calls.
//!
//! A fix replaces the whole invocation span with the constraint-model call
//! built from the rewritten argument list. The host owns the source text;
//! fixes only describe what to splice where.

use serde::Serialize;
use tracing::debug;

use crate::config::FrameworkConfig;
use crate::error::ShiftResult;
use crate::matcher::CallPatternMatcher;
use crate::rewrite::rewrite;
use crate::rules::RewriteRule;
use crate::symbols::SymbolStore;
use crate::syntax::{CallSite, CallSiteId, Expr};
use crate::types::Span;

/// Replace the bytes in `span` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

/// A reported classic assertion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Diagnostic id of the matched rule (`NUnit2027`).
    pub id: &'static str,
    pub call_id: CallSiteId,
    pub span: Span,
    pub message: String,
}

/// The constraint-model replacement for one classic call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassicAssertFix {
    pub call_id: CallSiteId,
    pub diagnostic_id: &'static str,
    /// Human-readable action title.
    pub title: String,
    /// Classic member that was replaced (`Greater`).
    pub legacy_name: &'static str,
    /// Constraint written in its place (`Is.GreaterThan`).
    pub constraint: String,
    /// The new invocation.
    pub replacement: Expr,
    /// The replacement rendered over the original invocation span.
    pub edit: TextEdit,
}

fn modern_call(config: &FrameworkConfig) -> String {
    format!(
        "{}.{}",
        config.assertions.modern_receiver, config.assertions.modern_method
    )
}

fn title_for(config: &FrameworkConfig, rule: &RewriteRule) -> String {
    format!(
        "Use {} with {} instead of {}",
        modern_call(config),
        rule.constraint_path(),
        rule.legacy_name
    )
}

/// Report every call-site that matches a classic rule.
pub fn diagnose(
    store: &SymbolStore,
    config: &FrameworkConfig,
    calls: &[CallSite],
) -> Vec<Diagnostic> {
    let matcher = CallPatternMatcher::new(store, config);
    calls
        .iter()
        .filter_map(|call| {
            let rule = matcher.match_call(call)?;
            Some(Diagnostic {
                id: rule.diagnostic_id,
                call_id: call.call_id,
                span: call.span,
                message: format!(
                    "Consider using the constraint model, {}(actual, {}), instead of the classic model, {}",
                    modern_call(config),
                    rule.constraint_path(),
                    rule.legacy_name
                ),
            })
        })
        .collect()
}

/// Build the fix for one call-site, or `None` if no rule applies.
pub fn classic_assert_fix(
    store: &SymbolStore,
    config: &FrameworkConfig,
    call: &CallSite,
) -> ShiftResult<Option<ClassicAssertFix>> {
    let Some(rule) = CallPatternMatcher::new(store, config).match_call(call) else {
        return Ok(None);
    };
    let args = rewrite(call, rule)?;
    let replacement = Expr::invoke(
        Expr::member(
            Expr::ident(config.assertions.modern_receiver.as_str()),
            config.assertions.modern_method.as_str(),
        ),
        args,
    );
    let edit = TextEdit {
        span: call.span,
        new_text: replacement.to_string(),
    };
    debug!(call = %call.call_id, span = %call.span, "built classic assertion fix");
    Ok(Some(ClassicAssertFix {
        call_id: call.call_id,
        diagnostic_id: rule.diagnostic_id,
        title: title_for(config, rule),
        legacy_name: rule.legacy_name,
        constraint: rule.constraint_path(),
        replacement,
        edit,
    }))
}

/// Fixes for every matching call-site, in input order.
///
/// Stops at the first call a rule matched but could not rewrite.
pub fn fixes_for_calls(
    store: &SymbolStore,
    config: &FrameworkConfig,
    calls: &[CallSite],
) -> ShiftResult<Vec<ClassicAssertFix>> {
    let mut fixes = Vec::new();
    for call in calls {
        if let Some(fix) = classic_assert_fix(store, config, call)? {
            fixes.push(fix);
        }
    }
    Ok(fixes)
}
