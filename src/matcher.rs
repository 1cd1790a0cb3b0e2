//! Classic assertion call-site matching.
//!
//! A call-site matches when:
//! 1. its callee resolves to a method of a configured classic assertion class,
//! 2. the method name has a rule in [`CLASSIC_RULES`](crate::rules::CLASSIC_RULES),
//! 3. the resolved overload is one the rule understands: exactly the rule's
//!    value parameters, or those plus a required trailing message parameter,
//!    with any further parameters optional or variadic,
//! 4. the argument count binds to that overload, and
//! 5. every named argument sits at the position of the parameter it names.
//!
//! Anything else is "not applicable" and yields `None`. Already-rewritten
//! calls (`Assert.That`) never match because `That` has no rule.

use tracing::debug;

use crate::config::FrameworkConfig;
use crate::params::classify;
use crate::rules::{rule_for, RewriteRule};
use crate::symbols::{MethodSymbol, SymbolStore};
use crate::syntax::CallSite;

/// Matches call-sites against the classic rule table.
#[derive(Debug, Clone, Copy)]
pub struct CallPatternMatcher<'a> {
    store: &'a SymbolStore,
    config: &'a FrameworkConfig,
}

impl<'a> CallPatternMatcher<'a> {
    /// Create a matcher over one snapshot.
    pub fn new(store: &'a SymbolStore, config: &'a FrameworkConfig) -> Self {
        CallPatternMatcher { store, config }
    }

    /// The rule that applies to this call-site, if any.
    pub fn match_call(&self, call: &CallSite) -> Option<&'static RewriteRule> {
        let Some(method) = self.store.method(call.callee) else {
            debug!(call = %call.call_id, callee = %call.callee, "callee not in snapshot");
            return None;
        };
        if !self.is_legacy_assertion(method) {
            return None;
        }
        let rule = rule_for(&method.name)?;
        if !self.overload_fits(method, rule) {
            debug!(
                call = %call.call_id,
                rule = rule.legacy_name,
                "overload shape not handled by rule"
            );
            return None;
        }
        if !classify(method).accepts(call.args.len()) {
            debug!(
                call = %call.call_id,
                args = call.args.len(),
                "argument count does not bind to callee"
            );
            return None;
        }
        if !named_arguments_in_place(method, call) {
            debug!(call = %call.call_id, "named arguments out of position");
            return None;
        }
        debug!(
            call = %call.call_id,
            rule = rule.legacy_name,
            diagnostic = rule.diagnostic_id,
            "classic assertion matched"
        );
        Some(rule)
    }

    /// True if the method is declared on a classic assertion class.
    pub fn is_legacy_assertion(&self, method: &MethodSymbol) -> bool {
        self.store
            .full_metadata_name(method.containing_type)
            .is_some_and(|name| self.config.is_legacy_class(&name))
    }

    /// The rule's value parameters come first; at most one more required
    /// parameter may follow, and only if it is the message. Generic
    /// overloads (`IsInstanceOf<T>(actual, message)`) carry their operand
    /// as a type argument and are left alone.
    fn overload_fits(&self, method: &MethodSymbol, rule: &RewriteRule) -> bool {
        if method.is_generic() {
            return false;
        }
        let values = rule.required_count as usize;
        let is_message = |index: usize| {
            method
                .parameters
                .get(index)
                .is_some_and(|p| p.name == self.config.assertions.message_parameter)
        };
        if (0..values).any(is_message) {
            return false;
        }
        let required = classify(method).required as usize;
        required == values || (required == values + 1 && is_message(values))
    }
}

fn named_arguments_in_place(method: &MethodSymbol, call: &CallSite) -> bool {
    call.args.iter().enumerate().all(|(i, arg)| match &arg.name {
        None => true,
        Some(name) => method
            .parameters
            .get(i)
            .is_some_and(|p| !p.is_params && &p.name == name),
    })
}
