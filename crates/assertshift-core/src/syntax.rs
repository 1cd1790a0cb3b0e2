//! Syntax fragments exchanged with the host.
//!
//! The host owns the real syntax tree. It hands the engine [`CallSite`]s
//! whose arguments are [`Expr`] fragments, and receives new fragments back
//! to splice in. Fragments the engine does not need to understand travel as
//! [`Expr::Verbatim`] and are moved, never copied into two places.
//!
//! `Display` renders fragments as C#-like source text:
//!
//! ```
//! use assertshift_core::syntax::{Argument, ArgumentList, Expr};
//!
//! let call = Expr::invoke(
//!     Expr::dotted("Is.GreaterThan"),
//!     ArgumentList::new(vec![Argument::positional(Expr::verbatim("b"))]),
//! );
//! assert_eq!(call.to_string(), "Is.GreaterThan(b)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolId;
use crate::types::Span;

// ============================================================================
// Expressions
// ============================================================================

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::String(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
        }
    }
}

/// An expression fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// A simple name (`Is`, `a`).
    Identifier { name: String },
    /// `target.name`
    MemberAccess { target: Box<Expr>, name: String },
    /// `callee(args)`
    Invocation { callee: Box<Expr>, args: ArgumentList },
    /// A literal.
    Literal { value: Literal },
    /// Host-owned source text the engine moves around untouched.
    Verbatim {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        span: Option<Span>,
    },
}

impl Expr {
    /// A simple name.
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier { name: name.into() }
    }

    /// `target.name`
    pub fn member(target: Expr, name: impl Into<String>) -> Self {
        Expr::MemberAccess {
            target: Box::new(target),
            name: name.into(),
        }
    }

    /// A member-access chain from a dotted path: `Is.Not` becomes
    /// `MemberAccess(Identifier(Is), Not)`. Empty segments are skipped.
    pub fn dotted(path: &str) -> Self {
        let mut segments = path.split('.').filter(|s| !s.is_empty());
        let first = segments.next().unwrap_or_default();
        segments.fold(Expr::ident(first), Expr::member)
    }

    /// `callee(args)`
    pub fn invoke(callee: Expr, args: ArgumentList) -> Self {
        Expr::Invocation {
            callee: Box::new(callee),
            args,
        }
    }

    /// Host source text without a span.
    pub fn verbatim(text: impl Into<String>) -> Self {
        Expr::Verbatim {
            text: text.into(),
            span: None,
        }
    }

    /// Host source text at a span.
    pub fn verbatim_at(text: impl Into<String>, span: Span) -> Self {
        Expr::Verbatim {
            text: text.into(),
            span: Some(span),
        }
    }

    /// A string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal {
            value: Literal::String(value.into()),
        }
    }

    /// The arguments of an invocation.
    pub fn invocation_args(&self) -> Option<&ArgumentList> {
        match self {
            Expr::Invocation { args, .. } => Some(args),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier { name } => write!(f, "{}", name),
            Expr::MemberAccess { target, name } => write!(f, "{}.{}", target, name),
            Expr::Invocation { callee, args } => write!(f, "{}({})", callee, args),
            Expr::Literal { value } => write!(f, "{}", value),
            Expr::Verbatim { text, .. } => write!(f, "{}", text),
        }
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// One argument of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Explicit parameter name (`message: "x"`), if written.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// The argument expression.
    pub expr: Expr,
}

impl Argument {
    /// A positional argument.
    pub fn positional(expr: Expr) -> Self {
        Argument { name: None, expr }
    }

    /// A named argument.
    pub fn named(name: impl Into<String>, expr: Expr) -> Self {
        Argument {
            name: Some(name.into()),
            expr,
        }
    }

    /// The same argument with its name removed.
    pub fn into_positional(self) -> Self {
        Argument {
            name: None,
            expr: self.expr,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}: {}", name, self.expr),
            None => write!(f, "{}", self.expr),
        }
    }
}

/// An ordered argument list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentList(Vec<Argument>);

impl ArgumentList {
    /// Create a list from arguments in order.
    pub fn new(args: Vec<Argument>) -> Self {
        ArgumentList(args)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Argument at a position.
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.0.get(index)
    }

    /// Iterate in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.0.iter()
    }

    /// Borrow as a slice.
    pub fn as_slice(&self) -> &[Argument] {
        &self.0
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<Argument> {
        self.0
    }
}

impl From<Vec<Argument>> for ArgumentList {
    fn from(args: Vec<Argument>) -> Self {
        ArgumentList(args)
    }
}

impl FromIterator<Argument> for ArgumentList {
    fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
        ArgumentList(iter.into_iter().collect())
    }
}

impl IntoIterator for ArgumentList {
    type Item = Argument;
    type IntoIter = std::vec::IntoIter<Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        Ok(())
    }
}

// ============================================================================
// Call Sites
// ============================================================================

/// Unique identifier for a call site within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct CallSiteId(pub u32);

impl CallSiteId {
    /// Create a new call site ID.
    pub fn new(id: u32) -> Self {
        CallSiteId(id)
    }
}

impl fmt::Display for CallSiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call_{}", self.0)
    }
}

/// An invocation found by the host, with its resolved callee.
///
/// For `Assert.Greater(a, b, "msg")` the receiver is `Assert`, the method
/// name is `Greater`, and `callee` is the overload the host resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Unique identifier for this call site.
    pub call_id: CallSiteId,
    /// Byte span of the whole invocation expression.
    #[serde(default)]
    pub span: Span,
    /// The resolved callee method.
    pub callee: SymbolId,
    /// The expression the method is invoked on.
    pub receiver: Expr,
    /// The invoked method name as written.
    pub method_name: String,
    /// Arguments in call order.
    #[serde(default)]
    pub args: ArgumentList,
}

impl CallSite {
    /// Create a call site with no arguments.
    pub fn new(
        call_id: CallSiteId,
        callee: SymbolId,
        receiver: Expr,
        method_name: impl Into<String>,
    ) -> Self {
        CallSite {
            call_id,
            span: Span::default(),
            callee,
            receiver,
            method_name: method_name.into(),
            args: ArgumentList::default(),
        }
    }

    /// Set the arguments.
    pub fn with_args(mut self, args: Vec<Argument>) -> Self {
        self.args = ArgumentList::new(args);
        self
    }

    /// Set the span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The invocation as an expression (`receiver.method(args)`).
    pub fn to_expr(&self) -> Expr {
        Expr::invoke(
            Expr::member(self.receiver.clone(), self.method_name.clone()),
            self.args.clone(),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
