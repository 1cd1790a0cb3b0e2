//! Parameter shape classification.
//!
//! Splits a method's formal parameters into required, optional (has a
//! default value) and variadic counts. The matcher uses the shape to tell
//! overloads apart, e.g. `Greater(arg1, arg2)` from
//! `Greater(arg1, arg2, message, params args)`, and to reject tolerance
//! overloads such as `AreEqual(expected, actual, delta)`.

use serde::Serialize;

use crate::symbols::{MethodSymbol, Parameter};

/// Required / optional / variadic parameter counts of one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ParameterShape {
    pub required: u32,
    pub optional: u32,
    pub variadic: u32,
}

impl ParameterShape {
    /// Total number of declared parameters.
    pub fn total(&self) -> u32 {
        self.required + self.optional + self.variadic
    }

    /// True if a call passing `arg_count` arguments can bind to this shape.
    pub fn accepts(&self, arg_count: usize) -> bool {
        let arg_count = arg_count as u64;
        let required = u64::from(self.required);
        let max = required + u64::from(self.optional);
        arg_count >= required && (self.variadic > 0 || arg_count <= max)
    }
}

/// Classify a method's parameters.
pub fn classify(method: &MethodSymbol) -> ParameterShape {
    classify_parameters(&method.parameters)
}

/// Classify a parameter list. Each parameter lands in exactly one bucket,
/// checked as optional, then variadic, then required.
pub fn classify_parameters(parameters: &[Parameter]) -> ParameterShape {
    let mut shape = ParameterShape::default();
    for parameter in parameters {
        if parameter.is_optional {
            shape.optional += 1;
        } else if parameter.is_params {
            shape.variadic += 1;
        } else {
            shape.required += 1;
        }
    }
    shape
}
