//! Framework configuration for assertshift.
//!
//! Every name the engine matches against (assertion classes, attribute
//! classes, the lifecycle enum) lives here so a host can point the engine
//! at a renamed or forked framework. Defaults describe NUnit.
//!
//! Config can be written as TOML:
//!
//! ```toml
//! [assertions]
//! legacy_classes = ["NUnit.Framework.Legacy.ClassicAssert"]
//!
//! [lifecycle]
//! per_test_case_sentinel = 1
//! ```
//!
//! or as the same structure in JSON. Omitted fields keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ShiftError, ShiftResult};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FrameworkConfig {
    /// Assertion classes and the constraint-model entry point.
    #[serde(default)]
    pub assertions: AssertionConfig,

    /// Attributes that mark test-lifecycle methods.
    #[serde(default)]
    pub attributes: AttributeConfig,

    /// Fixture instancing attribute and enum.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

/// Assertion class names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionConfig {
    /// Metadata names of classes whose members are classic assertions.
    #[serde(default = "default_legacy_classes")]
    pub legacy_classes: Vec<String>,

    /// Receiver written for the rewritten call.
    #[serde(default = "default_modern_receiver")]
    pub modern_receiver: String,

    /// Method name written for the rewritten call.
    #[serde(default = "default_modern_method")]
    pub modern_method: String,

    /// Name of the trailing message parameter of classic overloads.
    #[serde(default = "default_message_parameter")]
    pub message_parameter: String,
}

/// Lifecycle attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeConfig {
    /// Interfaces whose implementors build tests (`[Test]`, `[TestCase]`, ...).
    #[serde(default = "default_test_builder_interfaces")]
    pub test_builder_interfaces: Vec<String>,

    /// Attribute classes that mark test methods regardless of interfaces.
    #[serde(default = "default_test_attributes")]
    pub test_attributes: Vec<String>,

    #[serde(default = "default_setup")]
    pub setup: String,
    #[serde(default = "default_teardown")]
    pub teardown: String,
    #[serde(default = "default_one_time_setup")]
    pub one_time_setup: String,
    #[serde(default = "default_one_time_teardown")]
    pub one_time_teardown: String,
}

/// Fixture instancing names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// The attribute selecting the instancing policy.
    #[serde(default = "default_fixture_attribute")]
    pub fixture_attribute: String,

    /// The enum type of its single constructor argument.
    #[serde(default = "default_lifecycle_enum")]
    pub lifecycle_enum: String,

    /// The enum member meaning one instance per test case.
    #[serde(default = "default_per_test_case_member")]
    pub per_test_case_member: String,

    /// Underlying value of that member, used when the host does not
    /// describe the enum's members.
    #[serde(default = "default_per_test_case_sentinel")]
    pub per_test_case_sentinel: i64,
}

fn default_legacy_classes() -> Vec<String> {
    vec![
        "NUnit.Framework.Assert".to_string(),
        "NUnit.Framework.Legacy.ClassicAssert".to_string(),
    ]
}

fn default_modern_receiver() -> String {
    "Assert".to_string()
}

fn default_modern_method() -> String {
    "That".to_string()
}

fn default_message_parameter() -> String {
    "message".to_string()
}

fn default_test_builder_interfaces() -> Vec<String> {
    vec![
        "NUnit.Framework.Interfaces.ITestBuilder".to_string(),
        "NUnit.Framework.Interfaces.ISimpleTestBuilder".to_string(),
    ]
}

fn default_test_attributes() -> Vec<String> {
    [
        "TestAttribute",
        "TestCaseAttribute",
        "TestCaseSourceAttribute",
        "TheoryAttribute",
    ]
    .iter()
    .map(|name| format!("NUnit.Framework.{}", name))
    .collect()
}

fn default_setup() -> String {
    "NUnit.Framework.SetUpAttribute".to_string()
}

fn default_teardown() -> String {
    "NUnit.Framework.TearDownAttribute".to_string()
}

fn default_one_time_setup() -> String {
    "NUnit.Framework.OneTimeSetUpAttribute".to_string()
}

fn default_one_time_teardown() -> String {
    "NUnit.Framework.OneTimeTearDownAttribute".to_string()
}

fn default_fixture_attribute() -> String {
    "NUnit.Framework.FixtureLifeCycleAttribute".to_string()
}

fn default_lifecycle_enum() -> String {
    "NUnit.Framework.LifeCycle".to_string()
}

fn default_per_test_case_member() -> String {
    "InstancePerTestCase".to_string()
}

fn default_per_test_case_sentinel() -> i64 {
    1
}

impl Default for AssertionConfig {
    fn default() -> Self {
        Self {
            legacy_classes: default_legacy_classes(),
            modern_receiver: default_modern_receiver(),
            modern_method: default_modern_method(),
            message_parameter: default_message_parameter(),
        }
    }
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            test_builder_interfaces: default_test_builder_interfaces(),
            test_attributes: default_test_attributes(),
            setup: default_setup(),
            teardown: default_teardown(),
            one_time_setup: default_one_time_setup(),
            one_time_teardown: default_one_time_teardown(),
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            fixture_attribute: default_fixture_attribute(),
            lifecycle_enum: default_lifecycle_enum(),
            per_test_case_member: default_per_test_case_member(),
            per_test_case_sentinel: default_per_test_case_sentinel(),
        }
    }
}

impl FrameworkConfig {
    /// Parse TOML configuration.
    pub fn from_toml_str(content: &str) -> ShiftResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse JSON configuration.
    pub fn from_json_str(content: &str) -> ShiftResult<Self> {
        serde_json::from_str(content).map_err(|e| ShiftError::config(e.to_string()))
    }

    /// Load configuration from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> ShiftResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            other => {
                return Err(ShiftError::config(format!(
                    "unsupported config extension {:?} for {}",
                    other.unwrap_or(""),
                    path.display()
                )))
            }
        };
        tracing::debug!("loaded framework config from {}", path.display());
        Ok(config)
    }

    /// True if the metadata name is a configured classic assertion class.
    pub fn is_legacy_class(&self, metadata_name: &str) -> bool {
        self.assertions
            .legacy_classes
            .iter()
            .any(|c| c == metadata_name)
    }
}
