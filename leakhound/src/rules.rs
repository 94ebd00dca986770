//! Secret detection rules: the builtin provider registry, custom rules
//! from configuration, and remediation guidance.

mod registry;
mod remediation;

pub use registry::{builtin_rules, RuleSet, SecretRule};
pub use remediation::remediation_steps;
