//! # Style Compilation
//!
//! Turns a node's structured [`AdvancedSettings`](pagecraft_model::AdvancedSettings)
//! into a [`CompiledStyle`]: inline declarations, hover declarations, classes
//! and attributes. Compilation does not look at the viewport or any global
//! state; responsive hide flags become classes that [`responsive_rules`]
//! resolves at presentation time.

mod compiled;
mod compiler;
mod responsive;
mod scope;

pub use compiled::CompiledStyle;
pub use compiler::{box_shorthand, compile_advanced, transform_value};
pub use responsive::{responsive_rules, Device};
pub use scope::scope_custom_css;
