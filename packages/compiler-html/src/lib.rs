//! # Page Rendering
//!
//! Two entry points over one pipeline. [`render_tree`] with
//! [`RenderMode::Display`] produces what visitors see; with
//! [`RenderMode::Edit`] it produces the same boxes wrapped in editor chrome.
//! [`to_html`] and [`compile_page`] emit the virtual DOM as markup.

mod chrome;
mod compiler;
mod renderer;

pub use chrome::{strip_editor_chrome, ACTIONS, CHROME_CLASS, WRAPPER_CLASS};
pub use compiler::{compile_page, escape_html, to_html, CompileOptions};
pub use renderer::{element_class, render_tree, RenderMode};

#[cfg(test)]
mod tests;
