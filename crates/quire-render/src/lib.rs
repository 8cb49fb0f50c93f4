//! Rendering for Quire.
//!
//! This crate turns a [`PageTree`](quire_site::PageTree) into an output
//! directory:
//! - [`Builder`]: load, clear and render in one call
//! - [`Renderer`]: parallel depth-first walk writing pages and copying assets
//! - [`TemplateEngine`] and the default [`MiniJinjaEngine`]
//! - [`Shortcodes`]: bracketed macros expanded by the `shortcodes()` template
//!   function

mod builder;
mod error;
pub mod locals;
mod output;
mod renderer;
mod shortcode;
mod template;

pub use builder::Builder;
pub use error::BuildError;
pub use output::clear_output;
pub use renderer::{BuildReport, Renderer, find_template};
pub use shortcode::{ShortcodeAttrs, Shortcodes};
pub use template::{MiniJinjaEngine, TemplateEngine, TemplateError};
