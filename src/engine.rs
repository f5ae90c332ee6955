//! Rendering strategy abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the seam between the
//! resolver and the template languages it dispatches to. An engine is an
//! opaque function from template source text plus a data mapping to rendered
//! text; the resolver never inspects template syntax itself.
//!
//! Two engines ship by default:
//!
//! - [`MiniJinjaEngine`] - full Jinja2-compatible templates via MiniJinja
//! - [`SimpleEngine`] - lightweight `{variable}` substitution

use minijinja::{Environment, Value};

use crate::error::RenderError;

/// A rendering strategy that turns template text plus data into output text.
///
/// Engine failures (syntax errors, evaluation errors) surface to the caller
/// unmodified as [`RenderError::Template`].
pub trait TemplateEngine: Send + Sync {
    /// Renders `template` with the given data mapping.
    fn render(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError>;
}

/// MiniJinja-based rendering strategy.
///
/// Provides full template functionality: loops, conditionals, filters,
/// macros. This is the engine bound to the highest-priority suffix in the
/// default table.
///
/// # Example
///
/// ```rust
/// use blueprint_templates::{MiniJinjaEngine, TemplateEngine};
/// use serde_json::json;
///
/// let engine = MiniJinjaEngine::new();
/// let output = engine
///     .render("Hello {{ name }}", &json!({"name": "Ada"}))
///     .unwrap();
/// assert_eq!(output, "Hello Ada");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates a new MiniJinja engine with a default environment.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Returns a mutable reference to the underlying environment.
    ///
    /// Use this to register custom filters or functions before handing the
    /// engine to a resolver.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        Ok(self.env.render_str(template, Value::from_serialize(data))?)
    }
}

/// Format-string style rendering strategy using `{variable}` syntax.
///
/// Supports dotted paths into the data mapping (`{user.name}`, `{items.0}`)
/// and `{{`/`}}` escapes. Variables missing from the data are left in place
/// as literal placeholders. No loops, conditionals, or filters; use
/// [`MiniJinjaEngine`] for those.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEngine;

impl SimpleEngine {
    /// Creates a new simple engine.
    pub fn new() -> Self {
        Self
    }

    /// Resolves a dotted path (`user.profile.name`, `items.0`) in the data.
    fn lookup<'a>(data: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
        let mut current = data;
        for part in path.split('.') {
            current = match current {
                serde_json::Value::Object(map) => map.get(part)?,
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Formats a resolved value for output.
    fn stringify(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl TemplateEngine for SimpleEngine {
    fn render(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(RenderError::Template(format!(
                            "unclosed substitution: {{{}",
                            name
                        )));
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(RenderError::Template(
                            "empty variable name in template".to_string(),
                        ));
                    }
                    match Self::lookup(data, name) {
                        Some(value) => out.push_str(&Self::stringify(value)),
                        None => {
                            // Left in place so missing data is visible in output.
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                }
                _ => out.push(ch),
            }
        }

        Ok(out)
    }
}
