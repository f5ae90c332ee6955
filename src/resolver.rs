//! Template resolution with suffix priority and default fallback.
//!
//! This module provides [`TemplateResolver`], which maps a
//! (collection, blueprint) identifier pair to a physical template file under
//! a root directory and renders it with the engine bound to the file's
//! suffix.
//!
//! # Filesystem Layout
//!
//! ```text
//! {root}/default{suffix}                     - optional global fallback
//! {root}/{collection}/{blueprint}{suffix}    - specific template
//! ```
//!
//! # Suffix Priority
//!
//! The suffix table is an ordered list of `(suffix, engine)` pairs. For a
//! given pair, candidate paths are probed in table order and the first
//! existing file wins; remaining suffixes are not checked. The default
//! table binds `.jinja` to [`MiniJinjaEngine`] and `.txt` to
//! [`SimpleEngine`].
//!
//! # Caching
//!
//! The first successful resolution of a specific template is memoized for
//! the resolver's lifetime: repeated lookups return the contents read on
//! first access, even if the file changes on disk afterward. Construct a
//! new resolver to observe filesystem changes.
//!
//! The default-template fallback is *not* written into the per-pair cache.
//! A pair with no specific template re-runs the full suffix probe on every
//! call before falling back. This preserves the behavior callers observe in
//! the wild; hosts that render many such pairs on a hot path should be aware
//! that resolution cost is not amortized for them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::engine::{MiniJinjaEngine, SimpleEngine, TemplateEngine};
use crate::error::RenderError;
use crate::fs::{DiskFilesystem, Filesystem};

/// An ordered suffix-to-engine table. Earlier entries have higher probe
/// priority.
pub type SuffixTable = Vec<(String, Box<dyn TemplateEngine>)>;

/// Returns the default suffix table: `.jinja` rendered by MiniJinja,
/// `.txt` rendered by `{variable}` substitution.
pub fn default_engines() -> SuffixTable {
    vec![
        (
            ".jinja".to_string(),
            Box::new(MiniJinjaEngine::new()) as Box<dyn TemplateEngine>,
        ),
        (".txt".to_string(), Box::new(SimpleEngine::new())),
    ]
}

/// One resolved physical template.
///
/// Immutable once created: `contents` reflects the file's state at the
/// moment of first successful read. `path` is carried for diagnostics only;
/// rendering dispatches on `suffix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    /// Path the template was read from.
    pub path: PathBuf,
    /// The suffix that matched, selecting the rendering strategy.
    pub suffix: String,
    /// Raw template text, read once.
    pub contents: String,
}

/// Resolves and renders templates for (collection, blueprint) pairs.
///
/// The resolver owns a lookup cache and a default-template slot. The slot is
/// probed once at construction by trying `{root}/default{suffix}` for each
/// suffix in priority order; if no default exists the slot stays empty for
/// the resolver's lifetime. "No template" is a normal outcome, never an
/// error.
///
/// # Example
///
/// ```rust
/// use blueprint_templates::{MemoryFilesystem, TemplateResolver};
/// use serde_json::json;
///
/// let fs = MemoryFilesystem::new();
/// fs.insert("/tpl/posts/article.jinja", "Hello {{ name }}");
///
/// let mut resolver = TemplateResolver::with_filesystem("/tpl", fs);
/// assert!(resolver.has_template("posts", "article"));
///
/// let output = resolver
///     .render("posts", "article", &json!({"name": "Ada"}))
///     .unwrap();
/// assert_eq!(output.as_deref(), Some("Hello Ada"));
/// ```
pub struct TemplateResolver<F: Filesystem = DiskFilesystem> {
    root: PathBuf,
    engines: SuffixTable,
    cache: HashMap<String, TemplateRecord>,
    default_template: Option<TemplateRecord>,
    fs: F,
}

impl TemplateResolver<DiskFilesystem> {
    /// Creates a resolver over the real filesystem with the default suffix
    /// table.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_filesystem(root, DiskFilesystem)
    }
}

impl<F: Filesystem> TemplateResolver<F> {
    /// Creates a resolver with an injected filesystem and the default suffix
    /// table.
    pub fn with_filesystem(root: impl Into<PathBuf>, fs: F) -> Self {
        Self::with_engines(root, default_engines(), fs)
    }

    /// Creates a resolver with a custom suffix table.
    ///
    /// Table order defines probe priority. The default-template slot is
    /// probed immediately; a missing default is a valid state, not an error.
    pub fn with_engines(root: impl Into<PathBuf>, engines: SuffixTable, fs: F) -> Self {
        let root = root.into();
        let default_template = probe_default(&root, &engines, &fs);
        Self {
            root,
            engines,
            cache: HashMap::new(),
            default_template,
            fs,
        }
    }

    /// The root directory templates are resolved under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a default template was found at construction.
    pub fn has_default_template(&self) -> bool {
        self.default_template.is_some()
    }

    /// Tests whether a template (specific or default) exists for the pair.
    ///
    /// May populate the lookup cache as a side effect; a read failure during
    /// resolution reports `false`.
    pub fn has_template(&mut self, collection: &str, blueprint: &str) -> bool {
        matches!(self.resolve(collection, blueprint), Ok(Some(_)))
    }

    /// Renders the template for the pair with the given data.
    ///
    /// Returns `Ok(None)` when neither a specific nor a default template
    /// exists. Engine failures propagate unmodified.
    ///
    /// `collection` and `blueprint` are used verbatim as path segments; the
    /// resolver performs no sanitization, so untrusted identifiers must be
    /// validated upstream.
    pub fn render<T: Serialize>(
        &mut self,
        collection: &str,
        blueprint: &str,
        data: &T,
    ) -> Result<Option<String>, RenderError> {
        self.render_with(collection, blueprint, data, |contents, _| {
            contents.to_string()
        })
    }

    /// Renders the template for the pair, applying `modifier` to the raw
    /// template text before it reaches the engine.
    ///
    /// The modifier receives the template contents and the serialized data
    /// mapping; use it for caller-side preprocessing such as macro
    /// expansion.
    pub fn render_with<T, M>(
        &mut self,
        collection: &str,
        blueprint: &str,
        data: &T,
        modifier: M,
    ) -> Result<Option<String>, RenderError>
    where
        T: Serialize,
        M: FnOnce(&str, &serde_json::Value) -> String,
    {
        let record = match self.resolve(collection, blueprint)? {
            Some(record) => record,
            None => return Ok(None),
        };

        let data = serde_json::to_value(data)?;
        let contents = modifier(&record.contents, &data);
        let engine = self.engine_for(&record.suffix)?;
        engine.render(&contents, &data).map(Some)
    }

    /// Resolves the template record for a pair.
    ///
    /// Checks the cache, then probes candidate paths in suffix order,
    /// caching the first hit. Falls back to the default slot on a full
    /// miss.
    fn resolve(
        &mut self,
        collection: &str,
        blueprint: &str,
    ) -> Result<Option<TemplateRecord>, RenderError> {
        let key = format!("blueprint:{}:{}", collection, blueprint);

        if let Some(record) = self.cache.get(&key) {
            return Ok(Some(record.clone()));
        }

        for (suffix, _) in &self.engines {
            let path = self
                .root
                .join(collection)
                .join(format!("{}{}", blueprint, suffix));

            if self.fs.exists(&path) {
                let contents = self.fs.read_to_string(&path)?;
                let record = TemplateRecord {
                    path,
                    suffix: suffix.clone(),
                    contents,
                };
                self.cache.insert(key, record.clone());
                return Ok(Some(record));
            }
        }

        // The default slot is deliberately not cached under the per-pair
        // key: a pair with no specific template re-runs the probe above on
        // every call.
        Ok(self.default_template.clone())
    }

    /// Looks up the engine bound to a suffix.
    fn engine_for(&self, suffix: &str) -> Result<&dyn TemplateEngine, RenderError> {
        self.engines
            .iter()
            .find(|(s, _)| s == suffix)
            .map(|(_, engine)| engine.as_ref())
            .ok_or_else(|| RenderError::UnknownSuffix(suffix.to_string()))
    }
}

/// Probes `{root}/default{suffix}` in priority order for the default
/// template. The first existing candidate ends the probe; if it cannot be
/// read the slot is left empty.
fn probe_default<F: Filesystem>(
    root: &Path,
    engines: &SuffixTable,
    fs: &F,
) -> Option<TemplateRecord> {
    for (suffix, _) in engines {
        let path = root.join(format!("default{}", suffix));
        if fs.exists(&path) {
            return fs.read_to_string(&path).ok().map(|contents| TemplateRecord {
                path,
                suffix: suffix.clone(),
                contents,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFilesystem;
    use serde_json::json;

    fn resolver_with(files: &[(&str, &str)]) -> (TemplateResolver<MemoryFilesystem>, MemoryFilesystem) {
        let fs = MemoryFilesystem::new();
        for (path, contents) in files {
            fs.insert(*path, *contents);
        }
        (TemplateResolver::with_filesystem("/tpl", fs.clone()), fs)
    }

    #[test]
    fn test_resolves_specific_template() {
        let (mut resolver, _) =
            resolver_with(&[("/tpl/posts/article.jinja", "Hello {{ name }}")]);

        assert!(resolver.has_template("posts", "article"));
        let output = resolver
            .render("posts", "article", &json!({"name": "Ada"}))
            .unwrap();
        assert_eq!(output.as_deref(), Some("Hello Ada"));
    }

    #[test]
    fn test_dispatches_on_suffix() {
        let (mut resolver, _) =
            resolver_with(&[("/tpl/posts/plain.txt", "Count: {count}")]);

        let output = resolver
            .render("posts", "plain", &json!({"count": 3}))
            .unwrap();
        assert_eq!(output.as_deref(), Some("Count: 3"));
    }

    #[test]
    fn test_suffix_priority_first_match_wins() {
        let (mut resolver, fs) = resolver_with(&[
            ("/tpl/posts/article.jinja", "from jinja"),
            ("/tpl/posts/article.txt", "from txt"),
        ]);

        let output = resolver.render("posts", "article", &json!({})).unwrap();
        assert_eq!(output.as_deref(), Some("from jinja"));

        // Only the first suffix is probed; the lower-priority candidate is
        // never checked.
        assert_eq!(fs.exists_calls(), 3); // 2 default probes + 1 candidate
    }

    #[test]
    fn test_no_template_no_default() {
        let (mut resolver, _) = resolver_with(&[]);

        assert!(!resolver.has_template("posts", "missing"));
        let output = resolver.render("posts", "missing", &json!({})).unwrap();
        assert_eq!(output, None);
    }

    #[test]
    fn test_default_fallback() {
        let (mut resolver, _) = resolver_with(&[("/tpl/default.txt", "No template")]);

        assert!(resolver.has_default_template());
        assert!(resolver.has_template("posts", "missing"));

        let output = resolver.render("posts", "missing", &json!({})).unwrap();
        assert_eq!(output.as_deref(), Some("No template"));
    }

    #[test]
    fn test_default_probe_priority() {
        let (resolver, _) = resolver_with(&[
            ("/tpl/default.jinja", "jinja default"),
            ("/tpl/default.txt", "txt default"),
        ]);

        assert_eq!(
            resolver.default_template.as_ref().map(|r| r.suffix.as_str()),
            Some(".jinja")
        );
    }

    #[test]
    fn test_cached_resolution_survives_file_change() {
        let (mut resolver, fs) =
            resolver_with(&[("/tpl/posts/article.jinja", "version 1")]);

        let first = resolver.render("posts", "article", &json!({})).unwrap();
        assert_eq!(first.as_deref(), Some("version 1"));

        fs.insert("/tpl/posts/article.jinja", "version 2");

        let second = resolver.render("posts", "article", &json!({})).unwrap();
        assert_eq!(second.as_deref(), Some("version 1"));
    }

    #[test]
    fn test_cached_resolution_stops_probing() {
        let (mut resolver, fs) =
            resolver_with(&[("/tpl/posts/article.jinja", "cached")]);

        resolver.render("posts", "article", &json!({})).unwrap();
        let after_first = fs.exists_calls();

        resolver.render("posts", "article", &json!({})).unwrap();
        resolver.render("posts", "article", &json!({})).unwrap();

        assert_eq!(fs.exists_calls(), after_first);
        assert_eq!(fs.read_calls(), 1);
    }

    #[test]
    fn test_default_fallback_reprobes_each_call() {
        let (mut resolver, fs) = resolver_with(&[("/tpl/default.txt", "fallback")]);
        let baseline = fs.exists_calls();

        resolver.render("posts", "missing", &json!({})).unwrap();
        let per_call = fs.exists_calls() - baseline;
        assert_eq!(per_call, 2); // one probe per suffix

        resolver.render("posts", "missing", &json!({})).unwrap();
        resolver.render("posts", "missing", &json!({})).unwrap();

        assert_eq!(fs.exists_calls() - baseline, 3 * per_call);
    }

    #[test]
    fn test_render_with_modifier_applied_before_engine() {
        let (mut resolver, _) =
            resolver_with(&[("/tpl/posts/article.jinja", "MARKER {{ name }}")]);

        let output = resolver
            .render_with("posts", "article", &json!({"name": "Ada"}), |contents, _| {
                contents.replace("MARKER", "Hello")
            })
            .unwrap();
        assert_eq!(output.as_deref(), Some("Hello Ada"));
    }

    #[test]
    fn test_modifier_sees_data_mapping() {
        let (mut resolver, _) =
            resolver_with(&[("/tpl/posts/article.txt", "ignored")]);

        let output = resolver
            .render_with("posts", "article", &json!({"tag": "news"}), |contents, data| {
                format!("{} [{}]", contents, data["tag"].as_str().unwrap_or(""))
            })
            .unwrap();
        assert_eq!(output.as_deref(), Some("ignored [news]"));
    }

    #[test]
    fn test_engine_failure_propagates() {
        let (mut resolver, _) =
            resolver_with(&[("/tpl/posts/broken.jinja", "{% if %}")]);

        let result = resolver.render("posts", "broken", &json!({}));
        assert!(matches!(result, Err(RenderError::Template(_))));
    }

    #[test]
    fn test_custom_suffix_table_order() {
        let fs = MemoryFilesystem::new();
        fs.insert("/tpl/posts/article.jinja", "from jinja");
        fs.insert("/tpl/posts/article.txt", "from txt");

        // Reversed priority: .txt wins over .jinja.
        let engines: SuffixTable = vec![
            (".txt".to_string(), Box::new(SimpleEngine::new())),
            (".jinja".to_string(), Box::new(MiniJinjaEngine::new())),
        ];
        let mut resolver = TemplateResolver::with_engines("/tpl", engines, fs);

        let output = resolver.render("posts", "article", &json!({})).unwrap();
        assert_eq!(output.as_deref(), Some("from txt"));
    }

    #[test]
    fn test_separate_pairs_cached_independently() {
        let (mut resolver, _) = resolver_with(&[
            ("/tpl/posts/article.jinja", "article"),
            ("/tpl/pages/about.jinja", "about"),
        ]);

        assert_eq!(
            resolver.render("posts", "article", &json!({})).unwrap().as_deref(),
            Some("article")
        );
        assert_eq!(
            resolver.render("pages", "about", &json!({})).unwrap().as_deref(),
            Some("about")
        );
    }

    #[test]
    fn test_serializable_struct_data() {
        #[derive(serde::Serialize)]
        struct Entry {
            title: String,
        }

        let (mut resolver, _) =
            resolver_with(&[("/tpl/posts/article.jinja", "{{ title }}")]);

        let output = resolver
            .render(
                "posts",
                "article",
                &Entry {
                    title: "Launch".into(),
                },
            )
            .unwrap();
        assert_eq!(output.as_deref(), Some("Launch"));
    }
}
