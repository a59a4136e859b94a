//! The update pipeline: compile, resolve, copy, run, freeze.

use crate::error::UpdateError;
use crate::options::{self, UpdateOptions};
use imut_eval::{Interpreter, SelectiveCloner};
use imut_paths::{resolve, PathCache};
use imut_value::Value;

/// New root equal to `root` after running the procedure in `source` on it.
///
/// `root` is never written. The result shares every subtree the procedure
/// does not write with `root`, and has fresh nodes along each written path.
///
/// Map entries the procedure only deletes are dropped from the copy before
/// it runs. Reading such an entry in the same procedure sees `undefined`,
/// and the `delete` call itself returns `false`.
///
/// ```text
/// update(&state, "(s, id) => { s.entries.get(id).done = true }", Some(&id), None)
/// ```
pub fn update(
    root: &Value,
    source: &str,
    args: Option<&Value>,
    options: Option<&UpdateOptions>,
) -> Result<Value, UpdateError> {
    let mut update = Update::new(source);
    if let Some(args) = args {
        update = update.args(args.clone());
    }
    if let Some(options) = options {
        update = update.options(*options);
    }
    update.apply(root)
}

/// A configured update, reusable across roots.
#[derive(Clone, Debug)]
pub struct Update<'a> {
    source: &'a str,
    args: Option<Value>,
    captures: Vec<(String, Value)>,
    options: Option<UpdateOptions>,
    cache: Option<&'a PathCache>,
}

impl<'a> Update<'a> {
    pub fn new(source: &'a str) -> Self {
        Update {
            source,
            args: None,
            captures: Vec::new(),
            options: None,
            cache: None,
        }
    }

    /// Runtime argument, bound to the second parameter.
    #[must_use]
    pub fn args(mut self, args: Value) -> Self {
        self.args = Some(args);
        self
    }

    /// Outer variable the procedure may read (but not rebind) under `name`.
    #[must_use]
    pub fn capture(mut self, name: impl Into<String>, value: Value) -> Self {
        self.captures.push((name.into(), value));
        self
    }

    #[must_use]
    pub fn options(mut self, options: UpdateOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Compile through `cache` instead of [`PathCache::global`].
    #[must_use]
    pub fn cache(mut self, cache: &'a PathCache) -> Self {
        self.cache = Some(cache);
        self
    }

    #[tracing::instrument(level = "debug", skip_all, fields(len = self.source.len()))]
    pub fn apply(&self, root: &Value) -> Result<Value, UpdateError> {
        let cache = self.cache.unwrap_or_else(|| PathCache::global());
        let compiled = cache.compile(self.source)?;
        if compiled.paths.is_empty() {
            return Err(UpdateError::EmptyUpdate);
        }

        let resolved = resolve(&compiled.paths, self.args.as_ref())?;
        let options = options::effective(self.options.as_ref());
        tracing::trace!(paths = resolved.len(), ?options, "paths resolved");

        let cloned = SelectiveCloner::new()
            .preserve_concrete_type(options.preserve_concrete_type)
            .clone_root(root, &resolved);
        if !cloned.warnings.is_empty() {
            tracing::debug!(warnings = cloned.warnings.len(), "copied with structural warnings");
        }

        let mut interpreter = Interpreter::new(&compiled.procedure);
        for (name, value) in &self.captures {
            interpreter.capture(name, value.clone());
        }
        let result = interpreter.run(cloned.root, self.args.clone())?;

        if options.freeze_result {
            result.deep_freeze();
        }
        Ok(result)
    }
}
