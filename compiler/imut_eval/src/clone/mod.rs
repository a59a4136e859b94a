//! Selective cloning.
//!
//! Given the resolved write paths of a procedure, copy exactly the nodes a
//! path passes through and share everything else with the original tree.
//! A node that is only the *target* of a write (the last key of a path) is
//! not copied: its parent is, and the write replaces the shared handle.
//!
//! # Frontier
//!
//! At every node the remaining path suffixes are grouped by their first key.
//! Each group decides what happens to one child: recurse into it, drop it
//! (a map key whose every suffix is a terminal `delete`) or leave it shared.

use crate::StructuralCloneWarning;
use imut_paths::{Effect, ResolvedPath};
use imut_stack::ensure_sufficient_stack;
use imut_value::{parse_index, Class, Fields, Record, Value};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;

/// Remaining keys of one path below the current node.
#[derive(Copy, Clone, Debug)]
struct Suffix<'p> {
    keys: &'p [String],
    effect: Effect,
}

impl Suffix<'_> {
    fn is_terminal(self) -> bool {
        self.keys.is_empty()
    }
}

/// Suffixes grouped by first key, in first-seen order.
type Frontier<'p> = IndexMap<&'p str, Vec<Suffix<'p>>, FxBuildHasher>;

fn frontier<'p>(suffixes: &[Suffix<'p>]) -> Frontier<'p> {
    let mut groups = Frontier::default();
    for suffix in suffixes {
        if let Some((first, rest)) = suffix.keys.split_first() {
            groups.entry(first.as_str()).or_default().push(Suffix {
                keys: rest,
                effect: suffix.effect,
            });
        }
    }
    groups
}

/// Result of [`SelectiveCloner::clone_root`].
#[derive(Debug)]
pub struct Cloned {
    pub root: Value,
    /// Paths that ran past the shape of the tree. Non-fatal.
    pub warnings: Vec<StructuralCloneWarning>,
}

#[derive(Copy, Clone, Debug)]
pub struct SelectiveCloner {
    preserve_concrete_type: bool,
}

impl SelectiveCloner {
    pub fn new() -> Self {
        SelectiveCloner {
            preserve_concrete_type: true,
        }
    }

    /// Rebuild copied records through their class constructor (`true`) or
    /// as bare records (`false`).
    #[must_use]
    pub fn preserve_concrete_type(mut self, preserve: bool) -> Self {
        self.preserve_concrete_type = preserve;
        self
    }

    /// Copy every node of `root` that a path continues through.
    ///
    /// The returned root is freshly allocated whenever `paths` is non-empty,
    /// and every copied node is held only by its new parent.
    pub fn clone_root(&self, root: &Value, paths: &[ResolvedPath]) -> Cloned {
        let suffixes: Vec<Suffix<'_>> = paths
            .iter()
            .map(|path| Suffix {
                keys: &path.keys,
                effect: path.effect,
            })
            .collect();
        let mut walk = Walk {
            preserve_concrete_type: self.preserve_concrete_type,
            trail: Vec::new(),
            warnings: Vec::new(),
        };
        let root = walk.clone_node(root, &suffixes);
        Cloned {
            root,
            warnings: walk.warnings,
        }
    }
}

impl Default for SelectiveCloner {
    fn default() -> Self {
        Self::new()
    }
}

struct Walk<'p> {
    preserve_concrete_type: bool,
    /// Keys from the root to the node being cloned.
    trail: Vec<&'p str>,
    warnings: Vec<StructuralCloneWarning>,
}

impl<'p> Walk<'p> {
    fn clone_node(&mut self, value: &Value, suffixes: &[Suffix<'p>]) -> Value {
        ensure_sufficient_stack(|| {
            let groups = frontier(suffixes);
            if groups.is_empty() {
                return value.clone();
            }
            match value {
                Value::Date(date) => {
                    tracing::trace!(at = %self.at(), "copy date");
                    Value::date(date.millis)
                }
                Value::List(items) => {
                    tracing::trace!(at = %self.at(), len = items.len(), "copy list");
                    let mut items = items.to_vec();
                    for (key, tails) in &groups {
                        if tails.iter().all(|t| t.is_terminal()) {
                            continue;
                        }
                        match parse_index(key).filter(|&i| i < items.len()) {
                            Some(index) => {
                                let child = self.descend(*key, &items[index], tails);
                                items[index] = child;
                            }
                            None => self.absent(key),
                        }
                    }
                    Value::list(items)
                }
                Value::Map(entries) => {
                    tracing::trace!(at = %self.at(), len = entries.len(), "copy map");
                    let mut entries: Fields = (**entries).clone();
                    for (key, tails) in &groups {
                        if tails
                            .iter()
                            .all(|t| t.is_terminal() && t.effect == Effect::MapDelete)
                        {
                            entries.shift_remove(*key);
                            continue;
                        }
                        if tails.iter().all(|t| t.is_terminal()) {
                            continue;
                        }
                        let Some(child) = entries.get(*key) else {
                            self.absent(key);
                            continue;
                        };
                        let child = self.descend(*key, child, tails);
                        entries.insert((*key).to_string(), child);
                    }
                    Value::map(entries)
                }
                Value::Record(record) => {
                    tracing::trace!(at = %self.at(), class = ?record.class_name(), "copy record");
                    let (class, mut fields) = self.record_base(record);
                    for (key, tails) in &groups {
                        if tails.iter().all(|t| t.is_terminal()) {
                            continue;
                        }
                        let Some(child) = record.fields.get(*key) else {
                            self.absent(key);
                            continue;
                        };
                        let child = self.descend(*key, child, tails);
                        fields.insert((*key).to_string(), child);
                    }
                    match class {
                        Some(class) => Value::instance(class, fields),
                        None => Value::record(fields),
                    }
                }
                Value::Undefined
                | Value::Null
                | Value::Bool(_)
                | Value::Number(_)
                | Value::Str(_) => {
                    self.warn(StructuralCloneWarning::PastScalar {
                        path: self.at(),
                        type_name: value.type_name(),
                    });
                    value.clone()
                }
            }
        })
    }

    /// Class and field handles of a record copy. The class survives only
    /// when it is requested and the class has a constructor to rebuild from.
    fn record_base(&self, record: &Record) -> (Option<Arc<Class>>, Fields) {
        let constructed = record
            .class
            .as_ref()
            .filter(|_| self.preserve_concrete_type)
            .and_then(|class| Some((Arc::clone(class), class.construct()?)));
        match constructed {
            Some((class, mut fields)) => {
                for (key, value) in &record.fields {
                    fields.insert(key.clone(), value.clone());
                }
                (Some(class), fields)
            }
            None => (None, record.fields.clone()),
        }
    }

    fn descend(&mut self, key: &'p str, child: &Value, tails: &[Suffix<'p>]) -> Value {
        self.trail.push(key);
        let copy = self.clone_node(child, tails);
        self.trail.pop();
        copy
    }

    fn absent(&mut self, key: &str) {
        let path = if self.trail.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.at())
        };
        self.warn(StructuralCloneWarning::AbsentKey {
            path,
            key: key.to_string(),
        });
    }

    fn warn(&mut self, warning: StructuralCloneWarning) {
        tracing::warn!(%warning, "write path does not match the state");
        self.warnings.push(warning);
    }

    fn at(&self) -> String {
        self.trail.join(".")
    }
}

#[cfg(test)]
mod tests;
