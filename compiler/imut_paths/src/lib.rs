//! Write-path analysis for mutation procedures.
//!
//! - [`extract`] walks a parsed procedure and lists every root-relative path
//!   it writes through the state parameter.
//! - [`PathCache`] memoizes parse + extraction by exact source text.
//! - [`resolve`] substitutes the runtime argument into marker segments.

mod cache;
mod error;
mod extract;
mod resolve;

pub use cache::{CacheStats, Compiled, PathCache};
pub use error::{AnalysisError, ArgumentShapeError, CompileError};
pub use extract::extract;
pub use resolve::resolve;

use smallvec::SmallVec;
use std::fmt;

/// One step of a path.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    /// Key fixed at analysis time.
    Key(String),
    /// `%name`: field `name` of the runtime argument.
    NamedArg(String),
    /// `%`: the runtime argument itself.
    WholeArg,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::NamedArg(name) => write!(f, "%{name}"),
            Segment::WholeArg => f.write_str("%"),
        }
    }
}

/// How the last step of a path is written.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    /// Plain `=` assignment.
    Assign,
    /// `map.set(key, value)`.
    MapSet,
    /// `map.delete(key)`.
    MapDelete,
}

/// Segments of a typical path fit inline.
pub type Segments = SmallVec<[Segment; 4]>;

/// One discovered write, relative to the state root. Never empty.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub segments: Segments,
    pub effect: Effect,
}

impl Path {
    pub fn new(segments: impl IntoIterator<Item = Segment>, effect: Effect) -> Self {
        Path {
            segments: segments.into_iter().collect(),
            effect,
        }
    }

    /// Whether resolving this path needs the runtime argument.
    pub fn has_markers(&self) -> bool {
        self.segments
            .iter()
            .any(|s| !matches!(s, Segment::Key(_)))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// A path with every marker replaced by a concrete key.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedPath {
    pub keys: SmallVec<[String; 4]>,
    pub effect: Effect,
}

impl ResolvedPath {
    pub fn new<K: Into<String>>(keys: impl IntoIterator<Item = K>, effect: Effect) -> Self {
        ResolvedPath {
            keys: keys.into_iter().map(Into::into).collect(),
            effect,
        }
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keys.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_display_with_markers() {
        let path = Path::new(
            [
                Segment::Key("entries".into()),
                Segment::NamedArg("id".into()),
                Segment::Key("text".into()),
            ],
            Effect::Assign,
        );
        assert_eq!(path.to_string(), "entries.%id.text");
        assert!(path.has_markers());

        let whole = Path::new([Segment::Key("map".into()), Segment::WholeArg], Effect::MapSet);
        assert_eq!(whole.to_string(), "map.%");

        let plain = Path::new([Segment::Key("a".into())], Effect::Assign);
        assert!(!plain.has_markers());
    }

    #[test]
    fn resolved_paths_join_keys() {
        let path = ResolvedPath::new(["a", "3", "b"], Effect::Assign);
        assert_eq!(path.to_string(), "a.3.b");
    }
}
