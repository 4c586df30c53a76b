use std::fmt;

use serde::Serialize;

/// One step of a path into a value tree: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

/// An ordered sequence of steps locating a value (or a schema node) inside
/// its document, root first.
pub type Path = Vec<PathStep>;

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(k) => f.write_str(k),
            PathStep::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

/// Encode a path as its canonical id: `""` for the root, otherwise the
/// steps joined by `/` with a leading `/` (`["a", 0, "b"]` → `"/a/0/b"`).
///
/// Every place a path becomes a result-map key goes through this function.
///
/// Known limitation: a property name containing `/` collides with the
/// separator. Callers that need such names must escape them before
/// validation; the codec deliberately does not.
pub fn encode(path: &[PathStep]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut id = String::new();
    for step in path {
        id.push('/');
        id.push_str(&step.to_string());
    }
    id
}

/// `path` extended with one more step. Paths are short, so the clone is
/// cheaper than threading mutation through the recursion.
pub(crate) fn child(path: &[PathStep], step: impl Into<PathStep>) -> Path {
    let mut out = path.to_vec();
    out.push(step.into());
    out
}
