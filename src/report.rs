use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::issue::Issue;
use crate::path::{encode, Path, PathStep};
use crate::schema::Schema;

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Capability for out-of-band warnings raised while accumulating results.
///
/// Injected rather than ambient so the engine stays free of hidden global
/// effects and tests can observe warnings directly.
pub trait Diagnostics {
    /// A node report is about to overwrite an existing entry for `id`.
    ///
    /// This is expected whenever disambiguation revisits a path (a `oneOf`
    /// match is re-validated at its parent's path), but it can also flag an
    /// accidental key collision, e.g. a property name containing `/`.
    fn duplicate_node(&self, id: &str);
}

/// Default diagnostics: routes warnings through `tracing`.
#[derive(Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn duplicate_node(&self, id: &str) {
        tracing::warn!(id, "overwriting validation result");
    }
}

/// Diagnostics that drop everything. Used for isolated trial sinks, whose
/// side effects must never reach the caller.
#[derive(Debug, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn duplicate_node(&self, _id: &str) {}
}

// ---------------------------------------------------------------------------
// Result model
// ---------------------------------------------------------------------------

/// Per-node snapshot of the schema that governed a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDetails {
    /// Copy of the governing schema node, opaque metadata included.
    pub schema: Schema,
    /// Canonical id of the schema node's location inside the schema
    /// document (diverges from the value path at `oneOf`,
    /// `patternProperties`, and `additionalProperties` branches).
    pub schema_id: String,
    /// Index of the matched `oneOf` alternative, if the governing schema
    /// branched through one.
    pub one_of: Option<usize>,
    /// Whether the immediate parent's `required` list named this value.
    pub required: bool,
}

impl SchemaDetails {
    pub fn new(
        schema: &Schema,
        schema_path: &[PathStep],
        one_of: Option<usize>,
        required: bool,
    ) -> Self {
        Self {
            schema: schema.clone(),
            schema_id: encode(schema_path),
            one_of,
            required,
        }
    }
}

/// The full validation record for one visited value.
///
/// `issues` covers this node's own keyword checks only; children report
/// separately under their own ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultNode {
    pub path: Path,
    pub details: SchemaDetails,
    pub value: Value,
    pub issues: Vec<Issue>,
}

/// Validation results keyed by canonical path id (`""` is the root).
pub type ResultMap = BTreeMap<String, ResultNode>;

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receiver for one node's validation record.
///
/// The engine reports children before parents (postorder) and may report
/// the same id twice when disambiguation revisits a path; implementations
/// must treat the later report as authoritative.
pub trait ReportSink {
    fn report(
        &mut self,
        id: String,
        path: &[PathStep],
        details: SchemaDetails,
        value: &Value,
        issues: Vec<Issue>,
    );
}

/// The default sink: accumulates nodes into a [`ResultMap`] and warns on
/// duplicate ids through the injected [`Diagnostics`].
pub struct MapSink<'d> {
    map: ResultMap,
    diagnostics: &'d dyn Diagnostics,
}

impl<'d> MapSink<'d> {
    pub fn new(diagnostics: &'d dyn Diagnostics) -> Self {
        Self {
            map: ResultMap::new(),
            diagnostics,
        }
    }

    /// A fully isolated sink for trial validation passes. No warnings
    /// escape; only the accumulated issue count is meant to be read back.
    pub fn silent() -> MapSink<'static> {
        MapSink {
            map: ResultMap::new(),
            diagnostics: &NullDiagnostics,
        }
    }

    pub fn into_map(self) -> ResultMap {
        self.map
    }

    /// Total issues across every node recorded so far.
    ///
    /// Counts the map, not the report stream, so a node revisited during
    /// a trial contributes its final issue list once.
    pub fn issue_count(&self) -> usize {
        self.map.values().map(|n| n.issues.len()).sum()
    }

    pub(crate) fn node(&self, id: &str) -> Option<&ResultNode> {
        self.map.get(id)
    }
}

impl ReportSink for MapSink<'_> {
    fn report(
        &mut self,
        id: String,
        path: &[PathStep],
        details: SchemaDetails,
        value: &Value,
        issues: Vec<Issue>,
    ) {
        tracing::debug!(id = %id, issues = issues.len(), "validated node");
        if self.map.contains_key(&id) {
            self.diagnostics.duplicate_node(&id);
        }
        self.map.insert(
            id,
            ResultNode {
                path: path.to_vec(),
                details,
                value: value.clone(),
                issues,
            },
        );
    }
}
