//! Per-location validation of JSON value trees against declarative
//! constraint schemas.
//!
//! Instead of a single pass/fail verdict, [`validate_all`] walks a value
//! and its governing [`Schema`] together and produces a [`ResultMap`]:
//! one record per visited location, carrying the issues found there, a
//! snapshot of the governing schema node, and whether the parent required
//! the value. Downstream tooling (form generation, error display) can
//! then address individual fields by their canonical path id.
//!
//! The streaming entry point [`validate`] reports through a caller-owned
//! [`ReportSink`] instead, for incremental consumption or custom
//! duplicate-id policies.

pub mod issue;
pub mod path;
pub mod report;
pub mod schema;
pub mod value;

mod resolve;

pub mod validate;

pub use issue::{Issue, IssueKind};
pub use path::{encode, Path, PathStep};
pub use report::{
    Diagnostics, MapSink, NullDiagnostics, ReportSink, ResultMap, ResultNode, SchemaDetails,
    TracingDiagnostics,
};
pub use schema::{Schema, SchemaParseError};
pub use validate::{validate, validate_all, validate_all_with};
pub use value::{classify, ValueKind};
