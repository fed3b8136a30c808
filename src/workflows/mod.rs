// SPDX-License-Identifier: GPL-3.0-only

//! Inspection workflow definitions
//!
//! Workflows are free-form JSON objects stored one per file under
//! `workflows/qc_workflows` and `workflows/maintenance_workflows`. They are
//! loaded verbatim with no schema; the loader only records where each one
//! came from.

pub mod loader;
pub mod types;

pub use loader::WorkflowLoader;
pub use types::{Workflow, WorkflowType};
