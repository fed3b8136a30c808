// SPDX-License-Identifier: GPL-3.0-only

//! Workflow document and type

use crate::constants::workflow::{FILE_PATH_KEY, NAME_KEY, STEPS_KEY};
use crate::errors::WorkflowError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which workflow directory a document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    Qc,
    Maintenance,
}

impl WorkflowType {
    pub const ALL: [WorkflowType; 2] = [WorkflowType::Qc, WorkflowType::Maintenance];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::Qc => "qc",
            WorkflowType::Maintenance => "maintenance",
        }
    }
}

impl FromStr for WorkflowType {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qc" => Ok(WorkflowType::Qc),
            "maintenance" => Ok(WorkflowType::Maintenance),
            other => Err(WorkflowError::UnknownType(other.to_string())),
        }
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workflow loaded from disk
///
/// The document is kept exactly as parsed, plus the reserved
/// `_file_path` key holding the source path.
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    document: Map<String, Value>,
    file_path: PathBuf,
    kind: Option<WorkflowType>,
}

impl Workflow {
    /// Wrap a parsed document, recording its source path under `_file_path`
    pub fn new(mut document: Map<String, Value>, file_path: PathBuf) -> Self {
        document.insert(
            FILE_PATH_KEY.to_string(),
            Value::String(file_path.to_string_lossy().to_string()),
        );
        Self {
            document,
            file_path,
            kind: None,
        }
    }

    pub(crate) fn with_kind(mut self, kind: WorkflowType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Directory the workflow was loaded from, if loaded by type
    pub fn kind(&self) -> Option<WorkflowType> {
        self.kind
    }

    /// Display name: the `name` key if it is a string, else the file stem
    pub fn name(&self) -> String {
        self.document
            .get(NAME_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.file_stem())
    }

    pub fn file_stem(&self) -> String {
        self.file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Inspection steps, if the document has a `steps` array
    pub fn steps(&self) -> Option<&Vec<Value>> {
        self.document.get(STEPS_KEY).and_then(Value::as_array)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// True when the file held no keys of its own
    pub fn is_empty(&self) -> bool {
        self.document.keys().all(|key| key == FILE_PATH_KEY)
    }

    pub fn into_document(self) -> Map<String, Value> {
        self.document
    }
}

impl Serialize for Workflow {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_file_path_is_recorded() {
        let workflow = Workflow::new(
            object(json!({"name": "Pump housing"})),
            PathBuf::from("/station/workflows/qc_workflows/pump.json"),
        );
        assert_eq!(
            workflow.get(FILE_PATH_KEY),
            Some(&json!("/station/workflows/qc_workflows/pump.json"))
        );
        assert_eq!(workflow.name(), "Pump housing");
    }

    #[test]
    fn test_name_falls_back_to_file_stem() {
        let workflow = Workflow::new(
            object(json!({"name": 42, "steps": [{"title": "Check seal"}]})),
            PathBuf::from("gearbox_check.json"),
        );
        assert_eq!(workflow.name(), "gearbox_check");
        assert_eq!(workflow.steps().map(Vec::len), Some(1));
    }

    #[test]
    fn test_empty_document() {
        let empty = Workflow::new(Map::new(), PathBuf::from("blank.json"));
        assert!(empty.is_empty());

        let filled = Workflow::new(object(json!({"steps": []})), PathBuf::from("a.json"));
        assert!(!filled.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_document() {
        let workflow = Workflow::new(object(json!({"a": 1})), PathBuf::from("a.json"));
        let value = serde_json::to_value(&workflow).unwrap();
        assert_eq!(value, json!({"a": 1, "_file_path": "a.json"}));
    }

    #[test]
    fn test_workflow_type_parsing() {
        assert_eq!("qc".parse::<WorkflowType>(), Ok(WorkflowType::Qc));
        assert_eq!(
            "maintenance".parse::<WorkflowType>(),
            Ok(WorkflowType::Maintenance)
        );
        assert_eq!(
            "QC".parse::<WorkflowType>(),
            Err(WorkflowError::UnknownType("QC".to_string()))
        );
    }
}
