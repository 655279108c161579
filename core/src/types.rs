//! Identifiers and documents exchanged with the backend.
//!
//! # Design
//! Job and run documents are owned by the backend and their shape may change
//! without notice, so they stay untyped JSON behind transparent newtypes.
//! The client never looks inside them; the accessors exist for callers that
//! want to chain calls (e.g. take the `id` of an uploaded job).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a backend job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a single execution of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RunId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A job as returned by upload, parse and generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobDocument(pub Value);

impl JobDocument {
    pub fn id(&self) -> Option<JobId> {
        self.0.get("id").and_then(Value::as_u64).map(JobId)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// A run as returned by execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunDocument(pub Value);

impl RunDocument {
    pub fn id(&self) -> Option<RunId> {
        self.0.get("id").and_then(Value::as_u64).map(RunId)
    }

    pub fn job_id(&self) -> Option<JobId> {
        self.0.get("job_id").and_then(Value::as_u64).map(JobId)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Artifacts recorded for a job, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactList(pub Vec<Value>);

impl ArtifactList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Liveness document from the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthStatus(pub Value);
