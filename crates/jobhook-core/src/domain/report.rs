//! Check-in payloads: kind-specific progress reports carried in `check_in`.

use serde::{Deserialize, Serialize};

/// Scan progress: the raw scanner report for one artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInReport {
    pub digest: String,
    pub registration_uuid: String,
    pub mime_type: String,
    pub raw_report: String,
}

impl CheckInReport {
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

/// An artifact considered by a retention sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub digest: String,
}

/// Outcome of deleting one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionResult {
    pub target: Candidate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Retention progress: how many candidates were seen, kept and deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetainObject {
    pub total: i64,
    pub retained: i64,
    #[serde(default)]
    pub deleted: Vec<DeletionResult>,
}

impl RetainObject {
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_object_decodes_deleted_targets() {
        let data = r#"{
            "total": 10,
            "retained": 7,
            "deleted": [
                {"target": {"namespace": "library", "repository": "nginx", "tags": ["1.0"], "digest": "sha256:a"}},
                {"target": {"repository": "redis"}, "error": "locked"}
            ]
        }"#;
        let obj = RetainObject::from_json(data).unwrap();
        assert_eq!(obj.total, 10);
        assert_eq!(obj.retained, 7);
        assert_eq!(obj.deleted.len(), 2);
        assert_eq!(obj.deleted[0].target.tags, vec!["1.0".to_string()]);
        assert_eq!(obj.deleted[1].error.as_deref(), Some("locked"));
    }

    #[test]
    fn retain_object_requires_counters() {
        assert!(RetainObject::from_json(r#"{"deleted": []}"#).is_err());
    }

    #[test]
    fn check_in_report_rejects_non_json() {
        assert!(CheckInReport::from_json("not json").is_err());
    }
}
