//! ArtifactService port - artifact メタデータの参照
//!
//! scan イベントの組み立てに必要な座標（project, repository, digest,
//! manifest media type）だけを扱う。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ArtifactId, ServiceError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub project_id: i64,
    pub repository_name: String,
    pub digest: String,
    pub manifest_media_type: String,
}

/// Extra data to load alongside the artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactOption {
    pub with_tag: bool,
    pub with_label: bool,
}

#[async_trait]
pub trait ArtifactService: Send + Sync {
    async fn get(
        &self,
        id: ArtifactId,
        option: Option<ArtifactOption>,
    ) -> Result<Artifact, ServiceError>;
}
