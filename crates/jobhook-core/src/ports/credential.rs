//! CredentialService port - scan 用に払い出した robot account の管理

use async_trait::async_trait;

use crate::domain::{RobotId, ServiceError};

#[async_trait]
pub trait CredentialService: Send + Sync {
    async fn delete(&self, id: RobotId) -> Result<(), ServiceError>;
}
