//! EventBus port - ドメインイベントの配送
//!
//! 配送の仕組み（非同期化・リトライ）は bus 側の責務。

use async_trait::async_trait;

use crate::domain::{Event, ServiceError};

#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: &Event) -> Result<(), ServiceError>;
}
