//! IdGenerator port - イベント ID の採番
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（時刻でソート可能、調整なしで分散生成できる）

use crate::domain::EventId;
use crate::ports::Clock;
use ulid::Ulid;

pub trait IdGenerator: Send + Sync {
    fn generate_event_id(&self) -> EventId;
}

/// UlidGenerator は Clock の時刻を timestamp 部に使う
///
/// FixedClock を渡すと timestamp 部が固定され、テストで検証しやすい。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_event_id(&self) -> EventId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        EventId::from_ulid(Ulid::from_parts(timestamp_ms, rand::random()))
    }
}
