//! InMemoryScheduler - 名前付きコールバックの登録と手動発火
//!
//! 実際の cron 評価は行わない。`fire` で登録済みコールバックを呼び出す。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::{ScheduleCallback, Scheduler, SchedulerError};

#[derive(Default)]
pub struct InMemoryScheduler {
    callbacks: Mutex<HashMap<String, Arc<dyn ScheduleCallback>>>,
}

impl InMemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered callback names, sorted.
    pub fn callbacks(&self) -> Vec<String> {
        let callbacks = self.callbacks.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<_> = callbacks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Run the callback registered under `name`.
    pub async fn fire(&self, name: &str, param: &str) -> Result<(), SchedulerError> {
        // ロックを await の外で解放する
        let callback = self
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| SchedulerError::UnknownCallback(name.to_string()))?;
        callback.run(param).await
    }
}

impl Scheduler for InMemoryScheduler {
    fn register_callback(
        &self,
        name: &str,
        callback: Arc<dyn ScheduleCallback>,
    ) -> Result<(), SchedulerError> {
        let mut callbacks = self.callbacks.lock().unwrap_or_else(PoisonError::into_inner);
        if callbacks.contains_key(name) {
            return Err(SchedulerError::DuplicateCallback(name.to_string()));
        }
        callbacks.insert(name.to_string(), callback);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting(AtomicUsize);

    #[async_trait]
    impl ScheduleCallback for Counting {
        async fn run(&self, _param: &str) -> Result<(), SchedulerError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn fires_registered_callback() {
        let scheduler = InMemoryScheduler::new();
        let callback = Arc::new(Counting::default());
        scheduler.register_callback("tick", callback.clone()).unwrap();

        scheduler.fire("tick", "").await.unwrap();

        assert_eq!(callback.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejects_duplicates_and_unknown_names() {
        let scheduler = InMemoryScheduler::new();
        scheduler
            .register_callback("tick", Arc::new(Counting::default()))
            .unwrap();

        assert_eq!(
            scheduler.register_callback("tick", Arc::new(Counting::default())),
            Err(SchedulerError::DuplicateCallback("tick".to_string()))
        );
        assert_eq!(
            scheduler.fire("tock", "").await,
            Err(SchedulerError::UnknownCallback("tock".to_string()))
        );
    }
}
