//! App - アプリケーション層
//!
//! ports を組み合わせてコールバック処理を実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: 構築とワイヤリング（起動時検証）
//! - **CallbackRegistry**: job kind ごとの処理の登録と解決
//! - **CallbackDispatcher**: コールバックの分類と適用
//! - **finalizers**: scan / retention / notification の処理
//! - **EventEmitter**: イベントの組み立てと発行
//! - **ScanAllCallback**: スケジュール起動の scan all

pub mod builder;
pub mod dispatcher;
pub mod emitter;
pub mod finalizers;
pub mod registry;
pub mod scan_all;

#[cfg(test)]
pub(crate) mod testing;

pub use self::builder::{App, AppBuilder, BuildError, Collaborators};
pub use self::dispatcher::CallbackDispatcher;
pub use self::emitter::{EventEmitter, EventError};
pub use self::registry::{
    CallbackRegistry, CheckInProcessor, RegistryBuilder, RegistryError, StatusChangeEntry,
    StatusChangeHandler, StatusChangePostFunc,
};
pub use self::scan_all::{SCAN_ALL_CALLBACK, ScanAllCallback};
