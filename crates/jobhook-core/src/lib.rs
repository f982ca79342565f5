//! jobhook-core
//!
//! Job-execution callback core: receives status / check-in callbacks from a
//! job engine and applies them to task records, cleans up per-job resources
//! and publishes domain events.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, job_kind, status, task, payload, report, events, outcome, revision, errors）
//! - **ports**: 抽象化レイヤー（TaskStore, NotificationJobStore, ScanController, EventBus, Scheduler, など）
//! - **app**: アプリケーションロジック（builder, registry, dispatcher, finalizers, emitter, scan_all）
//! - **impls**: ports の in-memory 実装（開発用・テスト用）
//! - **config**: 実行時設定
//! - **observability**: ログ初期化と span

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;
