//! Finalizers - job kind ごとのコールバック処理
//!
//! | kind             | check-in | status-change              |
//! |------------------|----------|----------------------------|
//! | `IMAGE_SCAN`     | scan     | post func（終端の後始末）  |
//! | `IMAGE_SCAN_ALL` | scan     | -                          |
//! | `RETENTION`      | retention| handler（revision 条件付き）|
//! | `NOTIFICATION`   | -        | handler（部分更新）        |

pub mod notification;
pub mod retention;
pub mod scan;

pub use self::notification::NotificationFinalizer;
pub use self::retention::RetentionFinalizer;
pub use self::scan::ScanFinalizer;
