//! Schema of the check-in/check-out records.
//!
//! One `CheckInCheckOut` document per building or unit, provisioned
//! outside this service. Each has a `cleaning` sub-collection with the
//! `outCheckList` and `inCheckList` documents.

/// Root collection of building records.
pub const CHECK_IN_CHECK_OUT: &str = "CheckInCheckOut";

/// Field associating a physical device with a building record.
pub const DEVICE_ID: &str = "deviceId";
pub const STATUS: &str = "status";
pub const CHECK_OUT: &str = "checkOut";
pub const LAST_DEVICE: &str = "lastDevice";

/// Sub-collection holding the cleaning checklists.
pub const CLEANING: &str = "cleaning";
pub const OUT_CHECK_LIST: &str = "outCheckList";
pub const IN_CHECK_LIST: &str = "inCheckList";

/// Flag on `outCheckList`.
pub const IN_CHECK: &str = "inCheck";
/// Flag on `inCheckList`.
pub const OUT_CHECK: &str = "outCheck";

/// `status` value of a vacated record. Occupied records carry `1`.
pub const STATUS_CHECKED_OUT: i64 = 2;
