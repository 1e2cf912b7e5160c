pub mod enums;
pub mod medication;
pub mod patient;
pub mod validation;
pub mod vital_sign;

pub use enums::*;
pub use medication::*;
pub use patient::*;
pub use validation::*;
pub use vital_sign::*;

use chrono::{NaiveDateTime, Timelike, Utc};

/// Current UTC time truncated to whole seconds, the precision timestamps are
/// stored at.
pub(crate) fn timestamp_now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}
