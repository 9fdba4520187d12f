mod native;

pub use native::timestamp::{Clock, ManualClock, SystemClock};
