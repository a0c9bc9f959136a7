mod time_utils;

pub use time_utils::{
    TimeUtils, epoch_secs_to_utc, format_clock, format_duration, format_naive, parse_backend_time,
};
