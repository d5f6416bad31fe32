//! Human-readable summary line for a request log record.

use std::fmt::Write;

use super::event::HttpLogFields;

/// Render `"<method> <url> : <status>, [<n> bytes in ]<ms> ms"`.
///
/// The byte clause is present only for a known, non-zero response size.
pub fn construct_message<F: HttpLogFields + ?Sized>(fields: &F) -> String {
    let mut msg = String::with_capacity(fields.url().len() + 48);
    let _ = write!(msg, "{} {} : {}, ", fields.method(), fields.url(), fields.status());
    if let Some(size) = fields.response_size().filter(|&n| n > 0) {
        let _ = write!(msg, "{} bytes in ", size);
    }
    msg.push_str(&pretty_time(fields.duration_micros()));
    msg
}

/// Microseconds as milliseconds with one decimal, e.g. `1.0 ms`.
///
/// Ties round up: `150` renders as `0.2 ms`.
pub fn pretty_time(micros: u64) -> String {
    let tenths = micros.saturating_add(50) / 100;
    format!("{}.{} ms", tenths / 10, tenths % 10)
}
