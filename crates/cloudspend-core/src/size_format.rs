//! Human-readable byte sizes
//!
//! Sizes are scaled by powers of 1024 and labelled with the short unit names
//! operators expect from storage consoles (KB, MB, GB, ...).

use crate::rounding::round_to;

/// Unit labels, indexed by power of 1024
pub const SIZE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a byte count as a human-readable string
///
/// Zero and negative counts format as `"0 B"`. The scaled value is rounded
/// to two decimal places; whole values print without a fractional part.
/// Counts beyond the yottabyte range stay expressed in YB.
///
/// # Examples
/// ```
/// use cloudspend_core::size_format::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(1_073_741_824), "1 GB");
/// ```
pub fn format_size(byte_size: impl Into<i128>) -> String {
    let byte_size = byte_size.into();
    if byte_size <= 0 {
        return "0 B".to_string();
    }

    let mut index = 0;
    let mut scale: i128 = 1;
    while index < SIZE_UNITS.len() - 1 && byte_size / scale >= 1024 {
        scale *= 1024;
        index += 1;
    }

    let value = round_to(byte_size as f64 / scale as f64, 2);
    format!("{value} {}", SIZE_UNITS[index])
}
