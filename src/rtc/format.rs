//! Time and date strings as the watchfaces expect them

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 12 hour clock without hour padding, `"6:24 AM"`, `"12:05 PM"`, or `"6:24"`
pub fn format_time(hour: u8, minute: u8, include_ampm: bool) -> String {
    let is_pm = hour >= 12;
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };

    let mut out = format!("{}:{:02}", display_hour, minute);
    if include_ampm {
        out.push_str(if is_pm { " PM" } else { " AM" });
    }
    out
}

/// `"Oct 20"`, months outside 1..=12 fall back to January
pub fn format_date(month: u8, day: u8) -> String {
    let index = match month {
        1..=12 => usize::from(month - 1),
        _ => 0,
    };
    format!("{} {}", MONTH_NAMES[index], day)
}
