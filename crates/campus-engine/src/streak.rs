use std::collections::HashSet;

use chrono::NaiveDate;

/// Compute the streak after a check-in has been appended for `today`.
///
/// `history` is the user's full set of check-in dates, today's new event
/// included; order and duplicates don't matter. The raw streak is the number
/// of consecutive days (today, today-1, ...) that appear in the history.
///
/// The reset rule takes precedence over the raw walk: if the user's recorded
/// `last_active` date is neither today nor yesterday, a gap was observed and
/// the streak restarts at exactly 1, no matter what the history says. On a
/// first-ever check-in (`last_active` absent) the raw count stands.
///
/// Caller precondition: the duplicate-check-in guard has already rejected the
/// request if the user checked in today before.
pub fn streak_after_checkin(
    history: &[NaiveDate],
    last_active: Option<NaiveDate>,
    today: NaiveDate,
) -> u32 {
    let days: HashSet<NaiveDate> = history.iter().copied().collect();

    let mut streak = 0u32;
    let mut cursor = today;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }

    if let Some(last) = last_active {
        let yesterday = today.pred_opt();
        if last != today && Some(last) != yesterday {
            return 1;
        }
    }

    streak
}
