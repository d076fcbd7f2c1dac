//! Temporal axis math.
//!
//! Pure functions mapping calendar dates onto a bounded visual axis expressed
//! in percentages, plus header tick enumeration and granularity selection.
//! Nothing here clamps or clips: out-of-range results are meaningful (they
//! tell the renderer an event sits outside the visible window) and callers
//! apply their own clip-or-skip policy.

use chrono::{Datelike, Days, NaiveDate};

/// Header tick resolution for a visible window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    /// Daily ticks, spans of up to 14 days.
    Day,
    /// Weekly ticks, spans of up to 90 days.
    Week,
    /// Monthly ticks for anything longer.
    Month,
}

/// Position of `date` on the `[start, end]` window, scaled to `[0, 100]`.
///
/// Dates before `start` map below 0 and dates after `end` above 100; callers
/// decide whether to clip or skip. A degenerate window (`end <= start`) maps
/// everything to 0.
#[must_use]
pub fn position(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> f64 {
    let span = (end - start).num_days();
    if span <= 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let fraction = (date - start).num_days() as f64 / span as f64;
    fraction * 100.0
}

/// Width of a range event on the `[start, end]` window, as a percentage.
///
/// Never negative; a zero-length event has zero width. Events partially
/// outside the window produce widths the caller may clip.
#[must_use]
pub fn width(
    event_start: NaiveDate,
    event_end: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
) -> f64 {
    (position(event_end, start, end) - position(event_start, start, end)).max(0.0)
}

/// Inclusive enumeration of month-start dates covering `[start, end]`.
///
/// Begins at the first day of `start`'s month and ends with the first day of
/// `end`'s month. Empty when `end` precedes `start`.
#[must_use]
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    if end < start {
        return months;
    }
    let mut current = first_of_month(start);
    let last = first_of_month(end);
    while current <= last {
        months.push(current);
        current = next_month(current);
    }
    months
}

/// Selects the tick resolution for a window.
///
/// Deterministic in `(start, end)` only, so every rendering target computes
/// the same header.
#[must_use]
pub fn scale_for(start: NaiveDate, end: NaiveDate) -> AxisScale {
    let span_days = (end - start).num_days();
    if span_days <= 14 {
        AxisScale::Day
    } else if span_days <= 90 {
        AxisScale::Week
    } else {
        AxisScale::Month
    }
}

/// Label thinning: label every `stride`-th tick.
///
/// Dense headers drop labels rather than ticks: monthly headers label every
/// month up to 18 ticks, every 2nd up to 36, every 3rd beyond. Daily and
/// weekly headers thin at their own visual break points.
#[must_use]
pub fn label_stride(tick_count: usize, scale: AxisScale) -> usize {
    match scale {
        AxisScale::Day | AxisScale::Week => {
            if tick_count > 12 {
                2
            } else {
                1
            }
        }
        AxisScale::Month => {
            if tick_count > 36 {
                3
            } else if tick_count > 18 {
                2
            } else {
                1
            }
        }
    }
}

/// Tick dates for a window at the resolution chosen by [`scale_for`].
#[must_use]
pub fn ticks(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    match scale_for(start, end) {
        AxisScale::Day => step_days(start, end, 1),
        AxisScale::Week => step_days(start, end, 7),
        AxisScale::Month => months_between(start, end),
    }
}

fn step_days(start: NaiveDate, end: NaiveDate, step: u64) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut current = start;
    while current <= end {
        out.push(current);
        let Some(next) = current.checked_add_days(Days::new(step)) else {
            break;
        };
        current = next;
    }
    out
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 always exists for a valid month.
    date.with_day(1).unwrap_or(date)
}

fn next_month(month_start: NaiveDate) -> NaiveDate {
    let (year, month) = if month_start.month() == 12 {
        (month_start.year() + 1, 1)
    } else {
        (month_start.year(), month_start.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(month_start)
}
