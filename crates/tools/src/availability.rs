//! Slot resolution
//!
//! Availability for a day is the open-hours interval minus every scheduled
//! appointment padded by the booking buffer. Candidates advance on the
//! configured step; a candidate that collides jumps to the end of the
//! blocking interval, so the first slot after a booking starts exactly
//! when the buffer expires.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

use frontdesk_config::BusinessProfile;

use crate::store::Appointment;

/// A free slot request
#[derive(Debug, Clone)]
pub struct SlotQuery {
    pub date: NaiveDate,
    pub duration_minutes: u32,
    /// Restrict to one staff member's schedule
    pub staff: Option<String>,
    /// Preferred start time; slots sort closest-first when set
    pub requested_time: Option<NaiveTime>,
}

/// Availability answer for one day
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub day_name: String,
    pub is_closed: bool,
    /// Open slot start times, capped at the configured suggestion limit
    pub slots: Vec<NaiveTime>,
}

fn minutes(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

fn from_minutes(total: i32) -> Option<NaiveTime> {
    if !(0..24 * 60).contains(&total) {
        return None;
    }
    NaiveTime::from_hms_opt(total as u32 / 60, total as u32 % 60, 0)
}

/// Compute available slots for a query
pub fn available_slots(
    profile: &BusinessProfile,
    booked: &[Appointment],
    query: &SlotQuery,
) -> DayAvailability {
    let day_name = query.date.weekday().to_string();

    let Some(hours) = profile.hours.for_weekday(query.date.weekday()) else {
        return DayAvailability {
            date: query.date,
            day_name,
            is_closed: true,
            slots: Vec::new(),
        };
    };

    let open = minutes(hours.open);
    let close = minutes(hours.close);
    let duration = query.duration_minutes as i32;
    let step = profile.booking.slot_step_minutes as i32;
    let buffer = profile.booking.buffer_minutes as i32;

    // Buffered blackout intervals from the relevant bookings
    let blocked: Vec<(i32, i32)> = booked
        .iter()
        .filter(|a| a.date == query.date && a.blocks_staff(query.staff.as_deref()))
        .map(|a| (minutes(a.start) - buffer, minutes(a.end) + buffer))
        .collect();

    let mut slots = Vec::new();
    let mut t = open;
    while t + duration <= close {
        let overlap_end = blocked
            .iter()
            .filter(|(start, end)| t < *end && *start < t + duration)
            .map(|(_, end)| *end)
            .max();

        match overlap_end {
            Some(end) => {
                // Jump to the end of the blackout rather than the next
                // grid point, so post-booking slots are reachable
                t = end.max(t + step);
            },
            None => {
                if let Some(time) = from_minutes(t) {
                    slots.push(time);
                }
                t += step;
            },
        }
    }

    if let Some(requested) = query.requested_time {
        let requested = minutes(requested);
        slots.sort_by_key(|slot| ((minutes(*slot) - requested).abs(), minutes(*slot)));
    }
    slots.truncate(profile.booking.max_suggestions);
    if query.requested_time.is_some() {
        // Keep the capped set, but present it chronologically
        slots.sort();
    }

    DayAvailability {
        date: query.date,
        day_name,
        is_closed: false,
        slots,
    }
}

/// Is this exact slot bookable?
pub fn slot_is_free(
    profile: &BusinessProfile,
    booked: &[Appointment],
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: u32,
    staff: Option<&str>,
) -> bool {
    let Some(hours) = profile.hours.for_weekday(date.weekday()) else {
        return false;
    };

    let start_m = minutes(start);
    let end_m = start_m + duration_minutes as i32;
    if start_m < minutes(hours.open) || end_m > minutes(hours.close) {
        return false;
    }

    let buffer = profile.booking.buffer_minutes as i32;
    !booked.iter().any(|a| {
        a.date == date
            && a.blocks_staff(staff)
            && start_m < minutes(a.end) + buffer
            && minutes(a.start) - buffer < end_m
    })
}
