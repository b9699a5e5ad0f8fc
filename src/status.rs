//! Ticket lifecycle derivation.
//!
//! A ticket's status is never stored: every list, calendar and badge view
//! recomputes it from `{refresh_requested, work_date, expires}` and the
//! caller's local wall clock. The function is pure and cheap enough to call
//! on every render.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::Ticket;

// ═══════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════

/// How many whole days before expiration a ticket becomes extendable.
///
/// Business policy, not a derived value: the window is inclusive of the
/// expiration day itself, so 3 gives a 4-day "extend now" span.
pub const DEFAULT_EXTENDABLE_WINDOW_DAYS: i64 = 3;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Derived lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Work date is in the future.
    Pending,
    /// Inside the validity window.
    Valid,
    /// Expires within the look-ahead window (including the expiration day).
    Extendable,
    /// A crew member manually requested a refresh; beats every date rule.
    RefreshNeeded,
    /// Past end-of-day on the expiration date.
    Expired,
    /// One of the ticket's dates does not parse as `YYYY-MM-DD`.
    Unknown,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Valid => "valid",
            Self::Extendable => "extendable",
            Self::RefreshNeeded => "refresh_needed",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Derivation
// ═══════════════════════════════════════════════════════════

/// Derive a ticket's status at `now` using the default extendable window.
///
/// `now` is the caller's local wall clock (`Local::now().naive_local()`);
/// passing it explicitly keeps the function referentially transparent.
pub fn derive_status(ticket: &Ticket, now: NaiveDateTime) -> TicketStatus {
    derive_status_with_window(
        ticket.refresh_requested,
        &ticket.work_date,
        &ticket.expires,
        now,
        DEFAULT_EXTENDABLE_WINDOW_DAYS,
    )
}

/// Derive a status with an explicit look-ahead window (per-tenant policy).
///
/// Rules are evaluated in strict priority order, first match wins:
/// refresh override, unparseable dates, expired, extendable, valid, pending.
pub fn derive_status_with_window(
    refresh_requested: bool,
    work_date: &str,
    expires: &str,
    now: NaiveDateTime,
    window_days: i64,
) -> TicketStatus {
    // 1. Manual override: crews must see "someone already asked for a
    //    refresh" over an automatic "about to expire" hint.
    if refresh_requested {
        return TicketStatus::RefreshNeeded;
    }

    // 2. Both dates must parse; a malformed date is surfaced, not defaulted.
    let (work, exp) = match (parse_ticket_date(work_date), parse_ticket_date(expires)) {
        (Some(w), Some(e)) => (w, e),
        _ => return TicketStatus::Unknown,
    };

    // 3. A ticket is good through 23:59:59.999 local on its expiration date.
    let end_of_expiry = exp
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is valid on every calendar day");
    if now > end_of_expiry {
        return TicketStatus::Expired;
    }

    // 4. Midnight-to-midnight whole days; sub-day precision would flip the
    //    window at arbitrary times of day.
    let diff_days = (exp - now.date()).num_days();
    if (0..=window_days).contains(&diff_days) {
        return TicketStatus::Extendable;
    }

    // 5./6. Valid from start-of-day on the work date, pending before it.
    let start_of_work = work
        .and_hms_opt(0, 0, 0)
        .expect("midnight is valid on every calendar day");
    if now >= start_of_work {
        TicketStatus::Valid
    } else {
        TicketStatus::Pending
    }
}

/// Parse `YYYY-MM-DD` as a plain calendar date.
///
/// Splits on `-` and builds the date from the numeric fields directly; an
/// ISO/UTC datetime parse would shift the date by the timezone offset.
pub fn parse_ticket_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, h: u32, m: u32, s: u32) -> NaiveDateTime {
        parse_ticket_date(date).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    fn noon(date: &str) -> NaiveDateTime {
        at(date, 12, 0, 0)
    }

    fn status(work: &str, expires: &str, now: NaiveDateTime) -> TicketStatus {
        derive_status_with_window(false, work, expires, now, DEFAULT_EXTENDABLE_WINDOW_DAYS)
    }

    // ── Priority order ──────────────────────────────────

    #[test]
    fn refresh_requested_beats_every_date() {
        // Valid window, expired window, pending window — flag always wins.
        for now in ["2024-01-15", "2024-03-05", "2023-12-01"] {
            let got =
                derive_status_with_window(true, "2024-01-01", "2024-03-01", noon(now), 3);
            assert_eq!(got, TicketStatus::RefreshNeeded, "now = {now}");
        }
    }

    #[test]
    fn refresh_requested_beats_malformed_dates() {
        let got = derive_status_with_window(true, "not-a-date", "also-bad", noon("2024-01-01"), 3);
        assert_eq!(got, TicketStatus::RefreshNeeded);
    }

    // ── Expiration boundary ─────────────────────────────

    #[test]
    fn valid_through_end_of_expiration_day() {
        // 23:59:59 on the expiration day is not yet expired.
        let got = status("2024-01-01", "2024-01-10", at("2024-01-10", 23, 59, 59));
        assert_eq!(got, TicketStatus::Extendable);
    }

    #[test]
    fn expired_the_morning_after() {
        let got = status("2024-01-01", "2024-01-10", at("2024-01-11", 0, 0, 0));
        assert_eq!(got, TicketStatus::Expired);
    }

    #[test]
    fn expired_long_after() {
        let got = status("2024-01-01", "2024-01-10", noon("2024-06-01"));
        assert_eq!(got, TicketStatus::Expired);
    }

    // ── Extendable window ───────────────────────────────

    #[test]
    fn extendable_on_expiration_day() {
        let got = status("2024-01-01", "2024-01-10", noon("2024-01-10"));
        assert_eq!(got, TicketStatus::Extendable);
    }

    #[test]
    fn extendable_three_days_out() {
        let got = status("2024-01-01", "2024-01-10", noon("2024-01-07"));
        assert_eq!(got, TicketStatus::Extendable);
    }

    #[test]
    fn not_extendable_four_days_out() {
        let got = status("2024-01-01", "2024-01-10", noon("2024-01-06"));
        assert_eq!(got, TicketStatus::Valid);
    }

    #[test]
    fn window_is_whole_days_not_hours() {
        // 23:00 three days before midnight-of-expiry is still 3 whole days.
        let got = status("2024-01-01", "2024-01-10", at("2024-01-07", 23, 0, 0));
        assert_eq!(got, TicketStatus::Extendable);
    }

    #[test]
    fn custom_window_respected() {
        // 5 days out, window of 7 → extendable even though default says valid.
        let got =
            derive_status_with_window(false, "2024-01-01", "2024-01-10", noon("2024-01-05"), 7);
        assert_eq!(got, TicketStatus::Extendable);
        let got =
            derive_status_with_window(false, "2024-01-01", "2024-01-10", noon("2024-01-05"), 3);
        assert_eq!(got, TicketStatus::Valid);
    }

    // ── Valid / pending split ───────────────────────────

    #[test]
    fn valid_from_start_of_work_date() {
        let got = status("2024-01-05", "2024-02-01", at("2024-01-05", 0, 0, 0));
        assert_eq!(got, TicketStatus::Valid);
    }

    #[test]
    fn pending_the_second_before_work_date() {
        let got = status("2024-01-05", "2024-02-01", at("2024-01-04", 23, 59, 59));
        assert_eq!(got, TicketStatus::Pending);
    }

    // ── Malformed dates ─────────────────────────────────

    #[test]
    fn malformed_dates_surface_unknown() {
        let now = noon("2024-01-15");
        for (work, exp) in [
            ("2024-1", "2024-03-01"),
            ("2024-01-01", "March 1 2024"),
            ("", "2024-03-01"),
            ("2024-13-01", "2024-03-01"),
            ("2024-02-30", "2024-03-01"),
            ("2024-01-01", "2024-03-01-00"),
        ] {
            assert_eq!(status(work, exp, now), TicketStatus::Unknown, "{work} / {exp}");
        }
    }

    #[test]
    fn parse_rejects_utc_style_timestamps() {
        assert!(parse_ticket_date("2024-01-05T00:00:00Z").is_none());
        assert_eq!(parse_ticket_date("2024-01-05"), NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    // ── Purity ──────────────────────────────────────────

    #[test]
    fn idempotent_for_identical_inputs() {
        let now = noon("2024-01-08");
        let a = status("2024-01-01", "2024-01-10", now);
        let b = status("2024-01-01", "2024-01-10", now);
        assert_eq!(a, b);
    }

    // ── Worked examples ─────────────────────────────────

    #[test]
    fn scenario_two_days_remaining_is_extendable() {
        let got = status("2024-01-01", "2024-01-10", noon("2024-01-08"));
        assert_eq!(got, TicketStatus::Extendable);
    }

    #[test]
    fn scenario_day_after_expiry_is_expired() {
        let got = status("2024-01-01", "2024-01-10", noon("2024-01-11"));
        assert_eq!(got, TicketStatus::Expired);
    }

    #[test]
    fn scenario_before_work_date_is_pending() {
        let got = status("2024-02-01", "2024-02-20", noon("2024-01-15"));
        assert_eq!(got, TicketStatus::Pending);
    }

    #[test]
    fn scenario_refresh_flag_overrides_valid() {
        let got =
            derive_status_with_window(true, "2024-01-01", "2024-03-01", noon("2024-01-15"), 3);
        assert_eq!(got, TicketStatus::RefreshNeeded);
    }

    // ── Serialization ───────────────────────────────────

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&TicketStatus::RefreshNeeded).unwrap();
        assert_eq!(json, "\"refresh_needed\"");
        assert_eq!(TicketStatus::Extendable.as_str(), "extendable");
    }
}
