//! Daily priority assignment
//!
//! On creation a store counts the orders created during the current calendar
//! day and derives the new order's priority from that count. The calendar day
//! is computed in the service's time zone, resolved for the instant being
//! checked, so a DST change moves midnight with it.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a store assigns the initial priority of a new order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityPolicy {
    /// `priority = orders created today + 1`
    #[default]
    DailySequence,
    /// Every new order gets priority 0 and keeps it until explicitly updated
    Unassigned,
}

impl PriorityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityPolicy::DailySequence => "daily_sequence",
            PriorityPolicy::Unassigned => "unassigned",
        }
    }

    /// Priority for a new order given how many orders already exist today
    pub fn assign(&self, orders_today: u64) -> u32 {
        match self {
            PriorityPolicy::DailySequence => {
                u32::try_from(orders_today.saturating_add(1)).unwrap_or(u32::MAX)
            }
            PriorityPolicy::Unassigned => 0,
        }
    }
}

impl FromStr for PriorityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily_sequence" | "daily" => Ok(PriorityPolicy::DailySequence),
            "unassigned" | "none" => Ok(PriorityPolicy::Unassigned),
            other => Err(format!("unknown priority policy '{}'", other)),
        }
    }
}

/// Half-open UTC interval `[start, end)` covering one local calendar day
///
/// Days around a DST change last 23 or 25 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// The local day (in `tz`) that contains `instant`
    pub fn containing<Z: TimeZone>(instant: DateTime<Utc>, tz: &Z) -> Self {
        let date = instant.with_timezone(tz).date_naive();
        let start = start_of_day(tz, date);
        let end = date
            .succ_opt()
            .map(|next| start_of_day(tz, next))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// First instant of `date` in `tz`
fn start_of_day<Z: TimeZone>(tz: &Z, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => {
            // midnight falls in a DST gap: the day starts where the gap ends
            let offset = tz.offset_from_utc_datetime(&midnight).fix();
            (midnight - offset).and_utc()
        }
    }
}

/// Time zone that defines the calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayZone {
    /// The host's zone, resolved per instant
    Local,
    /// An IANA zone such as `America/Sao_Paulo`
    Named(Tz),
    /// A constant offset with no DST
    Fixed(FixedOffset),
}

impl DayZone {
    pub fn window(&self, now: DateTime<Utc>) -> DayWindow {
        match self {
            DayZone::Local => DayWindow::containing(now, &Local),
            DayZone::Named(tz) => DayWindow::containing(now, tz),
            DayZone::Fixed(offset) => DayWindow::containing(now, offset),
        }
    }
}

impl FromStr for DayZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "local" => Ok(DayZone::Local),
            "UTC" | "utc" => Ok(DayZone::Fixed(Utc.fix())),
            name => name
                .parse::<Tz>()
                .map(DayZone::Named)
                .map_err(|_| format!("unknown time zone '{}'", name)),
        }
    }
}

/// Policy plus the time zone that defines "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityRule {
    pub policy: PriorityPolicy,
    pub zone: DayZone,
}

impl PriorityRule {
    pub fn new(policy: PriorityPolicy, zone: DayZone) -> Self {
        Self { policy, zone }
    }

    /// Rule with a constant UTC offset
    pub fn fixed(policy: PriorityPolicy, offset: FixedOffset) -> Self {
        Self::new(policy, DayZone::Fixed(offset))
    }

    /// Rule following the host's local time zone
    pub fn local(policy: PriorityPolicy) -> Self {
        Self::new(policy, DayZone::Local)
    }

    pub fn window(&self, now: DateTime<Utc>) -> DayWindow {
        self.zone.window(now)
    }

    pub fn assign(&self, orders_today: u64) -> u32 {
        self.policy.assign(orders_today)
    }
}

impl Default for PriorityRule {
    fn default() -> Self {
        Self::fixed(PriorityPolicy::default(), Utc.fix())
    }
}
