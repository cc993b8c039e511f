//! Read-only aggregations for dashboards and the company directory.
//!
//! Everything here is a pure function of an offer snapshot and is recomputed
//! on every call.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::collections::HashSet;

use crate::models::{Contact, JobOffer, OfferStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts([usize; 7]);

impl StatusCounts {
    pub fn from_offers<'a>(offers: impl IntoIterator<Item = &'a JobOffer>) -> Self {
        let mut counts = StatusCounts::default();
        for offer in offers {
            counts.increment(offer.status);
        }
        counts
    }

    pub fn get(&self, status: OfferStatus) -> usize {
        self.0[status.index()]
    }

    pub fn increment(&mut self, status: OfferStatus) {
        self.0[status.index()] += 1;
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OfferStatus, usize)> + '_ {
        OfferStatus::ALL.iter().map(|s| (*s, self.get(*s)))
    }

    /// e.g. "2 à postuler, 1 entretien". Empty statuses are skipped.
    pub fn breakdown(&self) -> String {
        self.iter()
            .filter(|(_, n)| *n > 0)
            .map(|(s, n)| format!("{} {}", n, s.label().to_lowercase()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total: usize,
    /// Offers past the `ToApply` stage.
    pub sent: usize,
    pub pending: usize,
    pub interviews: usize,
    pub rejected: usize,
    pub offers: usize,
    pub to_apply: usize,
    pub to_relaunch: usize,
    pub no_response: usize,
    /// (interviews + rejections) / sent, in 0.0..=1.0.
    pub response_rate: f64,
    pub companies: usize,
}

pub fn dashboard_stats(offers: &[JobOffer]) -> DashboardStats {
    let counts = StatusCounts::from_offers(offers);
    let to_apply = counts.get(OfferStatus::ToApply);
    let sent = counts.total() - to_apply;
    let interviews = counts.get(OfferStatus::Interview);
    let rejected = counts.get(OfferStatus::Rejected);
    DashboardStats {
        total: counts.total(),
        sent,
        pending: counts.get(OfferStatus::Applied),
        interviews,
        rejected,
        offers: counts.get(OfferStatus::Offer),
        to_apply,
        to_relaunch: counts.get(OfferStatus::ToRelaunch),
        no_response: counts.get(OfferStatus::NoResponse),
        response_rate: response_rate(&counts),
        companies: unique_companies(offers),
    }
}

pub fn response_rate(counts: &StatusCounts) -> f64 {
    let sent = counts.total() - counts.get(OfferStatus::ToApply);
    if sent == 0 {
        return 0.0;
    }
    (counts.get(OfferStatus::Interview) + counts.get(OfferStatus::Rejected)) as f64 / sent as f64
}

pub fn unique_companies(offers: &[JobOffer]) -> usize {
    offers
        .iter()
        .map(|o| o.company.as_str())
        .collect::<HashSet<_>>()
        .len()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanySummary {
    pub id: Option<i64>,
    pub name: String,
    pub offer_count: usize,
    pub contacts: Vec<Contact>,
    pub latest_offer_date: DateTime<Utc>,
    pub status_counts: StatusCounts,
}

/// One summary per company whose name contains `search` (case-insensitive),
/// most recently active first.
pub fn company_summaries(offers: &[JobOffer], search: &str) -> Vec<CompanySummary> {
    let mut summaries: Vec<CompanySummary> = Vec::new();
    for offer in offers {
        let idx = match summaries.iter().position(|s| s.name == offer.company) {
            Some(idx) => idx,
            None => {
                summaries.push(CompanySummary {
                    id: None,
                    name: offer.company.clone(),
                    offer_count: 0,
                    contacts: Vec::new(),
                    latest_offer_date: DateTime::<Utc>::UNIX_EPOCH,
                    status_counts: StatusCounts::default(),
                });
                summaries.len() - 1
            }
        };
        let summary = &mut summaries[idx];
        if summary.id.is_none() {
            summary.id = offer.company_info.id;
        }
        summary.offer_count += 1;
        summary.status_counts.increment(offer.status);
        for contact in &offer.company_info.contacts {
            if !summary.contacts.iter().any(|c| c.name == contact.name) {
                summary.contacts.push(contact.clone());
            }
        }
        if offer.date_added > summary.latest_offer_date {
            summary.latest_offer_date = offer.date_added;
        }
    }

    let term = search.trim().to_lowercase();
    summaries.retain(|s| s.name.to_lowercase().contains(&term));
    summaries.sort_by(|a, b| b.latest_offer_date.cmp(&a.latest_offer_date));
    summaries
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    /// First day of the month.
    pub month: NaiveDate,
    /// Offers that held each status at some point during the month.
    pub counts: StatusCounts,
}

/// Per-month status counts for the `months` months ending with `now`'s month.
///
/// A history entry's status is active from its date until the next entry's
/// date; the last entry stays active until `now`. An offer counts once for
/// every status it held during a month.
pub fn monthly_series(offers: &[JobOffer], now: DateTime<Utc>, months: u32) -> Vec<MonthlyPoint> {
    let mut points = Vec::with_capacity(months as usize);
    for back in (0..months as i32).rev() {
        let (year, month) = shift_month(now.year(), now.month(), -back);
        let (next_year, next_month) = shift_month(year, month, 1);
        let (Some(start), Some(end)) = (month_start(year, month), month_start(next_year, next_month))
        else {
            continue;
        };

        let mut counts = StatusCounts::default();
        for offer in offers {
            for status in statuses_active_between(offer, start, end, now) {
                counts.increment(status);
            }
        }
        points.push(MonthlyPoint {
            month: start.date_naive(),
            counts,
        });
    }
    points
}

fn statuses_active_between(
    offer: &JobOffer,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Vec<OfferStatus> {
    let mut history = offer.status_history.clone();
    history.sort_by(|a, b| a.date.cmp(&b.date));

    let mut seen = [false; 7];
    let mut active = Vec::new();
    for (i, entry) in history.iter().enumerate() {
        let start = entry.date;
        let overlaps = match history.get(i + 1) {
            Some(next) => start < to && next.date > from,
            None => start < to && now >= from && now >= start,
        };
        if overlaps && !seen[entry.status.index()] {
            seen[entry.status.index()] = true;
            active.push(entry.status);
        }
    }
    active
}

fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + delta;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub offer_id: i64,
    pub title: String,
    pub company: String,
    pub status: OfferStatus,
    pub date: DateTime<Utc>,
}

/// The latest status changes across all offers, newest first.
pub fn recent_activity(offers: &[JobOffer], limit: usize) -> Vec<Activity> {
    let mut activity: Vec<Activity> = offers
        .iter()
        .flat_map(|offer| {
            offer.status_history.iter().map(move |entry| Activity {
                offer_id: offer.id,
                title: offer.title.clone(),
                company: offer.company.clone(),
                status: entry.status,
                date: entry.date,
            })
        })
        .collect();
    activity.sort_by(|a, b| b.date.cmp(&a.date));
    activity.truncate(limit);
    activity
}
