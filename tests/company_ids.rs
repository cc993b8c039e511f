use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use jobtrack::clock::FixedClock;
use jobtrack::db::Database;
use jobtrack::models::{CompanyInfo, JobOffer, OfferStatus};
use jobtrack::offers::normalize_company_ids;
use jobtrack::Tracker;
use proptest::prelude::*;

const COMPANIES: [&str; 4] = ["Acme", "Globex", "Initech", "Umbrella"];

#[derive(Debug, Clone)]
enum Op {
    Add { company: usize, status: usize },
    Rename { offer: usize, company: usize },
    SetStatus { offer: usize, status: usize },
    Delete { offer: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..COMPANIES.len(), 0..OfferStatus::ALL.len())
            .prop_map(|(company, status)| Op::Add { company, status }),
        2 => (any::<usize>(), 0..COMPANIES.len())
            .prop_map(|(offer, company)| Op::Rename { offer, company }),
        1 => (any::<usize>(), 0..OfferStatus::ALL.len())
            .prop_map(|(offer, status)| Op::SetStatus { offer, status }),
        1 => any::<usize>().prop_map(|offer| Op::Delete { offer }),
    ]
}

fn tracker() -> Tracker {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let mut tracker = Tracker::open(
        Database::open_in_memory().unwrap(),
        Box::new(FixedClock(now)),
    );
    tracker.register("Alice", "a@x.com", "pw1").unwrap();
    tracker
}

fn pick(offers: &[JobOffer], raw: usize) -> Option<JobOffer> {
    if offers.is_empty() {
        None
    } else {
        Some(offers[raw % offers.len()].clone())
    }
}

/// Same name means same id. Returns the id per company.
fn ids_by_company(offers: &[JobOffer]) -> Result<HashMap<String, i64>, TestCaseError> {
    let mut ids = HashMap::new();
    for offer in offers {
        let id = offer.company_info.id;
        prop_assert!(id.is_some(), "offer #{} has no company id", offer.id);
        let id = id.unwrap();
        let canonical = *ids.entry(offer.company.clone()).or_insert(id);
        prop_assert_eq!(canonical, id, "company {} has diverging ids", offer.company);
    }
    Ok(ids)
}

proptest! {
    #[test]
    fn writes_keep_one_id_per_company(ops in prop::collection::vec(op(), 1..40)) {
        let mut tracker = tracker();
        let start = tracker.now();

        for (step, op) in ops.into_iter().enumerate() {
            let offers = tracker.offers().offers().to_vec();
            match op {
                Op::Add { company, status } => {
                    let added = start - Duration::days(step as i64);
                    let offer = JobOffer::new(
                        format!("Role {}", step),
                        COMPANIES[company],
                        OfferStatus::ALL[status],
                        added,
                    );
                    tracker.add_offer(offer);
                }
                Op::Rename { offer, company } => {
                    if let Some(mut offer) = pick(&offers, offer) {
                        offer.company = COMPANIES[company].to_string();
                        prop_assert!(tracker.update_offer(offer));
                    }
                }
                Op::SetStatus { offer, status } => {
                    if let Some(mut offer) = pick(&offers, offer) {
                        offer.status = OfferStatus::ALL[status];
                        prop_assert!(tracker.update_offer(offer));
                    }
                }
                Op::Delete { offer } => {
                    if let Some(offer) = pick(&offers, offer) {
                        prop_assert!(tracker.delete_offer(offer.id));
                    }
                }
            }

            let ids = ids_by_company(tracker.offers().offers())?;
            let mut seen = HashMap::new();
            for (name, id) in &ids {
                if let Some(other) = seen.insert(*id, name.clone()) {
                    prop_assert!(false, "{} and {} share company id {}", other, name, id);
                }
            }
        }
    }

    #[test]
    fn normalization_converges(raw in prop::collection::vec((0..COMPANIES.len(), prop::option::of(-2i64..6)), 0..30)) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let mut offers: Vec<JobOffer> = raw
            .iter()
            .enumerate()
            .map(|(i, (company, id))| {
                let mut offer = JobOffer::new(format!("Role {}", i), COMPANIES[*company], OfferStatus::ToApply, now);
                offer.id = i as i64 + 1;
                offer.company_info = CompanyInfo { id: *id, ..Default::default() };
                offer
            })
            .collect();

        normalize_company_ids(&mut offers);
        let ids = ids_by_company(&offers)?;
        for id in ids.values() {
            prop_assert!(*id > 0);
        }

        // A second pass has nothing left to fix.
        prop_assert_eq!(normalize_company_ids(&mut offers), 0);
    }
}
