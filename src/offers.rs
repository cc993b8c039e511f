//! Job offers and the rules that keep them consistent.
//!
//! Three invariants are maintained on every write:
//!
//! * all offers sharing a company name carry the same `company_info.id`,
//!   and company-level fields written on one offer reach all of them;
//! * `status_history` is an append-only log: a status change appends one
//!   entry stamped with the write time, unless the caller replaces the
//!   history explicitly through [`OfferUpdate::with_history`];
//! * interviews are unique per (date, type).
//!
//! [`OfferStore::initialize`] also runs the follow-up sweep: applications
//! left unanswered for [`RELAUNCH_AFTER_DAYS`] move to `ToRelaunch` (and get a
//! relaunch task), and after [`NO_RESPONSE_AFTER_DAYS`] to `NoResponse`.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::rc::Rc;

use crate::db::Database;
use crate::models::{
    CompanyInfo, Contact, Interview, JobOffer, OfferStatus, StatusHistoryEntry, Task, TaskPriority,
};
use crate::state::{ListenerId, Observable};
use crate::tasks::TaskStore;

pub const RELAUNCH_AFTER_DAYS: i64 = 14;
pub const NO_RESPONSE_AFTER_DAYS: i64 = 35;

/// A write to an existing offer.
///
/// `history_override` and `interviews_override` carry lists the user edited
/// by hand; when present they are taken as authoritative instead of being
/// merged with what is stored.
#[derive(Debug, Clone)]
pub struct OfferUpdate {
    pub offer: JobOffer,
    pub history_override: Option<Vec<StatusHistoryEntry>>,
    pub interviews_override: Option<Vec<Interview>>,
}

impl OfferUpdate {
    pub fn new(offer: JobOffer) -> Self {
        Self {
            offer,
            history_override: None,
            interviews_override: None,
        }
    }

    pub fn with_history(mut self, history: Vec<StatusHistoryEntry>) -> Self {
        self.history_override = Some(history);
        self
    }

    pub fn with_interviews(mut self, interviews: Vec<Interview>) -> Self {
        self.interviews_override = Some(interviews);
        self
    }
}

impl From<JobOffer> for OfferUpdate {
    fn from(offer: JobOffer) -> Self {
        OfferUpdate::new(offer)
    }
}

/// Identifies a company either by its id or by its exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyRef {
    Id(i64),
    Name(String),
}

impl CompanyRef {
    /// Numeric input is an id, anything else a name.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(id) => CompanyRef::Id(id),
            Err(_) => CompanyRef::Name(raw.to_string()),
        }
    }
}

impl From<i64> for CompanyRef {
    fn from(id: i64) -> Self {
        CompanyRef::Id(id)
    }
}

impl From<&str> for CompanyRef {
    fn from(name: &str) -> Self {
        CompanyRef::Name(name.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub name: String,
    pub info: CompanyInfo,
    pub description: Option<String>,
    pub offers: Vec<JobOffer>,
}

/// Partial company edit; `None` fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct CompanyDetails {
    pub employees: Option<u32>,
    pub founded: Option<i32>,
    pub group: Option<String>,
    pub contacts: Option<Vec<Contact>>,
    pub description: Option<String>,
}

/// A status change made by the follow-up sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub offer_id: i64,
    pub from: OfferStatus,
    pub to: OfferStatus,
    pub task_id: Option<i64>,
}

pub struct OfferStore {
    db: Rc<Database>,
    owner: Option<String>,
    offers: Observable<JobOffer>,
}

impl OfferStore {
    pub fn new(db: Rc<Database>) -> Self {
        Self {
            db,
            owner: None,
            offers: Observable::default(),
        }
    }

    /// Switches to `owner`'s offers without running any automation.
    pub fn load(&mut self, owner: Option<&str>) {
        self.owner = owner.map(str::to_string);
        let offers = match owner {
            Some(id) => self.db.load_offers(id).unwrap_or_else(|e| {
                tracing::error!(user_id = id, error = %e, "failed to load offers");
                Vec::new()
            }),
            None => Vec::new(),
        };
        self.offers.replace(offers);
    }

    /// Repairs loaded data (missing histories, diverging company ids) and
    /// runs the follow-up sweep. Call once per load.
    pub fn initialize(&mut self, now: DateTime<Utc>, tasks: &mut TaskStore) -> Vec<Transition> {
        let mut offers = self.offers.to_vec();
        let seeded = offers
            .iter_mut()
            .map(seed_missing_history)
            .filter(|seeded| *seeded)
            .count();
        let rewritten = normalize_company_ids(&mut offers);
        if seeded > 0 || rewritten > 0 {
            tracing::info!(seeded, rewritten, "repaired stored offers");
            self.commit(offers);
        }
        self.run_automation(now, tasks)
    }

    pub fn offers(&self) -> &[JobOffer] {
        self.offers.get()
    }

    pub fn get_offer(&self, id: i64) -> Option<&JobOffer> {
        self.offers.get().iter().find(|o| o.id == id)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&[JobOffer]) + 'static) -> ListenerId {
        self.offers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.offers.unsubscribe(id)
    }

    /// Adds an offer at the top of the list and returns its id.
    ///
    /// The history is seeded with `ToApply` at `date_added`, plus the initial
    /// status at `now` when it differs. Any history on `offer` is ignored.
    pub fn add_offer(&mut self, mut offer: JobOffer, now: DateTime<Utc>, tasks: &mut TaskStore) -> i64 {
        if offer.id <= 0 || self.get_offer(offer.id).is_some() {
            offer.id = self.next_id();
        }
        offer.status_history = vec![StatusHistoryEntry::new(OfferStatus::ToApply, offer.date_added)];
        if offer.status != OfferStatus::ToApply {
            offer
                .status_history
                .push(StatusHistoryEntry::new(offer.status, now));
        }
        offer.interviews = dedup_interviews(std::mem::take(&mut offer.interviews));
        let fresh_interview = record_new_interview(&mut offer);

        let id = offer.id;
        tracing::info!(offer_id = id, company = %offer.company, status = %offer.status, "offer added");

        let mut offers = self.offers.to_vec();
        offers.insert(0, offer);
        apply_company_write(&mut offers, 0);
        let follow_up = fresh_interview.map(|i| interview_task(&offers[0], &i));
        self.commit(offers);

        if let Some(task) = follow_up {
            tasks.add_task(task);
        }
        id
    }

    /// Writes an existing offer. Returns false if no offer has that id, or if
    /// the update would leave the offer with an empty history.
    pub fn update_offer(
        &mut self,
        update: impl Into<OfferUpdate>,
        now: DateTime<Utc>,
        tasks: &mut TaskStore,
    ) -> bool {
        let OfferUpdate {
            mut offer,
            history_override,
            interviews_override,
        } = update.into();
        if history_override.as_ref().is_some_and(Vec::is_empty) {
            tracing::warn!(offer_id = offer.id, "rejected empty status history");
            return false;
        }

        let mut offers = self.offers.to_vec();
        let Some(idx) = offers.iter().position(|o| o.id == offer.id) else {
            return false;
        };
        let previous = &offers[idx];

        match history_override {
            Some(mut history) => {
                history.sort_by(|a, b| a.date.cmp(&b.date));
                if let Some(latest) = history.last() {
                    offer.status = latest.status;
                }
                offer.status_history = history;
            }
            None => {
                offer.status_history = previous.status_history.clone();
                if offer.status != previous.status {
                    offer
                        .status_history
                        .push(StatusHistoryEntry::new(offer.status, now));
                    tracing::info!(
                        offer_id = offer.id,
                        from = %previous.status,
                        to = %offer.status,
                        "offer status changed"
                    );
                }
            }
        }

        let fresh_interview = match interviews_override {
            Some(interviews) => {
                replace_interviews(&mut offer, interviews, now);
                None
            }
            None => {
                offer.interviews = previous.interviews.clone();
                record_new_interview(&mut offer)
            }
        };

        offers[idx] = offer;
        apply_company_write(&mut offers, idx);
        let follow_up = fresh_interview.map(|i| interview_task(&offers[idx], &i));
        self.commit(offers);

        if let Some(task) = follow_up {
            tasks.add_task(task);
        }
        true
    }

    pub fn delete_offer(&mut self, id: i64) -> bool {
        let mut offers = self.offers.to_vec();
        let before = offers.len();
        offers.retain(|o| o.id != id);
        if offers.len() == before {
            return false;
        }
        tracing::info!(offer_id = id, "offer deleted");
        self.commit(offers);
        true
    }

    /// Company view assembled from its offers. Company-level fields come
    /// from the most recently added offer.
    pub fn get_company(&self, key: &CompanyRef) -> Option<Company> {
        let name = match key {
            CompanyRef::Name(name) => name.clone(),
            CompanyRef::Id(id) => latest_offer(
                self.offers
                    .get()
                    .iter()
                    .filter(|o| o.company_info.id == Some(*id)),
            )?
            .company
            .clone(),
        };

        let offers: Vec<JobOffer> = self
            .offers
            .get()
            .iter()
            .filter(|o| o.company == name)
            .cloned()
            .collect();
        let latest = latest_offer(offers.iter())?;
        Some(Company {
            name: latest.company.clone(),
            info: latest.company_info.clone(),
            description: latest.company_description.clone(),
            offers: offers.clone(),
        })
    }

    /// Merges `details` into every offer of `company`. Returns false if the
    /// company has no offers.
    pub fn update_company_details(&mut self, company: &str, details: &CompanyDetails) -> bool {
        let mut offers = self.offers.to_vec();
        let mut touched = 0;
        for offer in offers.iter_mut().filter(|o| o.company == company) {
            let info = &mut offer.company_info;
            if details.employees.is_some() {
                info.employees = details.employees;
            }
            if details.founded.is_some() {
                info.founded = details.founded;
            }
            if let Some(group) = &details.group {
                info.group = non_empty(group);
            }
            if let Some(contacts) = &details.contacts {
                info.contacts = contacts.clone();
            }
            if let Some(description) = &details.description {
                offer.company_description = non_empty(description);
            }
            touched += 1;
        }
        if touched == 0 {
            return false;
        }
        tracing::info!(company, offers = touched, "company details updated");
        self.commit(offers);
        true
    }

    pub fn clear_all(&mut self) {
        self.commit(Vec::new());
    }

    /// Moves stale applications forward. Never moves an offer backwards and
    /// only touches offers waiting on an answer (`Applied`, `ToRelaunch`).
    pub fn run_automation(&mut self, now: DateTime<Utc>, tasks: &mut TaskStore) -> Vec<Transition> {
        let mut offers = self.offers.to_vec();
        let mut transitions = Vec::new();
        let mut relaunch_tasks = Vec::new();

        for offer in offers.iter_mut() {
            let Some(to) = automatic_transition(offer, now) else {
                continue;
            };
            let from = offer.status;
            offer.status = to;
            offer.status_history.push(StatusHistoryEntry::new(to, now));
            if to == OfferStatus::ToRelaunch {
                relaunch_tasks.push((transitions.len(), relaunch_task(offer, now)));
            }
            transitions.push(Transition {
                offer_id: offer.id,
                from,
                to,
                task_id: None,
            });
        }

        if transitions.is_empty() {
            return transitions;
        }
        self.commit(offers);
        for (idx, task) in relaunch_tasks {
            transitions[idx].task_id = Some(tasks.add_task(task));
        }
        tracing::info!(count = transitions.len(), "follow-up sweep moved offers");
        transitions
    }

    fn next_id(&self) -> i64 {
        self.offers.get().iter().map(|o| o.id).max().unwrap_or(0) + 1
    }

    fn commit(&mut self, offers: Vec<JobOffer>) {
        self.offers.replace(offers);
        match self.owner.as_deref() {
            Some(owner) => {
                if let Err(e) = self.db.save_offers(owner, self.offers.get()) {
                    tracing::error!(user_id = owner, error = %e, "failed to save offers");
                }
            }
            None => tracing::debug!("no active user; offers kept in memory only"),
        }
    }
}

/// Gives every company a single id: the first id found among its offers,
/// or a fresh one above the current maximum. Returns how many offers changed.
pub fn normalize_company_ids(offers: &mut [JobOffer]) -> usize {
    let mut canonical: HashMap<String, i64> = HashMap::new();
    for offer in offers.iter() {
        if let Some(id) = offer.company_info.id.filter(|id| *id > 0) {
            canonical.entry(offer.company.clone()).or_insert(id);
        }
    }

    let mut max_id = max_company_id(offers);
    for offer in offers.iter() {
        if !canonical.contains_key(&offer.company) {
            max_id += 1;
            canonical.insert(offer.company.clone(), max_id);
        }
    }

    let mut rewritten = 0;
    for offer in offers.iter_mut() {
        let id = canonical[&offer.company];
        if offer.company_info.id != Some(id) {
            offer.company_info.id = Some(id);
            rewritten += 1;
        }
    }
    rewritten
}

/// The date the application was sent: the latest `Applied` history entry,
/// else the date the offer was added.
pub fn application_date(offer: &JobOffer) -> DateTime<Utc> {
    offer
        .status_history
        .iter()
        .filter(|h| h.status == OfferStatus::Applied)
        .map(|h| h.date)
        .max()
        .unwrap_or(offer.date_added)
}

fn automatic_transition(offer: &JobOffer, now: DateTime<Utc>) -> Option<OfferStatus> {
    if !matches!(offer.status, OfferStatus::Applied | OfferStatus::ToRelaunch) {
        return None;
    }
    let waited = now - application_date(offer);
    if waited >= Duration::days(NO_RESPONSE_AFTER_DAYS) {
        Some(OfferStatus::NoResponse)
    } else if waited >= Duration::days(RELAUNCH_AFTER_DAYS) && offer.status == OfferStatus::Applied {
        Some(OfferStatus::ToRelaunch)
    } else {
        None
    }
}

fn max_company_id(offers: &[JobOffer]) -> i64 {
    offers
        .iter()
        .filter_map(|o| o.company_info.id)
        .max()
        .unwrap_or(0)
        .max(0)
}

/// Picks the id for the company of `offers[idx]`: the id its sibling offers
/// already share, else the id it carries if no other company uses it, else a
/// fresh one.
fn resolve_company_id(offers: &[JobOffer], idx: usize) -> i64 {
    let name = &offers[idx].company;
    let sibling_id = offers
        .iter()
        .enumerate()
        .filter(|(i, o)| *i != idx && &o.company == name)
        .find_map(|(_, o)| o.company_info.id.filter(|id| *id > 0));
    if let Some(id) = sibling_id {
        return id;
    }

    if let Some(id) = offers[idx].company_info.id.filter(|id| *id > 0) {
        let taken = offers
            .iter()
            .any(|o| &o.company != name && o.company_info.id == Some(id));
        if !taken {
            return id;
        }
    }
    max_company_id(offers) + 1
}

/// Fans the company id and any company-level fields set on `offers[idx]`
/// out to every offer of the same company.
fn apply_company_write(offers: &mut [JobOffer], idx: usize) {
    let id = resolve_company_id(offers, idx);
    let source = offers[idx].clone();
    let description = source
        .company_description
        .as_deref()
        .and_then(non_empty);

    for offer in offers.iter_mut().filter(|o| o.company == source.company) {
        let info = &mut offer.company_info;
        info.id = Some(id);
        if source.company_info.employees.is_some() {
            info.employees = source.company_info.employees;
        }
        if source.company_info.founded.is_some() {
            info.founded = source.company_info.founded;
        }
        if source.company_info.group.is_some() {
            info.group = source.company_info.group.clone();
        }
        if !source.company_info.contacts.is_empty() {
            info.contacts = source.company_info.contacts.clone();
        }
        if description.is_some() {
            offer.company_description = description.clone();
        }
    }
}

fn latest_offer<'a>(offers: impl Iterator<Item = &'a JobOffer>) -> Option<&'a JobOffer> {
    offers.fold(None::<&'a JobOffer>, |best, o| match best {
        Some(b) if b.date_added >= o.date_added => Some(b),
        _ => Some(o),
    })
}

/// Older records may lack a history; rebuild the minimal one.
fn seed_missing_history(offer: &mut JobOffer) -> bool {
    if !offer.status_history.is_empty() {
        return false;
    }
    offer
        .status_history
        .push(StatusHistoryEntry::new(OfferStatus::ToApply, offer.date_added));
    if offer.status != OfferStatus::ToApply {
        offer
            .status_history
            .push(StatusHistoryEntry::new(offer.status, offer.date_added));
    }
    true
}

fn dedup_interviews(interviews: Vec<Interview>) -> Vec<Interview> {
    let mut unique: Vec<Interview> = Vec::with_capacity(interviews.len());
    for interview in interviews {
        if !unique.iter().any(|u| u.same_slot(&interview)) {
            unique.push(interview);
        }
    }
    unique
}

/// Appends the interview described by `interview_date`/`interview_type` when
/// the offer is at the interview stage and that slot is not recorded yet.
fn record_new_interview(offer: &mut JobOffer) -> Option<Interview> {
    if offer.status != OfferStatus::Interview {
        return None;
    }
    let (Some(date), Some(kind)) = (offer.interview_date, offer.interview_type) else {
        return None;
    };
    let interview = Interview::new(date, kind);
    if offer.interviews.iter().any(|i| i.same_slot(&interview)) {
        return None;
    }
    offer.interviews.push(interview.clone());
    Some(interview)
}

/// Installs a hand-edited interview list: deduplicated, newest first, with
/// the summary fields pointing at the next interview (or the last one held).
fn replace_interviews(offer: &mut JobOffer, interviews: Vec<Interview>, now: DateTime<Utc>) {
    let mut interviews = dedup_interviews(interviews);
    interviews.sort_by(|a, b| b.date.cmp(&a.date));

    let upcoming = interviews
        .iter()
        .filter(|i| i.date >= now)
        .min_by(|a, b| a.date.cmp(&b.date));
    let summary = upcoming.or_else(|| interviews.first());
    offer.interview_date = summary.map(|i| i.date);
    offer.interview_type = summary.map(|i| i.kind);
    offer.interviews = interviews;
}

fn interview_task(offer: &JobOffer, interview: &Interview) -> Task {
    let mut task = Task::new(
        format!("{} - {}", interview.kind.task_label(), offer.company),
        interview.date,
        TaskPriority::High,
    );
    task.related_offers = vec![offer.task_reference()];
    task.link = offer.link.clone();
    task
}

fn relaunch_task(offer: &JobOffer, now: DateTime<Utc>) -> Task {
    let mut task = Task::new(format!("Relancer {}", offer.company), now, TaskPriority::High);
    task.related_offers = vec![offer.task_reference()];
    task.link = offer.link.clone();
    task
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InterviewType, User};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn stores() -> (OfferStore, TaskStore) {
        let db = Rc::new(Database::open_in_memory().unwrap());
        db.save_user(&User {
            id: "u1".into(),
            full_name: "Alice".into(),
            email: "a@x.com".into(),
            password: "pw1".into(),
            auth_method: Default::default(),
            created_at: at(2024, 1, 1),
            title: None,
            location: None,
            bio: None,
            skills: vec![],
        })
        .unwrap();
        let mut offers = OfferStore::new(Rc::clone(&db));
        let mut tasks = TaskStore::new(db);
        offers.load(Some("u1"));
        tasks.load(Some("u1"));
        (offers, tasks)
    }

    fn applied_on(store: &mut OfferStore, tasks: &mut TaskStore, company: &str, applied: DateTime<Utc>) -> i64 {
        let offer = JobOffer::new("Dev", company, OfferStatus::Applied, applied);
        store.add_offer(offer, applied, tasks)
    }

    #[test]
    fn add_seeds_history() {
        let (mut store, mut tasks) = stores();
        let added = at(2024, 3, 1);
        let id = store.add_offer(
            JobOffer::new("Dev", "Acme", OfferStatus::ToApply, added),
            added,
            &mut tasks,
        );
        let offer = store.get_offer(id).unwrap();
        assert_eq!(offer.status_history, vec![StatusHistoryEntry::new(OfferStatus::ToApply, added)]);

        let now = at(2024, 3, 2);
        let id = store.add_offer(
            JobOffer::new("Ops", "Acme", OfferStatus::Applied, added),
            now,
            &mut tasks,
        );
        let history = &store.get_offer(id).unwrap().status_history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], StatusHistoryEntry::new(OfferStatus::ToApply, added));
        assert_eq!(history[1], StatusHistoryEntry::new(OfferStatus::Applied, now));
    }

    #[test]
    fn status_change_appends_one_entry() {
        let (mut store, mut tasks) = stores();
        let added = at(2024, 3, 1);
        let id = store.add_offer(
            JobOffer::new("Dev", "Acme", OfferStatus::ToApply, added),
            added,
            &mut tasks,
        );

        let mut edited = store.get_offer(id).unwrap().clone();
        edited.status = OfferStatus::Applied;
        edited.status_history.clear(); // ignored without an explicit override
        let now = at(2024, 3, 5);
        assert!(store.update_offer(edited, now, &mut tasks));

        let offer = store.get_offer(id).unwrap();
        assert_eq!(offer.status, OfferStatus::Applied);
        assert_eq!(offer.status_history.len(), 2);
        assert_eq!(offer.status_history[1], StatusHistoryEntry::new(OfferStatus::Applied, now));

        // Same status again: nothing appended.
        let same = store.get_offer(id).unwrap().clone();
        store.update_offer(same, at(2024, 3, 6), &mut tasks);
        assert_eq!(store.get_offer(id).unwrap().status_history.len(), 2);
    }

    #[test]
    fn history_override_wins_and_syncs_status() {
        let (mut store, mut tasks) = stores();
        let added = at(2024, 3, 1);
        let id = store.add_offer(
            JobOffer::new("Dev", "Acme", OfferStatus::Applied, added),
            added,
            &mut tasks,
        );

        let offer = store.get_offer(id).unwrap().clone();
        let history = vec![
            StatusHistoryEntry::new(OfferStatus::Interview, at(2024, 3, 10)),
            StatusHistoryEntry::new(OfferStatus::ToApply, added),
        ];
        let update = OfferUpdate::new(offer).with_history(history);
        assert!(store.update_offer(update, at(2024, 3, 11), &mut tasks));

        let offer = store.get_offer(id).unwrap();
        assert_eq!(offer.status, OfferStatus::Interview);
        assert_eq!(offer.status_history.len(), 2);
        assert_eq!(offer.status_history[0].status, OfferStatus::ToApply);
    }

    #[test]
    fn empty_history_override_is_rejected() {
        let (mut store, mut tasks) = stores();
        let added = at(2024, 3, 1);
        let id = store.add_offer(
            JobOffer::new("Dev", "Acme", OfferStatus::Applied, added),
            added,
            &mut tasks,
        );

        let offer = store.get_offer(id).unwrap().clone();
        let update = OfferUpdate::new(offer).with_history(Vec::new());
        assert!(!store.update_offer(update, at(2024, 3, 2), &mut tasks));

        let offer = store.get_offer(id).unwrap();
        assert_eq!(offer.status, OfferStatus::Applied);
        assert_eq!(offer.status_history.len(), 2);
    }

    #[test]
    fn company_id_is_shared_and_description_fans_out() {
        let (mut store, mut tasks) = stores();
        let now = at(2024, 3, 1);
        let first = store.add_offer(JobOffer::new("Dev", "Acme", OfferStatus::ToApply, now), now, &mut tasks);
        let other = store.add_offer(JobOffer::new("Dev", "Globex", OfferStatus::ToApply, now), now, &mut tasks);

        let mut second = JobOffer::new("Ops", "Acme", OfferStatus::ToApply, now);
        second.company_info.id = Some(999);
        second.company_description = Some("Rockets".into());
        let second = store.add_offer(second, now, &mut tasks);

        let acme_id = store.get_offer(first).unwrap().company_info.id;
        assert!(acme_id.is_some());
        assert_eq!(store.get_offer(second).unwrap().company_info.id, acme_id);
        assert_ne!(store.get_offer(other).unwrap().company_info.id, acme_id);
        assert_eq!(
            store.get_offer(first).unwrap().company_description.as_deref(),
            Some("Rockets")
        );
        assert_eq!(store.get_offer(other).unwrap().company_description, None);
    }

    #[test]
    fn renamed_offer_does_not_steal_old_company_id() {
        let (mut store, mut tasks) = stores();
        let now = at(2024, 3, 1);
        let a = store.add_offer(JobOffer::new("Dev", "Acme", OfferStatus::ToApply, now), now, &mut tasks);
        let b = store.add_offer(JobOffer::new("Ops", "Acme", OfferStatus::ToApply, now), now, &mut tasks);

        let mut moved = store.get_offer(b).unwrap().clone();
        moved.company = "Initech".into();
        store.update_offer(moved, now, &mut tasks);

        assert_ne!(
            store.get_offer(a).unwrap().company_info.id,
            store.get_offer(b).unwrap().company_info.id
        );
    }

    #[test]
    fn normalization_adopts_first_id_or_allocates() {
        let now = at(2024, 3, 1);
        let mut offers = vec![
            JobOffer::new("A", "Acme", OfferStatus::ToApply, now),
            JobOffer::new("B", "Acme", OfferStatus::ToApply, now),
            JobOffer::new("C", "Globex", OfferStatus::ToApply, now),
            JobOffer::new("D", "Acme", OfferStatus::ToApply, now),
        ];
        offers[1].company_info.id = Some(4);
        offers[3].company_info.id = Some(7);

        let rewritten = normalize_company_ids(&mut offers);

        assert_eq!(rewritten, 3);
        for i in [0, 1, 3] {
            assert_eq!(offers[i].company_info.id, Some(4));
        }
        assert_eq!(offers[2].company_info.id, Some(8));
    }

    #[test]
    fn duplicate_interview_is_recorded_once_with_one_task() {
        let (mut store, mut tasks) = stores();
        let now = at(2024, 3, 1);
        let id = store.add_offer(JobOffer::new("Dev", "Acme", OfferStatus::Applied, now), now, &mut tasks);

        let mut edited = store.get_offer(id).unwrap().clone();
        edited.status = OfferStatus::Interview;
        edited.interview_date = Some(at(2024, 3, 20));
        edited.interview_type = Some(InterviewType::Prequal);
        store.update_offer(edited.clone(), now, &mut tasks);
        store.update_offer(edited, now, &mut tasks);

        let offer = store.get_offer(id).unwrap();
        assert_eq!(offer.interviews.len(), 1);
        assert_eq!(tasks.tasks().len(), 1);
        let task = &tasks.tasks()[0];
        assert_eq!(task.title, "Préqualification - Acme");
        assert_eq!(task.due_date, at(2024, 3, 20));
    }

    #[test]
    fn interview_override_syncs_summary_fields() {
        let (mut store, mut tasks) = stores();
        let now = at(2024, 3, 1);
        let id = store.add_offer(JobOffer::new("Dev", "Acme", OfferStatus::Interview, now), now, &mut tasks);

        let offer = store.get_offer(id).unwrap().clone();
        let interviews = vec![
            Interview::new(at(2024, 2, 1), InterviewType::Phone),
            Interview::new(at(2024, 4, 1), InterviewType::Video),
            Interview::new(at(2024, 3, 15), InterviewType::OnSite),
            Interview::new(at(2024, 3, 15), InterviewType::OnSite),
        ];
        store.update_offer(OfferUpdate::new(offer).with_interviews(interviews), now, &mut tasks);

        let offer = store.get_offer(id).unwrap();
        assert_eq!(offer.interviews.len(), 3);
        assert_eq!(offer.interviews[0].date, at(2024, 4, 1));
        assert_eq!(offer.interview_date, Some(at(2024, 3, 15)));
        assert_eq!(offer.interview_type, Some(InterviewType::OnSite));
        assert!(tasks.tasks().is_empty());
    }

    #[test]
    fn sweep_thresholds() {
        let (mut store, mut tasks) = stores();
        let now = at(2024, 6, 30);
        let relaunch = applied_on(&mut store, &mut tasks, "Acme", now - Duration::days(14));
        let silent = applied_on(&mut store, &mut tasks, "Globex", now - Duration::days(35));
        let fresh = applied_on(&mut store, &mut tasks, "Initech", now - Duration::days(13));

        let transitions = store.run_automation(now, &mut tasks);

        assert_eq!(transitions.len(), 2);
        assert_eq!(store.get_offer(relaunch).unwrap().status, OfferStatus::ToRelaunch);
        assert_eq!(store.get_offer(silent).unwrap().status, OfferStatus::NoResponse);
        assert_eq!(store.get_offer(fresh).unwrap().status, OfferStatus::Applied);

        assert_eq!(tasks.tasks().len(), 1);
        let task = &tasks.tasks()[0];
        assert_eq!(task.priority, TaskPriority::High);
        assert!(task.related_offers[0].contains("Dev"));
        assert!(task.related_offers[0].contains("Acme"));

        let moved = transitions.iter().find(|t| t.offer_id == relaunch).unwrap();
        assert_eq!(moved.task_id, Some(task.id));
        let history = &store.get_offer(relaunch).unwrap().status_history;
        assert_eq!(history.last().unwrap(), &StatusHistoryEntry::new(OfferStatus::ToRelaunch, now));
    }

    #[test]
    fn sweep_never_regresses_or_repeats() {
        let (mut store, mut tasks) = stores();
        let now = at(2024, 6, 30);
        let id = applied_on(&mut store, &mut tasks, "Acme", now - Duration::days(20));
        store.run_automation(now, &mut tasks);
        assert!(store.run_automation(now, &mut tasks).is_empty());
        assert_eq!(tasks.tasks().len(), 1);

        // Later, the relaunched offer ages out.
        let later = now + Duration::days(15);
        let transitions = store.run_automation(later, &mut tasks);
        assert_eq!(transitions[0].to, OfferStatus::NoResponse);
        assert_eq!(store.get_offer(id).unwrap().status, OfferStatus::NoResponse);
        assert_eq!(tasks.tasks().len(), 1);

        let mut interview = JobOffer::new("QA", "Acme", OfferStatus::Interview, now - Duration::days(90));
        interview.id = 50;
        store.add_offer(interview, now - Duration::days(90), &mut tasks);
        assert!(store.run_automation(later, &mut tasks).is_empty());
    }

    #[test]
    fn application_date_uses_latest_applied_entry() {
        let added = at(2024, 1, 1);
        let mut offer = JobOffer::new("Dev", "Acme", OfferStatus::Applied, added);
        assert_eq!(application_date(&offer), added);
        offer.status_history = vec![
            StatusHistoryEntry::new(OfferStatus::Applied, at(2024, 1, 5)),
            StatusHistoryEntry::new(OfferStatus::Applied, at(2024, 2, 5)),
        ];
        assert_eq!(application_date(&offer), at(2024, 2, 5));
    }

    #[test]
    fn company_lookup_by_id_or_name_matches() {
        let (mut store, mut tasks) = stores();
        let first = store.add_offer(
            JobOffer::new("Dev", "Acme", OfferStatus::ToApply, at(2024, 1, 1)),
            at(2024, 1, 1),
            &mut tasks,
        );
        let mut newer = JobOffer::new("Ops", "Acme", OfferStatus::ToApply, at(2024, 2, 1));
        newer.company_info.employees = Some(120);
        store.add_offer(newer, at(2024, 2, 1), &mut tasks);

        let id = store.get_offer(first).unwrap().company_info.id.unwrap();
        let by_id = store.get_company(&CompanyRef::Id(id)).unwrap();
        let by_name = store.get_company(&CompanyRef::from("Acme")).unwrap();
        assert_eq!(by_id, by_name);
        assert_eq!(by_id.offers.len(), 2);
        assert_eq!(by_id.info.employees, Some(120));
        assert!(store.get_company(&CompanyRef::Name("Nope".into())).is_none());
        assert!(store.get_company(&CompanyRef::Id(id + 100)).is_none());
    }

    #[test]
    fn company_details_reach_every_offer() {
        let (mut store, mut tasks) = stores();
        let now = at(2024, 1, 1);
        let a = store.add_offer(JobOffer::new("Dev", "Acme", OfferStatus::ToApply, now), now, &mut tasks);
        let b = store.add_offer(JobOffer::new("Ops", "Acme", OfferStatus::ToApply, now), now, &mut tasks);

        let details = CompanyDetails {
            founded: Some(1999),
            description: Some("Makes anvils".into()),
            ..Default::default()
        };
        assert!(store.update_company_details("Acme", &details));
        assert!(!store.update_company_details("Nope", &details));

        for id in [a, b] {
            let offer = store.get_offer(id).unwrap();
            assert_eq!(offer.company_info.founded, Some(1999));
            assert_eq!(offer.company_description.as_deref(), Some("Makes anvils"));
        }
    }

    #[test]
    fn company_ref_parses_numbers_as_ids() {
        assert_eq!(CompanyRef::parse("12"), CompanyRef::Id(12));
        assert_eq!(CompanyRef::parse("Acme"), CompanyRef::Name("Acme".into()));
    }

    #[test]
    fn initialize_seeds_missing_history() {
        let (mut store, mut tasks) = stores();
        let added = at(2024, 1, 1);
        let mut legacy = JobOffer::new("Dev", "Acme", OfferStatus::Offer, added);
        legacy.id = 3;
        store.db.save_offers("u1", &[legacy]).unwrap();
        store.load(Some("u1"));

        store.initialize(at(2024, 6, 1), &mut tasks);

        let offer = store.get_offer(3).unwrap();
        assert_eq!(offer.status_history.len(), 2);
        assert!(offer.company_info.id.is_some());
        assert_eq!(store.db.load_offers("u1").unwrap()[0].status_history.len(), 2);
    }
}
