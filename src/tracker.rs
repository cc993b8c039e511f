use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{JobOffer, ProfileUpdate, User};
use crate::offers::{Company, CompanyDetails, CompanyRef, OfferStore, OfferUpdate, Transition};
use crate::tasks::TaskStore;
use crate::users::UserDirectory;

/// Wires the stores to one database and one clock.
///
/// Whenever the active user changes (and on open) both stores are reloaded
/// for that user and the offer store is initialized, which runs the
/// follow-up sweep.
pub struct Tracker {
    db: Rc<Database>,
    clock: Box<dyn Clock>,
    users: UserDirectory,
    offers: OfferStore,
    tasks: TaskStore,
    last_sweep: Vec<Transition>,
}

impl Tracker {
    pub fn open(db: Database, clock: Box<dyn Clock>) -> Self {
        let db = Rc::new(db);
        let mut tracker = Self {
            users: UserDirectory::new(Rc::clone(&db)),
            offers: OfferStore::new(Rc::clone(&db)),
            tasks: TaskStore::new(Rc::clone(&db)),
            db,
            clock,
            last_sweep: Vec::new(),
        };
        tracker.reload();
        tracker
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn offers(&self) -> &OfferStore {
        &self.offers
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskStore {
        &mut self.tasks
    }

    /// Transitions made by the sweep that ran at the last (re)load.
    pub fn last_sweep(&self) -> &[Transition] {
        &self.last_sweep
    }

    pub fn current_user(&self) -> Option<&User> {
        self.users.current_user()
    }

    pub fn require_user(&self) -> Result<&User> {
        self.users.current_user().ok_or(Error::NotLoggedIn)
    }

    // --- Session ---

    pub fn register(&mut self, full_name: &str, email: &str, password: &str) -> Result<User> {
        let now = self.now();
        let user = self.users.register(full_name, email, password, now)?;
        self.reload();
        Ok(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let user = self.users.login(email, password)?;
        self.reload();
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.users.logout();
        self.reload();
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<User> {
        self.users.update_profile(update)
    }

    /// Deletes the account and everything it owns, then starts over with no
    /// active user.
    pub fn delete_current_user(&mut self) -> Result<User> {
        let user = self.users.delete_current_user()?;
        self.reload();
        Ok(user)
    }

    // --- Offers ---

    pub fn add_offer(&mut self, offer: JobOffer) -> i64 {
        let now = self.now();
        self.offers.add_offer(offer, now, &mut self.tasks)
    }

    pub fn update_offer(&mut self, update: impl Into<OfferUpdate>) -> bool {
        let now = self.now();
        self.offers.update_offer(update, now, &mut self.tasks)
    }

    pub fn delete_offer(&mut self, id: i64) -> bool {
        self.offers.delete_offer(id)
    }

    pub fn get_company(&self, key: &CompanyRef) -> Option<Company> {
        self.offers.get_company(key)
    }

    pub fn update_company_details(&mut self, company: &str, details: &CompanyDetails) -> bool {
        self.offers.update_company_details(company, details)
    }

    /// Runs the follow-up sweep again without reloading.
    pub fn run_automation(&mut self) -> Vec<Transition> {
        let now = self.now();
        self.offers.run_automation(now, &mut self.tasks)
    }

    // --- Whole dataset ---

    pub fn export_json(&self) -> Result<String> {
        self.db.export_json()
    }

    /// Replaces all stored data with an export. On a parse error nothing changes.
    pub fn import_json(&mut self, raw: &str) -> Result<()> {
        self.db.import_json(raw)?;
        self.users.reload();
        self.reload();
        Ok(())
    }

    /// Wipes every user and all their data.
    pub fn clear_all(&mut self) -> Result<()> {
        self.db.clear_all()?;
        self.users.reload();
        self.reload();
        Ok(())
    }

    fn reload(&mut self) {
        let now = self.now();
        let owner = self.users.current_user().map(|u| u.id.clone());
        self.tasks.load(owner.as_deref());
        self.offers.load(owner.as_deref());
        self.last_sweep = self.offers.initialize(now, &mut self.tasks);
        tracing::debug!(
            user = owner.as_deref().unwrap_or("-"),
            offers = self.offers.offers().len(),
            tasks = self.tasks.tasks().len(),
            "stores reloaded"
        );
    }
}
