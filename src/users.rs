use chrono::{DateTime, Utc};
use rand::Rng;
use std::rc::Rc;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{AuthMethod, ProfileUpdate, User};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Registered accounts and the current session.
///
/// Credentials are compared in plaintext. This is a local, single-user mock
/// of authentication, not a security boundary.
pub struct UserDirectory {
    db: Rc<Database>,
    current: Option<User>,
}

impl UserDirectory {
    /// Restores the session recorded in the database, if any.
    pub fn new(db: Rc<Database>) -> Self {
        let mut directory = Self { db, current: None };
        directory.reload();
        directory
    }

    /// Re-reads the current user from the database.
    pub fn reload(&mut self) {
        self.current = match self.db.current_user_id() {
            Ok(Some(id)) => self.db.get_user(&id).unwrap_or_else(|e| {
                tracing::error!(user_id = %id, error = %e, "failed to load current user");
                None
            }),
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, "failed to read session");
                None
            }
        };
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.db.list_users()
    }

    /// Creates an account and logs it in. Emails are compared exactly.
    pub fn register(
        &mut self,
        full_name: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let full_name = required(full_name, "fullName")?;
        let email = required(email, "email")?;
        if password.is_empty() {
            return Err(Error::MissingField("password"));
        }
        if self.db.find_user_by_email(email)?.is_some() {
            return Err(Error::DuplicateEmail(email.to_string()));
        }

        let user = User {
            id: generate_id(now),
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            auth_method: AuthMethod::Email,
            created_at: now,
            title: None,
            location: None,
            bio: None,
            skills: Vec::new(),
        };
        self.db.save_user(&user)?;
        self.db.set_current_user(Some(&user.id))?;
        tracing::info!(user_id = %user.id, "user registered");
        self.current = Some(user.clone());
        Ok(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let user = self
            .db
            .find_user_by_email(email.trim())?
            .filter(|u| u.password == password)
            .ok_or(Error::InvalidCredentials)?;
        self.db.set_current_user(Some(&user.id))?;
        tracing::info!(user_id = %user.id, "user logged in");
        self.current = Some(user.clone());
        Ok(user)
    }

    /// Ends the session. Stored data is kept.
    pub fn logout(&mut self) {
        if let Err(e) = self.db.set_current_user(None) {
            tracing::error!(error = %e, "failed to clear session");
        }
        if let Some(user) = self.current.take() {
            tracing::info!(user_id = %user.id, "user logged out");
        }
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<User> {
        let user = self.current.as_mut().ok_or(Error::NotLoggedIn)?;
        if let Some(full_name) = update.full_name {
            user.full_name = required(&full_name, "fullName")?.to_string();
        }
        if let Some(title) = update.title {
            user.title = optional(title);
        }
        if let Some(location) = update.location {
            user.location = optional(location);
        }
        if let Some(bio) = update.bio {
            user.bio = optional(bio);
        }
        if let Some(skills) = update.skills {
            user.skills = skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        let user = user.clone();
        if let Err(e) = self.db.save_user(&user) {
            tracing::error!(user_id = %user.id, error = %e, "failed to save profile");
        }
        Ok(user)
    }

    /// Deletes the logged-in account together with its offers and tasks.
    pub fn delete_current_user(&mut self) -> Result<User> {
        let user = self.current.take().ok_or(Error::NotLoggedIn)?;
        self.db.delete_user(&user.id)?;
        self.db.set_current_user(None)?;
        Ok(user)
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn generate_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("user_{}_{}", now.timestamp_millis(), suffix)
}
