use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{strip_obsolete_user_fields, Dataset, JobOffer, Task, User, UserRecord};

const SCHEMA_VERSION: i32 = 1;
const CURRENT_USER_KEY: &str = "currentUserId";

/// Per-user document store. One row per user, offer and task; each row holds
/// the entity's JSON exactly as it appears in an exported [`Dataset`].
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let db = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        db.init()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        db.init()?;
        Ok(db)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn default_path() -> PathBuf {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobtrack") {
            proj_dirs.data_dir().join("jobtrack.db")
        } else {
            PathBuf::from("jobtrack.db")
        }
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version >= SCHEMA_VERSION {
            return Ok(());
        }

        tracing::info!(from = version, to = SCHEMA_VERSION, "migrating database schema");
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT
            );

            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                doc TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS offers (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                doc TEXT NOT NULL,
                PRIMARY KEY (user_id, position)
            );

            CREATE TABLE IF NOT EXISTS tasks (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                doc TEXT NOT NULL,
                PRIMARY KEY (user_id, position)
            );

            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
            "#,
        )?;
        self.conn
            .execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION))?;
        Ok(())
    }

    // --- Whole dataset ---

    /// Loads every partition. Never fails: unreadable rows are skipped and an
    /// unreadable database yields an empty dataset.
    pub fn load(&self) -> Dataset {
        match self.try_load() {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::error!(error = %e, "failed to load data; starting empty");
                Dataset::default()
            }
        }
    }

    fn try_load(&self) -> Result<Dataset> {
        let mut dataset = Dataset {
            current_user_id: self.current_user_id()?,
            ..Dataset::default()
        };
        for (id, user) in self.load_user_rows()? {
            let offers = self.load_offers(&id)?;
            let tasks = self.load_tasks(&id)?;
            dataset.users.insert(
                id,
                UserRecord {
                    user,
                    offers,
                    tasks,
                },
            );
        }
        Ok(dataset)
    }

    /// Replaces everything stored with `dataset` in one transaction.
    pub fn save(&self, dataset: &Dataset) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch("DELETE FROM tasks; DELETE FROM offers; DELETE FROM users;")?;
        for (id, record) in &dataset.users {
            upsert_user(&tx, id, &record.user)?;
            replace_docs(&tx, "offers", id, &record.offers)?;
            replace_docs(&tx, "tasks", id, &record.tasks)?;
        }
        write_current_user(&tx, dataset.current_user_id.as_deref())?;
        tx.commit()?;
        Ok(())
    }

    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute_batch(
            "DELETE FROM tasks; DELETE FROM offers; DELETE FROM users; DELETE FROM app_state;",
        )?;
        tracing::info!("all stored data cleared");
        Ok(())
    }

    /// Unlike [`Database::load`], read failures are returned, so a broken
    /// database never exports as an empty backup.
    pub fn export_json(&self) -> Result<String> {
        Ok(self.try_load()?.to_json_pretty()?)
    }

    /// Replaces the stored dataset with an exported one. Nothing is written
    /// unless the whole file parses.
    pub fn import_json(&self, raw: &str) -> Result<Dataset> {
        let dataset = Dataset::from_json(raw).map_err(|e| Error::Import(e.to_string()))?;
        self.save(&dataset)?;
        tracing::info!(users = dataset.users.len(), "dataset imported");
        Ok(dataset)
    }

    // --- Users ---

    pub fn current_user_id(&self) -> Result<Option<String>> {
        let value: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                [CURRENT_USER_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    pub fn set_current_user(&self, id: Option<&str>) -> Result<()> {
        write_current_user(&self.conn, id)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        upsert_user(&self.conn, &user.id, user)
    }

    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self
            .load_user_rows()?
            .into_iter()
            .find(|(row_id, _)| row_id == id)
            .map(|(_, user)| user))
    }

    /// Exact, case-sensitive match.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .load_user_rows()?
            .into_iter()
            .map(|(_, user)| user)
            .find(|user| user.email == email))
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        Ok(self
            .load_user_rows()?
            .into_iter()
            .map(|(_, user)| user)
            .collect())
    }

    /// Removes one user's partition; other users are untouched.
    pub fn delete_user(&self, id: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tasks WHERE user_id = ?1", [id])?;
        tx.execute("DELETE FROM offers WHERE user_id = ?1", [id])?;
        tx.execute("DELETE FROM users WHERE id = ?1", [id])?;
        tx.execute(
            "DELETE FROM app_state WHERE key = ?1 AND value = ?2",
            params![CURRENT_USER_KEY, id],
        )?;
        tx.commit()?;
        tracing::info!(user_id = id, "user partition deleted");
        Ok(())
    }

    fn load_user_rows(&self) -> Result<Vec<(String, User)>> {
        let mut stmt = self.conn.prepare("SELECT id, doc FROM users ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut users = Vec::with_capacity(rows.len());
        for (id, doc) in rows {
            let mut value: serde_json::Value = match serde_json::from_str(&doc) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(user_id = %id, error = %e, "discarding unreadable user record");
                    continue;
                }
            };
            if strip_obsolete_user_fields(&mut value) {
                tracing::debug!(user_id = %id, "dropped obsolete user fields");
                self.conn.execute(
                    "UPDATE users SET doc = ?1 WHERE id = ?2",
                    params![value.to_string(), id],
                )?;
            }
            match serde_json::from_value::<User>(value) {
                Ok(user) => users.push((id, user)),
                Err(e) => {
                    tracing::warn!(user_id = %id, error = %e, "discarding unreadable user record");
                }
            }
        }
        Ok(users)
    }

    // --- Offers and tasks ---

    pub fn load_offers(&self, user_id: &str) -> Result<Vec<JobOffer>> {
        self.load_docs("offers", user_id)
    }

    pub fn save_offers(&self, user_id: &str, offers: &[JobOffer]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        replace_docs(&tx, "offers", user_id, offers)?;
        tx.commit()?;
        Ok(())
    }

    pub fn load_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        self.load_docs("tasks", user_id)
    }

    pub fn save_tasks(&self, user_id: &str, tasks: &[Task]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        replace_docs(&tx, "tasks", user_id, tasks)?;
        tx.commit()?;
        Ok(())
    }

    fn load_docs<T: DeserializeOwned>(&self, table: &'static str, user_id: &str) -> Result<Vec<T>> {
        let sql = format!(
            "SELECT position, doc FROM {} WHERE user_id = ?1 ORDER BY position",
            table
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([user_id], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut items = Vec::with_capacity(rows.len());
        for (position, doc) in rows {
            match serde_json::from_str::<T>(&doc) {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!(
                    table,
                    user_id,
                    position,
                    error = %e,
                    "discarding unreadable record"
                ),
            }
        }
        Ok(items)
    }
}

fn upsert_user(conn: &Connection, id: &str, user: &User) -> Result<()> {
    let doc = serde_json::to_string(user)?;
    conn.execute(
        "INSERT INTO users (id, email, doc) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET email = excluded.email, doc = excluded.doc",
        params![id, user.email, doc],
    )?;
    Ok(())
}

fn replace_docs<T: Serialize>(
    conn: &Connection,
    table: &'static str,
    user_id: &str,
    items: &[T],
) -> Result<()> {
    conn.execute(&format!("DELETE FROM {} WHERE user_id = ?1", table), [user_id])?;
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} (user_id, position, doc) VALUES (?1, ?2, ?3)",
        table
    ))?;
    for (position, item) in items.iter().enumerate() {
        let doc = serde_json::to_string(item)?;
        stmt.execute(params![user_id, position as i64, doc])?;
    }
    Ok(())
}

fn write_current_user(conn: &Connection, id: Option<&str>) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![CURRENT_USER_KEY, id],
    )?;
    Ok(())
}
