use chrono::{DateTime, Duration, Utc};
use std::rc::Rc;

use crate::db::Database;
use crate::models::{Task, TaskStatus};
use crate::state::{ListenerId, Observable};

/// The current user's tasks. Every mutation replaces the snapshot, notifies
/// listeners and writes the collection back to the database.
pub struct TaskStore {
    db: Rc<Database>,
    owner: Option<String>,
    tasks: Observable<Task>,
}

impl TaskStore {
    pub fn new(db: Rc<Database>) -> Self {
        Self {
            db,
            owner: None,
            tasks: Observable::default(),
        }
    }

    /// Switches to `owner`'s tasks (or to an empty, unpersisted list).
    pub fn load(&mut self, owner: Option<&str>) {
        self.owner = owner.map(str::to_string);
        let mut tasks = match owner {
            Some(id) => self.db.load_tasks(id).unwrap_or_else(|e| {
                tracing::error!(user_id = id, error = %e, "failed to load tasks");
                Vec::new()
            }),
            None => Vec::new(),
        };
        for task in tasks.iter_mut() {
            let status = task.status;
            task.set_status(status);
        }
        self.tasks.replace(tasks);
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.get()
    }

    pub fn get_task(&self, id: i64) -> Option<&Task> {
        self.tasks.get().iter().find(|t| t.id == id)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&[Task]) + 'static) -> ListenerId {
        self.tasks.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.tasks.unsubscribe(id)
    }

    /// Adds a task at the top of the list and returns its id. A zero or
    /// already-used id is replaced with a fresh one.
    pub fn add_task(&mut self, mut task: Task) -> i64 {
        if task.id <= 0 || self.get_task(task.id).is_some() {
            task.id = self.next_id();
        }
        let status = task.status;
        task.set_status(status);
        let id = task.id;
        tracing::debug!(task_id = id, title = %task.title, "task added");

        let mut tasks = self.tasks.to_vec();
        tasks.insert(0, task);
        self.commit(tasks);
        id
    }

    /// Replaces the task with the same id. `completed` is re-derived from `status`.
    pub fn update_task(&mut self, mut task: Task) -> bool {
        let status = task.status;
        task.set_status(status);
        let mut tasks = self.tasks.to_vec();
        let Some(slot) = tasks.iter_mut().find(|t| t.id == task.id) else {
            return false;
        };
        *slot = task;
        self.commit(tasks);
        true
    }

    pub fn delete_task(&mut self, id: i64) -> bool {
        let mut tasks = self.tasks.to_vec();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return false;
        }
        self.commit(tasks);
        true
    }

    /// Flips `completed`; status becomes Done or Todo to match.
    pub fn toggle_task(&mut self, id: i64) -> bool {
        self.modify(id, |task| {
            let status = if task.completed {
                TaskStatus::Todo
            } else {
                TaskStatus::Done
            };
            task.set_status(status);
        })
    }

    pub fn set_status(&mut self, id: i64, status: TaskStatus) -> bool {
        self.modify(id, |task| task.set_status(status))
    }

    /// Moves a task to `index` (clamped), shifting the others.
    pub fn move_task(&mut self, id: i64, index: usize) -> bool {
        let mut tasks = self.tasks.to_vec();
        let Some(from) = tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        let task = tasks.remove(from);
        let to = index.min(tasks.len());
        tasks.insert(to, task);
        self.commit(tasks);
        true
    }

    /// Replaces the whole list, e.g. after a board reorder.
    pub fn set_tasks(&mut self, mut tasks: Vec<Task>) {
        for task in tasks.iter_mut() {
            let status = task.status;
            task.set_status(status);
        }
        self.commit(tasks);
    }

    pub fn clear_all(&mut self) {
        self.commit(Vec::new());
    }

    /// Incomplete tasks due before `now + days`, soonest first.
    pub fn due_soon(&self, now: DateTime<Utc>, days: i64) -> Vec<&Task> {
        let horizon = now + Duration::days(days);
        let mut due: Vec<&Task> = self
            .tasks
            .get()
            .iter()
            .filter(|t| !t.completed && t.due_date <= horizon)
            .collect();
        due.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        due
    }

    fn next_id(&self) -> i64 {
        self.tasks.get().iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    fn modify(&mut self, id: i64, f: impl FnOnce(&mut Task)) -> bool {
        let mut tasks = self.tasks.to_vec();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        f(task);
        self.commit(tasks);
        true
    }

    fn commit(&mut self, tasks: Vec<Task>) {
        self.tasks.replace(tasks);
        match self.owner.as_deref() {
            Some(owner) => {
                if let Err(e) = self.db.save_tasks(owner, self.tasks.get()) {
                    tracing::error!(user_id = owner, error = %e, "failed to save tasks");
                }
            }
            None => tracing::debug!("no active user; tasks kept in memory only"),
        }
    }
}
