use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RelayError, Result};
use crate::roles::{RoleClass, classify};

pub const INBOX_DIR: &str = "inbox";
pub const TO_DIR: &str = "to";
pub const FROM_DIR: &str = "from";

/// A task addressed to a role, stored in its `to/` queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub from: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub pending: bool,
}

/// A status report authored by a role, stored in its `from/` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub status: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

/// A notification appended to a role's inbox log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

/// `messages:` sequence wrapper shared by all three mailbox file kinds.
#[derive(Debug, Serialize, Deserialize)]
struct MessageFile<T> {
    messages: Vec<T>,
}

impl<T: Serialize + DeserializeOwned> MessageFile<T> {
    /// Load existing messages from disk, or start empty.
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                messages: Vec::new(),
            });
        }
        let data = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&data).map_err(|e| RelayError::MalformedMailbox {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn store(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

/// Canonical seed content for a freshly materialized mailbox file.
pub fn empty_seed() -> String {
    "messages: []\n".to_string()
}

/// The inbox/to/from file set for one role under a target root.
///
/// The namesake role is the sole intended writer of its `from/` file
/// and sole intended reader of its `to/` queue and inbox; no locking
/// is applied.
pub struct Mailbox {
    root: PathBuf,
    role: String,
}

impl Mailbox {
    pub fn new(root: impl Into<PathBuf>, role: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            role: role.into(),
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn inbox_path(&self) -> PathBuf {
        self.root.join(INBOX_DIR).join(format!("{}.yaml", self.role))
    }

    pub fn to_path(&self) -> PathBuf {
        self.root.join(TO_DIR).join(format!("{}.yaml", self.role))
    }

    pub fn from_path(&self) -> PathBuf {
        self.root.join(FROM_DIR).join(format!("{}.yaml", self.role))
    }

    /// Coordinator roles issue tasks but never receive them; they get
    /// no to/from queue.
    pub fn receives_tasks(&self) -> bool {
        classify(&self.role) != RoleClass::Coordinator
    }

    /// Append a task from another role to this role's `to/` queue.
    pub fn push_task(&self, from: &str, message: &str) -> Result<()> {
        if !self.receives_tasks() {
            return Err(RelayError::NoTaskQueue(self.role.clone()));
        }
        let path = self.to_path();
        let mut file = MessageFile::<TaskEntry>::load(&path)?;
        file.messages.push(TaskEntry {
            from: from.to_string(),
            message: message.to_string(),
            sent_at: Utc::now(),
            pending: true,
        });
        file.store(&path)
    }

    /// Append a status report authored by this role.
    pub fn push_report(&self, status: &str, message: &str) -> Result<()> {
        if !self.receives_tasks() {
            return Err(RelayError::NoTaskQueue(self.role.clone()));
        }
        let path = self.from_path();
        let mut file = MessageFile::<ReportEntry>::load(&path)?;
        file.messages.push(ReportEntry {
            status: status.to_string(),
            message: message.to_string(),
            sent_at: Utc::now(),
        });
        file.store(&path)
    }

    /// Append a notification to this role's inbox log.
    pub fn push_notice(&self, message: &str) -> Result<()> {
        let path = self.inbox_path();
        let mut file = MessageFile::<Notice>::load(&path)?;
        file.messages.push(Notice {
            message: message.to_string(),
            sent_at: Utc::now(),
        });
        file.store(&path)
    }

    pub fn tasks(&self) -> Result<Vec<TaskEntry>> {
        Ok(MessageFile::<TaskEntry>::load(&self.to_path())?.messages)
    }

    /// Tasks not yet acknowledged, in arrival order.
    pub fn pending_tasks(&self) -> Result<Vec<TaskEntry>> {
        Ok(self
            .tasks()?
            .into_iter()
            .filter(|t| t.pending)
            .collect())
    }

    /// Mark the task at `index` (position in the full queue) as done.
    /// Returns false when the index is out of range.
    pub fn ack_task(&self, index: usize) -> Result<bool> {
        let path = self.to_path();
        let mut file = MessageFile::<TaskEntry>::load(&path)?;
        match file.messages.get_mut(index) {
            Some(task) => {
                task.pending = false;
                file.store(&path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn reports(&self) -> Result<Vec<ReportEntry>> {
        Ok(MessageFile::<ReportEntry>::load(&self.from_path())?.messages)
    }

    pub fn notices(&self) -> Result<Vec<Notice>> {
        Ok(MessageFile::<Notice>::load(&self.inbox_path())?.messages)
    }
}
