use serde::{Deserialize, Serialize};

/// One tracked download as the server reports it on every poll.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DownloadRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub filepath: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub downloaded: i64,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub err: String,
}

/// Free space and path of the directory the server downloads into.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirInfo {
    pub path: String,
    #[serde(rename = "freeSpace")]
    pub free_space: String,
}

/// Form fields for submitting a new download.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddRequest {
    pub url: String,
    pub dir: String,
    pub filename: String,
}

/// Server acknowledgement of an accepted download.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddedFile {
    pub id: i64,
    pub filename: String,
}

/// Lifecycle state of a download, derived from its flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Active,
    Finished,
    Stopped,
    Failed(String),
}

impl DownloadRecord {
    /// Classify the record's flags into a status label. First match wins:
    /// active, then completed, then a clean stop, and only then the error
    /// string. A record that is both completed and carries an error is
    /// therefore "finished" — inherited contract, pinned by tests.
    pub fn status(&self) -> Status {
        if self.active {
            Status::Active
        } else if self.completed {
            Status::Finished
        } else if self.err.is_empty() {
            Status::Stopped
        } else {
            Status::Failed(self.err.clone())
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Active => write!(f, "active"),
            Status::Finished => write!(f, "finished"),
            Status::Stopped => write!(f, "stopped"),
            Status::Failed(msg) => write!(f, "{}", msg),
        }
    }
}
