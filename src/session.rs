//! Persisted session state for the Blogline client.
//!
//! Everything the client keeps across restarts lives in one JSON document
//! under `~/.blogline/session.json`: the token pair, the signed-in user's
//! profile, and the retained notification list. The HTTP facade reads and
//! writes only the token fields.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// The session directory name.
const SESSION_DIR: &str = ".blogline";

/// The session file name.
const SESSION_FILE: &str = "session.json";

/// Maximum notifications retained locally.
const MAX_NOTICE_ITEMS: usize = 50;

/// Profile of the signed-in user, as delivered by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub role_id: i64,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub bg_image: String,
    #[serde(default)]
    pub about_me: String,
    #[serde(default)]
    pub location: String,
    /// Comment ids this user has liked.
    #[serde(default)]
    pub like_ids: Vec<i64>,
    /// Users this user follows.
    #[serde(default)]
    pub followed: Vec<FollowedUser>,
}

impl UserInfo {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn is_admin(&self) -> bool {
        self.role_id == 3
    }

    pub fn can_manage_comments(&self) -> bool {
        self.role_id >= 2
    }

    /// Nickname when set, username otherwise.
    pub fn display_name(&self) -> &str {
        if self.nickname.is_empty() {
            &self.username
        } else {
            &self.nickname
        }
    }
}

/// A followed user, as kept in the local profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FollowedUser {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
}

/// A locally retained notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoticeItem {
    pub id: i64,
    pub kind: String,
    pub text: String,
    #[serde(default)]
    pub read: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// The whole persisted session document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_info: UserInfo,
    #[serde(default)]
    pub notice: Vec<NoticeItem>,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Manages session persistence and in-memory access.
///
/// Reads happen on every outgoing request; writes happen on login, on a
/// successful refresh, and on logout. Writes go through the interior mutex
/// so the stored document is always a complete snapshot.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    state: Mutex<SessionState>,
}

impl SessionStore {
    /// Create a store at the default location, loading any saved session.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn open_default() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::open_at(home.join(SESSION_DIR).join(SESSION_FILE)))
    }

    /// Create a store backed by an explicit file path.
    pub fn open_at(path: PathBuf) -> Self {
        let state = Self::load_from(&path);
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    /// Create an in-memory store seeded with the given state. The path is a
    /// throwaway under the temp dir; used by tests and the probe binary.
    pub fn ephemeral(state: SessionState) -> Self {
        let path = std::env::temp_dir()
            .join(SESSION_DIR)
            .join(format!("session-{}.json", std::process::id()));
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    fn load_from(path: &PathBuf) -> SessionState {
        if !path.exists() {
            return SessionState::default();
        }
        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return SessionState::default(),
        };
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).unwrap_or_default()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.lock().expect("session lock poisoned").clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state
            .lock()
            .expect("session lock poisoned")
            .access_token
            .clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state
            .lock()
            .expect("session lock poisoned")
            .refresh_token
            .clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state
            .lock()
            .expect("session lock poisoned")
            .is_logged_in()
    }

    /// Store both tokens, e.g. after login.
    pub fn set_tokens(&self, access_token: String, refresh_token: String) -> bool {
        {
            let mut state = self.state.lock().expect("session lock poisoned");
            state.access_token = Some(access_token);
            state.refresh_token = Some(refresh_token);
        }
        self.persist()
    }

    /// Replace the access token after a successful refresh. The refresh
    /// token stays as-is; the backend does not rotate it.
    pub fn set_access_token(&self, access_token: String) -> bool {
        {
            let mut state = self.state.lock().expect("session lock poisoned");
            state.access_token = Some(access_token);
        }
        self.persist()
    }

    /// Merge profile fields delivered by the backend.
    pub fn set_user_info(&self, user_info: UserInfo) -> bool {
        {
            let mut state = self.state.lock().expect("session lock poisoned");
            state.user_info = user_info;
        }
        self.persist()
    }

    /// Retain notifications, newest first, capped at the local limit.
    pub fn save_notifications(&self, mut items: Vec<NoticeItem>) -> bool {
        items.truncate(MAX_NOTICE_ITEMS);
        {
            let mut state = self.state.lock().expect("session lock poisoned");
            state.notice = items;
        }
        self.persist()
    }

    pub fn notifications(&self) -> Vec<NoticeItem> {
        self.state
            .lock()
            .expect("session lock poisoned")
            .notice
            .clone()
    }

    /// Drop all session state and remove the backing file.
    pub fn clear(&self) -> bool {
        {
            let mut state = self.state.lock().expect("session lock poisoned");
            *state = SessionState::default();
        }
        if !self.path.exists() {
            return true;
        }
        fs::remove_file(&self.path).is_ok()
    }

    fn persist(&self) -> bool {
        let snapshot = self.state();
        if let Some(parent) = self.path.parent() {
            if !parent.exists() && fs::create_dir_all(parent).is_err() {
                return false;
            }
        }
        let file = match File::create(&self.path) {
            Ok(f) => f,
            Err(_) => return false,
        };
        let mut writer = BufWriter::new(file);
        if serde_json::to_writer_pretty(&mut writer, &snapshot).is_err() {
            return false;
        }
        writer.flush().is_ok()
    }
}
