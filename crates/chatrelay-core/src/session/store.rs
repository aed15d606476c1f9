//! Session persistence for the memory service.
//!
//! File format: a single JSON object mapping session id to its message list,
//! e.g. `{"default": [{"role": "user", "content": "hello"}]}`.
//! The whole file is rewritten after every mutation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::types::Message;

/// Session id → ordered message history.
pub type SessionMap = HashMap<String, Vec<Message>>;

/// File-backed session store.
///
/// The in-memory map is authoritative; persistence failures are logged and
/// never surface to callers.
pub struct SessionStore {
    /// Path of the JSON snapshot file.
    path: PathBuf,
    sessions: RwLock<SessionMap>,
}

impl SessionStore {
    /// Open a store, loading any existing snapshot from `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let sessions = load(&path);
        info!(
            path = %path.display(),
            sessions = sessions.len(),
            "session store ready"
        );
        SessionStore {
            path,
            sessions: RwLock::new(sessions),
        }
    }

    /// Append a message, creating the session if needed, then persist.
    pub fn append(&self, session_id: &str, message: Message) {
        let mut sessions = self.write();
        sessions
            .entry(session_id.to_string())
            .or_default()
            .push(message);
        self.persist(&sessions);
    }

    /// Empty an existing session and persist. Unknown ids are left alone.
    pub fn clear(&self, session_id: &str) {
        let mut sessions = self.write();
        if let Some(messages) = sessions.get_mut(session_id) {
            messages.clear();
            self.persist(&sessions);
        }
    }

    /// Write the current snapshot to disk.
    pub fn save(&self) {
        let sessions = self.read();
        self.persist(&sessions);
    }

    /// Full history of a session (empty if unknown).
    pub fn history(&self, session_id: &str) -> Vec<Message> {
        self.read().get(session_id).cloned().unwrap_or_default()
    }

    /// Snapshot of the whole mapping.
    pub fn snapshot(&self) -> SessionMap {
        self.read().clone()
    }

    /// All known session ids, sorted.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, sessions: &SessionMap) {
        if let Err(e) = save(&self.path, sessions) {
            warn!(path = %self.path.display(), error = %e, "failed to save session memory");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionMap> {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionMap> {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Read a snapshot file. Missing, unreadable or malformed files yield an empty map.
///
/// Sessions that fail to decode are skipped. Whenever anything is dropped the
/// file is first copied to `<file>.bak`, since the next save overwrites it.
pub fn load(path: &Path) -> SessionMap {
    if !path.exists() {
        debug!("No session memory at {}, starting empty", path.display());
        return SessionMap::new();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read session memory {}: {}", path.display(), e);
            return SessionMap::new();
        }
    };

    let raw = match serde_json::from_str::<HashMap<String, serde_json::Value>>(&content) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to parse session memory {}: {}", path.display(), e);
            back_up(path);
            return SessionMap::new();
        }
    };

    let mut sessions = SessionMap::with_capacity(raw.len());
    let mut skipped = 0usize;
    for (id, value) in raw {
        match serde_json::from_value::<Vec<Message>>(value) {
            Ok(messages) => {
                sessions.insert(id, messages);
            }
            Err(e) => {
                warn!(session = %id, error = %e, "Skipping unreadable session");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        back_up(path);
    }

    debug!(
        "Loaded {} sessions from {} ({} skipped)",
        sessions.len(),
        path.display(),
        skipped
    );
    sessions
}

/// `<file>.bak` next to the snapshot.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

fn back_up(path: &Path) {
    let backup = backup_path(path);
    match std::fs::copy(path, &backup) {
        Ok(_) => warn!("Kept a copy of session memory at {}", backup.display()),
        Err(e) => warn!("Failed to back up session memory to {}: {}", backup.display(), e),
    }
}

/// Overwrite the snapshot file with `sessions`.
pub fn save(path: &Path, sessions: &SessionMap) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(sessions)?;
    std::fs::write(path, json)?;

    debug!(
        "Saved {} sessions to {}",
        sessions.len(),
        path.display()
    );
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("memory.json"));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_open_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::open(&path);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_append_creates_session_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let store = SessionStore::open(&path);

        store.append("s1", Message::user("hello"));

        let on_disk = load(&path);
        assert_eq!(on_disk["s1"], vec![Message::user("hello")]);
    }

    #[test]
    fn test_file_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let store = SessionStore::open(&path);
        store.append("default", Message::user("hi"));
        store.append("default", Message::assistant("hello"));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "default": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ]
            })
        );
    }

    #[test]
    fn test_round_trip_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");

        let before = {
            let store = SessionStore::open(&path);
            store.append("a", Message::user("one"));
            store.append("a", Message::assistant("two"));
            store.append("b", Message::user("three"));
            store.append("c", Message::user("four"));
            store.clear("c");
            store.snapshot()
        };

        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.snapshot(), before);
        assert_eq!(reopened.history("c"), Vec::<Message>::new());
        assert_eq!(reopened.session_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clear_then_append_holds_only_new_message() {
        let dir = tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("memory.json"));
        store.append("s", Message::user("old"));
        store.append("s", Message::assistant("old reply"));

        store.clear("s");
        store.append("s", Message::user("new"));

        assert_eq!(store.history("s"), vec![Message::user("new")]);
    }

    #[test]
    fn test_clear_unknown_session_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let store = SessionStore::open(&path);

        store.clear("nobody");

        assert!(!path.exists());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_no_truncation() {
        let dir = tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("memory.json"));
        for i in 0..100 {
            store.append("long", Message::user(format!("m{i}")));
        }
        assert_eq!(store.history("long").len(), 100);
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("memory.json");
        std::fs::create_dir(&path).unwrap();

        let store = SessionStore::open(&path);
        store.append("s", Message::user("still here"));

        assert_eq!(store.history("s"), vec![Message::user("still here")]);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/memory.json");
        let store = SessionStore::open(&path);
        store.append("s", Message::user("x"));
        store.save();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_backed_up_before_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::open(&path);
        store.append("new", Message::user("hi"));

        assert_eq!(std::fs::read_to_string(backup_path(&path)).unwrap(), "{not json");
    }

    #[test]
    fn test_unknown_role_skips_only_that_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let original = r#"{"keep":[{"role":"user","content":"precious"}],"other":[{"role":"tool","content":"x"}]}"#;
        std::fs::write(&path, original).unwrap();

        let store = SessionStore::open(&path);
        assert_eq!(store.history("keep"), vec![Message::user("precious")]);
        assert!(store.history("other").is_empty());

        store.append("new", Message::user("hi"));

        let on_disk = load(&path);
        assert_eq!(on_disk["keep"], vec![Message::user("precious")]);
        assert_eq!(on_disk["new"], vec![Message::user("hi")]);
        assert_eq!(std::fs::read_to_string(backup_path(&path)).unwrap(), original);
    }

    #[test]
    fn test_clean_load_writes_no_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        SessionStore::open(&path).append("s", Message::user("x"));

        SessionStore::open(&path);
        assert!(!backup_path(&path).exists());
    }
}
