use std::sync::{Arc, Mutex, PoisonError};

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::queries;

pub const BOOKING_STORE_KEY: &str = "booking-store";
pub const UI_STORE_KEY: &str = "ui-store";

/// Version written by this build. Blobs without an envelope are version 0.
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct Snapshot<T> {
    version: u32,
    state: T,
}

/// Loads the state stored under `key`, lifting older layouts to the current one.
///
/// Missing, unreadable or newer-than-known snapshots fall back to `T::default()`; only
/// database errors are returned.
pub fn load_snapshot<T>(conn: &Connection, key: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = queries::get_state(conn, key)? else {
        return Ok(T::default());
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unparsable snapshot");
            return set_aside(conn, key, &raw);
        }
    };

    let (version, state) = split_envelope(value);
    if version > CURRENT_VERSION {
        tracing::warn!(key, version, "snapshot is newer than this build, using defaults");
        return set_aside(conn, key, &raw);
    }

    let state = migrate(key, version, state);
    match serde_json::from_value(state) {
        Ok(state) => Ok(state),
        Err(e) => {
            tracing::warn!(key, error = %e, "snapshot does not match current shape, using defaults");
            set_aside(conn, key, &raw)
        }
    }
}

/// Key holding the last snapshot that could not be loaded.
pub fn backup_key(key: &str) -> String {
    format!("{key}.backup")
}

/// Copies an unloadable snapshot to its backup key so the next save cannot destroy it.
fn set_aside<T: Default>(conn: &Connection, key: &str, raw: &str) -> anyhow::Result<T> {
    let backup = backup_key(key);
    queries::put_state(conn, &backup, raw)?;
    tracing::warn!(key, backup = %backup, "unloadable snapshot kept under backup key");
    Ok(T::default())
}

pub fn save_snapshot<T: Serialize>(conn: &Connection, key: &str, state: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(&Snapshot {
        version: CURRENT_VERSION,
        state,
    })?;
    queries::put_state(conn, key, &json)
}

fn split_envelope(value: serde_json::Value) -> (u32, serde_json::Value) {
    if let serde_json::Value::Object(map) = &value {
        let version = map.get("version").and_then(|v| v.as_u64());
        if let (Some(version), Some(state)) = (version, map.get("state")) {
            let version = u32::try_from(version).unwrap_or(u32::MAX);
            return (version, state.clone());
        }
    }
    (0, value)
}

fn migrate(key: &str, from: u32, state: serde_json::Value) -> serde_json::Value {
    // v1 wraps the v0 tree in an envelope without changing the tree itself.
    if from < CURRENT_VERSION {
        tracing::info!(key, from, to = CURRENT_VERSION, "migrated snapshot");
    }
    state
}

/// A store's handle on its persisted entry. Saving is fire-and-forget: failures are logged
/// and the in-memory state stays as it is.
#[derive(Clone)]
pub struct StatePersistence {
    conn: Arc<Mutex<Connection>>,
    key: &'static str,
}

impl StatePersistence {
    pub fn new(conn: Arc<Mutex<Connection>>, key: &'static str) -> Self {
        Self { conn, key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn load<T: DeserializeOwned + Default>(&self) -> anyhow::Result<T> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        load_snapshot(&conn, self.key)
    }

    pub fn save<T: Serialize>(&self, state: &T) {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = save_snapshot(&conn, self.key, state) {
            tracing::warn!(key = self.key, error = %e, "failed to persist state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{BookingState, UiState};

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    #[test]
    fn test_missing_snapshot_gives_default() {
        let conn = setup_db();
        let state: UiState = load_snapshot(&conn, UI_STORE_KEY).unwrap();
        assert_eq!(state, UiState::default());
    }

    #[test]
    fn test_save_writes_envelope() {
        let conn = setup_db();
        let state = UiState {
            current_step: 3,
            ..Default::default()
        };
        save_snapshot(&conn, UI_STORE_KEY, &state).unwrap();

        let raw = queries::get_state(&conn, UI_STORE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["version"], CURRENT_VERSION);
        assert_eq!(json["state"]["currentStep"], 3);

        let loaded: UiState = load_snapshot(&conn, UI_STORE_KEY).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_unversioned_blob_is_lifted() {
        let conn = setup_db();
        let legacy = r#"{
            "selectedServiceId": 2,
            "selectedServiceIds": [1, 3],
            "formData": {"totalPeople": 1, "date": "2024/01/15", "timeSlot": "", "name": "Amy",
                         "phone": "", "email": "", "extraPersons": [], "serviceId": 2},
            "bookingHistory": [],
            "cart": []
        }"#;
        queries::put_state(&conn, BOOKING_STORE_KEY, legacy).unwrap();

        let state: BookingState = load_snapshot(&conn, BOOKING_STORE_KEY).unwrap();
        assert_eq!(state.selected_service_id, Some(2));
        assert_eq!(state.selected_service_ids, vec![1, 3]);
        assert_eq!(state.form_data.name, "Amy");
        assert_eq!(state.form_data.date, "2024/01/15");
        assert_eq!(state.editing_item_index, None);
    }

    #[test]
    fn test_newer_version_falls_back_to_default() {
        let conn = setup_db();
        queries::put_state(
            &conn,
            UI_STORE_KEY,
            r#"{"version": 99, "state": {"currentStep": 4}}"#,
        )
        .unwrap();
        let state: UiState = load_snapshot(&conn, UI_STORE_KEY).unwrap();
        assert_eq!(state, UiState::default());
        assert!(queries::get_state(&conn, &backup_key(UI_STORE_KEY))
            .unwrap()
            .is_some_and(|raw| raw.contains("99")));
    }

    #[test]
    fn test_legacy_history_entry_without_identity_is_kept() {
        let conn = setup_db();
        let legacy = r#"{
            "formData": {},
            "bookingHistory": [
                {"id": "b-1", "createdAt": "2024-01-10T08:00:00Z", "status": "confirmed",
                 "name": "Amy", "phone": "0912345678", "date": "2024-01-15",
                 "timeSlot": "10:00", "totalPeople": 1, "serviceId": 1, "selectedStaffId": 1},
                {"name": "Ben", "email": "ben@example.com", "date": "2024-01-16",
                 "timeSlot": "11:00", "totalPeople": 1}
            ]
        }"#;
        queries::put_state(&conn, BOOKING_STORE_KEY, legacy).unwrap();

        let state: BookingState = load_snapshot(&conn, BOOKING_STORE_KEY).unwrap();
        assert_eq!(state.booking_history.len(), 2);
        assert_eq!(state.booking_history[0].id, "b-1");
        assert_eq!(state.booking_history[1].form.name, "Ben");
        assert!(!state.booking_history[1].id.is_empty());
        assert_ne!(state.booking_history[1].id, state.booking_history[0].id);
        assert!(queries::get_state(&conn, &backup_key(BOOKING_STORE_KEY))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_shape_mismatch_is_backed_up_before_overwrite() {
        let conn = Arc::new(Mutex::new(setup_db()));
        let bad = r#"{"bookingHistory": [{"name": "Amy", "totalPeople": "two"}]}"#;
        queries::put_state(&conn.lock().unwrap(), BOOKING_STORE_KEY, bad).unwrap();

        let persistence = StatePersistence::new(Arc::clone(&conn), BOOKING_STORE_KEY);
        let state: BookingState = persistence.load().unwrap();
        assert!(state.booking_history.is_empty());
        persistence.save(&state);

        let db = conn.lock().unwrap();
        let backup = queries::get_state(&db, &backup_key(BOOKING_STORE_KEY)).unwrap();
        assert_eq!(backup.as_deref(), Some(bad));
    }

    #[test]
    fn test_garbage_falls_back_to_default() {
        let conn = setup_db();
        queries::put_state(&conn, UI_STORE_KEY, "{not json").unwrap();
        let state: UiState = load_snapshot(&conn, UI_STORE_KEY).unwrap();
        assert_eq!(state, UiState::default());

        queries::put_state(&conn, UI_STORE_KEY, r#"{"currentStep": "three"}"#).unwrap();
        let state: UiState = load_snapshot(&conn, UI_STORE_KEY).unwrap();
        assert_eq!(state, UiState::default());
    }

    #[test]
    fn test_persistence_handle_round_trip() {
        let conn = Arc::new(Mutex::new(setup_db()));
        let persistence = StatePersistence::new(Arc::clone(&conn), UI_STORE_KEY);
        let state = UiState {
            modal_open: true,
            ..Default::default()
        };
        persistence.save(&state);
        let loaded: UiState = persistence.load().unwrap();
        assert!(loaded.modal_open);
    }
}
