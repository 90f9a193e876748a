use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::errors::{DairyError, Result};
use crate::core::time::{Clock, SystemClock};
use crate::domain::{
    CenterInput, CollectionEntry, DairyCenter, EntryFilter, Farmer, FarmerInput, NewEntry, Role,
    UserProfile,
};

use super::{CenterDirectory, EntrySink, EntrySource, FarmerDirectory};

pub const STORE_SCHEMA_VERSION: u32 = 1;

const DATA_DIR: &str = "data";
const BACKUP_DIR: &str = "backups";
const STORE_FILE: &str = "store.json";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const NAMED_BACKUP_PREFIX: &str = "store";
const AUTO_BACKUP_PREFIX: &str = "auto";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Everything the application persists, serialized as a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreDocument {
    pub schema_version: u32,
    #[serde(default)]
    pub centers: Vec<DairyCenter>,
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub farmers: Vec<Farmer>,
    #[serde(default)]
    pub entries: Vec<CollectionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            schema_version: STORE_SCHEMA_VERSION,
            centers: Vec::new(),
            users: Vec::new(),
            farmers: Vec::new(),
            entries: Vec::new(),
            updated_at: None,
        }
    }
}

/// Describes a persisted backup of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub path: PathBuf,
}

/// Filesystem-backed JSON store.
///
/// The document is held in memory and written through on every change. A
/// write is staged on a copy and only becomes visible after it reached disk.
#[derive(Clone)]
pub struct JsonStorage {
    store_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
    document: Arc<RwLock<StoreDocument>>,
    clock: Arc<dyn Clock>,
}

impl JsonStorage {
    pub fn new(base: &Path, retention: Option<usize>) -> Result<Self> {
        Self::with_clock(base, retention, Arc::new(SystemClock))
    }

    pub fn with_clock(base: &Path, retention: Option<usize>, clock: Arc<dyn Clock>) -> Result<Self> {
        let data_dir = base.join(DATA_DIR);
        let backups_dir = base.join(BACKUP_DIR);
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&backups_dir)?;
        let store_path = data_dir.join(STORE_FILE);
        let document = if store_path.exists() {
            load_document(&store_path)?
        } else {
            StoreDocument::default()
        };
        debug!(
            path = %store_path.display(),
            farmers = document.farmers.len(),
            entries = document.entries.len(),
            "store opened"
        );
        Ok(Self {
            store_path,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
            document: Arc::new(RwLock::new(document)),
            clock,
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Copy of the current document.
    pub fn snapshot(&self) -> Result<StoreDocument> {
        Ok(self.read()?.clone())
    }

    /// Writes a named backup of the current document.
    ///
    /// Only automatic pre-write copies count against the retention limit, so
    /// named backups stay until removed by hand.
    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo> {
        let document = self.snapshot()?;
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = self.clock.now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", NAMED_BACKUP_PREFIX, timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let id = format!("{}.{}", stem, BACKUP_EXTENSION);
        let path = self.backups_dir.join(&id);
        write_atomic(&path, &serialize_document(&document)?)?;
        info!(backup = %id, "store backup written");
        Ok(BackupInfo {
            created_at: parse_backup_timestamp(&id),
            id,
            path,
        })
    }

    /// Backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(BackupInfo {
                    id: name.to_string(),
                    created_at: parse_backup_timestamp(name),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by_key(|info| Reverse((info.created_at, info.id.clone())));
        Ok(entries)
    }

    /// Replaces the live document with the contents of a backup.
    pub fn restore(&self, backup_id: &str) -> Result<StoreDocument> {
        let path = self.backups_dir.join(backup_id);
        if !path.exists() {
            return Err(DairyError::StorageError(format!(
                "backup `{}` not found",
                backup_id
            )));
        }
        let restored = load_document(&path)?;
        let mut guard = self.write()?;
        self.persist(&restored)?;
        *guard = restored.clone();
        info!(backup = %backup_id, "store restored from backup");
        Ok(restored)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreDocument>> {
        self.document
            .read()
            .map_err(|_| DairyError::StorageError("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreDocument>> {
        self.document
            .write()
            .map_err(|_| DairyError::StorageError("store lock poisoned".into()))
    }

    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut StoreDocument, DateTime<Utc>) -> Result<T>,
    ) -> Result<T> {
        let now = self.clock.now();
        let mut guard = self.write()?;
        let mut draft = guard.clone();
        let value = change(&mut draft, now)?;
        draft.updated_at = Some(now);
        self.persist(&draft)?;
        *guard = draft;
        Ok(value)
    }

    fn persist(&self, document: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if self.store_path.exists() {
            self.backup_existing_file()?;
        }
        let tmp = tmp_path(&self.store_path);
        write_atomic(&tmp, &serialize_document(document)?)?;
        fs::rename(&tmp, &self.store_path)?;
        Ok(())
    }

    fn backup_existing_file(&self) -> Result<()> {
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = self.clock.now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_path = self
            .backups_dir
            .join(format!("{}_{}.{}", AUTO_BACKUP_PREFIX, timestamp, BACKUP_EXTENSION));
        fs::copy(&self.store_path, &backup_path)?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<()> {
        let automatic = self
            .list_backups()?
            .into_iter()
            .filter(|info| is_automatic_backup(&info.id));
        for stale in automatic.skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale.path) {
                warn!(backup = %stale.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl EntrySource for JsonStorage {
    fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<CollectionEntry>> {
        let document = self.read()?;
        let mut entries: Vec<CollectionEntry> = document
            .entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        entries.sort_by_key(|entry| Reverse((entry.date, entry.created_at)));
        debug!(count = entries.len(), "entries listed");
        Ok(entries)
    }
}

impl EntrySink for JsonStorage {
    fn create_entry(&self, entry: NewEntry) -> Result<CollectionEntry> {
        let figures = [
            entry.fat_percentage,
            entry.quantity_liters,
            entry.rate,
            entry.amount,
        ];
        if figures.iter().any(|value| !value.is_finite()) {
            return Err(DairyError::StorageError(
                "collection entry figures must be finite numbers".into(),
            ));
        }
        let created = self.mutate(|document, now| {
            let farmer = document
                .farmers
                .iter()
                .find(|farmer| {
                    farmer.id == entry.farmer_id && farmer.dairy_center_id == entry.dairy_center_id
                })
                .ok_or_else(|| DairyError::FarmerNotFound(entry.farmer_id.to_string()))?;
            let record = CollectionEntry {
                id: Uuid::new_v4(),
                dairy_center_id: entry.dairy_center_id,
                farmer_id: farmer.id,
                farmer_name: farmer.name.clone(),
                date: entry.date.unwrap_or_else(|| self.clock.today()),
                session: entry.session,
                fat_percentage: entry.fat_percentage,
                quantity_liters: entry.quantity_liters,
                rate_per_liter: entry.rate,
                total_amount: entry.amount,
                created_at: now,
            };
            document.entries.push(record.clone());
            Ok(record)
        })?;
        info!(entry = %created.id, farmer = %created.farmer_id, "collection entry stored");
        Ok(created)
    }
}

impl FarmerDirectory for JsonStorage {
    fn list_farmers(&self, dairy_center_id: Uuid) -> Result<Vec<Farmer>> {
        let document = self.read()?;
        let mut farmers: Vec<Farmer> = document
            .farmers
            .iter()
            .filter(|farmer| farmer.dairy_center_id == dairy_center_id)
            .cloned()
            .collect();
        farmers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(farmers)
    }

    fn farmer(&self, id: Uuid) -> Result<Option<Farmer>> {
        let document = self.read()?;
        Ok(document.farmers.iter().find(|farmer| farmer.id == id).cloned())
    }

    fn create_farmer(&self, dairy_center_id: Uuid, input: FarmerInput) -> Result<Farmer> {
        self.mutate(|document, now| {
            if !document.centers.iter().any(|center| center.id == dairy_center_id) {
                return Err(DairyError::CenterNotFound(dairy_center_id.to_string()));
            }
            let farmer = Farmer::new(dairy_center_id, input, now);
            document.farmers.push(farmer.clone());
            Ok(farmer)
        })
    }

    fn update_farmer(&self, id: Uuid, input: FarmerInput) -> Result<Farmer> {
        self.mutate(|document, now| {
            let farmer = document
                .farmers
                .iter_mut()
                .find(|farmer| farmer.id == id)
                .ok_or_else(|| DairyError::FarmerNotFound(id.to_string()))?;
            farmer.apply(input, now);
            Ok(farmer.clone())
        })
    }

    fn delete_farmer(&self, id: Uuid) -> Result<()> {
        self.mutate(|document, _| {
            let before = document.farmers.len();
            document.farmers.retain(|farmer| farmer.id != id);
            if document.farmers.len() == before {
                return Err(DairyError::FarmerNotFound(id.to_string()));
            }
            Ok(())
        })
    }
}

impl CenterDirectory for JsonStorage {
    fn list_centers(&self) -> Result<Vec<DairyCenter>> {
        let mut centers = self.read()?.centers.clone();
        centers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(centers)
    }

    fn center(&self, id: Uuid) -> Result<Option<DairyCenter>> {
        Ok(self.read()?.centers.iter().find(|c| c.id == id).cloned())
    }

    fn create_center(&self, input: CenterInput) -> Result<DairyCenter> {
        self.mutate(|document, now| {
            let center = DairyCenter::new(input, now);
            document.centers.push(center.clone());
            Ok(center)
        })
    }

    fn update_center(&self, id: Uuid, input: CenterInput) -> Result<DairyCenter> {
        self.mutate(|document, now| {
            let center = document
                .centers
                .iter_mut()
                .find(|center| center.id == id)
                .ok_or_else(|| DairyError::CenterNotFound(id.to_string()))?;
            center.apply(input, now);
            Ok(center.clone())
        })
    }

    fn delete_center(&self, id: Uuid) -> Result<()> {
        self.mutate(|document, now| {
            if !document.centers.iter().any(|center| center.id == id) {
                return Err(DairyError::CenterNotFound(id.to_string()));
            }
            if document.farmers.iter().any(|farmer| farmer.dairy_center_id == id) {
                return Err(DairyError::InvalidInput(
                    "dairy center still has registered farmers".into(),
                ));
            }
            document.centers.retain(|center| center.id != id);
            for user in document
                .users
                .iter_mut()
                .filter(|user| user.dairy_center_id == Some(id))
            {
                user.dairy_center_id = None;
                user.updated_at = now;
            }
            Ok(())
        })
    }

    fn list_users(&self) -> Result<Vec<UserProfile>> {
        let mut users = self.read()?.users.clone();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    fn user(&self, id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.read()?.users.iter().find(|user| user.id == id).cloned())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let needle = email.trim().to_lowercase();
        Ok(self
            .read()?
            .users
            .iter()
            .find(|user| user.email == needle)
            .cloned())
    }

    fn create_user(&self, email: &str, full_name: Option<String>) -> Result<UserProfile> {
        self.mutate(|document, now| {
            let profile = UserProfile::new(email, full_name, now);
            if document.users.iter().any(|user| user.email == profile.email) {
                return Err(DairyError::InvalidInput(format!(
                    "user `{}` already exists",
                    profile.email
                )));
            }
            document.users.push(profile.clone());
            Ok(profile)
        })
    }

    fn assign_center(&self, user_id: Uuid, dairy_center_id: Option<Uuid>) -> Result<UserProfile> {
        self.mutate(|document, now| {
            if let Some(center_id) = dairy_center_id {
                if !document.centers.iter().any(|center| center.id == center_id) {
                    return Err(DairyError::CenterNotFound(center_id.to_string()));
                }
            }
            let user = document
                .users
                .iter_mut()
                .find(|user| user.id == user_id)
                .ok_or_else(|| DairyError::UserNotFound(user_id.to_string()))?;
            user.dairy_center_id = dairy_center_id;
            user.updated_at = now;
            Ok(user.clone())
        })
    }

    fn assign_role(&self, user_id: Uuid, role: Role) -> Result<UserProfile> {
        self.mutate(|document, now| {
            let user = document
                .users
                .iter_mut()
                .find(|user| user.id == user_id)
                .ok_or_else(|| DairyError::UserNotFound(user_id.to_string()))?;
            user.role = role;
            user.updated_at = now;
            Ok(user.clone())
        })
    }
}

/// Loads and version-checks a store document.
pub fn load_document(path: &Path) -> Result<StoreDocument> {
    let data = fs::read_to_string(path)?;
    let document: StoreDocument = serde_json::from_str(&data)?;
    if document.schema_version > STORE_SCHEMA_VERSION {
        return Err(DairyError::StorageError(format!(
            "store `{}` is from a newer schema version ({})",
            path.display(),
            document.schema_version
        )));
    }
    Ok(document)
}

fn serialize_document(document: &StoreDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !sanitized.ends_with('-')
        {
            sanitized.push('-');
        }
    }
    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let mut segments = stem.split('_').skip(1);
    let date = segments.next()?;
    let time = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_automatic_backup(name: &str) -> bool {
    name.strip_prefix(AUTO_BACKUP_PREFIX)
        .is_some_and(|rest| rest.starts_with('_'))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_note_is_slugified() {
        assert_eq!(
            sanitize_backup_note(Some("  Before June close!  ")).as_deref(),
            Some("before-june-close")
        );
        assert_eq!(sanitize_backup_note(Some("!!!")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }

    #[test]
    fn backup_timestamp_parses_with_and_without_note() {
        let plain = parse_backup_timestamp("store_20240601_063000.json").unwrap();
        assert_eq!(plain.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-06-01 06:30:00");
        assert!(parse_backup_timestamp("store_20240601_063000_month-end.json").is_some());
        assert!(parse_backup_timestamp("store_latest.json").is_none());
        assert_eq!(
            parse_backup_timestamp("auto_20240601_063000.json"),
            Some(plain)
        );
    }

    #[test]
    fn only_auto_prefixed_backups_are_automatic() {
        assert!(is_automatic_backup("auto_20240601_063000.json"));
        assert!(!is_automatic_backup("store_20240601_063000_month-end.json"));
        assert!(!is_automatic_backup("autumn_20240601_063000.json"));
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let tmp = tmp_path(Path::new("/data/store.json"));
        assert_eq!(tmp, PathBuf::from("/data/store.json.tmp"));
    }
}
