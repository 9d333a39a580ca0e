use std::marker::PhantomData;

use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// Flat key/value record space. Every collection lives under one key as a JSON array.
pub trait RecordStore {
    fn get(&self, key: &str) -> EngineResult<Option<String>>;
    fn put(&self, key: &str, value: &str) -> EngineResult<()>;
}

/// Record store backed by the workspace `records` table.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore for SqliteStore<'_> {
    fn get(&self, key: &str) -> EngineResult<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value_json FROM records WHERE key = ?", [key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> EngineResult<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO records(key, value_json, updated_at) VALUES(?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json, updated_at = excluded.updated_at",
            (key, value, now),
        )?;
        Ok(())
    }
}

/// Typed view over one collection key. Reads always load the whole collection and writes
/// always replace it; there is no partial update at this boundary.
pub struct Collection<'s, T> {
    store: &'s dyn RecordStore,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<'s, T> Collection<'s, T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(store: &'s dyn RecordStore, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    pub fn read_all(&self) -> EngineResult<Vec<T>> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| EngineError::Corrupt {
            collection: self.key.to_string(),
            source,
        })
    }

    pub fn write_all(&self, items: &[T]) -> EngineResult<()> {
        let raw = serde_json::to_string(items).map_err(|source| EngineError::Encode {
            collection: self.key.to_string(),
            source,
        })?;
        self.store.put(self.key, &raw)
    }

    pub fn find_by<K, F>(&self, key_of: F, key: &K) -> EngineResult<Option<T>>
    where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        Ok(self.read_all()?.into_iter().find(|item| key_of(item) == *key))
    }

    /// Replace-or-append keyed by `key_of`. `build` receives the stored item for `key` (if
    /// any) and returns the item to store in its place.
    pub fn upsert_by<K, F, B>(&self, key_of: F, key: &K, build: B) -> EngineResult<T>
    where
        K: PartialEq,
        F: Fn(&T) -> K,
        B: FnOnce(Option<&T>) -> T,
    {
        let mut items = self.read_all()?;
        let pos = items.iter().position(|item| key_of(item) == *key);
        let next = build(pos.map(|i| &items[i]));
        match pos {
            Some(i) => items[i] = next.clone(),
            None => items.push(next.clone()),
        }
        self.write_all(&items)?;
        Ok(next)
    }

    /// Removes every matching item; writes back only when something was removed.
    pub fn remove_where<P>(&self, pred: P) -> EngineResult<usize>
    where
        P: Fn(&T) -> bool,
    {
        let mut items = self.read_all()?;
        let before = items.len();
        items.retain(|item| !pred(item));
        let removed = before - items.len();
        if removed > 0 {
            self.write_all(&items)?;
        }
        Ok(removed)
    }
}
