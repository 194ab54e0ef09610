use bytes::Bytes;
use glob_match::glob_match;
use itertools::Itertools;
use std::collections::{HashMap, VecDeque};
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strum_macros::IntoStaticStr;
use thiserror::Error as ThisError;
use tokio::time::{Duration, Instant};

/// The Store is responsible for managing key-value pairs, with optional time-to-live settings for
/// each key. Expired keys are only removed when they are touched again, there is no background
/// sweep. The store is designed to be thread-safe, allowing it to be shared and cloned cheaply
/// using reference counting.
///
/// Every operation goes through [`InnerStore::lock`], a single lock over the whole keyspace, so a
/// command that checks and then mutates a key does both without anyone else interleaving.
#[derive(Clone)]
pub struct Store {
    inner: Arc<InnerStore>,
}

impl Store {
    pub fn new() -> Store {
        let state = State {
            keys: HashMap::new(),
        };

        let inner = Arc::new(InnerStore {
            state: Mutex::new(state),
        });

        Self { inner }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Store {
    type Target = InnerStore;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct InnerStore {
    state: Mutex<State>,
}

impl InnerStore {
    pub fn lock(&self) -> InnerStoreLocked<'_> {
        // A panic while holding the lock leaves the map itself consistent, every mutation is a
        // single map or list operation.
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        InnerStoreLocked { state }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum StoreError {
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
}

/// Remaining time to live of a key.
#[derive(Debug, PartialEq)]
pub enum KeyTtl {
    Missing,
    Persistent,
    Expires(Duration),
}

pub struct InnerStoreLocked<'a> {
    state: MutexGuard<'a, State>,
}

impl<'a> InnerStoreLocked<'a> {
    /// Returns the entry stored at `key`, removing it first if it has expired.
    pub fn get(&mut self, key: &str) -> Option<&Entry> {
        self.remove_if_expired(key);
        self.state.keys.get(key)
    }

    pub fn get_string(&mut self, key: &str) -> Result<Option<Bytes>, StoreError> {
        match self.get(key).map(|entry| &entry.value) {
            Some(Value::String(data)) => Ok(Some(data.clone())),
            Some(_) => Err(StoreError::WrongType),
            None => Ok(None),
        }
    }

    pub fn set(&mut self, key: String, data: Bytes) {
        self.insert(key, Value::String(data), None);
    }

    /// A deadline past the range of the clock can never be reached, the key is then stored
    /// without expiry.
    pub fn set_with_ttl(&mut self, key: String, data: Bytes, ttl: Duration) {
        let expires_at = Instant::now().checked_add(ttl);
        self.insert(key, Value::String(data), expires_at);
    }

    fn insert(&mut self, key: String, value: Value, expires_at: Option<Instant>) {
        self.state.keys.insert(key, Entry { value, expires_at });
    }

    /// Removes every key that exists and returns how many were removed.
    pub fn delete<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .filter(|key| {
                let key = key.as_ref();
                self.remove_if_expired(key);
                self.state.keys.remove(key).is_some()
            })
            .count()
    }

    pub fn exists(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn ttl(&mut self, key: &str) -> KeyTtl {
        match self.get(key) {
            None => KeyTtl::Missing,
            Some(Entry {
                expires_at: None, ..
            }) => KeyTtl::Persistent,
            Some(Entry {
                expires_at: Some(expires_at),
                ..
            }) => KeyTtl::Expires(expires_at.saturating_duration_since(Instant::now())),
        }
    }

    /// Type name of the value stored at `key`, as reported by `TYPE`.
    pub fn value_type(&mut self, key: &str) -> Option<&'static str> {
        self.get(key).map(|entry| (&entry.value).into())
    }

    /// Appends `values` to the tail of the list at `key`, creating the list if needed. Returns the
    /// new length.
    pub fn rpush(&mut self, key: &str, values: Vec<Bytes>) -> Result<usize, StoreError> {
        let list = self.list_or_default(key)?;
        list.extend(values);
        Ok(list.len())
    }

    /// Prepends `values` one at a time, so the last value ends up at the head of the list.
    pub fn lpush(&mut self, key: &str, values: Vec<Bytes>) -> Result<usize, StoreError> {
        let list = self.list_or_default(key)?;
        for value in values {
            list.push_front(value);
        }
        Ok(list.len())
    }

    /// Returns the elements between `start` and `stop`, both inclusive. Negative offsets count
    /// from the end of the list, `-1` being the last element. Out of range offsets are clamped to
    /// the list bounds.
    pub fn lrange(&mut self, key: &str, start: i64, stop: i64) -> Result<Vec<Bytes>, StoreError> {
        let Some(list) = self.list(key)? else {
            return Ok(vec![]);
        };

        let len = list.len() as i64;
        let stop = match stop {
            stop if stop >= len => len - 1,
            stop if stop < 0 => len + stop,
            stop => stop,
        };
        let start = match start {
            start if start < 0 => (len + start).max(0),
            start => start,
        };

        if start > stop || start >= len {
            return Ok(vec![]);
        }

        Ok(list
            .range(start as usize..=stop as usize)
            .cloned()
            .collect())
    }

    pub fn llen(&mut self, key: &str) -> Result<usize, StoreError> {
        Ok(self.list(key)?.map_or(0, |list| list.len()))
    }

    /// Removes up to `count` elements from the head of the list. `None` means the key does not
    /// exist, an existing list that is already empty yields an empty vector.
    pub fn lpop(&mut self, key: &str, count: usize) -> Result<Option<Vec<Bytes>>, StoreError> {
        Ok(self.list_mut(key)?.map(|list| {
            let count = count.min(list.len());
            list.drain(..count).collect()
        }))
    }

    /// Like [`InnerStoreLocked::lpop`], from the tail. Elements are returned in pop order.
    pub fn rpop(&mut self, key: &str, count: usize) -> Result<Option<Vec<Bytes>>, StoreError> {
        Ok(self.list_mut(key)?.map(|list| {
            let count = count.min(list.len());
            list.drain(list.len() - count..).rev().collect()
        }))
    }

    /// Live keys matching the glob-style `pattern`, sorted.
    pub fn keys(&mut self, pattern: &str) -> Vec<String> {
        self.remove_expired_keys();
        self.state
            .keys
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .sorted()
            .collect()
    }

    pub fn size(&mut self) -> usize {
        self.remove_expired_keys();
        self.state.keys.len()
    }

    fn list(&mut self, key: &str) -> Result<Option<&VecDeque<Bytes>>, StoreError> {
        Ok(self.list_mut(key)?.map(|list| &*list))
    }

    fn list_mut(&mut self, key: &str) -> Result<Option<&mut VecDeque<Bytes>>, StoreError> {
        self.remove_if_expired(key);
        match self.state.keys.get_mut(key).map(|entry| &mut entry.value) {
            Some(Value::List(list)) => Ok(Some(list)),
            Some(_) => Err(StoreError::WrongType),
            None => Ok(None),
        }
    }

    fn list_or_default(&mut self, key: &str) -> Result<&mut VecDeque<Bytes>, StoreError> {
        self.remove_if_expired(key);
        let entry = self
            .state
            .keys
            .entry(key.to_string())
            .or_insert_with(|| Entry {
                value: Value::List(VecDeque::new()),
                expires_at: None,
            });

        match &mut entry.value {
            Value::List(list) => Ok(list),
            _ => Err(StoreError::WrongType),
        }
    }

    fn remove_if_expired(&mut self, key: &str) {
        let now = Instant::now();
        if self
            .state
            .keys
            .get(key)
            .is_some_and(|entry| entry.is_expired(now))
        {
            self.state.keys.remove(key);
        }
    }

    fn remove_expired_keys(&mut self) {
        let now = Instant::now();
        self.state.keys.retain(|_, entry| !entry.is_expired(now));
    }
}

#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Value {
    String(Bytes),
    List(VecDeque<Bytes>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub value: Value,
    pub expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

pub struct State {
    keys: HashMap<String, Entry>,
}
