use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A key was inserted twice into a [`KeyedTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate key `{0}`")]
pub struct DuplicateKey(pub String);

/// An ordered mapping from a string key to a list of values.
///
/// Keys keep the order they were inserted in (which is the order rustdoc
/// wrote them) and are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedTable<V> {
    entries: Vec<(String, Vec<V>)>,
}

impl<V> Default for KeyedTable<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> KeyedTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `values` under `key`, failing if the key is already present.
    pub fn try_insert(&mut self, key: impl Into<String>, values: Vec<V>) -> Result<(), DuplicateKey> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(DuplicateKey(key));
        }
        self.entries.push((key, values));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&[V]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[V])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of values across all keys.
    pub fn value_count(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }
}

impl<V: Serialize> Serialize for KeyedTable<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for KeyedTable<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableVisitor(PhantomData))
    }
}

struct TableVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for TableVisitor<V> {
    type Value = KeyedTable<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping names to arrays")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut table = KeyedTable::new();
        while let Some(key) = map.next_key::<String>()? {
            if table.contains_key(&key) {
                return Err(de::Error::custom(DuplicateKey(key)));
            }
            let values = map.next_value::<Vec<V>>()?;
            table.entries.push((key, values));
        }
        Ok(table)
    }
}
