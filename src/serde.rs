use super::{HashTable, INITIAL_CAPACITY};

use serde::de::{Deserialize, Error as DeError, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserializer;

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Upper bound on the number of entries a size hint may reserve slots for.
const MAX_PRESIZED_ENTRIES: usize = 4096;

pub struct HashTableVisitor<K: Eq + Hash, V> {
    marker: PhantomData<fn() -> HashTable<K, V>>,
}

impl<K, V> HashTableVisitor<K, V>
where
    K: Eq + Hash,
{
    fn new() -> Self {
        HashTableVisitor {
            marker: PhantomData,
        }
    }
}

impl<'de, K, V> Visitor<'de> for HashTableVisitor<K, V>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    type Value = HashTable<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a HashTable")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let capacity = access
            .size_hint()
            .map_or(INITIAL_CAPACITY, |len| {
                (len.min(MAX_PRESIZED_ENTRIES) * 2).max(INITIAL_CAPACITY)
            });
        let mut table = HashTable::with_capacity(capacity);
        while let Some((key, value)) = access.next_entry()? {
            table.try_add(key, value).map_err(M::Error::custom)?;
        }
        Ok(table)
    }
}

impl<'de, K, V> Deserialize<'de> for HashTable<K, V>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(HashTableVisitor::<K, V>::new())
    }
}

impl<K, V> Serialize for HashTable<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.count()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
