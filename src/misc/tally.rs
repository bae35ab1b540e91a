use core::fmt::{Formatter, Result as FmtResult};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Counts keyed by name, remembering the order in which keys first appeared.
///
/// Serializes as a map in that order, so a sorted tally stays sorted in JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally(Vec<(String, u64)>);

impl Tally {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds `amount` to the count for `key`, appending the key if it is new.
    pub fn add(&mut self, key: &str, amount: u64) {
        if let Some((_, count)) = self.0.iter_mut().find(|(k, _)| k == key) {
            *count += amount;
        } else {
            self.0.push((key.to_string(), amount));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> u64 {
        self.0.iter().find(|(k, _)| k == key).map_or(0, |(_, count)| *count)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// Orders entries by descending count; ties keep their first-occurrence order.
    #[must_use]
    pub fn sorted_descending(mut self) -> Self {
        self.0.sort_by(|a, b| b.1.cmp(&a.1));
        self
    }
}

impl FromIterator<(String, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut tally = Self::new();
        for (key, count) in iter {
            tally.add(&key, count);
        }
        tally
    }
}

impl Serialize for Tally {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in &self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Tally {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TallyVisitor;

        impl<'de> Visitor<'de> for TallyVisitor {
            type Value = Tally;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> FmtResult {
                formatter.write_str("a map of names to counts")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut tally = Tally::new();
                while let Some((key, count)) = access.next_entry::<String, u64>()? {
                    tally.add(&key, count);
                }
                Ok(tally)
            }
        }

        deserializer.deserialize_map(TallyVisitor)
    }
}
