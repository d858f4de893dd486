//! Serde support: a multiset is stored as a map from element to
//! multiplicity.
//!
//! Loading rebuilds the backing map from scratch and re-validates it the
//! way [`Multiset::wrap`] does: a missing count is reported as
//! [`MultisetError::MissingMultiplicity`], a zero count as
//! [`MultisetError::InvalidMultiplicity`]. Repeated keys add up.

use crate::backing::BackingMap;
use crate::error::MultisetError;
use crate::multiset::Multiset;
use core::fmt;
use core::marker::PhantomData;
use serde::de::{self, Error as _, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl<T, M> Serialize for Multiset<T, M>
where
    T: Serialize,
    M: BackingMap<T>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.distinct_len()))?;
        for (element, m) in self.entries() {
            map.serialize_entry(element, &m)?;
        }
        map.end()
    }
}

struct MultisetVisitor<T, M> {
    marker: PhantomData<fn() -> (T, M)>,
}

impl<T, M> MultisetVisitor<T, M> {
    const fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<'de, T, M> Visitor<'de> for MultisetVisitor<T, M>
where
    T: Deserialize<'de>,
    M: BackingMap<T> + Default,
{
    type Value = Multiset<T, M>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map from element to positive multiplicity")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = M::default();
        while let Some((element, m)) = access.next_entry::<T, Option<usize>>()? {
            let m = match m {
                None => return Err(de::Error::custom(MultisetError::MissingMultiplicity)),
                Some(0) => {
                    return Err(de::Error::custom(MultisetError::InvalidMultiplicity {
                        multiplicity: 0,
                    }))
                }
                Some(m) => m,
            };
            let present = map.get(&element).unwrap_or(0);
            map.insert(element, present + m).map_err(A::Error::custom)?;
        }
        let set = Multiset::wrap(map).map_err(A::Error::custom)?;
        log::debug!(
            "deserialized multiset: {} distinct, {} total",
            set.distinct_len(),
            set.len()
        );
        Ok(set)
    }
}

impl<'de, T, M> Deserialize<'de> for Multiset<T, M>
where
    T: Deserialize<'de>,
    M: BackingMap<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MultisetVisitor::new())
    }
}
