//! chunk/split の結果（コレクションの列）

use crate::value::{Key, Value};
use std::fmt;

use super::Collection;

/// 読み取り専用のコレクションの列
#[derive(Clone, Default, PartialEq)]
pub struct CollectionCollection {
    collections: Vec<Collection>,
}

impl CollectionCollection {
    pub fn new(collections: Vec<Collection>) -> Self {
        Self { collections }
    }

    pub fn count(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Collection> {
        self.collections.get(index)
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Collection> {
        self.collections.iter()
    }

    /// 入れ子のコレクションとして1つにまとめる（キーは0からの連番）
    pub fn into_collection(self) -> Collection {
        Collection::from_items(
            self.collections
                .into_iter()
                .enumerate()
                .map(|(i, c)| (Key::Int(i as i64), Value::Collection(c)))
                .collect(),
            true,
        )
    }
}

impl FromIterator<Collection> for CollectionCollection {
    fn from_iter<I: IntoIterator<Item = Collection>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for CollectionCollection {
    type Item = Collection;
    type IntoIter = std::vec::IntoIter<Collection>;

    fn into_iter(self) -> Self::IntoIter {
        self.collections.into_iter()
    }
}

impl<'a> IntoIterator for &'a CollectionCollection {
    type Item = &'a Collection;
    type IntoIter = std::slice::Iter<'a, Collection>;

    fn into_iter(self) -> Self::IntoIter {
        self.collections.iter()
    }
}

impl fmt::Display for CollectionCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.collections.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for CollectionCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.collections.iter()).finish()
    }
}
