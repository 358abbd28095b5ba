//! 実体化されたキー付き配列
//!
//! `Collection::to_array` の結果。キーは一意で、挿入順を保持します。

use crate::error::{CollectionError, Result};
use crate::log;
use crate::value::{Key, Value};
use crate::{new_hashmap, HashMap};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::Pair;

/// キーが一意な順序付きマップ
#[derive(Debug, Clone, Default)]
pub struct Array {
    entries: im::Vector<Pair>,
    index: HashMap<Key, usize>,
}

impl Array {
    pub fn new() -> Self {
        Self {
            entries: im::Vector::new(),
            index: new_hashmap(),
        }
    }

    /// 後勝ちで実体化（位置は最初に出現した場所）
    pub(crate) fn from_results<I>(op: &str, pairs: I) -> Result<Self>
    where
        I: Iterator<Item = Result<Pair>>,
    {
        let mut array = Self::new();
        let mut overwritten = 0usize;
        for pair in pairs {
            let (k, v) = pair?;
            if array.insert(k, v).is_some() {
                overwritten += 1;
            }
        }
        if overwritten > 0 && log::enabled(log::LogLevel::Debug) {
            log::debug(
                "duplicate keys overwritten",
                &[("op", op.to_string()), ("count", overwritten.to_string())],
            );
        }
        Ok(array)
    }

    /// キー重複をエラーにして実体化
    pub(crate) fn from_results_unique<I>(op: &str, pairs: I) -> Result<Self>
    where
        I: Iterator<Item = Result<Pair>>,
    {
        let mut array = Self::new();
        for pair in pairs {
            let (k, v) = pair?;
            if let Some(&pos) = array.index.get(&k) {
                return Err(CollectionError::duplicate_key(op, &k.to_string())
                    .with_note(format!("first seen at position {}", pos))
                    .with_help("use to_array() to keep the last value instead"));
            }
            array.insert(k, v);
        }
        Ok(array)
    }

    /// 挿入または上書き。上書きした場合は古い値を返す
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        match self.index.get(&key) {
            Some(&pos) => {
                let old = std::mem::replace(&mut self.entries[pos].1, value);
                Some(old)
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push_back((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キーが 0..n の連番か
    pub fn is_list(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, (k, _))| *k == Key::Int(i as i64))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub(crate) fn into_vector(self) -> im::Vector<Pair> {
        self.entries
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_list() {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for v in self.values() {
                seq.serialize_element(v)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (k, v) in self.iter() {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }
}
