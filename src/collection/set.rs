//! 集合演算・結合
//!
//! 値の比較は厳密な等価性（型も含めて一致）で行います。

use crate::constants::ops;
use crate::error::{CollectionError, Result};
use crate::i18n::MsgKey;
use crate::value::{Key, Value};
use crate::{new_hashset, HashSet};

use super::{log_materialize, Array, Collection, Pair};
use std::sync::{Arc, OnceLock};

/// ハッシュ可能な値の表現
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Hashed {
    Nil,
    Bool(bool),
    Int(i64),
    /// ビット表現（-0.0は0.0に正規化）
    Float(u64),
    Str(String),
}

impl Hashed {
    /// NaNとコレクションはハッシュしない
    fn of(value: &Value) -> Option<Hashed> {
        match value {
            Value::Nil => Some(Hashed::Nil),
            Value::Bool(b) => Some(Hashed::Bool(*b)),
            Value::Integer(n) => Some(Hashed::Int(*n)),
            Value::Float(f) if f.is_nan() => None,
            Value::Float(f) => Some(Hashed::Float(if *f == 0.0 { 0 } else { f.to_bits() })),
            Value::String(s) => Some(Hashed::Str(s.clone())),
            Value::Collection(_) => None,
        }
    }
}

/// 厳密な等価性に基づく値の集合
///
/// スカラーはハッシュ、入れ子のコレクションは線形に比較する。NaNは何とも一致しない。
pub(crate) struct ValueSet {
    scalars: HashSet<Hashed>,
    nested: Vec<Value>,
}

impl ValueSet {
    pub(crate) fn new() -> Self {
        Self {
            scalars: new_hashset(),
            nested: Vec::new(),
        }
    }

    pub(crate) fn from_collection(c: &Collection) -> Result<Self> {
        let mut set = Self::new();
        for pair in c.iter() {
            set.insert(&pair?.1);
        }
        Ok(set)
    }

    /// 新しく追加された場合true
    pub(crate) fn insert(&mut self, value: &Value) -> bool {
        match Hashed::of(value) {
            Some(h) => self.scalars.insert(h).is_none(),
            None if value.as_collection().is_some() => {
                if self.nested.contains(value) {
                    false
                } else {
                    self.nested.push(value.clone());
                    true
                }
            }
            // NaN
            None => true,
        }
    }

    pub(crate) fn contains(&self, value: &Value) -> bool {
        match Hashed::of(value) {
            Some(h) => self.scalars.contains(&h),
            None => self.nested.contains(value),
        }
    }
}

impl Collection {
    /// `other` に含まれない要素（キーは保持）
    ///
    /// `other` は最初の列挙開始時に一度だけ実体化され、以後の列挙で再利用される。
    pub fn diff<C: Into<Collection>>(&self, other: C) -> Collection {
        self.membership(other.into(), false)
    }

    /// `other` に含まれる要素（キーは保持）
    pub fn intersect<C: Into<Collection>>(&self, other: C) -> Collection {
        self.membership(other.into(), true)
    }

    fn membership(&self, other: Collection, keep: bool) -> Collection {
        let source = self.clone();
        let cache: Arc<OnceLock<Result<ValueSet>>> = Arc::new(OnceLock::new());
        Collection::lazy(move || {
            if let Err(e) = cache.get_or_init(|| ValueSet::from_collection(&other)) {
                return Box::new(std::iter::once(Err(e.clone())));
            }
            let cache = Arc::clone(&cache);
            Box::new(source.iter().filter(move |pair| match pair {
                Ok((_, v)) => cache
                    .get()
                    .and_then(|set| set.as_ref().ok())
                    .is_some_and(|set| set.contains(v) == keep),
                Err(_) => true,
            }))
        })
    }

    /// 重複を除く（最初の出現を残す）
    pub fn distinct(&self) -> Collection {
        let source = self.clone();
        Collection::lazy(move || {
            let mut seen = ValueSet::new();
            Box::new(source.iter().filter(move |pair| match pair {
                Ok((_, v)) => seen.insert(v),
                Err(_) => true,
            }))
        })
    }

    /// 連想配列のマージ
    ///
    /// 文字列キーは `other` で上書き（位置は最初の出現）。
    /// 整数キーは両側とも振り直して末尾に追加する。
    pub fn merge<C: Into<Collection>>(&self, other: C) -> Result<Collection> {
        let other = other.into();
        let mut merged = Array::new();
        let mut next = 0i64;

        for side in [self, &other] {
            for (k, v) in side.to_array()?.into_vector() {
                match k {
                    Key::Int(_) => {
                        merged.insert(Key::Int(next), v);
                        next += 1;
                    }
                    Key::Str(_) => {
                        merged.insert(k, v);
                    }
                }
            }
        }

        log_materialize(ops::MERGE, merged.len());
        Ok(Collection::from(merged))
    }

    /// 行と列を入れ替える
    ///
    /// 全要素が同じ長さのコレクションでなければ InvalidArgument。
    /// 外側のキーは先頭行のキー、内側のキーは元のキー。
    pub fn transpose(&self) -> Result<Collection> {
        let outer = self.to_array()?;

        let mut row_keys: Vec<Key> = Vec::with_capacity(outer.len());
        let mut rows: Vec<Vec<Value>> = Vec::with_capacity(outer.len());
        let mut column_keys: Option<Vec<Key>> = None;

        for (k, v) in outer.iter() {
            let row = match v {
                Value::Collection(c) => c.to_array()?,
                other => {
                    return Err(CollectionError::invalid_argument(
                        MsgKey::NotACollection,
                        &[ops::TRANSPOSE, &k.to_string(), other.type_name()],
                    ))
                }
            };

            match column_keys.as_ref().map(Vec::len) {
                None => column_keys = Some(row.keys().cloned().collect()),
                Some(expected) if expected != row.len() => {
                    return Err(CollectionError::invalid_argument(
                        MsgKey::LengthMismatch,
                        &[
                            ops::TRANSPOSE,
                            &k.to_string(),
                            &row.len().to_string(),
                            &expected.to_string(),
                        ],
                    ))
                }
                Some(_) => {}
            }

            row_keys.push(k.clone());
            rows.push(row.values().cloned().collect());
        }

        let column_keys = column_keys.unwrap_or_default();
        log_materialize(ops::TRANSPOSE, rows.len());

        let columns: im::Vector<Pair> = column_keys
            .into_iter()
            .enumerate()
            .map(|(j, column_key)| {
                let column: im::Vector<Pair> = row_keys
                    .iter()
                    .zip(&rows)
                    .map(|(rk, row)| (rk.clone(), row[j].clone()))
                    .collect();
                (column_key, Value::Collection(Collection::from_items(column, true)))
            })
            .collect();
        Ok(Collection::from_items(columns, true))
    }
}
