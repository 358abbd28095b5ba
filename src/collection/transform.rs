//! 変換演算
//!
//! map/filter/extract/index_by/flip/flatten などは遅延評価。
//! group_by/sort系/transform は呼び出し時に実体化します。

use crate::constants::{collections::DEFAULT_VEC_CAPACITY, ops};
use crate::error::{CollectionError, Result};
use crate::i18n::MsgKey;
use crate::value::{Key, Value};
use crate::{new_hashmap, HashMap};
use std::cmp::Ordering;
use std::sync::Arc;

use super::iter::{FlattenIter, TakeIter};
use super::{log_materialize, Collection, Pair, Selector};

impl Collection {
    /// 各値に関数を適用（キーは保持）
    pub fn map<F>(&self, f: F) -> Collection
    where
        F: Fn(&Value, &Key) -> Result<Value> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Collection::lazy(move || {
            let f = Arc::clone(&f);
            Box::new(source.iter().map(move |pair| -> Result<Pair> {
                let (k, v) = pair?;
                let mapped = f(&v, &k)?;
                Ok((k, mapped))
            }))
        })
    }

    /// 述語を満たす要素のみを残す（キーは保持）
    pub fn filter<F>(&self, pred: F) -> Collection
    where
        F: Fn(&Value, &Key) -> Result<bool> + Send + Sync + 'static,
    {
        self.retain_lazy(pred, true)
    }

    /// 述語を満たす要素を除く（キーは保持）
    pub fn reject<F>(&self, pred: F) -> Collection
    where
        F: Fn(&Value, &Key) -> Result<bool> + Send + Sync + 'static,
    {
        self.retain_lazy(pred, false)
    }

    fn retain_lazy<F>(&self, pred: F, keep: bool) -> Collection
    where
        F: Fn(&Value, &Key) -> Result<bool> + Send + Sync + 'static,
    {
        let source = self.clone();
        let pred = Arc::new(pred);
        Collection::lazy(move || {
            let pred = Arc::clone(&pred);
            Box::new(source.iter().filter_map(move |pair| {
                let (k, v) = match pair {
                    Ok(pair) => pair,
                    Err(e) => return Some(Err(e)),
                };
                match pred(&v, &k) {
                    Ok(matched) if matched == keep => Some(Ok((k, v))),
                    Ok(_) => None,
                    Err(e) => Some(Err(e)),
                }
            }))
        })
    }

    /// セレクタで値を取り出す（キーは保持）
    pub fn extract<S: Into<Selector>>(&self, selector: S) -> Collection {
        let selector = selector.into();
        let source = self.clone();
        Collection::lazy(move || {
            let selector = selector.clone();
            Box::new(source.iter().map(move |pair| -> Result<Pair> {
                let (k, v) = pair?;
                let extracted = selector.resolve(&v, &k)?;
                Ok((k, extracted))
            }))
        })
    }

    /// セレクタの結果をキーにする（衝突時は後勝ち）
    pub fn index_by<S: Into<Selector>>(&self, selector: S) -> Collection {
        let selector = selector.into();
        let source = self.clone();
        Collection::lazy(move || {
            let selector = selector.clone();
            Box::new(source.iter().map(move |pair| -> Result<Pair> {
                let (k, v) = pair?;
                let new_key = selector.resolve(&v, &k)?.to_key(ops::INDEX_BY)?;
                Ok((new_key, v))
            }))
        })
    }

    /// キーと値を入れ替える
    pub fn flip(&self) -> Collection {
        let source = self.clone();
        Collection::lazy(move || {
            Box::new(source.iter().map(|pair| -> Result<Pair> {
                let (k, v) = pair?;
                Ok((v.to_key(ops::FLIP)?, k.to_value()))
            }))
        })
    }

    /// キーの一覧（キーは0からの連番）
    pub fn keys(&self) -> Collection {
        let source = self.clone();
        Collection::lazy(move || {
            Box::new(source.iter().enumerate().map(|(i, pair)| -> Result<Pair> {
                let (k, _) = pair?;
                Ok((Key::Int(i as i64), k.to_value()))
            }))
        })
    }

    /// 値の一覧（キーは0からの連番）
    pub fn values(&self) -> Collection {
        let source = self.clone();
        Collection::lazy(move || {
            Box::new(source.iter().enumerate().map(|(i, pair)| -> Result<Pair> {
                let (_, v) = pair?;
                Ok((Key::Int(i as i64), v))
            }))
        })
    }

    /// 先頭からn件
    pub fn take(&self, n: usize) -> Collection {
        let source = self.clone();
        Collection::lazy(move || Box::new(TakeIter::new(source.iter(), n)))
    }

    /// 連結（キーは0からの連番）
    pub fn concat<C: Into<Collection>>(&self, other: C) -> Collection {
        let first = self.clone();
        let second = other.into();
        Collection::lazy(move || {
            Box::new(
                first
                    .iter()
                    .chain(second.iter())
                    .enumerate()
                    .map(|(i, pair)| pair.map(|(_, v)| (Key::Int(i as i64), v))),
            )
        })
    }

    /// 位置ごとに [a, b] の組を作る。短い方で止まる
    pub fn zip<C: Into<Collection>>(&self, other: C) -> Collection {
        let left = self.clone();
        let right = other.into();
        Collection::lazy(move || {
            Box::new(
                left.iter()
                    .zip(right.iter())
                    .enumerate()
                    .map(|(i, (a, b))| -> Result<Pair> {
                        let (_, a) = a?;
                        let (_, b) = b?;
                        Ok((
                            Key::Int(i as i64),
                            Value::Collection(Collection::from_values([a, b])),
                        ))
                    }),
            )
        })
    }

    /// 入れ子のコレクションを展開
    ///
    /// - `-1`: 完全に展開
    /// - `0`: そのまま
    /// - `k`: k段だけ展開
    ///
    /// 展開結果のキーは0からの連番。
    pub fn flatten(&self, depth: i64) -> Result<Collection> {
        let depth = match depth {
            -1 => None,
            0 => return Ok(self.clone()),
            d if d > 0 => Some(d as usize),
            d => {
                return Err(CollectionError::invalid_argument(
                    MsgKey::InvalidFlattenDepth,
                    &[&d.to_string()],
                ))
            }
        };

        let source = self.clone();
        Ok(Collection::lazy(move || {
            Box::new(FlattenIter::new(source.iter(), depth))
        }))
    }

    // ========================================
    // 非遅延の変換
    // ========================================

    /// セレクタの結果でグループ化
    ///
    /// グループは最初に出現した順。各グループの値はキーを振り直したコレクション。
    pub fn group_by<S: Into<Selector>>(&self, selector: S) -> Result<Collection> {
        let selector = selector.into();
        let mut order: Vec<(Key, Vec<Value>)> = Vec::with_capacity(DEFAULT_VEC_CAPACITY);
        let mut index: HashMap<Key, usize> = new_hashmap();

        for pair in self.iter() {
            let (k, v) = pair?;
            let group = selector.resolve(&v, &k)?.to_key(ops::GROUP_BY)?;
            match index.get(&group) {
                Some(&pos) => order[pos].1.push(v),
                None => {
                    index.insert(group.clone(), order.len());
                    order.push((group, vec![v]));
                }
            }
        }

        log_materialize(ops::GROUP_BY, order.len());
        Ok(Collection::from_items(
            order
                .into_iter()
                .map(|(k, members)| (k, Value::Collection(Collection::from_values(members))))
                .collect(),
            true,
        ))
    }

    /// 自然順序で安定ソート（キーは振り直し）
    pub fn sort(&self) -> Result<Collection> {
        let values = self.to_values()?;
        log_materialize(ops::SORT, values.len());
        let sorted = merge_sort(values, &mut |a: &Value, b: &Value| {
            Ok(a.compare(b) == Ordering::Greater)
        })?;
        Ok(Collection::from_values(sorted))
    }

    /// セレクタの結果の自然順序で安定ソート（キーは振り直し）
    pub fn sort_by<S: Into<Selector>>(&self, selector: S) -> Result<Collection> {
        let selector = selector.into();
        let mut keyed = Vec::with_capacity(DEFAULT_VEC_CAPACITY);
        for pair in self.iter() {
            let (k, v) = pair?;
            let sort_key = selector.resolve(&v, &k)?;
            keyed.push((sort_key, v));
        }

        log_materialize(ops::SORT, keyed.len());
        let sorted = merge_sort(keyed, &mut |a: &(Value, Value), b: &(Value, Value)| {
            Ok(a.0.compare(&b.0) == Ordering::Greater)
        })?;
        Ok(Collection::from_values(sorted.into_iter().map(|(_, v)| v)))
    }

    /// 比較関数で安定ソート（キーは振り直し）
    ///
    /// `cmp(a, b)` は数値（正: a > b）か真偽値（true: a > b）を返す。
    pub fn sort_with<F>(&self, cmp: F) -> Result<Collection>
    where
        F: Fn(&Value, &Value) -> Result<Value>,
    {
        let values = self.to_values()?;
        log_materialize(ops::SORT, values.len());
        let sorted = merge_sort(values, &mut |a: &Value, b: &Value| match cmp(a, b)? {
            Value::Integer(n) => Ok(n > 0),
            Value::Float(f) => Ok(f > 0.0),
            Value::Bool(greater) => Ok(greater),
            other => Err(CollectionError::invalid_return(
                ops::SORT,
                "number or boolean",
                other.type_name(),
            )),
        })?;
        Ok(Collection::from_values(sorted))
    }

    /// コレクション全体に関数を適用し、その結果のコレクションを返す
    pub fn transform<F>(&self, f: F) -> Result<Collection>
    where
        F: FnOnce(Collection) -> Result<Value>,
    {
        match f(self.clone())? {
            Value::Collection(c) => Ok(c),
            other => Err(CollectionError::invalid_return(
                ops::TRANSFORM,
                "collection",
                other.type_name(),
            )),
        }
    }
}

/// 失敗しうる比較関数による安定マージソート
///
/// `is_greater(a, b)` がtrueのときだけbを先に出すので、等しい要素の順序は保たれる。
pub(crate) fn merge_sort<T, F>(mut items: Vec<T>, is_greater: &mut F) -> Result<Vec<T>>
where
    F: FnMut(&T, &T) -> Result<bool>,
{
    if items.len() <= 1 {
        return Ok(items);
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, is_greater)?;
    let right = merge_sort(right, is_greater)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => is_greater(l, r)?,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    Ok(merged)
}
