//! 変更操作
//!
//! 受け手を一度だけ実体化（後勝ち）してから変更します。
//! 変更関数が失敗した場合、受け手は元のまま残ります。

use crate::constants::ops;
use crate::error::{CollectionError, Result};
use crate::i18n::MsgKey;
use crate::value::{Key, Value};

use super::{Collection, Pair};

/// 最大の整数キー + 1（無ければ0）。i64::MAX の次は作れない
fn next_int_key(op: &str, pairs: &im::Vector<Pair>) -> Result<i64> {
    match pairs.iter().filter_map(|(k, _)| k.as_int()).max() {
        None => Ok(0),
        Some(max) => max.checked_add(1).ok_or_else(|| {
            CollectionError::invalid_argument(MsgKey::IntKeyOverflow, &[op, &max.to_string()])
        }),
    }
}

impl Collection {
    /// 実体化した組に変更を適用し、成功した場合のみ書き戻す
    fn mutate<R, F>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut im::Vector<Pair>) -> Result<R>,
    {
        let mut pairs = self.unique_items(op)?;
        let out = f(&mut pairs)?;
        *self = Collection::from_items(pairs, true);
        Ok(out)
    }

    /// 末尾に追加（キーは次の整数）
    pub fn push<V: Into<Value>>(&mut self, value: V) -> Result<()> {
        let value = value.into();
        self.mutate(ops::PUSH, |pairs| {
            let key = next_int_key(ops::PUSH, pairs)?;
            pairs.push_back((Key::Int(key), value));
            Ok(())
        })
    }

    /// キーを指定して設定（既存なら同じ位置で上書き、無ければ末尾に追加）
    pub fn put<K: Into<Key>, V: Into<Value>>(&mut self, key: K, value: V) -> Result<()> {
        let key = key.into();
        let value = value.into();
        self.mutate(ops::PUT, |pairs| {
            match pairs.iter().position(|(k, _)| *k == key) {
                Some(pos) => pairs[pos].1 = value,
                None => pairs.push_back((key, value)),
            }
            Ok(())
        })
    }

    /// 末尾の値を取り除いて返す
    pub fn pop(&mut self) -> Result<Value> {
        self.mutate(ops::POP, |pairs| {
            pairs
                .pop_back()
                .map(|(_, v)| v)
                .ok_or_else(|| CollectionError::empty(ops::POP))
        })
    }

    /// 先頭の値を取り除いて返す（残りのキーはそのまま）
    pub fn shift(&mut self) -> Result<Value> {
        self.mutate(ops::SHIFT, |pairs| {
            pairs
                .pop_front()
                .map(|(_, v)| v)
                .ok_or_else(|| CollectionError::empty(ops::SHIFT))
        })
    }

    /// 先頭に追加し、整数キーを0から振り直す（文字列キーはそのまま）
    pub fn unshift<V: Into<Value>>(&mut self, value: V) -> Result<()> {
        let value = value.into();
        self.mutate(ops::UNSHIFT, |pairs| {
            pairs.push_front((Key::Int(0), value));
            let mut next = 0i64;
            for (k, _) in pairs.iter_mut() {
                if k.is_int() {
                    *k = Key::Int(next);
                    next += 1;
                }
            }
            Ok(())
        })
    }

    /// 先頭に追加
    ///
    /// キーを指定した場合、同じキーの既存要素は取り除かれる。
    /// キーが無ければ `unshift` と同じ。
    pub fn prepend<V: Into<Value>>(&mut self, value: V, key: Option<Key>) -> Result<()> {
        let Some(key) = key else {
            return self.unshift(value);
        };

        let value = value.into();
        self.mutate(ops::PREPEND, |pairs| {
            pairs.retain(|(k, _)| *k != key);
            pairs.push_front((key, value));
            Ok(())
        })
    }

    /// 述語に一致する要素を全て取り除き、取り除いた要素（キー保持）を返す
    pub fn pull<F>(&mut self, pred: F) -> Result<Collection>
    where
        F: Fn(&Value, &Key) -> Result<bool>,
    {
        self.mutate(ops::PULL, |pairs| {
            let mut kept = im::Vector::new();
            let mut pulled = im::Vector::new();
            for (k, v) in pairs.iter() {
                if pred(v, k)? {
                    pulled.push_back((k.clone(), v.clone()));
                } else {
                    kept.push_back((k.clone(), v.clone()));
                }
            }
            *pairs = kept;
            Ok(Collection::from_items(pulled, true))
        })
    }
}
