//! 分割・切り出し・並べ替え
//!
//! chunk/split は `CollectionCollection` を返します。

use crate::constants::ops;
use crate::error::{CollectionError, Result};

use super::iter::TakeIter;
use super::{log_materialize, Collection, CollectionCollection, Pair, Pairs};

/// 部分列からコレクションを作る（preserve_keys=falseなら0からの連番）
fn part(pairs: &[Pair], preserve_keys: bool) -> Collection {
    if preserve_keys {
        Collection::from_items(pairs.iter().cloned().collect(), true)
    } else {
        Collection::from_values(pairs.iter().map(|(_, v)| v.clone()))
    }
}

impl Collection {
    /// `size` 件ずつに分割（最後は短くてもよい）
    pub fn chunk(&self, size: usize, preserve_keys: bool) -> Result<CollectionCollection> {
        if size == 0 {
            return Err(CollectionError::must_be_positive(ops::CHUNK, "size"));
        }

        let pairs: Vec<Pair> = self.to_array()?.into_vector().into_iter().collect();
        log_materialize(ops::CHUNK, pairs.len());
        Ok(pairs
            .chunks(size)
            .map(|chunk| part(chunk, preserve_keys))
            .collect())
    }

    /// ちょうど `groups` 個に分割
    ///
    /// 各グループの大きさは ceil(件数 / groups)。末尾のグループは空になりうる。
    pub fn split(&self, groups: usize, preserve_keys: bool) -> Result<CollectionCollection> {
        if groups == 0 {
            return Err(CollectionError::must_be_positive(ops::SPLIT, "number of groups"));
        }

        let pairs: Vec<Pair> = self.to_array()?.into_vector().into_iter().collect();
        log_materialize(ops::SPLIT, pairs.len());
        let size = pairs.len().div_ceil(groups);

        Ok((0..groups)
            .map(|g| {
                let start = (g * size).min(pairs.len());
                let end = (start + size).min(pairs.len());
                part(&pairs[start..end], preserve_keys)
            })
            .collect())
    }

    /// 位置で切り出す（キーは保持）
    ///
    /// - 負の `offset` は末尾から数える
    /// - `length` が `None` なら最後まで
    /// - 負の `length` は末尾からその件数手前で止まる
    ///
    /// 負の値を含む場合は件数が必要なため列挙開始時にバッファする。
    pub fn slice(&self, offset: i64, length: Option<i64>) -> Collection {
        let source = self.clone();

        if offset >= 0 && length.map_or(true, |len| len >= 0) {
            let offset = offset as usize;
            let length = length.map(|len| len as usize);
            return Collection::lazy(move || {
                let skipped: Pairs = Box::new(
                    source
                        .iter()
                        .enumerate()
                        .filter(move |(i, pair)| pair.is_err() || *i >= offset)
                        .map(|(_, pair)| pair),
                );
                let pairs: Pairs = match length {
                    Some(n) => Box::new(TakeIter::new(skipped, n)),
                    None => skipped,
                };
                pairs
            });
        }

        Collection::deferred(move || {
            let pairs = source.to_pairs()?;
            let total = pairs.len() as i64;
            let start = if offset < 0 {
                (total + offset).max(0)
            } else {
                offset.min(total)
            };
            let end = match length {
                None => total,
                Some(len) if len < 0 => (total + len).max(start),
                Some(len) => start.saturating_add(len).min(total),
            };
            Ok(pairs[start as usize..end as usize].to_vec())
        })
    }

    /// `offset` 番目から `step` 件おきに取り出す（キーは保持）
    pub fn nth(&self, step: usize, offset: usize) -> Result<Collection> {
        if step == 0 {
            return Err(CollectionError::must_be_positive(ops::NTH, "step"));
        }

        let source = self.clone();
        Ok(Collection::lazy(move || {
            Box::new(
                source
                    .iter()
                    .enumerate()
                    .filter(move |(i, pair)| {
                        pair.is_err() || (*i >= offset && (*i - offset) % step == 0)
                    })
                    .map(|(_, pair)| pair),
            )
        }))
    }

    /// `nth` の別名
    pub fn take_nth(&self, step: usize, offset: usize) -> Result<Collection> {
        self.nth(step, offset)
    }

    /// 逆順（キーは保持）
    pub fn reverse(&self) -> Result<Collection> {
        let mut pairs: Vec<Pair> = self.to_array()?.into_vector().into_iter().collect();
        log_materialize(ops::REVERSE, pairs.len());
        pairs.reverse();
        Ok(Collection::from_items(pairs.into_iter().collect(), true))
    }

    /// ランダムに並べ替える（キーは保持）
    #[cfg(feature = "std-math")]
    pub fn shuffle(&self) -> Result<Collection> {
        use rand::seq::SliceRandom;

        let mut pairs: Vec<Pair> = self.to_array()?.into_vector().into_iter().collect();
        log_materialize(ops::SHUFFLE, pairs.len());
        pairs.shuffle(&mut rand::rng());
        Ok(Collection::from_items(pairs.into_iter().collect(), true))
    }
}
