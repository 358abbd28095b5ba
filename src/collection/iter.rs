//! 遅延演算用のイテレータ

use crate::error::Result;
use crate::value::{Key, Value};

use super::{Pair, Pairs};

/// 入れ子のコレクションを展開するイテレータ
///
/// `depth` が `None` なら完全に展開する。出力のキーは0からの連番。
pub(crate) struct FlattenIter {
    stack: Vec<(Pairs, Option<usize>)>,
    next_key: i64,
}

impl FlattenIter {
    pub(crate) fn new(root: Pairs, depth: Option<usize>) -> Self {
        Self {
            stack: vec![(root, depth)],
            next_key: 0,
        }
    }
}

impl Iterator for FlattenIter {
    type Item = Result<Pair>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (iter, depth) = self.stack.last_mut()?;
            let depth = *depth;
            let item = match iter.next() {
                Some(item) => item,
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            let value = match item {
                Ok((_, v)) => v,
                Err(e) => return Some(Err(e)),
            };

            match (&value, depth) {
                (Value::Collection(_), Some(0)) => {}
                (Value::Collection(c), remaining) => {
                    let inner = c.iter();
                    self.stack.push((inner, remaining.map(|d| d - 1)));
                    continue;
                }
                _ => {}
            }

            let key = Key::Int(self.next_key);
            self.next_key += 1;
            return Some(Ok((key, value)));
        }
    }
}

/// 先頭からn件だけ取り出し、以降は上流を読まないイテレータ
pub(crate) struct TakeIter {
    inner: Pairs,
    remaining: usize,
}

impl TakeIter {
    pub(crate) fn new(inner: Pairs, n: usize) -> Self {
        Self {
            inner,
            remaining: n,
        }
    }
}

impl Iterator for TakeIter {
    type Item = Result<Pair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.inner.next()?;
        // エラーの後は続けない
        self.remaining = if item.is_ok() { self.remaining - 1 } else { 0 };
        Some(item)
    }
}
