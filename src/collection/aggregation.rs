//! 集計演算
//!
//! sum/avg/min/max/median/reduce/count_by。すべて呼び出し時に全要素を走査します。

use crate::constants::ops;
use crate::error::{CollectionError, Result};
use crate::i18n::MsgKey;
use crate::value::{Key, Value};
use crate::{new_hashmap, HashMap};
use std::cmp::Ordering;

use super::{log_materialize, Collection, Selector};

/// 合計の途中結果（オーバーフローまたは浮動小数点数で Float に移る）
enum Total {
    Int(i64),
    Float(f64),
}

impl Total {
    fn add(self, value: &Value, op: &str) -> Result<Total> {
        match (self, value) {
            (Total::Int(acc), Value::Integer(n)) => Ok(match acc.checked_add(*n) {
                Some(sum) => Total::Int(sum),
                None => Total::Float(acc as f64 + *n as f64),
            }),
            (Total::Int(acc), Value::Float(f)) => Ok(Total::Float(acc as f64 + f)),
            (Total::Float(acc), Value::Integer(n)) => Ok(Total::Float(acc + *n as f64)),
            (Total::Float(acc), Value::Float(f)) => Ok(Total::Float(acc + f)),
            (_, other) => Err(not_numeric(op, other)),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Total::Int(n) => Value::Integer(n),
            Total::Float(f) => Value::Float(f),
        }
    }
}

fn not_numeric(op: &str, value: &Value) -> CollectionError {
    CollectionError::invalid_argument(
        MsgKey::AllElementsMustBe,
        &[op, "numbers", value.type_name()],
    )
}

impl Collection {
    /// 合計。全て整数なら Integer、浮動小数点数を含めば Float。空なら0
    pub fn sum(&self) -> Result<Value> {
        self.sum_by(Selector::Identity)
    }

    /// セレクタの結果の合計
    pub fn sum_by<S: Into<Selector>>(&self, selector: S) -> Result<Value> {
        let selector = selector.into();
        let mut total = Total::Int(0);
        for pair in self.iter() {
            let (k, v) = pair?;
            total = total.add(&selector.resolve(&v, &k)?, ops::SUM)?;
        }
        Ok(total.into_value())
    }

    /// 平均（Float）。空なら EmptyCollection
    pub fn avg(&self) -> Result<Value> {
        self.avg_by(Selector::Identity)
    }

    pub fn avg_by<S: Into<Selector>>(&self, selector: S) -> Result<Value> {
        let selector = selector.into();
        let mut total = 0.0;
        let mut count = 0usize;
        for pair in self.iter() {
            let (k, v) = pair?;
            let resolved = selector.resolve(&v, &k)?;
            total += resolved
                .as_f64()
                .ok_or_else(|| not_numeric(ops::AVG, &resolved))?;
            count += 1;
        }

        if count == 0 {
            return Err(CollectionError::empty(ops::AVG));
        }
        Ok(Value::Float(total / count as f64))
    }

    /// 最小の要素（自然順序、同値なら先勝ち）
    pub fn min(&self) -> Result<Value> {
        self.min_by(Selector::Identity)
    }

    pub fn min_by<S: Into<Selector>>(&self, selector: S) -> Result<Value> {
        self.extreme_by(selector.into(), Ordering::Less, ops::MIN)
    }

    /// 最大の要素（自然順序、同値なら先勝ち）
    pub fn max(&self) -> Result<Value> {
        self.max_by(Selector::Identity)
    }

    pub fn max_by<S: Into<Selector>>(&self, selector: S) -> Result<Value> {
        self.extreme_by(selector.into(), Ordering::Greater, ops::MAX)
    }

    /// `wanted` 方向に厳密に勝つときだけ置き換える
    fn extreme_by(&self, selector: Selector, wanted: Ordering, op: &str) -> Result<Value> {
        let mut best: Option<(Value, Value)> = None;
        for pair in self.iter() {
            let (k, v) = pair?;
            let resolved = selector.resolve(&v, &k)?;
            let replace = match &best {
                None => true,
                Some((current, _)) => resolved.compare(current) == wanted,
            };
            if replace {
                best = Some((resolved, v));
            }
        }

        best.map(|(_, item)| item)
            .ok_or_else(|| CollectionError::empty(op))
    }

    /// 中央値（Float）。偶数個なら中央2つの平均
    pub fn median(&self) -> Result<Value> {
        self.median_by(Selector::Identity)
    }

    pub fn median_by<S: Into<Selector>>(&self, selector: S) -> Result<Value> {
        let selector = selector.into();
        let mut nums = Vec::new();
        for pair in self.iter() {
            let (k, v) = pair?;
            let resolved = selector.resolve(&v, &k)?;
            nums.push(
                resolved
                    .as_f64()
                    .ok_or_else(|| not_numeric(ops::MEDIAN, &resolved))?,
            );
        }

        if nums.is_empty() {
            return Err(CollectionError::empty(ops::MEDIAN));
        }

        nums.sort_by(|a, b| a.total_cmp(b));
        let mid = nums.len() / 2;
        let median = if nums.len() % 2 == 0 {
            (nums[mid - 1] + nums[mid]) / 2.0
        } else {
            nums[mid]
        };
        Ok(Value::Float(median))
    }

    /// 左畳み込み `f(carry, value, key)`
    ///
    /// `initial` が無ければ最初の値を初期値にして2番目から畳み込む。
    /// その場合に空なら EmptyCollection。
    pub fn reduce<F>(&self, f: F, initial: Option<Value>) -> Result<Value>
    where
        F: Fn(Value, &Value, &Key) -> Result<Value>,
    {
        let mut iter = self.iter();
        let mut carry = match initial {
            Some(init) => init,
            None => match iter.next() {
                Some(pair) => pair?.1,
                None => return Err(CollectionError::empty(ops::REDUCE)),
            },
        };

        for pair in iter {
            let (k, v) = pair?;
            carry = f(carry, &v, &k)?;
        }
        Ok(carry)
    }

    /// セレクタの結果ごとの出現回数（最初に出現した順）
    pub fn count_by<S: Into<Selector>>(&self, selector: S) -> Result<Collection> {
        let selector = selector.into();
        let mut counts: Vec<(Key, i64)> = Vec::new();
        let mut index: HashMap<Key, usize> = new_hashmap();

        for pair in self.iter() {
            let (k, v) = pair?;
            let group = selector.resolve(&v, &k)?.to_key(ops::COUNT_BY)?;
            match index.get(&group) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    index.insert(group.clone(), counts.len());
                    counts.push((group, 1));
                }
            }
        }

        log_materialize(ops::COUNT_BY, counts.len());
        Ok(Collection::from_items(
            counts
                .into_iter()
                .map(|(k, n)| (k, Value::Integer(n)))
                .collect(),
            true,
        ))
    }

    /// 値ごとの出現回数
    pub fn frequencies(&self) -> Result<Collection> {
        self.count_by(Selector::Identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection;
    use crate::error::ErrorCode;

    #[test]
    fn test_sum() {
        assert_eq!(collection![1, 2, 3].sum().unwrap(), Value::Integer(6));
        assert_eq!(collection![1, 2.5].sum().unwrap(), Value::Float(3.5));
        assert_eq!(Collection::new().sum().unwrap(), Value::Integer(0));
        assert_eq!(
            collection![1, "x"].sum().unwrap_err().code(),
            ErrorCode::InvalidArgument
        );
    }

    #[test]
    fn test_sum_overflow_falls_back_to_float() {
        let c = Collection::from_values([i64::MAX, 1]);
        assert!(matches!(c.sum().unwrap(), Value::Float(_)));
    }

    #[test]
    fn test_sum_by_key() {
        let rows = Collection::from_values(vec![
            Value::from(collection! {"price" => 100}),
            Value::from(collection! {"price" => 250}),
        ]);
        assert_eq!(rows.sum_by("price").unwrap(), Value::Integer(350));
    }

    #[test]
    fn test_avg() {
        assert_eq!(collection![1, 2, 3, 4].avg().unwrap(), Value::Float(2.5));
        assert_eq!(
            Collection::new().avg().unwrap_err().code(),
            ErrorCode::EmptyCollection
        );
    }

    #[test]
    fn test_min_max_return_items() {
        let c = collection![3, 1.0, 1, 7];
        assert_eq!(c.min().unwrap(), Value::Float(1.0));
        assert_eq!(c.max().unwrap(), Value::Integer(7));

        let rows = Collection::from_values(vec![
            Value::from(collection! {"n" => 5, "id" => "a"}),
            Value::from(collection! {"n" => 9, "id" => "b"}),
        ]);
        let top = rows.max_by("n").unwrap();
        assert_eq!(
            top.as_collection().unwrap().get(&Key::from("id"), Value::Nil).unwrap(),
            Value::from("b")
        );
        assert_eq!(
            Collection::new().min().unwrap_err().code(),
            ErrorCode::EmptyCollection
        );
    }

    #[test]
    fn test_median() {
        assert_eq!(collection![1, 2, 3, 4].median().unwrap(), Value::Float(2.5));
        assert_eq!(collection![5, 1, 3].median().unwrap(), Value::Float(3.0));
        assert_eq!(
            Collection::new().median().unwrap_err().code(),
            ErrorCode::EmptyCollection
        );
    }

    #[test]
    fn test_reduce() {
        let c = collection![1, 2, 3];
        let add = |carry: Value, v: &Value, _: &Key| {
            let sum = carry.as_f64().unwrap_or(0.0) + v.as_f64().unwrap_or(0.0);
            Ok(Value::Integer(sum as i64))
        };
        assert_eq!(c.reduce(add, None).unwrap(), Value::Integer(6));
        assert_eq!(c.reduce(add, Some(Value::Integer(10))).unwrap(), Value::Integer(16));
        assert_eq!(
            Collection::new().reduce(add, None).unwrap_err().code(),
            ErrorCode::EmptyCollection
        );
        assert_eq!(
            Collection::new().reduce(add, Some(Value::Nil)).unwrap(),
            Value::Nil
        );
    }

    #[test]
    fn test_frequencies_and_count_by() {
        let c = collection!["a", "b", "a", "c", "a"];
        assert_eq!(
            c.frequencies().unwrap(),
            collection! {"a" => 3, "b" => 1, "c" => 1}
        );

        let lengths = collection!["x", "yy", "zz"]
            .count_by(Selector::by(|v, _| {
                let len = match v {
                    Value::String(s) => s.len(),
                    _ => 0,
                };
                Ok(Value::from(len))
            }))
            .unwrap();
        assert_eq!(lengths, collection! {1 => 1, 2 => 2});
    }
}
