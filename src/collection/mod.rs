//! キー付き順序コレクション
//!
//! `Collection` は (キー, 値) の順序付き列を表します。ソースは2種類:
//! - 実体化済みの `im::Vector`（構造共有でclone()はO(1)）
//! - 列挙のたびに呼び出されるイテレータ生成関数（遅延評価）
//!
//! map/filterなどの遅延演算は上流のイテレータを包むだけで、
//! 列挙されるまで何も計算しません。

pub mod aggregation;
pub mod array;
pub mod chunks;
mod iter;
#[cfg(feature = "format-json")]
pub mod json;
pub mod mutation;
pub mod partition;
pub mod selector;
pub mod set;
pub mod transform;

pub use array::Array;
pub use chunks::CollectionCollection;
pub use selector::{Callable, Selector};

use crate::constants::ops;
use crate::error::{CollectionError, Result};
use crate::log;
use crate::value::{Key, Value};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use std::sync::Arc;

/// (キー, 値) の組
pub type Pair = (Key, Value);

/// 列挙用カーソル（次の組か終端を返す）
pub type Pairs = Box<dyn Iterator<Item = Result<Pair>> + Send>;

type Factory = Arc<dyn Fn() -> Pairs + Send + Sync>;

#[derive(Clone)]
enum Source {
    /// 実体化済み。`unique` はキーの重複が無いことが分かっている場合にtrue
    Items { pairs: im::Vector<Pair>, unique: bool },
    /// 遅延ソース（列挙のたびに生成関数を呼ぶ）
    Lazy(Factory),
}

/// キー付き順序コレクション
#[derive(Clone)]
pub struct Collection {
    source: Source,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    /// 空のコレクション
    pub fn new() -> Self {
        Self::from_items(im::Vector::new(), true)
    }

    /// 値の列から作成（キーは0から連番）
    pub fn from_values<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let pairs = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Key::Int(i as i64), v.into()))
            .collect();
        Self::from_items(pairs, true)
    }

    /// (キー, 値) の列から作成
    ///
    /// 重複したキーはそのまま保持され、実体化（to_array）時に後勝ちで解決されます。
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_items(pairs, false)
    }

    /// イテレータ生成関数から遅延コレクションを作成
    ///
    /// 列挙のたびに `f` が呼ばれ、新しいイテレータが作られます。
    ///
    /// ```
    /// use qi_collection::{Collection, Key, Value};
    ///
    /// let evens = Collection::from_fn(|| {
    ///     (0..5).map(|i| (Key::Int(i), Value::Integer(i * 2)))
    /// });
    /// assert_eq!(evens.count().unwrap(), 5);
    /// ```
    pub fn from_fn<F, I>(f: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = Pair>,
        I::IntoIter: Send + 'static,
    {
        Self::lazy(move || Box::new(f().into_iter().map(Ok)))
    }

    pub(crate) fn from_items(pairs: im::Vector<Pair>, unique: bool) -> Self {
        Collection {
            source: Source::Items { pairs, unique },
        }
    }

    /// 遅延コレクション（内部用）
    pub(crate) fn lazy<F>(factory: F) -> Self
    where
        F: Fn() -> Pairs + Send + Sync + 'static,
    {
        Collection {
            source: Source::Lazy(Arc::new(factory)),
        }
    }

    /// 列挙開始時に全体を計算する遅延コレクション（内部用）
    ///
    /// 計算に失敗した場合、最初の列挙ステップでエラーになります。
    pub(crate) fn deferred<F>(compute: F) -> Self
    where
        F: Fn() -> Result<Vec<Pair>> + Send + Sync + 'static,
    {
        Self::lazy(move || match compute() {
            Ok(pairs) => Box::new(pairs.into_iter().map(Ok)),
            Err(e) => Box::new(std::iter::once(Err(e))),
        })
    }

    /// 遅延ソースかどうか
    pub fn is_lazy(&self) -> bool {
        matches!(self.source, Source::Lazy(_))
    }

    // ========================================
    // 列挙
    // ========================================

    /// (キー, 値) を順に列挙する
    pub fn iter(&self) -> Pairs {
        match &self.source {
            Source::Items { pairs, .. } => Box::new(pairs.clone().into_iter().map(Ok)),
            Source::Lazy(factory) => factory(),
        }
    }

    /// 全ての組を取得（重複キーも含む）
    pub fn to_pairs(&self) -> Result<Vec<Pair>> {
        self.iter().collect()
    }

    /// 全ての値を取得
    pub fn to_values(&self) -> Result<Vec<Value>> {
        self.iter().map(|pair| pair.map(|(_, v)| v)).collect()
    }

    /// 実体化（後勝ち）
    pub fn to_array(&self) -> Result<Array> {
        Array::from_results(ops::TO_ARRAY, self.iter())
    }

    /// 実体化（キー重複をエラーにする）
    pub fn to_array_unique(&self) -> Result<Array> {
        Array::from_results_unique(ops::TO_ARRAY, self.iter())
    }

    /// 実体化済みでキーが一意な組（変更操作・非遅延演算用）
    pub(crate) fn unique_items(&self, op: &str) -> Result<im::Vector<Pair>> {
        match &self.source {
            Source::Items {
                pairs,
                unique: true,
            } => Ok(pairs.clone()),
            _ => {
                let pairs = self.to_array()?.into_vector();
                log_materialize(op, pairs.len());
                Ok(pairs)
            }
        }
    }

    // ========================================
    // アクセサ
    // ========================================

    /// 要素数
    pub fn count(&self) -> Result<usize> {
        match &self.source {
            Source::Items { pairs, .. } => Ok(pairs.len()),
            Source::Lazy(_) => {
                let mut count = 0;
                for pair in self.iter() {
                    pair?;
                    count += 1;
                }
                Ok(count)
            }
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        match self.iter().next() {
            None => Ok(true),
            Some(pair) => pair.map(|_| false),
        }
    }

    /// キーが存在するか
    pub fn has(&self, key: &Key) -> Result<bool> {
        for pair in self.iter() {
            if pair?.0 == *key {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// 値が含まれるか（厳密な等価性）
    pub fn contains(&self, value: &Value) -> Result<bool> {
        for pair in self.iter() {
            if pair?.1 == *value {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// キーに対応する値。重複キーは後勝ち
    pub fn get_opt(&self, key: &Key) -> Result<Option<Value>> {
        let mut found = None;
        for pair in self.iter() {
            let (k, v) = pair?;
            if k == *key {
                found = Some(v);
            }
        }
        Ok(found)
    }

    /// キーに対応する値。無ければ `default`
    pub fn get(&self, key: &Key, default: Value) -> Result<Value> {
        Ok(self.get_opt(key)?.unwrap_or(default))
    }

    /// 最初の値。空なら EmptyCollection
    pub fn first(&self) -> Result<Value> {
        match self.iter().next() {
            Some(pair) => pair.map(|(_, v)| v),
            None => Err(CollectionError::empty(ops::FIRST)),
        }
    }

    /// 述語に一致する最初の値
    ///
    /// 一致しなければ `default`、それも無ければ EmptyCollection。
    pub fn first_matching<F>(&self, predicate: F, default: Option<Value>) -> Result<Value>
    where
        F: Fn(&Value, &Key) -> Result<bool>,
    {
        for pair in self.iter() {
            let (k, v) = pair?;
            if predicate(&v, &k)? {
                return Ok(v);
            }
        }
        default.ok_or_else(|| CollectionError::no_match(ops::FIRST))
    }

    /// 最後の値。空なら EmptyCollection
    pub fn last(&self) -> Result<Value> {
        match &self.source {
            Source::Items { pairs, .. } => pairs
                .last()
                .map(|(_, v)| v.clone())
                .ok_or_else(|| CollectionError::empty(ops::LAST)),
            Source::Lazy(_) => {
                let mut last = None;
                for pair in self.iter() {
                    last = Some(pair?.1);
                }
                last.ok_or_else(|| CollectionError::empty(ops::LAST))
            }
        }
    }

    /// 述語に一致する最後の値
    pub fn last_matching<F>(&self, predicate: F, default: Option<Value>) -> Result<Value>
    where
        F: Fn(&Value, &Key) -> Result<bool>,
    {
        let mut last = None;
        for pair in self.iter() {
            let (k, v) = pair?;
            if predicate(&v, &k)? {
                last = Some(v);
            }
        }
        last.or(default)
            .ok_or_else(|| CollectionError::no_match(ops::LAST))
    }

    /// ランダムな値を1つ取得
    #[cfg(feature = "std-math")]
    pub fn random(&self) -> Result<Value> {
        use rand::seq::IndexedRandom;

        let values = self.to_values()?;
        values
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| CollectionError::empty(ops::RANDOM))
    }
}

/// 実体化のデバッグログ
pub(crate) fn log_materialize(op: &str, count: usize) {
    if log::enabled(log::LogLevel::Debug) {
        log::debug(
            "materialize",
            &[("op", op.to_string()), ("items", count.to_string())],
        );
    }
}

// ========================================
// 構築の入口
// ========================================

impl<T: Into<Value>> From<Vec<T>> for Collection {
    fn from(values: Vec<T>) -> Self {
        Self::from_values(values)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Collection {
    fn from(values: [T; N]) -> Self {
        Self::from_values(values)
    }
}

impl From<Array> for Collection {
    fn from(array: Array) -> Self {
        Self::from_items(array.into_vector(), true)
    }
}

impl From<&Collection> for Collection {
    fn from(c: &Collection) -> Self {
        c.clone()
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl FromIterator<Pair> for Collection {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl IntoIterator for &Collection {
    type Item = Result<Pair>;
    type IntoIter = Pairs;

    fn into_iter(self) -> Pairs {
        self.iter()
    }
}

/// コレクションを作成するマクロ
///
/// ```
/// use qi_collection::collection;
///
/// let list = collection![1, 2, 3];
/// let map = collection!{"a" => 1, "b" => 2};
/// assert_eq!(list.count().unwrap(), 3);
/// assert_eq!(map.count().unwrap(), 2);
/// ```
#[macro_export]
macro_rules! collection {
    () => {
        $crate::Collection::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Collection::from_pairs([
            $(($crate::Key::from($key), $crate::Value::from($value))),+
        ])
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Collection::from_values([$($crate::Value::from($value)),+])
    };
}

// ========================================
// 比較・表示
// ========================================

/// 列挙した (キー, 値) の列が一致すれば等しい。列挙中のエラーは不一致とみなす
impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(Ok(a)), Some(Ok(b))) if a == b => continue,
                _ => return false,
            }
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let array = match self.to_array() {
            Ok(array) => array,
            Err(_) => return write!(f, "#<error>"),
        };

        if array.is_list() {
            write!(f, "[")?;
            for (i, (_, v)) in array.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", v)?;
            }
            write!(f, "]")
        } else {
            write!(f, "{{")?;
            for (i, (k, v)) in array.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{} {}", k, v)?;
            }
            write!(f, "}}")
        }
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_lazy() { "lazy" } else { "items" };
        write!(f, "Collection<{}>({})", kind, self)
    }
}

/// 連番キー（0..n）ならシーケンス、それ以外はマップとしてシリアライズ
impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let array = self
            .to_array()
            .map_err(<S::Error as serde::ser::Error>::custom)?;

        if array.is_list() {
            let mut seq = serializer.serialize_seq(Some(array.len()))?;
            for (_, v) in array.iter() {
                seq.serialize_element(v)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(array.len()))?;
            for (k, v) in array.iter() {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }
}
