//! キー付き順序コレクション
//!
//! map/filter などの遅延変換、集計、集合演算、分割・変更操作を
//! 1つの `Collection` 型で提供します。
//!
//! ```
//! use qi_collection::{collection, Value};
//!
//! let total = collection![1, 2, 3, 4]
//!     .filter(|v, _| Ok(v.as_f64().is_some_and(|n| n > 1.0)))
//!     .sum()
//!     .unwrap();
//! assert_eq!(total, Value::Integer(9));
//! ```

pub mod collection;
pub mod config;
pub mod constants;
pub mod error;
pub mod i18n;
pub mod log;
pub mod value;

pub use collection::{Array, Callable, Collection, CollectionCollection, Pair, Pairs, Selector};
pub use config::Config;
pub use error::{CollectionError, ErrorCode, Result};
pub use value::{Key, Value};

// ========================================
// システム共通型定義
// ========================================

use ahash::RandomState;

/// ライブラリ共通のHashMap型（im::HashMapにahashを適用）
///
/// ahashは高速な非暗号学的ハッシュ。
/// 将来的にハッシュアルゴリズムを変更する場合もここだけ修正すればOK。
pub type HashMap<K, V> = im::HashMap<K, V, RandomState>;

/// 共通HashMapを作成するヘルパー関数
#[inline]
pub fn new_hashmap<K, V>() -> HashMap<K, V> {
    im::HashMap::with_hasher(RandomState::new())
}

/// ライブラリ共通のHashSet型（im::HashSetにahashを適用）
pub type HashSet<T> = im::HashSet<T, RandomState>;

/// 共通HashSetを作成するヘルパー関数
#[inline]
pub fn new_hashset<T>() -> HashSet<T> {
    im::HashSet::with_hasher(RandomState::new())
}
