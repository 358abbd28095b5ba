//! 値の取り出し規則（セレクタ）
//!
//! `extract`/`index_by`/`group_by`/`sum_by` などが共通で使う。

use crate::error::Result;
use crate::value::{Key, Value};
use std::fmt;
use std::sync::Arc;

/// ユーザー関数 `f(value, key)`
pub type Callable = Arc<dyn Fn(&Value, &Key) -> Result<Value> + Send + Sync>;

/// 値の取り出し規則
#[derive(Clone, Default)]
pub enum Selector {
    /// 要素そのもの
    #[default]
    Identity,
    /// 要素（コレクション）内のキー
    Key(Key),
    /// 関数呼び出し
    Callable(Callable),
}

impl Selector {
    /// 関数からセレクタを作成
    pub fn by<F>(f: F) -> Self
    where
        F: Fn(&Value, &Key) -> Result<Value> + Send + Sync + 'static,
    {
        Selector::Callable(Arc::new(f))
    }

    pub fn key<K: Into<Key>>(key: K) -> Self {
        Selector::Key(key.into())
    }

    /// セレクタを適用
    ///
    /// キー指定で要素がコレクションでない場合、またはキーが無い場合はnil。
    pub fn resolve(&self, value: &Value, key: &Key) -> Result<Value> {
        match self {
            Selector::Identity => Ok(value.clone()),
            Selector::Key(k) => match value {
                Value::Collection(c) => c.get(k, Value::Nil),
                _ => Ok(Value::Nil),
            },
            Selector::Callable(f) => f(value, key),
        }
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Identity => write!(f, "Identity"),
            Selector::Key(k) => write!(f, "Key({})", k),
            Selector::Callable(_) => write!(f, "Callable(<fn>)"),
        }
    }
}

impl From<Key> for Selector {
    fn from(key: Key) -> Self {
        Selector::Key(key)
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Selector::Key(Key::from(s))
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Selector::Key(Key::Str(s))
    }
}

impl From<i64> for Selector {
    fn from(n: i64) -> Self {
        Selector::Key(Key::Int(n))
    }
}

impl From<i32> for Selector {
    fn from(n: i32) -> Self {
        Selector::Key(Key::from(n))
    }
}

impl From<usize> for Selector {
    fn from(n: usize) -> Self {
        Selector::Key(Key::from(n))
    }
}
