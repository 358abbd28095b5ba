//! ライブラリ全体で使用される定数
//!
//! ハードコードされた文字列を定数化し、`to_string()` の呼び出しを削減します。

/// 環境変数名
pub mod env {
    pub const LANG: &str = "QI_LANG";
    pub const LOG_LEVEL: &str = "QI_LOG_LEVEL";
    pub const LOG_FORMAT: &str = "QI_LOG_FORMAT";
}

/// 操作名（エラーメッセージ・ログ用）
pub mod ops {
    pub const FIRST: &str = "first";
    pub const LAST: &str = "last";
    pub const RANDOM: &str = "random";
    pub const SUM: &str = "sum";
    pub const AVG: &str = "avg";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const MEDIAN: &str = "median";
    pub const REDUCE: &str = "reduce";
    pub const COUNT_BY: &str = "count_by";
    pub const GROUP_BY: &str = "group_by";
    pub const INDEX_BY: &str = "index_by";
    pub const FLIP: &str = "flip";
    pub const TRANSFORM: &str = "transform";
    pub const TRANSPOSE: &str = "transpose";
    pub const MERGE: &str = "merge";
    pub const CHUNK: &str = "chunk";
    pub const SPLIT: &str = "split";
    pub const NTH: &str = "nth";
    pub const SORT: &str = "sort";
    pub const REVERSE: &str = "reverse";
    pub const SHUFFLE: &str = "shuffle";
    pub const PUSH: &str = "push";
    pub const PUT: &str = "put";
    pub const POP: &str = "pop";
    pub const SHIFT: &str = "shift";
    pub const UNSHIFT: &str = "unshift";
    pub const PREPEND: &str = "prepend";
    pub const PULL: &str = "pull";
    pub const TO_ARRAY: &str = "to_array";
    pub const TO_JSON: &str = "to_json";
    pub const FROM_JSON: &str = "from_json";
}

/// コレクション操作の定数
pub mod collections {
    /// 中間バッファの初期容量
    pub const DEFAULT_VEC_CAPACITY: usize = 16;
}
