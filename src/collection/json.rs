//! JSONとの相互変換
//!
//! - to_json: 0からの連番キーなら配列、それ以外はオブジェクト
//! - from_json: 配列は連番キー、オブジェクトは文字列キー

use crate::constants::ops;
use crate::error::{CollectionError, ErrorCode, Result};
use crate::i18n::{fmt_msg, MsgKey};
use crate::value::{Key, Value};

use super::Collection;

fn serialization_error(key: MsgKey, args: &[&str]) -> CollectionError {
    CollectionError::new(ErrorCode::Serialization, fmt_msg(key, args))
}

impl Collection {
    /// serde_json::Value に変換
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let array = self.to_array()?;

        if array.is_list() {
            let items = array
                .values()
                .map(value_to_json)
                .collect::<Result<Vec<_>>>()?;
            Ok(serde_json::Value::Array(items))
        } else {
            let mut obj = serde_json::Map::new();
            for (k, v) in array.iter() {
                let name = match k {
                    Key::Int(n) => n.to_string(),
                    Key::Str(s) => s.clone(),
                };
                obj.insert(name, value_to_json(v)?);
            }
            Ok(serde_json::Value::Object(obj))
        }
    }

    /// JSON文字列に変換
    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let json = self.to_json()?;
        let result = if pretty {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        };
        result.map_err(|e| {
            serialization_error(MsgKey::CannotConvertToJson, &[ops::TO_JSON])
                .with_note(e.to_string())
        })
    }

    /// serde_json::Value から作成（配列かオブジェクトのみ）
    pub fn from_json(json: serde_json::Value) -> Result<Collection> {
        match json_to_value(json) {
            Value::Collection(c) => Ok(c),
            other => Err(serialization_error(
                MsgKey::JsonParseError,
                &[
                    ops::FROM_JSON,
                    &format!("expected an array or object, got {}", other.type_name()),
                ],
            )),
        }
    }

    /// JSON文字列をパースして作成
    pub fn from_json_str(s: &str) -> Result<Collection> {
        let json = serde_json::from_str::<serde_json::Value>(s).map_err(|e| {
            serialization_error(MsgKey::JsonParseError, &[ops::FROM_JSON, &e.to_string()])
        })?;
        Self::from_json(json)
    }
}

/// serde_json::Value を Value に変換
fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Nil
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::Collection(Collection::from_values(arr.into_iter().map(json_to_value)))
        }
        serde_json::Value::Object(obj) => Value::Collection(Collection::from_items(
            obj.into_iter()
                .map(|(k, v)| (Key::Str(k), json_to_value(v)))
                .collect(),
            true,
        )),
    }
}

/// Value を serde_json::Value に変換（NaN/無限大はnull）
fn value_to_json(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Nil => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Collection(c) => c.to_json()?,
    })
}
