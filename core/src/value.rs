//! 字段值模型
//!
//! 由 derive(Model) 生成的 `field_value` 把结构体字段转换为 [`Value`]，
//! 查询层据此判断字段是否为零值。

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{mpsc, Arc};

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, Utc};

/// 通道等不透明句柄，只关心是否已设置
#[derive(Clone)]
pub struct Handle(Arc<dyn Any + Send + Sync>);

impl Handle {
    pub fn new<T: Any + Send + Sync>(inner: T) -> Self {
        Self(Arc::new(inner))
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handle(..)")
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// 字段值
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 没有值
    Nil,
    /// 可空引用（`Option<T>`、`Box<T>`）
    Ptr(Option<Box<Value>>),
    /// 动态列表
    List(Option<Vec<Value>>),
    /// 关联映射
    Map(Option<BTreeMap<String, Value>>),
    /// 通道 / 队列句柄
    Chan(Option<Handle>),
    /// 动态类型包装
    Dyn(Option<Box<Value>>),
    Text(String),
    Int(i64),
    Float(f64),
    Uint(u64),
    Bool(bool),
    Time(DateTime<Utc>),
    Decimal(BigDecimal),
}

impl Value {
    /// 值的种类名称，用于日志输出
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Ptr(_) => "ptr",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Chan(_) => "chan",
            Value::Dyn(_) => "dyn",
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Uint(_) => "uint",
            Value::Bool(_) => "bool",
            Value::Time(_) => "time",
            Value::Decimal(_) => "decimal",
        }
    }

    /// 包装成动态类型值
    pub fn boxed(self) -> Value {
        Value::Dyn(Some(Box::new(self)))
    }
}

/// 将 Rust 值转换为 [`Value`]
///
/// derive(Model) 为每个带 `#[db]` 的字段调用 `to_value`，
/// 因此字段类型需要实现此 trait。
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

macro_rules! impl_to_value {
    ($variant:ident as $target:ty: $($t:ty),+ $(,)?) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::$variant(*self as $target)
            }
        })+
    };
}

impl_to_value!(Int as i64: i8, i16, i32, i64, isize);
impl_to_value!(Uint as u64: u8, u16, u32, u64, usize);
impl_to_value!(Float as f64: f32, f64);

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Time(*self)
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::Time(self.and_utc())
    }
}

impl ToValue for BigDecimal {
    fn to_value(&self) -> Value {
        Value::Decimal(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        Value::Ptr(self.as_ref().map(|v| Box::new(v.to_value())))
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        Value::Ptr(Some(Box::new((**self).to_value())))
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(Some(self.iter().map(ToValue::to_value).collect()))
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(Some(
            self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect(),
        ))
    }
}

impl<T: ToValue, S> ToValue for HashMap<String, T, S> {
    fn to_value(&self) -> Value {
        Value::Map(Some(
            self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect(),
        ))
    }
}

impl<T: Send + 'static> ToValue for mpsc::Sender<T> {
    fn to_value(&self) -> Value {
        Value::Chan(Some(Handle::new(self.clone())))
    }
}

impl<T: Send + 'static> ToValue for mpsc::SyncSender<T> {
    fn to_value(&self) -> Value {
        Value::Chan(Some(Handle::new(self.clone())))
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        use serde_json::Value as Json;

        let inner = match self {
            Json::Null => return Value::Dyn(None),
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => Value::Int(i),
                (None, Some(u), _) => Value::Uint(u),
                (None, None, Some(f)) => Value::Float(f),
                (None, None, None) => return Value::Dyn(None),
            },
            Json::String(s) => Value::Text(s.clone()),
            Json::Array(items) => Value::List(Some(items.iter().map(ToValue::to_value).collect())),
            Json::Object(map) => Value::Map(Some(
                map.iter().map(|(k, v)| (k.clone(), v.to_value())).collect(),
            )),
        };
        inner.boxed()
    }
}
