//! 工具函数模块

use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::value::{ToValue, Value};

/// 零时刻（`0001-01-01T00:00:00Z`）相对 Unix 纪元的秒数
pub const ZERO_INSTANT_UNIX_SECS: i64 = -62_135_596_800;

/// 时间类型的零时刻
///
/// 注意：零时刻不是 Unix 纪元，而是公元 1 年 1 月 1 日 00:00:00 UTC。
pub fn zero_instant() -> DateTime<Utc> {
    *ZERO_INSTANT
}

// 公元 1 年在 chrono 的取值范围内，构造不会失败
static ZERO_INSTANT: LazyLock<DateTime<Utc>> = LazyLock::new(|| {
    DateTime::from_timestamp(ZERO_INSTANT_UNIX_SECS, 0)
        .expect("year 1 is within chrono's supported range")
});

/// 判断时间是否为零时刻
pub fn is_zero_instant(t: &DateTime<Utc>) -> bool {
    t.timestamp() == ZERO_INSTANT_UNIX_SECS && t.timestamp_subsec_nanos() == 0
}

/// 判断字段值是否为零值
///
/// 判断顺序：
/// 1. `Nil` 为零值
/// 2. 引用、列表、映射、通道、动态包装：未设置（`None`）时为零值，
///    已设置时即使指向空容器也不是零值
/// 3. 文本：长度为 0 时为零值
/// 4. 有符号整数与浮点数：等于 0 时为零值（浮点按位比较，`-0.0` 不是零值）
/// 5. 时间：等于 [`zero_instant`] 时为零值
/// 6. 其它（布尔、无符号整数、Decimal）一律不是零值
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Nil => true,
        Value::Ptr(v) | Value::Dyn(v) => v.is_none(),
        Value::List(v) => v.is_none(),
        Value::Map(v) => v.is_none(),
        Value::Chan(v) => v.is_none(),
        Value::Text(s) => s.is_empty(),
        Value::Int(i) => *i == 0,
        Value::Float(f) => f.to_bits() == 0,
        Value::Time(t) => is_zero_instant(t),
        Value::Uint(_) | Value::Bool(_) | Value::Decimal(_) => false,
    }
}

/// 对任意实现了 [`ToValue`] 的值判断是否为零值
pub fn is_zero_value<T: ToValue + ?Sized>(value: &T) -> bool {
    is_zero(&value.to_value())
}

impl Value {
    /// 见 [`is_zero`]
    pub fn is_zero(&self) -> bool {
        is_zero(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::TimeZone;
    use std::collections::BTreeMap;
    use std::sync::mpsc;

    #[test]
    fn nil_is_zero() {
        assert!(is_zero(&Value::Nil));
    }

    #[test]
    fn unset_nilable_kinds_are_zero() {
        assert!(is_zero(&Value::Ptr(None)));
        assert!(is_zero(&Value::List(None)));
        assert!(is_zero(&Value::Map(None)));
        assert!(is_zero(&Value::Chan(None)));
        assert!(is_zero(&Value::Dyn(None)));
    }

    #[test]
    fn set_nilable_kinds_are_not_zero() {
        assert!(!is_zero_value(&Some(String::new())));
        assert!(!is_zero_value(&Some(0i64)));
        assert!(!is_zero_value(&Vec::<i32>::new()));
        assert!(!is_zero_value(&BTreeMap::<String, i32>::new()));
        assert!(!is_zero(&Value::Nil.boxed()));

        let (tx, _rx) = mpsc::channel::<()>();
        assert!(!is_zero_value(&tx));
    }

    #[test]
    fn text() {
        assert!(is_zero_value(""));
        assert!(is_zero_value(&String::new()));
        assert!(!is_zero_value("x"));
    }

    #[test]
    fn signed_and_float() {
        assert!(is_zero_value(&0i32));
        assert!(is_zero_value(&0i8));
        assert!(is_zero_value(&0.0f64));
        assert!(is_zero_value(&0.0f32));
        assert!(!is_zero_value(&-1i64));
        assert!(!is_zero_value(&0.5f64));
        assert!(!is_zero_value(&-0.0f64));
    }

    #[test]
    fn zero_instant_is_year_one() {
        let t = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(zero_instant(), t);
        assert_eq!(zero_instant().timestamp(), ZERO_INSTANT_UNIX_SECS);
        assert!(is_zero_value(&t));
    }

    #[test]
    fn other_instants_are_not_zero() {
        let epoch = DateTime::from_timestamp(0, 0).unwrap();
        assert!(!is_zero_value(&epoch));
        assert!(!is_zero_value(&Utc::now()));
        let just_after = zero_instant() + chrono::Duration::nanoseconds(1);
        assert!(!is_zero_value(&just_after));
    }

    #[test]
    fn naive_zero_instant() {
        assert!(is_zero_value(&zero_instant().naive_utc()));
    }

    #[test]
    fn booleans_unsigned_and_decimals_are_never_zero() {
        assert!(!is_zero_value(&false));
        assert!(!is_zero_value(&0u32));
        assert!(!is_zero_value(&0usize));
        assert!(!is_zero_value(&BigDecimal::from(0)));
    }
}
