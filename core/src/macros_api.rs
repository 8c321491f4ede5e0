//! 宏接口模块，供 proc-macro crate 使用
//!
//! 这个模块提供了 derive 宏生成代码时需要的辅助类型

use crate::tag::StructTag;

/// 结构体字段声明，由 derive(Model) 生成
///
/// `tag` 由字段上的 `#[db = "..."]` 与 `#[qbr = "..."]` 拼接而成，
/// 例如 `db:"name" qbr:"ignore_on=insert"`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructField<'a> {
    /// Rust 字段名
    pub name: &'a str,
    /// 字段标签
    pub tag: StructTag<'a>,
}

impl<'a> StructField<'a> {
    pub const fn new(name: &'a str, tag: &'a str) -> Self {
        Self {
            name,
            tag: StructTag::new(tag),
        }
    }
}

/// 拼接字段标签，值中的 `\` 与 `"` 会被转义
///
/// 供手写注册或工具生成标签字符串使用，derive 宏在编译期做同样的拼接。
pub fn compose_tag<'k, 'v>(pairs: impl IntoIterator<Item = (&'k str, &'v str)>) -> String {
    let mut tag = String::new();
    for (key, value) in pairs {
        if !tag.is_empty() {
            tag.push(' ');
        }
        tag.push_str(key);
        tag.push_str(":\"");
        for c in value.chars() {
            match c {
                '\\' | '"' => {
                    tag.push('\\');
                    tag.push(c);
                }
                '\n' => tag.push_str("\\n"),
                '\t' => tag.push_str("\\t"),
                '\r' => tag.push_str("\\r"),
                _ => tag.push(c),
            }
        }
        tag.push('"');
    }
    tag
}
