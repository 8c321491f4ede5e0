//! 字段描述符
//!
//! 从字段标签中解析列名与 `ignore_on` 指令：
//!
//! ```ignore
//! db:"name" qbr:"ignore_on=insert,update"
//! ```
//!
//! - `db` 标签为空或缺失时字段不参与持久化，不生成描述符；
//! - `qbr` 标签由空格分隔的多个指令块组成，目前只识别 `ignore_on=`，
//!   其它指令块被忽略（仅输出 debug 日志）。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::macros_api::StructField;

/// `ignore_on` 指令名
pub const IGNORE_ON: &str = "ignore_on";

/// 操作类型（insert、update、select、delete ...）
///
/// 解析时统一转为小写，不校验是否为已知操作，未知操作在匹配时自然不会命中。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct OperationType(String);

impl OperationType {
    pub const INSERT: &'static str = "insert";
    pub const UPDATE: &'static str = "update";
    pub const SELECT: &'static str = "select";
    pub const DELETE: &'static str = "delete";

    /// 已知的操作类型
    pub const KNOWN: [&'static str; 4] = [Self::INSERT, Self::UPDATE, Self::SELECT, Self::DELETE];

    /// 创建操作类型，统一转为小写
    pub fn new(op: impl AsRef<str>) -> Self {
        Self(op.as_ref().to_lowercase())
    }

    pub fn insert() -> Self {
        Self(Self::INSERT.to_string())
    }

    pub fn update() -> Self {
        Self(Self::UPDATE.to_string())
    }

    pub fn select() -> Self {
        Self(Self::SELECT.to_string())
    }

    pub fn delete() -> Self {
        Self(Self::DELETE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为 [`OperationType::KNOWN`] 中的操作
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperationType {
    fn from(op: &str) -> Self {
        Self::new(op)
    }
}

impl From<String> for OperationType {
    fn from(op: String) -> Self {
        Self::new(op)
    }
}

impl From<OperationType> for String {
    fn from(op: OperationType) -> Self {
        op.0
    }
}

impl PartialEq<str> for OperationType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for OperationType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// 标签键配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagKeys {
    /// 列名标签，默认 `db`
    pub column: String,
    /// 指令标签，默认 `qbr`
    pub directive: String,
}

impl Default for TagKeys {
    fn default() -> Self {
        Self {
            column: "db".to_string(),
            directive: "qbr".to_string(),
        }
    }
}

/// 字段描述符：列名 + 需要忽略的操作列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    column: String,
    ignore_on: Vec<OperationType>,
}

impl FieldDescriptor {
    /// 列名
    pub fn column(&self) -> &str {
        &self.column
    }

    /// 忽略的操作（按标签中的顺序，不去重）
    pub fn ignore_on(&self) -> &[OperationType] {
        &self.ignore_on
    }

    /// 见 [`is_ignored`]
    pub fn is_ignored(&self, op: &OperationType) -> bool {
        is_ignored(self, op)
    }
}

/// 解析 `ignore_on=<op1>,<op2>,...` 指令块
///
/// 去掉指令前缀后按逗号拆分，丢弃空项，其余转为小写。
pub fn parse_ignore_on(block: &str) -> Vec<OperationType> {
    let ops = block
        .strip_prefix(IGNORE_ON)
        .and_then(|rest| rest.strip_prefix('='))
        .unwrap_or(block);

    ops.split(',')
        .filter(|op| !op.is_empty())
        .map(OperationType::new)
        .collect()
}

/// 使用默认标签键（`db` / `qbr`）构建字段描述符
pub fn build_field(field: &StructField<'_>) -> Option<FieldDescriptor> {
    build_field_with(&TagKeys::default(), field)
}

/// 根据字段标签构建字段描述符
///
/// 列名标签为空或缺失时返回 `None`，表示该字段不参与持久化。
pub fn build_field_with(keys: &TagKeys, field: &StructField<'_>) -> Option<FieldDescriptor> {
    let column = field.tag.get(&keys.column);
    if column.is_empty() {
        tracing::trace!(field = field.name, "no column tag, field skipped");
        return None;
    }

    let mut descriptor = FieldDescriptor {
        column: column.into_owned(),
        ignore_on: Vec::new(),
    };

    let directives = field.tag.get(&keys.directive);
    if directives.is_empty() {
        return Some(descriptor);
    }

    let ignore_on_prefix = format!("{IGNORE_ON}=");
    for block in directives.split(' ') {
        if block.is_empty() {
            continue;
        }

        if block.starts_with(&ignore_on_prefix) {
            descriptor.ignore_on.extend(parse_ignore_on(block));
        } else {
            tracing::debug!(
                field = field.name,
                column = %descriptor.column,
                block,
                "unrecognized directive ignored"
            );
        }
    }

    Some(descriptor)
}

/// 字段是否在指定操作中被忽略
pub fn is_ignored(descriptor: &FieldDescriptor, op: &OperationType) -> bool {
    descriptor.ignore_on.iter().any(|ignored| ignored == op)
}
