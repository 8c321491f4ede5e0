//! Schema 模块
//!
//! 按字段声明顺序保存 `字段名 -> FieldDescriptor` 的映射，只包含映射到列的字段。

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{QbrError, Result};
use crate::field::{build_field_with, FieldDescriptor, OperationType, TagKeys};
use crate::macros_api::StructField;

/// 单个字段的 schema 条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    /// Rust 字段名
    pub name: String,
    #[serde(flatten)]
    pub descriptor: FieldDescriptor,
}

/// 一个结构体类型的字段描述符集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    /// 使用默认标签键构建
    pub fn from_fields(fields: &[StructField<'_>]) -> Self {
        Self::with_keys(&TagKeys::default(), fields)
    }

    /// 使用指定标签键构建，没有列名标签的字段被跳过
    pub fn with_keys(keys: &TagKeys, fields: &[StructField<'_>]) -> Self {
        let fields: Vec<SchemaField> = fields
            .iter()
            .filter_map(|field| {
                build_field_with(keys, field).map(|descriptor| SchemaField {
                    name: field.name.to_string(),
                    descriptor,
                })
            })
            .collect();

        tracing::debug!(mapped = fields.len(), "schema built");

        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter()
    }

    /// 根据 Rust 字段名获取描述符
    pub fn get(&self, field_name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name == field_name)
            .map(|f| &f.descriptor)
    }

    /// 根据字段名获取描述符，字段不存在时返回错误
    pub fn require(&self, field_name: &str) -> Result<&FieldDescriptor> {
        self.get(field_name)
            .ok_or_else(|| QbrError::UnknownField(field_name.to_string()))
    }

    /// 根据列名查找字段
    pub fn by_column(&self, column: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.descriptor.column() == column)
    }

    /// 指定操作中未被忽略的列（按声明顺序）
    pub fn columns(&self, op: &OperationType) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.descriptor.is_ignored(op))
            .map(|f| f.descriptor.column())
            .collect()
    }

    /// 严格校验：列名不能重复，`ignore_on` 只能包含 `known` 中的操作
    ///
    /// 构建 schema 时不会调用，未知指令与操作默认被静默接受。
    pub fn validate(&self, known: &[OperationType]) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            let column = field.descriptor.column();
            if !seen.insert(column) {
                return Err(QbrError::InvalidField(format!(
                    "Column '{}' of field '{}' is already mapped by another field",
                    column, field.name
                )));
            }

            if let Some(op) = field
                .descriptor
                .ignore_on()
                .iter()
                .find(|op| !known.contains(op))
            {
                return Err(QbrError::UnknownOperation {
                    field: field.name.clone(),
                    operation: op.to_string(),
                });
            }
        }
        Ok(())
    }

    /// 使用 [`OperationType::KNOWN`] 校验
    pub fn validate_known(&self) -> Result<()> {
        let known: Vec<OperationType> = OperationType::KNOWN
            .iter()
            .map(OperationType::new)
            .collect();
        self.validate(&known)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a SchemaField;
    type IntoIter = std::slice::Iter<'a, SchemaField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
