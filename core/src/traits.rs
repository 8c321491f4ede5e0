use crate::field::OperationType;
use crate::macros_api::StructField;
use crate::schema::Schema;
use crate::utils::is_zero;
use crate::value::Value;

/// 是否跳过零值字段
///
/// 部分更新、条件过滤等场景使用 `Yes`，只让有值的字段参与查询。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OmitZero {
    Yes,
    #[default]
    No,
}

/// 参与查询的列及其值
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub column: String,
    pub value: Value,
}

/// Model trait 定义了模型的字段元数据
///
/// 通常由 derive(Model) 生成；手写实现时需要自己缓存 `schema()` 的结果。
pub trait Model: Sized {
    /// 字段声明（按结构体中的顺序）
    const FIELDS: &'static [StructField<'static>];

    /// 字段描述符集合，每个类型只构建一次
    fn schema() -> &'static Schema;

    /// 根据 Rust 字段名取字段值
    fn field_value(&self, field_name: &str) -> Option<Value>;

    /// 指定操作中需要参与查询的列与值
    ///
    /// 字段在 `op` 中被忽略时跳过；`omit_zero` 为 `Yes` 时零值字段也跳过。
    fn bindings(&self, op: &OperationType, omit_zero: OmitZero) -> Vec<Binding> {
        let mut bindings = Vec::new();
        for field in Self::schema() {
            let column = field.descriptor.column();
            if field.descriptor.is_ignored(op) {
                tracing::trace!(column, %op, "ignored for operation");
                continue;
            }

            let Some(value) = self.field_value(&field.name) else {
                continue;
            };
            if omit_zero == OmitZero::Yes && is_zero(&value) {
                tracing::trace!(column, %op, kind = value.kind(), "zero value omitted");
                continue;
            }

            bindings.push(Binding {
                column: column.to_string(),
                value,
            });
        }
        bindings
    }
}
