pub mod error;
pub mod field;
pub mod macros_api;
pub mod schema;
pub mod tag;
pub mod traits;
pub mod utils;
pub mod value;

pub use field::{
    build_field, build_field_with, is_ignored, parse_ignore_on, FieldDescriptor, OperationType,
    TagKeys,
};
pub use macros_api::StructField;
pub use schema::{Schema, SchemaField};
pub use tag::StructTag;
pub use traits::{Binding, Model, OmitZero};
pub use utils::{is_zero, is_zero_value, zero_instant};
pub use value::{Handle, ToValue, Value};

// 重新导出 derive 的所有公共 API（宏）
pub use error::{QbrError, Result};
pub use qbr_derive::*;
