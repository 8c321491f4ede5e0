use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QbrError {
    /// `ignore_on` 中出现了未知的操作类型（仅在显式校验时报告）
    #[error("Unknown operation '{operation}' in ignore_on of field '{field}'")]
    UnknownOperation { field: String, operation: String },
    /// Invalid field error
    #[error("Invalid field: {0}")]
    InvalidField(String),
    /// 字段不存在或未映射到列
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, QbrError>;
