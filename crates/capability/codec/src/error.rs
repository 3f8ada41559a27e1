//! 解码错误类型定义
//!
//! 所有偏移量都是相对输入缓冲区起点的绝对字节位置。

/// 解码错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// varint 超过 10 字节仍未结束
    #[error("malformed varint at offset {offset}")]
    MalformedVarint { offset: usize },

    /// 缓冲区或长度前缀限定的区间在字段中途结束，或区间内有多余字节
    #[error("truncated message at offset {offset} (field {field:?})")]
    TruncatedMessage { offset: usize, field: Option<u32> },

    /// 字段的线上类型与 schema 不符，或是不支持的线上类型
    #[error("invalid wire type {wire_type} for field {field} at offset {offset}")]
    InvalidWireType {
        offset: usize,
        field: u32,
        wire_type: u8,
    },

    /// tag 的字段号为 0 或超出范围
    #[error("invalid tag {tag} at offset {offset}")]
    InvalidTag { offset: usize, tag: u64 },

    /// string 字段不是合法 UTF-8
    #[error("invalid utf-8 in field {field} at offset {offset}")]
    InvalidUtf8 { offset: usize, field: u32 },

    /// 嵌套消息深度超过上限
    #[error("recursion limit {limit} exceeded at offset {offset}")]
    RecursionLimitExceeded { offset: usize, limit: u32 },

    /// 报文超过配置的字节上限
    #[error("payload of {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },
}

impl DecodeError {
    /// 出错位置（`PayloadTooLarge` 为 0）。
    pub fn offset(&self) -> usize {
        match self {
            Self::MalformedVarint { offset }
            | Self::TruncatedMessage { offset, .. }
            | Self::InvalidWireType { offset, .. }
            | Self::InvalidTag { offset, .. }
            | Self::InvalidUtf8 { offset, .. }
            | Self::RecursionLimitExceeded { offset, .. } => *offset,
            Self::PayloadTooLarge { .. } => 0,
        }
    }

    /// 出错字段号（已知时）。
    pub fn field(&self) -> Option<u32> {
        match self {
            Self::TruncatedMessage { field, .. } => *field,
            Self::InvalidWireType { field, .. } | Self::InvalidUtf8 { field, .. } => Some(*field),
            _ => None,
        }
    }
}
