//! Sparkplug B `Payload` 报文树。
//!
//! ```text
//! Payload
//!   └── Metric*
//!         ├── MetaData?
//!         ├── PropertySet? ── PropertyValue* ── PropertySet / PropertySetList
//!         └── value: MetricValue?
//!               ├── DataSet ── Row* ── DataSetValue*
//!               └── Template ── Metric* / Parameter*
//! ```
//!
//! 约定：
//! - 可选标量字段使用 `Option<T>` 表示存在性，`Some(0)` 与 `None` 在线上不同
//! - repeated 字段保持插入顺序，空与缺省在线上等价
//! - oneof 字段使用 `Option<枚举>`，`None` 表示未设置
//! - 每个消息都带 `unknown_fields`，解码时保留无法识别的字段并在重新编码时原样写回

mod dataset;
mod payload;
mod property;
mod template;
mod unknown;

pub use dataset::{DataSet, DataSetValue, DataSetValueKind, Row};
pub use payload::{MetaData, Metric, MetricValue, Payload, ValueExtension};
pub use property::{PropertySet, PropertySetList, PropertyValue, PropertyValueKind};
pub use template::{Parameter, ParameterValue, Template};
pub use unknown::{UnknownField, UnknownFields};

/// 并列数组形状校验错误（应用层约束，线上不强制）。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("dataset has {columns} columns but {types} types")]
    ColumnTypeMismatch { columns: usize, types: usize },
    #[error("dataset declares {declared} columns but has {actual}")]
    ColumnCountMismatch { declared: u64, actual: usize },
    #[error("dataset row {row} has {elements} elements, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        elements: usize,
        expected: usize,
    },
    #[error("property set has {keys} keys but {values} values")]
    PropertyCountMismatch { keys: usize, values: usize },
}
