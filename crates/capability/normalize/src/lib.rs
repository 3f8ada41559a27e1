//! # 指标规范化模块
//!
//! 把 Sparkplug B 报文中的 Metric 转换为统一的 [`PointValue`](domain::PointValue)：
//!
//! ```text
//! RawEvent (topic + 原始字节)
//!       │  Codec::decode
//!       ▼
//! Payload ── BIRTH ──▶ AliasTable (alias → name)
//!       │
//!       ▼
//! metric_to_point_value (按 datatype 取值，数组转 JSON)
//!       │
//!       ▼
//! PointValue
//! ```
//!
//! 反方向的 [`create_metric`] 用于由点位值构造下行报文。

mod alias;
mod array;
mod normalizer;
mod value;

pub use alias::{AliasScope, AliasTable};
pub use array::{decode_array, encode_array};
pub use normalizer::SparkplugNormalizer;
pub use value::{create_metric, metric_to_point_value};

use domain::ShapeError;
use spb_codec::DecodeError;

/// 规范化错误。
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("unsupported metric datatype {0}")]
    UnsupportedDataType(u32),
    #[error("value does not match datatype {0}")]
    ValueMismatch(u32),
    #[error("malformed array for datatype {data_type}: {len} bytes")]
    MalformedArray { data_type: u32, len: usize },
    #[error("invalid json array: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("invalid shape: {0}")]
    Shape(#[from] ShapeError),
}
