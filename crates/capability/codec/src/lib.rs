//! # Sparkplug B Payload 编解码模块
//!
//! 不依赖 protobuf 运行时，直接按线上格式读写 `org.eclipse.tahu.protobuf.Payload`。
//!
//! ## 分层
//!
//! ```text
//! Codec (大小上限 / 递归上限 / 计数)
//!       │
//!       ▼
//! schema  ── 各消息字段编号、oneof 分发
//!       │
//!       ▼
//! message ── 子消息长度前缀、未知字段透传
//!       │
//!       ▼
//! scalar  ── uint32 / uint64 / bool / float / double / string / bytes
//!       │
//!       ▼
//! wire    ── varint、tag、带边界的读取游标
//! ```
//!
//! ## 约定
//!
//! - 解码结果中字段是否出现用 `Option` 表示，编码只写出出现过的字段；
//! - 未知字段按线上顺序保存，编码时在已知字段之后原样写回；
//! - `DataSet.types` 解码兼容 packed 与非 packed，编码固定为非 packed。

mod error;
pub mod message;
pub mod scalar;
mod schema;
pub mod wire;

pub use error::DecodeError;
pub use message::Message;
pub use spb_config::DEFAULT_RECURSION_LIMIT;

use bytes::{Bytes, BytesMut};
use domain::Payload;
use tracing::debug;
use wire::Reader;

/// 编解码参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// 子消息最大嵌套深度
    pub recursion_limit: u32,
    /// 输入报文字节上限，`None` 表示不限制
    pub max_payload_bytes: Option<usize>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            max_payload_bytes: None,
        }
    }
}

impl From<&spb_config::CodecConfig> for CodecOptions {
    fn from(config: &spb_config::CodecConfig) -> Self {
        Self {
            recursion_limit: config.recursion_limit,
            max_payload_bytes: config.max_payload_bytes,
        }
    }
}

/// 无状态编解码器，可在线程间自由复制。
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    options: CodecOptions,
}

impl Codec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// 编码消息；对合法的内存模型不会失败。
    pub fn encode<M: Message>(&self, message: &M) -> Bytes {
        let len = message.encoded_len();
        let mut buf = BytesMut::with_capacity(len);
        message.encode_raw(&mut buf);
        spb_telemetry::record_encoded(buf.len());
        debug!(target: "spb.codec", bytes = buf.len(), "message encoded");
        buf.freeze()
    }

    /// 解码完整报文；任何结构错误都使整个解码失败，不返回部分结果。
    pub fn decode<M: Message>(&self, buf: &[u8]) -> Result<M, DecodeError> {
        let result = self.decode_inner(buf);
        match &result {
            Ok(_) => spb_telemetry::record_decoded(buf.len()),
            Err(err) => {
                spb_telemetry::record_decode_failure();
                debug!(
                    target: "spb.codec",
                    offset = err.offset(),
                    field = ?err.field(),
                    "decode failed: {}",
                    err
                );
            }
        }
        result
    }

    fn decode_inner<M: Message>(&self, buf: &[u8]) -> Result<M, DecodeError> {
        if let Some(limit) = self.options.max_payload_bytes {
            if buf.len() > limit {
                return Err(DecodeError::PayloadTooLarge {
                    size: buf.len(),
                    limit,
                });
            }
        }
        let mut reader = Reader::new(buf, self.options.recursion_limit);
        let mut message = M::default();
        message.merge(&mut reader)?;
        let unknown = reader.unknown_fields();
        if unknown > 0 {
            spb_telemetry::record_unknown_fields(unknown);
            debug!(target: "spb.codec", count = unknown, "unknown fields preserved");
        }
        debug!(target: "spb.codec", bytes = buf.len(), "message decoded");
        Ok(message)
    }
}

/// 以默认参数编码 Payload。
pub fn encode(payload: &Payload) -> Bytes {
    Codec::default().encode(payload)
}

/// 以默认参数解码 Payload。
pub fn decode(buf: &[u8]) -> Result<Payload, DecodeError> {
    Codec::default().decode(buf)
}

/// Payload 编码后的字节数。
pub fn encoded_len(payload: &Payload) -> usize {
    payload.encoded_len()
}
