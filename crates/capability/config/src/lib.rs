//! 编解码运行配置加载。

use std::env;

/// 默认嵌套深度上限（与 protobuf-java 默认一致）。
pub const DEFAULT_RECURSION_LIMIT: u32 = 100;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 编解码运行配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    pub recursion_limit: u32,
    pub max_payload_bytes: Option<usize>,
    pub validate_shapes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            max_payload_bytes: None,
            validate_shapes: false,
        }
    }
}

impl CodecConfig {
    /// 从环境变量读取配置。
    ///
    /// - `SPB_RECURSION_LIMIT`：嵌套消息深度上限，默认 100
    /// - `SPB_MAX_PAYLOAD_BYTES`：单个报文字节上限，空或 0 表示不限制
    /// - `SPB_VALIDATE_SHAPES`：标准化前校验 DataSet / PropertySet 并列数组长度
    pub fn from_env() -> Result<Self, ConfigError> {
        let recursion_limit = read_u32_with_default("SPB_RECURSION_LIMIT", DEFAULT_RECURSION_LIMIT)?;
        let max_payload_bytes =
            read_optional_usize("SPB_MAX_PAYLOAD_BYTES")?.filter(|value| *value > 0);
        let validate_shapes = read_bool_with_default("SPB_VALIDATE_SHAPES", false);

        Ok(Self {
            recursion_limit,
            max_payload_bytes,
            validate_shapes,
        })
    }
}

fn read_u32_with_default(key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional_usize(key: &str) -> Result<Option<usize>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        Err(_) => Ok(None),
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
