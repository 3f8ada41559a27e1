//! 数组类指标的字节布局（小端）。
//!
//! | datatype | 元素布局 |
//! |---|---|
//! | Int8/UInt8/Bytes | 1 字节 |
//! | Int16/UInt16 | 2 字节 |
//! | Int32/UInt32/Float | 4 字节 |
//! | Int64/UInt64/Double/DateTime | 8 字节 |
//! | Boolean | 4 字节元素个数 + 按位打包（高位在前） |
//! | String | UTF-8 字符串，各以 `\0` 结尾 |

use crate::NormalizeError;
use bytes::BufMut;
use domain::DataType;
use serde_json::Value;

/// 把 bytes_value 按 datatype 解析为 JSON 数组。
pub fn decode_array(data_type: DataType, bytes: &[u8]) -> Result<Value, NormalizeError> {
    let items = match data_type {
        DataType::Bytes | DataType::UInt8Array => bytes.iter().map(|value| Value::from(*value)).collect(),
        DataType::Int8Array => bytes
            .iter()
            .map(|value| Value::from(*value as i8))
            .collect(),
        DataType::Int16Array => fixed::<2>(data_type, bytes)?
            .map(|raw| Value::from(i16::from_le_bytes(raw)))
            .collect(),
        DataType::UInt16Array => fixed::<2>(data_type, bytes)?
            .map(|raw| Value::from(u16::from_le_bytes(raw)))
            .collect(),
        DataType::Int32Array => fixed::<4>(data_type, bytes)?
            .map(|raw| Value::from(i32::from_le_bytes(raw)))
            .collect(),
        DataType::UInt32Array => fixed::<4>(data_type, bytes)?
            .map(|raw| Value::from(u32::from_le_bytes(raw)))
            .collect(),
        DataType::Int64Array => fixed::<8>(data_type, bytes)?
            .map(|raw| Value::from(i64::from_le_bytes(raw)))
            .collect(),
        DataType::UInt64Array | DataType::DateTimeArray => fixed::<8>(data_type, bytes)?
            .map(|raw| Value::from(u64::from_le_bytes(raw)))
            .collect(),
        DataType::FloatArray => fixed::<4>(data_type, bytes)?
            .map(|raw| Value::from(widen_f32(f32::from_le_bytes(raw))))
            .collect(),
        DataType::DoubleArray => fixed::<8>(data_type, bytes)?
            .map(|raw| Value::from(f64::from_le_bytes(raw)))
            .collect(),
        DataType::BooleanArray => decode_booleans(bytes)?,
        DataType::StringArray => decode_strings(bytes)?,
        other => return Err(NormalizeError::UnsupportedDataType(other.code())),
    };
    Ok(Value::Array(items))
}

/// [`decode_array`] 的逆过程。
pub fn encode_array(data_type: DataType, value: &Value) -> Result<Vec<u8>, NormalizeError> {
    let Value::Array(items) = value else {
        return Err(NormalizeError::ValueMismatch(data_type.code()));
    };
    let mut out = Vec::new();
    match data_type {
        DataType::Bytes | DataType::UInt8Array => {
            for item in items {
                out.put_u8(integer(data_type, item)?);
            }
        }
        DataType::Int8Array => {
            for item in items {
                out.put_i8(integer(data_type, item)?);
            }
        }
        DataType::Int16Array => {
            for item in items {
                out.put_i16_le(integer(data_type, item)?);
            }
        }
        DataType::UInt16Array => {
            for item in items {
                out.put_u16_le(integer(data_type, item)?);
            }
        }
        DataType::Int32Array => {
            for item in items {
                out.put_i32_le(integer(data_type, item)?);
            }
        }
        DataType::UInt32Array => {
            for item in items {
                out.put_u32_le(integer(data_type, item)?);
            }
        }
        DataType::Int64Array => {
            for item in items {
                out.put_i64_le(integer(data_type, item)?);
            }
        }
        DataType::UInt64Array | DataType::DateTimeArray => {
            for item in items {
                out.put_u64_le(integer(data_type, item)?);
            }
        }
        DataType::FloatArray => {
            for item in items {
                out.put_f32_le(float(data_type, item)? as f32);
            }
        }
        DataType::DoubleArray => {
            for item in items {
                out.put_f64_le(float(data_type, item)?);
            }
        }
        DataType::BooleanArray => {
            let flags = items
                .iter()
                .map(|item| item.as_bool())
                .collect::<Option<Vec<bool>>>()
                .ok_or(NormalizeError::ValueMismatch(data_type.code()))?;
            encode_booleans(&flags, &mut out)?;
        }
        DataType::StringArray => {
            for item in items {
                let text = item
                    .as_str()
                    .filter(|text| !text.contains('\0'))
                    .ok_or(NormalizeError::ValueMismatch(data_type.code()))?;
                out.put_slice(text.as_bytes());
                out.put_u8(0);
            }
        }
        other => return Err(NormalizeError::UnsupportedDataType(other.code())),
    }
    Ok(out)
}

/// f32 按最短十进制表示转为 f64（`0.1f32` 得到 `0.1`）。
pub(crate) fn widen_f32(value: f32) -> f64 {
    if !value.is_finite() {
        return f64::from(value);
    }
    value
        .to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| f64::from(value))
}

fn fixed<const N: usize>(
    data_type: DataType,
    bytes: &[u8],
) -> Result<impl Iterator<Item = [u8; N]> + '_, NormalizeError> {
    if bytes.len() % N != 0 {
        return Err(malformed(data_type, bytes));
    }
    Ok(bytes.chunks_exact(N).map(|chunk| {
        let mut raw = [0u8; N];
        raw.copy_from_slice(chunk);
        raw
    }))
}

fn decode_booleans(bytes: &[u8]) -> Result<Vec<Value>, NormalizeError> {
    let Some((count, packed)) = bytes.split_first_chunk::<4>() else {
        return Err(malformed(DataType::BooleanArray, bytes));
    };
    let count = u32::from_le_bytes(*count) as usize;
    if packed.len() != count.div_ceil(8) {
        return Err(malformed(DataType::BooleanArray, bytes));
    }
    Ok((0..count)
        .map(|index| Value::from(packed[index / 8] & (0x80 >> (index % 8)) != 0))
        .collect())
}

fn encode_booleans(flags: &[bool], out: &mut Vec<u8>) -> Result<(), NormalizeError> {
    let count = u32::try_from(flags.len())
        .map_err(|_| NormalizeError::ValueMismatch(DataType::BooleanArray.code()))?;
    out.put_u32_le(count);
    for chunk in flags.chunks(8) {
        let byte = chunk
            .iter()
            .enumerate()
            .filter(|(_, flag)| **flag)
            .fold(0u8, |byte, (index, _)| byte | (0x80 >> index));
        out.put_u8(byte);
    }
    Ok(())
}

fn decode_strings(bytes: &[u8]) -> Result<Vec<Value>, NormalizeError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let Some((&0, body)) = bytes.split_last() else {
        return Err(malformed(DataType::StringArray, bytes));
    };
    body.split(|byte| *byte == 0)
        .map(|raw| {
            std::str::from_utf8(raw)
                .map(Value::from)
                .map_err(|_| malformed(DataType::StringArray, bytes))
        })
        .collect()
}

fn integer<T: TryFrom<i128>>(data_type: DataType, item: &Value) -> Result<T, NormalizeError> {
    item.as_i64()
        .map(i128::from)
        .or_else(|| item.as_u64().map(i128::from))
        .and_then(|value| T::try_from(value).ok())
        .ok_or(NormalizeError::ValueMismatch(data_type.code()))
}

fn float(data_type: DataType, item: &Value) -> Result<f64, NormalizeError> {
    item.as_f64()
        .ok_or(NormalizeError::ValueMismatch(data_type.code()))
}

fn malformed(data_type: DataType, bytes: &[u8]) -> NormalizeError {
    NormalizeError::MalformedArray {
        data_type: data_type.code(),
        len: bytes.len(),
    }
}
