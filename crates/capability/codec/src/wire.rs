//! varint 与 tag 编解码，以及带边界的读取游标。
//!
//! tag = `(field_number << 3) | wire_type`，本 schema 只使用四种线上类型：
//!
//! | wire type | 值 | 用途 |
//! |---|---|---|
//! | VARINT | 0 | uint32 / uint64 / bool |
//! | FIXED64 | 1 | double |
//! | LENGTH_DELIMITED | 2 | string / bytes / 子消息 / packed repeated |
//! | FIXED32 | 5 | float |

use crate::error::DecodeError;
use bytes::BufMut;

/// varint 最大字节数。
pub const MAX_VARINT_LEN: usize = 10;

/// 字段号上限（不含），扩展区间止于此。
pub const FIELD_NUMBER_LIMIT: u32 = 1 << 29;

/// 线上类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    /// 组（3/4）与保留值（6/7）返回 `None`。
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }
}

/// 已解析的字段 tag。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub field: u32,
    pub wire_type: WireType,
    pub tag: u32,
    /// tag 首字节位置
    pub offset: usize,
}

enum VarintFault {
    Truncated,
    Overlong,
}

fn decode_varint_slice(bytes: &[u8]) -> Result<(u64, usize), VarintFault> {
    let mut value = 0u64;
    for index in 0..MAX_VARINT_LEN {
        let Some(&byte) = bytes.get(index) else {
            return Err(VarintFault::Truncated);
        };
        value |= u64::from(byte & 0x7f) << (7 * index);
        if byte < 0x80 {
            return Ok((value, index + 1));
        }
    }
    Err(VarintFault::Overlong)
}

/// 从切片头部读取 varint，返回 `(值, 消耗字节数)`。
pub fn read_varint(buf: &[u8]) -> Result<(u64, usize), DecodeError> {
    decode_varint_slice(buf).map_err(|fault| match fault {
        VarintFault::Truncated => DecodeError::TruncatedMessage {
            offset: buf.len(),
            field: None,
        },
        VarintFault::Overlong => DecodeError::MalformedVarint { offset: 0 },
    })
}

/// 从切片头部读取 tag，返回 `(field_number, wire_type, 消耗字节数)`。
///
/// 不校验线上类型；tag 为 0 时返回 `(0, 0, n)`，由调用方视为消息结束。
pub fn read_tag(buf: &[u8]) -> Result<(u32, u8, usize), DecodeError> {
    let (tag, consumed) = read_varint(buf)?;
    let tag = u32::try_from(tag).map_err(|_| DecodeError::InvalidTag { offset: 0, tag })?;
    Ok((tag >> 3, (tag & 0x7) as u8, consumed))
}

pub fn encode_varint(mut value: u64, buf: &mut impl BufMut) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// 编码为独立字节序列。
pub fn write_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len_varint(value));
    encode_varint(value, &mut out);
    out
}

pub fn encoded_len_varint(value: u64) -> usize {
    // 每 7 位一个字节，0 也占 1 字节
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

pub fn encode_key(field: u32, wire_type: WireType, buf: &mut impl BufMut) {
    encode_varint(u64::from((field << 3) | wire_type as u32), buf);
}

pub fn key_len(field: u32) -> usize {
    encoded_len_varint(u64::from(field << 3))
}

/// 带边界与深度计数的读取游标。
///
/// 子消息解码时通过 [`Reader::nested`] 临时收窄边界，子消息必须恰好读完自己的区间。
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
    depth: u32,
    recursion_limit: u32,
    unknown_fields: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8], recursion_limit: u32) -> Self {
        Self {
            buf,
            pos: 0,
            end: buf.len(),
            depth: 0,
            recursion_limit,
            unknown_fields: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.end
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// 解码过程中累计保留的未知字段数。
    pub fn unknown_fields(&self) -> usize {
        self.unknown_fields
    }

    pub(crate) fn note_unknown_field(&mut self) {
        self.unknown_fields += 1;
    }

    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let start = self.pos;
        match decode_varint_slice(&self.buf[start..self.end]) {
            Ok((value, consumed)) => {
                self.pos += consumed;
                Ok(value)
            }
            Err(VarintFault::Truncated) => Err(DecodeError::TruncatedMessage {
                offset: self.end,
                field: None,
            }),
            Err(VarintFault::Overlong) => Err(DecodeError::MalformedVarint { offset: start }),
        }
    }

    /// 读取下一个 tag；区间读完或遇到 tag 0 时返回 `None`。
    ///
    /// tag 0 之后区间内仍有字节视为截断错误。
    pub fn read_key(&mut self) -> Result<Option<Key>, DecodeError> {
        if self.is_empty() {
            return Ok(None);
        }
        let offset = self.pos;
        let raw = self.read_varint()?;
        if raw == 0 {
            if !self.is_empty() {
                return Err(DecodeError::TruncatedMessage {
                    offset: self.pos,
                    field: None,
                });
            }
            return Ok(None);
        }
        let tag = u32::try_from(raw).map_err(|_| DecodeError::InvalidTag { offset, tag: raw })?;
        let field = tag >> 3;
        let raw_wire_type = (tag & 0x7) as u8;
        if field == 0 {
            return Err(DecodeError::InvalidTag { offset, tag: raw });
        }
        let wire_type = WireType::from_raw(raw_wire_type).ok_or(DecodeError::InvalidWireType {
            offset,
            field,
            wire_type: raw_wire_type,
        })?;
        Ok(Some(Key {
            field,
            wire_type,
            tag,
            offset,
        }))
    }

    fn take(&mut self, len: usize, field: u32) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::TruncatedMessage {
                offset: self.end,
                field: Some(field),
            });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..self.pos])
    }

    pub fn read_fixed32(&mut self, field: u32) -> Result<[u8; 4], DecodeError> {
        let mut out = [0u8; 4];
        out.copy_from_slice(self.take(4, field)?);
        Ok(out)
    }

    pub fn read_fixed64(&mut self, field: u32) -> Result<[u8; 8], DecodeError> {
        let mut out = [0u8; 8];
        out.copy_from_slice(self.take(8, field)?);
        Ok(out)
    }

    fn read_length(&mut self, field: u32) -> Result<usize, DecodeError> {
        let len = self.read_varint()?;
        if len > self.remaining() as u64 {
            return Err(DecodeError::TruncatedMessage {
                offset: self.end,
                field: Some(field),
            });
        }
        Ok(len as usize)
    }

    /// 读取 length-delimited 字段的内容（不含长度前缀）。
    pub fn read_length_delimited(&mut self, field: u32) -> Result<&'a [u8], DecodeError> {
        let len = self.read_length(field)?;
        self.take(len, field)
    }

    /// 在长度前缀限定的区间内执行 `f`，`f` 必须读完整个区间。
    pub fn bounded<T>(
        &mut self,
        field: u32,
        f: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let len = self.read_length(field)?;
        let outer_end = self.end;
        let inner_end = self.pos + len;
        self.end = inner_end;
        let result = f(self);
        self.end = outer_end;
        let value = result?;
        if self.pos != inner_end {
            return Err(DecodeError::TruncatedMessage {
                offset: self.pos,
                field: Some(field),
            });
        }
        Ok(value)
    }

    /// 进入一层子消息：深度 +1 后在其区间内执行 `f`。
    pub fn nested<T>(
        &mut self,
        field: u32,
        f: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        if self.depth >= self.recursion_limit {
            return Err(DecodeError::RecursionLimitExceeded {
                offset: self.pos,
                limit: self.recursion_limit,
            });
        }
        self.depth += 1;
        let result = self.bounded(field, f);
        self.depth -= 1;
        result
    }

    /// 跳过字段值，返回 tag 之后的原始字节（含长度前缀）。
    pub fn skip_field(&mut self, key: Key) -> Result<&'a [u8], DecodeError> {
        let start = self.pos;
        match key.wire_type {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.take(8, key.field)?;
            }
            WireType::LengthDelimited => {
                self.read_length_delimited(key.field)?;
            }
            WireType::Fixed32 => {
                self.take(4, key.field)?;
            }
        }
        Ok(&self.buf[start..self.pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_lengths() {
        assert_eq!(encoded_len_varint(0), 1);
        assert_eq!(encoded_len_varint(127), 1);
        assert_eq!(encoded_len_varint(128), 2);
        assert_eq!(encoded_len_varint(16_383), 2);
        assert_eq!(encoded_len_varint(16_384), 3);
        assert_eq!(encoded_len_varint(u64::MAX), 10);
        for value in [0u64, 1, 300, 1 << 35, u64::MAX] {
            assert_eq!(write_varint(value).len(), encoded_len_varint(value));
        }
    }

    #[test]
    fn varint_known_encodings() {
        assert_eq!(write_varint(1), vec![0x01]);
        assert_eq!(write_varint(150), vec![0x96, 0x01]);
        assert_eq!(write_varint(1000), vec![0xE8, 0x07]);
        assert_eq!(
            write_varint(u64::MAX),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
    }

    #[test]
    fn read_varint_reports_consumed_bytes() {
        assert_eq!(read_varint(&[0x96, 0x01, 0xAA]).unwrap(), (150, 2));
        assert_eq!(
            read_varint(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]).unwrap(),
            (u64::MAX, 10)
        );
    }

    #[test]
    fn overlong_varint_is_malformed() {
        let bytes = [0x80u8; 11];
        assert_eq!(
            read_varint(&bytes),
            Err(DecodeError::MalformedVarint { offset: 0 })
        );
    }

    #[test]
    fn unterminated_varint_is_truncated() {
        assert_eq!(
            read_varint(&[0x80, 0x80]),
            Err(DecodeError::TruncatedMessage {
                offset: 2,
                field: None
            })
        );
    }

    #[test]
    fn read_tag_splits_field_and_wire_type() {
        assert_eq!(read_tag(&[0x08]).unwrap(), (1, 0, 1));
        assert_eq!(read_tag(&[0x65]).unwrap(), (12, 5, 1));
        assert_eq!(read_tag(&[0xC2, 0x3E]).unwrap(), (1000, 2, 2));
    }

    #[test]
    fn key_length_matches_encoding() {
        let mut buf = Vec::new();
        encode_key(1000, WireType::LengthDelimited, &mut buf);
        assert_eq!(buf, vec![0xC2, 0x3E]);
        assert_eq!(key_len(1000), 2);
        assert_eq!(key_len(15), 1);
        assert_eq!(key_len(16), 2);
    }

    #[test]
    fn reader_rejects_groups() {
        let mut reader = Reader::new(&[0x0B], 10);
        assert_eq!(
            reader.read_key(),
            Err(DecodeError::InvalidWireType {
                offset: 0,
                field: 1,
                wire_type: 3
            })
        );
    }

    #[test]
    fn reader_rejects_field_zero() {
        let mut reader = Reader::new(&[0x02, 0x00], 10);
        assert_eq!(
            reader.read_key(),
            Err(DecodeError::InvalidTag { offset: 0, tag: 2 })
        );
    }

    #[test]
    fn zero_tag_ends_message() {
        let mut reader = Reader::new(&[0x00], 10);
        assert_eq!(reader.read_key(), Ok(None));

        let mut reader = Reader::new(&[0x00, 0x08, 0x01], 10);
        assert_eq!(
            reader.read_key(),
            Err(DecodeError::TruncatedMessage {
                offset: 1,
                field: None
            })
        );
    }

    #[test]
    fn bounded_read_stays_inside_length() {
        // 长度 2，区间内是一个 varint 字段；之后还有外层字节
        let bytes = [0x02, 0x08, 0x05, 0x10];
        let mut reader = Reader::new(&bytes, 10);
        let value = reader
            .nested(1, |inner| {
                let key = inner.read_key()?.expect("key");
                assert_eq!(key.field, 1);
                let value = inner.read_varint()?;
                assert!(inner.is_empty());
                assert_eq!(inner.depth(), 1);
                Ok(value)
            })
            .unwrap();
        assert_eq!(value, 5);
        assert_eq!(reader.depth(), 0);
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn length_past_end_is_truncated() {
        let mut reader = Reader::new(&[0x05, 0x01], 10);
        assert_eq!(
            reader.read_length_delimited(4),
            Err(DecodeError::TruncatedMessage {
                offset: 2,
                field: Some(4)
            })
        );
    }

    #[test]
    fn nesting_past_limit_fails() {
        let mut reader = Reader::new(&[0x00], 0);
        assert_eq!(
            reader.nested(2, |_| Ok(())),
            Err(DecodeError::RecursionLimitExceeded {
                offset: 0,
                limit: 0
            })
        );
    }

    #[test]
    fn skip_returns_raw_value_bytes() {
        let bytes = [0x03, 0x61, 0x62, 0x63, 0x96, 0x01];
        let mut reader = Reader::new(&bytes, 10);
        let key = Key {
            field: 9,
            wire_type: WireType::LengthDelimited,
            tag: (9 << 3) | 2,
            offset: 0,
        };
        assert_eq!(reader.skip_field(key).unwrap(), &[0x03, 0x61, 0x62, 0x63]);
        let key = Key {
            wire_type: WireType::Varint,
            tag: 9 << 3,
            ..key
        };
        assert_eq!(reader.skip_field(key).unwrap(), &[0x96, 0x01]);
        assert!(reader.is_empty());
    }
}
