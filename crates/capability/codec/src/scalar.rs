//! 标量字段编解码。
//!
//! 读取函数先校验线上类型，再从游标读取值；写入函数同时写出 tag。
//! `*_len` 返回含 tag 的编码长度，供外层计算子消息长度前缀。

use crate::error::DecodeError;
use crate::wire::{Key, Reader, WireType, encode_key, encode_varint, encoded_len_varint, key_len};
use bytes::BufMut;

pub fn expect_wire_type(key: Key, expected: WireType) -> Result<(), DecodeError> {
    if key.wire_type != expected {
        return Err(DecodeError::InvalidWireType {
            offset: key.offset,
            field: key.field,
            wire_type: key.wire_type as u8,
        });
    }
    Ok(())
}

pub fn read_uint64(reader: &mut Reader<'_>, key: Key) -> Result<u64, DecodeError> {
    expect_wire_type(key, WireType::Varint)?;
    reader.read_varint()
}

/// 超出 32 位的高位被截断。
pub fn read_uint32(reader: &mut Reader<'_>, key: Key) -> Result<u32, DecodeError> {
    read_uint64(reader, key).map(|value| value as u32)
}

pub fn read_bool(reader: &mut Reader<'_>, key: Key) -> Result<bool, DecodeError> {
    read_uint64(reader, key).map(|value| value != 0)
}

pub fn read_float(reader: &mut Reader<'_>, key: Key) -> Result<f32, DecodeError> {
    expect_wire_type(key, WireType::Fixed32)?;
    reader.read_fixed32(key.field).map(f32::from_le_bytes)
}

pub fn read_double(reader: &mut Reader<'_>, key: Key) -> Result<f64, DecodeError> {
    expect_wire_type(key, WireType::Fixed64)?;
    reader.read_fixed64(key.field).map(f64::from_le_bytes)
}

pub fn read_bytes(reader: &mut Reader<'_>, key: Key) -> Result<Vec<u8>, DecodeError> {
    expect_wire_type(key, WireType::LengthDelimited)?;
    reader.read_length_delimited(key.field).map(<[u8]>::to_vec)
}

/// 严格校验 UTF-8。
pub fn read_string(reader: &mut Reader<'_>, key: Key) -> Result<String, DecodeError> {
    expect_wire_type(key, WireType::LengthDelimited)?;
    let raw = reader.read_length_delimited(key.field)?;
    let start = reader.offset() - raw.len();
    match std::str::from_utf8(raw) {
        Ok(text) => Ok(text.to_owned()),
        Err(err) => Err(DecodeError::InvalidUtf8 {
            offset: start + err.valid_up_to(),
            field: key.field,
        }),
    }
}

pub fn put_uint64(field: u32, value: u64, buf: &mut impl BufMut) {
    encode_key(field, WireType::Varint, buf);
    encode_varint(value, buf);
}

pub fn put_uint32(field: u32, value: u32, buf: &mut impl BufMut) {
    put_uint64(field, u64::from(value), buf);
}

pub fn put_bool(field: u32, value: bool, buf: &mut impl BufMut) {
    put_uint64(field, u64::from(value), buf);
}

pub fn put_float(field: u32, value: f32, buf: &mut impl BufMut) {
    encode_key(field, WireType::Fixed32, buf);
    buf.put_f32_le(value);
}

pub fn put_double(field: u32, value: f64, buf: &mut impl BufMut) {
    encode_key(field, WireType::Fixed64, buf);
    buf.put_f64_le(value);
}

pub fn put_bytes(field: u32, value: &[u8], buf: &mut impl BufMut) {
    encode_key(field, WireType::LengthDelimited, buf);
    encode_varint(value.len() as u64, buf);
    buf.put_slice(value);
}

pub fn put_string(field: u32, value: &str, buf: &mut impl BufMut) {
    put_bytes(field, value.as_bytes(), buf);
}

pub fn uint64_len(field: u32, value: u64) -> usize {
    key_len(field) + encoded_len_varint(value)
}

pub fn uint32_len(field: u32, value: u32) -> usize {
    uint64_len(field, u64::from(value))
}

pub fn bool_len(field: u32) -> usize {
    key_len(field) + 1
}

pub fn float_len(field: u32) -> usize {
    key_len(field) + 4
}

pub fn double_len(field: u32) -> usize {
    key_len(field) + 8
}

pub fn bytes_len(field: u32, len: usize) -> usize {
    key_len(field) + encoded_len_varint(len as u64) + len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_at(reader: &mut Reader<'_>) -> Key {
        reader.read_key().unwrap().expect("key")
    }

    #[test]
    fn float_is_little_endian_fixed32() {
        let mut buf = Vec::new();
        put_float(12, 21.5, &mut buf);
        assert_eq!(buf, vec![0x65, 0x00, 0x00, 0xAC, 0x41]);
        assert_eq!(buf.len(), float_len(12));

        let mut reader = Reader::new(&buf, 10);
        let key = key_at(&mut reader);
        assert_eq!(read_float(&mut reader, key).unwrap(), 21.5);
    }

    #[test]
    fn double_is_little_endian_fixed64() {
        let mut buf = Vec::new();
        put_double(13, 1.0, &mut buf);
        assert_eq!(
            buf,
            vec![0x69, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F]
        );
        assert_eq!(buf.len(), double_len(13));
    }

    #[test]
    fn nonzero_varint_decodes_as_true() {
        let bytes = [0x38, 0x02];
        let mut reader = Reader::new(&bytes, 10);
        let key = key_at(&mut reader);
        assert!(read_bool(&mut reader, key).unwrap());
    }

    #[test]
    fn uint32_truncates_high_bits() {
        let mut buf = Vec::new();
        put_uint64(10, (1 << 32) | 7, &mut buf);
        let mut reader = Reader::new(&buf, 10);
        let key = key_at(&mut reader);
        assert_eq!(read_uint32(&mut reader, key).unwrap(), 7);
    }

    #[test]
    fn string_roundtrip_and_length() {
        let mut buf = Vec::new();
        put_string(1, "temp", &mut buf);
        assert_eq!(buf, vec![0x0A, 0x04, b't', b'e', b'm', b'p']);
        assert_eq!(buf.len(), bytes_len(1, 4));

        let mut reader = Reader::new(&buf, 10);
        let key = key_at(&mut reader);
        assert_eq!(read_string(&mut reader, key).unwrap(), "temp");
    }

    #[test]
    fn invalid_utf8_reports_byte_position() {
        let bytes = [0x22, 0x03, b'o', 0xFF, b'k'];
        let mut reader = Reader::new(&bytes, 10);
        let key = key_at(&mut reader);
        assert_eq!(
            read_string(&mut reader, key),
            Err(DecodeError::InvalidUtf8 {
                offset: 3,
                field: 4
            })
        );
    }

    #[test]
    fn wire_type_mismatch_is_rejected() {
        // 字段 4 以 FIXED32 出现
        let bytes = [0x25, 0x01, 0x02, 0x03, 0x04];
        let mut reader = Reader::new(&bytes, 10);
        let key = key_at(&mut reader);
        assert_eq!(
            read_string(&mut reader, key),
            Err(DecodeError::InvalidWireType {
                offset: 0,
                field: 4,
                wire_type: 5
            })
        );
    }

    #[test]
    fn truncated_fixed_width_value() {
        let bytes = [0x65, 0x00, 0x00];
        let mut reader = Reader::new(&bytes, 10);
        let key = key_at(&mut reader);
        assert_eq!(
            read_float(&mut reader, key),
            Err(DecodeError::TruncatedMessage {
                offset: 3,
                field: Some(12)
            })
        );
    }
}
