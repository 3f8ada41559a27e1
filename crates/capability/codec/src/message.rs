//! 消息帧：字段分发、子消息长度前缀、未知字段透传。

use crate::error::DecodeError;
use crate::scalar::expect_wire_type;
use crate::wire::{Key, Reader, WireType, encode_key, encode_varint, encoded_len_varint, key_len};
use bytes::BufMut;
use domain::{UnknownField, UnknownFields};

/// Sparkplug B 消息的编解码接口。
///
/// 实现方只处理已知字段：`merge_field` 对未识别的字段号返回 `Ok(false)`，
/// 由 [`Message::merge`] 统一把它们存入 `unknown_fields`；
/// 编码时已知字段按字段号升序写出，未知字段随后原样写回。
pub trait Message: Default {
    /// 扩展区间起点，区间止于 [`crate::wire::FIELD_NUMBER_LIMIT`]（不含）。
    const EXTENSION_START: u32;

    /// 合并一个已知字段；字段号未知时返回 `Ok(false)` 且不消耗字节。
    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError>;

    /// 按字段号升序写出已知字段。
    fn encode_fields(&self, buf: &mut impl BufMut);

    /// 已知字段的编码长度。
    fn fields_len(&self) -> usize;

    fn unknown_fields(&self) -> &UnknownFields;

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields;

    /// 读取字段直到区间结束，合并进 `self`。
    fn merge(&mut self, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        while let Some(key) = reader.read_key()? {
            if self.merge_field(key, reader)? {
                continue;
            }
            let data = reader.skip_field(key)?;
            self.unknown_fields_mut()
                .push(UnknownField::new(key.tag, data.to_vec()));
            reader.note_unknown_field();
        }
        Ok(())
    }

    /// 落在扩展区间内的未知字段。
    fn extension_fields(&self) -> impl Iterator<Item = &UnknownField> {
        self.unknown_fields().extensions(Self::EXTENSION_START)
    }

    /// 不含外层 tag 与长度前缀的消息体。
    fn encode_raw(&self, buf: &mut impl BufMut) {
        self.encode_fields(buf);
        encode_unknown_fields(self.unknown_fields(), buf);
    }

    fn encoded_len(&self) -> usize {
        self.fields_len() + unknown_fields_len(self.unknown_fields())
    }
}

pub fn encode_unknown_fields(fields: &UnknownFields, buf: &mut impl BufMut) {
    for field in fields {
        encode_varint(u64::from(field.tag), buf);
        buf.put_slice(&field.data);
    }
}

pub fn unknown_fields_len(fields: &UnknownFields) -> usize {
    fields
        .iter()
        .map(|field| encoded_len_varint(u64::from(field.tag)) + field.data.len())
        .sum()
}

/// 写出子消息字段：tag、长度前缀、消息体。
pub fn put_message<M: Message>(field: u32, message: &M, buf: &mut impl BufMut) {
    encode_key(field, WireType::LengthDelimited, buf);
    encode_varint(message.encoded_len() as u64, buf);
    message.encode_raw(buf);
}

pub fn message_len<M: Message>(field: u32, message: &M) -> usize {
    let len = message.encoded_len();
    key_len(field) + encoded_len_varint(len as u64) + len
}

/// 把子消息合并进已有值（同一字段重复出现时按 protobuf 规则合并）。
pub fn merge_message<M: Message>(
    message: &mut M,
    reader: &mut Reader<'_>,
    key: Key,
) -> Result<(), DecodeError> {
    expect_wire_type(key, WireType::LengthDelimited)?;
    reader.nested(key.field, |inner| message.merge(inner))
}

pub fn read_message<M: Message>(reader: &mut Reader<'_>, key: Key) -> Result<M, DecodeError> {
    let mut message = M::default();
    merge_message(&mut message, reader, key)?;
    Ok(message)
}

/// repeated uint32：接受逐个 VARINT 与 packed 两种形式。
pub fn merge_repeated_uint32(
    values: &mut Vec<u32>,
    reader: &mut Reader<'_>,
    key: Key,
) -> Result<(), DecodeError> {
    match key.wire_type {
        WireType::Varint => {
            values.push(reader.read_varint()? as u32);
            Ok(())
        }
        WireType::LengthDelimited => reader.bounded(key.field, |inner| {
            while !inner.is_empty() {
                values.push(inner.read_varint()? as u32);
            }
            Ok(())
        }),
        other => Err(DecodeError::InvalidWireType {
            offset: key.offset,
            field: key.field,
            wire_type: other as u8,
        }),
    }
}
