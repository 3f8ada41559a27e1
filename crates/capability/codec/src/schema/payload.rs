use crate::error::DecodeError;
use crate::message::{Message, message_len, put_message, read_message};
use crate::scalar;
use crate::wire::{Key, Reader};
use bytes::BufMut;
use domain::{MetaData, Payload, UnknownFields, ValueExtension};

const TIMESTAMP: u32 = 1;
const METRICS: u32 = 2;
const SEQ: u32 = 3;
const UUID: u32 = 4;
const BODY: u32 = 5;

impl Message for Payload {
    const EXTENSION_START: u32 = 6;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        match key.field {
            TIMESTAMP => self.timestamp = Some(scalar::read_uint64(reader, key)?),
            METRICS => self.metrics.push(read_message(reader, key)?),
            SEQ => self.seq = Some(scalar::read_uint64(reader, key)?),
            UUID => self.uuid = Some(scalar::read_string(reader, key)?),
            BODY => self.body = Some(scalar::read_bytes(reader, key)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn encode_fields(&self, buf: &mut impl BufMut) {
        if let Some(timestamp) = self.timestamp {
            scalar::put_uint64(TIMESTAMP, timestamp, buf);
        }
        for metric in &self.metrics {
            put_message(METRICS, metric, buf);
        }
        if let Some(seq) = self.seq {
            scalar::put_uint64(SEQ, seq, buf);
        }
        if let Some(uuid) = &self.uuid {
            scalar::put_string(UUID, uuid, buf);
        }
        if let Some(body) = &self.body {
            scalar::put_bytes(BODY, body, buf);
        }
    }

    fn fields_len(&self) -> usize {
        self.timestamp
            .map_or(0, |value| scalar::uint64_len(TIMESTAMP, value))
            + self
                .metrics
                .iter()
                .map(|metric| message_len(METRICS, metric))
                .sum::<usize>()
            + self.seq.map_or(0, |value| scalar::uint64_len(SEQ, value))
            + self
                .uuid
                .as_ref()
                .map_or(0, |value| scalar::bytes_len(UUID, value.len()))
            + self
                .body
                .as_ref()
                .map_or(0, |value| scalar::bytes_len(BODY, value.len()))
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}

const IS_MULTI_PART: u32 = 1;
const CONTENT_TYPE: u32 = 2;
const SIZE: u32 = 3;
const META_SEQ: u32 = 4;
const FILE_NAME: u32 = 5;
const FILE_TYPE: u32 = 6;
const MD5: u32 = 7;
const DESCRIPTION: u32 = 8;

impl Message for MetaData {
    const EXTENSION_START: u32 = 9;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        match key.field {
            IS_MULTI_PART => self.is_multi_part = Some(scalar::read_bool(reader, key)?),
            CONTENT_TYPE => self.content_type = Some(scalar::read_string(reader, key)?),
            SIZE => self.size = Some(scalar::read_uint64(reader, key)?),
            META_SEQ => self.seq = Some(scalar::read_uint64(reader, key)?),
            FILE_NAME => self.file_name = Some(scalar::read_string(reader, key)?),
            FILE_TYPE => self.file_type = Some(scalar::read_string(reader, key)?),
            MD5 => self.md5 = Some(scalar::read_string(reader, key)?),
            DESCRIPTION => self.description = Some(scalar::read_string(reader, key)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn encode_fields(&self, buf: &mut impl BufMut) {
        if let Some(value) = self.is_multi_part {
            scalar::put_bool(IS_MULTI_PART, value, buf);
        }
        if let Some(value) = &self.content_type {
            scalar::put_string(CONTENT_TYPE, value, buf);
        }
        if let Some(value) = self.size {
            scalar::put_uint64(SIZE, value, buf);
        }
        if let Some(value) = self.seq {
            scalar::put_uint64(META_SEQ, value, buf);
        }
        for (field, value) in file_strings(self) {
            if let Some(value) = value {
                scalar::put_string(field, value, buf);
            }
        }
    }

    fn fields_len(&self) -> usize {
        let strings: usize = file_strings(self)
            .into_iter()
            .filter_map(|(field, value)| value.map(|value| scalar::bytes_len(field, value.len())))
            .sum();
        self.is_multi_part
            .map_or(0, |_| scalar::bool_len(IS_MULTI_PART))
            + self
                .content_type
                .as_ref()
                .map_or(0, |value| scalar::bytes_len(CONTENT_TYPE, value.len()))
            + self.size.map_or(0, |value| scalar::uint64_len(SIZE, value))
            + self.seq.map_or(0, |value| scalar::uint64_len(META_SEQ, value))
            + strings
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}

// 字段 5..=8 同为可选 string，编码与长度计算共用一张表
fn file_strings(metadata: &MetaData) -> [(u32, Option<&String>); 4] {
    [
        (FILE_NAME, metadata.file_name.as_ref()),
        (FILE_TYPE, metadata.file_type.as_ref()),
        (MD5, metadata.md5.as_ref()),
        (DESCRIPTION, metadata.description.as_ref()),
    ]
}

impl Message for ValueExtension {
    const EXTENSION_START: u32 = 1;

    fn merge_field(&mut self, _key: Key, _reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        Ok(false)
    }

    fn encode_fields(&self, _buf: &mut impl BufMut) {}

    fn fields_len(&self) -> usize {
        0
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}
