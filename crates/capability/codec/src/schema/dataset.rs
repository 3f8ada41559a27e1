use crate::error::DecodeError;
use crate::message::{
    Message, merge_message, merge_repeated_uint32, message_len, put_message, read_message,
};
use crate::scalar;
use crate::wire::{Key, Reader};
use bytes::BufMut;
use domain::{DataSet, DataSetValue, DataSetValueKind, Row, UnknownFields, ValueExtension};

const NUM_OF_COLUMNS: u32 = 1;
const COLUMNS: u32 = 2;
const TYPES: u32 = 3;
const ROWS: u32 = 4;

impl Message for DataSet {
    const EXTENSION_START: u32 = 5;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        match key.field {
            NUM_OF_COLUMNS => self.num_of_columns = Some(scalar::read_uint64(reader, key)?),
            COLUMNS => self.columns.push(scalar::read_string(reader, key)?),
            TYPES => merge_repeated_uint32(&mut self.types, reader, key)?,
            ROWS => self.rows.push(read_message(reader, key)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    // types 按 proto2 默认的非 packed 形式逐个写出
    fn encode_fields(&self, buf: &mut impl BufMut) {
        if let Some(count) = self.num_of_columns {
            scalar::put_uint64(NUM_OF_COLUMNS, count, buf);
        }
        for column in &self.columns {
            scalar::put_string(COLUMNS, column, buf);
        }
        for datatype in &self.types {
            scalar::put_uint32(TYPES, *datatype, buf);
        }
        for row in &self.rows {
            put_message(ROWS, row, buf);
        }
    }

    fn fields_len(&self) -> usize {
        self.num_of_columns
            .map_or(0, |value| scalar::uint64_len(NUM_OF_COLUMNS, value))
            + self
                .columns
                .iter()
                .map(|column| scalar::bytes_len(COLUMNS, column.len()))
                .sum::<usize>()
            + self
                .types
                .iter()
                .map(|datatype| scalar::uint32_len(TYPES, *datatype))
                .sum::<usize>()
            + self
                .rows
                .iter()
                .map(|row| message_len(ROWS, row))
                .sum::<usize>()
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}

const ELEMENTS: u32 = 1;

impl Message for Row {
    const EXTENSION_START: u32 = 2;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        if key.field != ELEMENTS {
            return Ok(false);
        }
        self.elements.push(read_message(reader, key)?);
        Ok(true)
    }

    fn encode_fields(&self, buf: &mut impl BufMut) {
        for element in &self.elements {
            put_message(ELEMENTS, element, buf);
        }
    }

    fn fields_len(&self) -> usize {
        self.elements
            .iter()
            .map(|element| message_len(ELEMENTS, element))
            .sum()
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}

const INT_VALUE: u32 = 1;
const LONG_VALUE: u32 = 2;
const FLOAT_VALUE: u32 = 3;
const DOUBLE_VALUE: u32 = 4;
const BOOLEAN_VALUE: u32 = 5;
const STRING_VALUE: u32 = 6;
const EXTENSION_VALUE: u32 = 7;

impl Message for DataSetValue {
    // 字段 7 之后没有声明扩展区间
    const EXTENSION_START: u32 = crate::wire::FIELD_NUMBER_LIMIT;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        let value = match key.field {
            INT_VALUE => DataSetValueKind::Int(scalar::read_uint32(reader, key)?),
            LONG_VALUE => DataSetValueKind::Long(scalar::read_uint64(reader, key)?),
            FLOAT_VALUE => DataSetValueKind::Float(scalar::read_float(reader, key)?),
            DOUBLE_VALUE => DataSetValueKind::Double(scalar::read_double(reader, key)?),
            BOOLEAN_VALUE => DataSetValueKind::Boolean(scalar::read_bool(reader, key)?),
            STRING_VALUE => DataSetValueKind::String(scalar::read_string(reader, key)?),
            EXTENSION_VALUE => {
                let mut extension = match self.value.take() {
                    Some(DataSetValueKind::Extension(extension)) => extension,
                    _ => ValueExtension::default(),
                };
                merge_message(&mut extension, reader, key)?;
                DataSetValueKind::Extension(extension)
            }
            _ => return Ok(false),
        };
        self.value = Some(value);
        Ok(true)
    }

    fn encode_fields(&self, buf: &mut impl BufMut) {
        let Some(value) = &self.value else {
            return;
        };
        match value {
            DataSetValueKind::Int(value) => scalar::put_uint32(INT_VALUE, *value, buf),
            DataSetValueKind::Long(value) => scalar::put_uint64(LONG_VALUE, *value, buf),
            DataSetValueKind::Float(value) => scalar::put_float(FLOAT_VALUE, *value, buf),
            DataSetValueKind::Double(value) => scalar::put_double(DOUBLE_VALUE, *value, buf),
            DataSetValueKind::Boolean(value) => scalar::put_bool(BOOLEAN_VALUE, *value, buf),
            DataSetValueKind::String(value) => scalar::put_string(STRING_VALUE, value, buf),
            DataSetValueKind::Extension(value) => put_message(EXTENSION_VALUE, value, buf),
        }
    }

    fn fields_len(&self) -> usize {
        match &self.value {
            None => 0,
            Some(DataSetValueKind::Int(value)) => scalar::uint32_len(INT_VALUE, *value),
            Some(DataSetValueKind::Long(value)) => scalar::uint64_len(LONG_VALUE, *value),
            Some(DataSetValueKind::Float(_)) => scalar::float_len(FLOAT_VALUE),
            Some(DataSetValueKind::Double(_)) => scalar::double_len(DOUBLE_VALUE),
            Some(DataSetValueKind::Boolean(_)) => scalar::bool_len(BOOLEAN_VALUE),
            Some(DataSetValueKind::String(value)) => scalar::bytes_len(STRING_VALUE, value.len()),
            Some(DataSetValueKind::Extension(value)) => message_len(EXTENSION_VALUE, value),
        }
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}
