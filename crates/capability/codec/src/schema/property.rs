use crate::error::DecodeError;
use crate::message::{Message, merge_message, message_len, put_message, read_message};
use crate::scalar;
use crate::wire::{Key, Reader};
use bytes::BufMut;
use domain::{
    PropertySet, PropertySetList, PropertyValue, PropertyValueKind, UnknownFields, ValueExtension,
};

const TYPE: u32 = 1;
const IS_NULL: u32 = 2;
const INT_VALUE: u32 = 3;
const LONG_VALUE: u32 = 4;
const FLOAT_VALUE: u32 = 5;
const DOUBLE_VALUE: u32 = 6;
const BOOLEAN_VALUE: u32 = 7;
const STRING_VALUE: u32 = 8;
const PROPERTYSET_VALUE: u32 = 9;
const PROPERTYSETS_VALUE: u32 = 10;
const EXTENSION_VALUE: u32 = 11;

impl Message for PropertyValue {
    const EXTENSION_START: u32 = crate::wire::FIELD_NUMBER_LIMIT;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        let value = match key.field {
            TYPE => {
                self.r#type = Some(scalar::read_uint32(reader, key)?);
                return Ok(true);
            }
            IS_NULL => {
                self.is_null = Some(scalar::read_bool(reader, key)?);
                return Ok(true);
            }
            INT_VALUE => PropertyValueKind::Int(scalar::read_uint32(reader, key)?),
            LONG_VALUE => PropertyValueKind::Long(scalar::read_uint64(reader, key)?),
            FLOAT_VALUE => PropertyValueKind::Float(scalar::read_float(reader, key)?),
            DOUBLE_VALUE => PropertyValueKind::Double(scalar::read_double(reader, key)?),
            BOOLEAN_VALUE => PropertyValueKind::Boolean(scalar::read_bool(reader, key)?),
            STRING_VALUE => PropertyValueKind::String(scalar::read_string(reader, key)?),
            PROPERTYSET_VALUE => {
                let mut set = match self.value.take() {
                    Some(PropertyValueKind::PropertySet(set)) => set,
                    _ => PropertySet::default(),
                };
                merge_message(&mut set, reader, key)?;
                PropertyValueKind::PropertySet(set)
            }
            PROPERTYSETS_VALUE => {
                let mut list = match self.value.take() {
                    Some(PropertyValueKind::PropertySetList(list)) => list,
                    _ => PropertySetList::default(),
                };
                merge_message(&mut list, reader, key)?;
                PropertyValueKind::PropertySetList(list)
            }
            EXTENSION_VALUE => {
                let mut extension = match self.value.take() {
                    Some(PropertyValueKind::Extension(extension)) => extension,
                    _ => ValueExtension::default(),
                };
                merge_message(&mut extension, reader, key)?;
                PropertyValueKind::Extension(extension)
            }
            _ => return Ok(false),
        };
        self.value = Some(value);
        Ok(true)
    }

    fn encode_fields(&self, buf: &mut impl BufMut) {
        if let Some(datatype) = self.r#type {
            scalar::put_uint32(TYPE, datatype, buf);
        }
        if let Some(value) = self.is_null {
            scalar::put_bool(IS_NULL, value, buf);
        }
        let Some(value) = &self.value else {
            return;
        };
        match value {
            PropertyValueKind::Int(value) => scalar::put_uint32(INT_VALUE, *value, buf),
            PropertyValueKind::Long(value) => scalar::put_uint64(LONG_VALUE, *value, buf),
            PropertyValueKind::Float(value) => scalar::put_float(FLOAT_VALUE, *value, buf),
            PropertyValueKind::Double(value) => scalar::put_double(DOUBLE_VALUE, *value, buf),
            PropertyValueKind::Boolean(value) => scalar::put_bool(BOOLEAN_VALUE, *value, buf),
            PropertyValueKind::String(value) => scalar::put_string(STRING_VALUE, value, buf),
            PropertyValueKind::PropertySet(value) => put_message(PROPERTYSET_VALUE, value, buf),
            PropertyValueKind::PropertySetList(value) => {
                put_message(PROPERTYSETS_VALUE, value, buf)
            }
            PropertyValueKind::Extension(value) => put_message(EXTENSION_VALUE, value, buf),
        }
    }

    fn fields_len(&self) -> usize {
        let value_len = match &self.value {
            None => 0,
            Some(PropertyValueKind::Int(value)) => scalar::uint32_len(INT_VALUE, *value),
            Some(PropertyValueKind::Long(value)) => scalar::uint64_len(LONG_VALUE, *value),
            Some(PropertyValueKind::Float(_)) => scalar::float_len(FLOAT_VALUE),
            Some(PropertyValueKind::Double(_)) => scalar::double_len(DOUBLE_VALUE),
            Some(PropertyValueKind::Boolean(_)) => scalar::bool_len(BOOLEAN_VALUE),
            Some(PropertyValueKind::String(value)) => scalar::bytes_len(STRING_VALUE, value.len()),
            Some(PropertyValueKind::PropertySet(value)) => message_len(PROPERTYSET_VALUE, value),
            Some(PropertyValueKind::PropertySetList(value)) => {
                message_len(PROPERTYSETS_VALUE, value)
            }
            Some(PropertyValueKind::Extension(value)) => message_len(EXTENSION_VALUE, value),
        };
        self.r#type.map_or(0, |value| scalar::uint32_len(TYPE, value))
            + self.is_null.map_or(0, |_| scalar::bool_len(IS_NULL))
            + value_len
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}

const KEYS: u32 = 1;
const VALUES: u32 = 2;

impl Message for PropertySet {
    const EXTENSION_START: u32 = 3;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        match key.field {
            KEYS => self.keys.push(scalar::read_string(reader, key)?),
            VALUES => self.values.push(read_message(reader, key)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn encode_fields(&self, buf: &mut impl BufMut) {
        for key in &self.keys {
            scalar::put_string(KEYS, key, buf);
        }
        for value in &self.values {
            put_message(VALUES, value, buf);
        }
    }

    fn fields_len(&self) -> usize {
        self.keys
            .iter()
            .map(|key| scalar::bytes_len(KEYS, key.len()))
            .sum::<usize>()
            + self
                .values
                .iter()
                .map(|value| message_len(VALUES, value))
                .sum::<usize>()
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}

const PROPERTYSET: u32 = 1;

impl Message for PropertySetList {
    const EXTENSION_START: u32 = 2;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        if key.field != PROPERTYSET {
            return Ok(false);
        }
        self.propertyset.push(read_message(reader, key)?);
        Ok(true)
    }

    fn encode_fields(&self, buf: &mut impl BufMut) {
        for set in &self.propertyset {
            put_message(PROPERTYSET, set, buf);
        }
    }

    fn fields_len(&self) -> usize {
        self.propertyset
            .iter()
            .map(|set| message_len(PROPERTYSET, set))
            .sum()
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}
