use crate::error::DecodeError;
use crate::message::{Message, merge_message, message_len, put_message};
use crate::scalar;
use crate::wire::{Key, Reader};
use bytes::BufMut;
use domain::{DataSet, Metric, MetricValue, Template, UnknownFields, ValueExtension};

const NAME: u32 = 1;
const ALIAS: u32 = 2;
const TIMESTAMP: u32 = 3;
const DATATYPE: u32 = 4;
const IS_HISTORICAL: u32 = 5;
const IS_TRANSIENT: u32 = 6;
const IS_NULL: u32 = 7;
const METADATA: u32 = 8;
const PROPERTIES: u32 = 9;
const INT_VALUE: u32 = 10;
const LONG_VALUE: u32 = 11;
const FLOAT_VALUE: u32 = 12;
const DOUBLE_VALUE: u32 = 13;
const BOOLEAN_VALUE: u32 = 14;
const STRING_VALUE: u32 = 15;
const BYTES_VALUE: u32 = 16;
const DATASET_VALUE: u32 = 17;
const TEMPLATE_VALUE: u32 = 18;
const EXTENSION_VALUE: u32 = 19;

impl Message for Metric {
    // Metric 没有声明扩展区间，未知字段仍然保留
    const EXTENSION_START: u32 = crate::wire::FIELD_NUMBER_LIMIT;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        match key.field {
            NAME => self.name = Some(scalar::read_string(reader, key)?),
            ALIAS => self.alias = Some(scalar::read_uint64(reader, key)?),
            TIMESTAMP => self.timestamp = Some(scalar::read_uint64(reader, key)?),
            DATATYPE => self.datatype = Some(scalar::read_uint32(reader, key)?),
            IS_HISTORICAL => self.is_historical = Some(scalar::read_bool(reader, key)?),
            IS_TRANSIENT => self.is_transient = Some(scalar::read_bool(reader, key)?),
            IS_NULL => self.is_null = Some(scalar::read_bool(reader, key)?),
            METADATA => {
                merge_message(self.metadata.get_or_insert_with(Default::default), reader, key)?
            }
            PROPERTIES => merge_message(
                self.properties.get_or_insert_with(Default::default),
                reader,
                key,
            )?,
            INT_VALUE => self.value = Some(MetricValue::Int(scalar::read_uint32(reader, key)?)),
            LONG_VALUE => self.value = Some(MetricValue::Long(scalar::read_uint64(reader, key)?)),
            FLOAT_VALUE => self.value = Some(MetricValue::Float(scalar::read_float(reader, key)?)),
            DOUBLE_VALUE => {
                self.value = Some(MetricValue::Double(scalar::read_double(reader, key)?))
            }
            BOOLEAN_VALUE => {
                self.value = Some(MetricValue::Boolean(scalar::read_bool(reader, key)?))
            }
            STRING_VALUE => {
                self.value = Some(MetricValue::String(scalar::read_string(reader, key)?))
            }
            BYTES_VALUE => self.value = Some(MetricValue::Bytes(scalar::read_bytes(reader, key)?)),
            DATASET_VALUE => {
                let mut dataset = match self.value.take() {
                    Some(MetricValue::DataSet(dataset)) => dataset,
                    _ => DataSet::default(),
                };
                merge_message(&mut dataset, reader, key)?;
                self.value = Some(MetricValue::DataSet(dataset));
            }
            TEMPLATE_VALUE => {
                let mut template = match self.value.take() {
                    Some(MetricValue::Template(template)) => template,
                    _ => Template::default(),
                };
                merge_message(&mut template, reader, key)?;
                self.value = Some(MetricValue::Template(template));
            }
            EXTENSION_VALUE => {
                let mut extension = match self.value.take() {
                    Some(MetricValue::Extension(extension)) => extension,
                    _ => ValueExtension::default(),
                };
                merge_message(&mut extension, reader, key)?;
                self.value = Some(MetricValue::Extension(extension));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn encode_fields(&self, buf: &mut impl BufMut) {
        if let Some(name) = &self.name {
            scalar::put_string(NAME, name, buf);
        }
        if let Some(alias) = self.alias {
            scalar::put_uint64(ALIAS, alias, buf);
        }
        if let Some(timestamp) = self.timestamp {
            scalar::put_uint64(TIMESTAMP, timestamp, buf);
        }
        if let Some(datatype) = self.datatype {
            scalar::put_uint32(DATATYPE, datatype, buf);
        }
        if let Some(value) = self.is_historical {
            scalar::put_bool(IS_HISTORICAL, value, buf);
        }
        if let Some(value) = self.is_transient {
            scalar::put_bool(IS_TRANSIENT, value, buf);
        }
        if let Some(value) = self.is_null {
            scalar::put_bool(IS_NULL, value, buf);
        }
        if let Some(metadata) = &self.metadata {
            put_message(METADATA, metadata, buf);
        }
        if let Some(properties) = &self.properties {
            put_message(PROPERTIES, properties, buf);
        }
        if let Some(value) = &self.value {
            put_value(value, buf);
        }
    }

    fn fields_len(&self) -> usize {
        let flags = [self.is_historical, self.is_transient, self.is_null];
        let flag_fields = [IS_HISTORICAL, IS_TRANSIENT, IS_NULL];
        let flags_len: usize = flags
            .iter()
            .zip(flag_fields)
            .filter(|(flag, _)| flag.is_some())
            .map(|(_, field)| scalar::bool_len(field))
            .sum();

        self.name
            .as_ref()
            .map_or(0, |value| scalar::bytes_len(NAME, value.len()))
            + self.alias.map_or(0, |value| scalar::uint64_len(ALIAS, value))
            + self
                .timestamp
                .map_or(0, |value| scalar::uint64_len(TIMESTAMP, value))
            + self
                .datatype
                .map_or(0, |value| scalar::uint32_len(DATATYPE, value))
            + flags_len
            + self
                .metadata
                .as_ref()
                .map_or(0, |value| message_len(METADATA, value))
            + self
                .properties
                .as_ref()
                .map_or(0, |value| message_len(PROPERTIES, value))
            + self.value.as_ref().map_or(0, value_len)
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}

fn put_value(value: &MetricValue, buf: &mut impl BufMut) {
    match value {
        MetricValue::Int(value) => scalar::put_uint32(INT_VALUE, *value, buf),
        MetricValue::Long(value) => scalar::put_uint64(LONG_VALUE, *value, buf),
        MetricValue::Float(value) => scalar::put_float(FLOAT_VALUE, *value, buf),
        MetricValue::Double(value) => scalar::put_double(DOUBLE_VALUE, *value, buf),
        MetricValue::Boolean(value) => scalar::put_bool(BOOLEAN_VALUE, *value, buf),
        MetricValue::String(value) => scalar::put_string(STRING_VALUE, value, buf),
        MetricValue::Bytes(value) => scalar::put_bytes(BYTES_VALUE, value, buf),
        MetricValue::DataSet(value) => put_message(DATASET_VALUE, value, buf),
        MetricValue::Template(value) => put_message(TEMPLATE_VALUE, value, buf),
        MetricValue::Extension(value) => put_message(EXTENSION_VALUE, value, buf),
    }
}

fn value_len(value: &MetricValue) -> usize {
    match value {
        MetricValue::Int(value) => scalar::uint32_len(INT_VALUE, *value),
        MetricValue::Long(value) => scalar::uint64_len(LONG_VALUE, *value),
        MetricValue::Float(_) => scalar::float_len(FLOAT_VALUE),
        MetricValue::Double(_) => scalar::double_len(DOUBLE_VALUE),
        MetricValue::Boolean(_) => scalar::bool_len(BOOLEAN_VALUE),
        MetricValue::String(value) => scalar::bytes_len(STRING_VALUE, value.len()),
        MetricValue::Bytes(value) => scalar::bytes_len(BYTES_VALUE, value.len()),
        MetricValue::DataSet(value) => message_len(DATASET_VALUE, value),
        MetricValue::Template(value) => message_len(TEMPLATE_VALUE, value),
        MetricValue::Extension(value) => message_len(EXTENSION_VALUE, value),
    }
}
