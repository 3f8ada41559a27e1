use crate::error::DecodeError;
use crate::message::{Message, merge_message, message_len, put_message, read_message};
use crate::scalar;
use crate::wire::{Key, Reader};
use bytes::BufMut;
use domain::{Parameter, ParameterValue, Template, UnknownFields, ValueExtension};

const VERSION: u32 = 1;
const METRICS: u32 = 2;
const PARAMETERS: u32 = 3;
const TEMPLATE_REF: u32 = 4;
const IS_DEFINITION: u32 = 5;

impl Message for Template {
    const EXTENSION_START: u32 = 6;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        match key.field {
            VERSION => self.version = Some(scalar::read_string(reader, key)?),
            METRICS => self.metrics.push(read_message(reader, key)?),
            PARAMETERS => self.parameters.push(read_message(reader, key)?),
            TEMPLATE_REF => self.template_ref = Some(scalar::read_string(reader, key)?),
            IS_DEFINITION => self.is_definition = Some(scalar::read_bool(reader, key)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn encode_fields(&self, buf: &mut impl BufMut) {
        if let Some(version) = &self.version {
            scalar::put_string(VERSION, version, buf);
        }
        for metric in &self.metrics {
            put_message(METRICS, metric, buf);
        }
        for parameter in &self.parameters {
            put_message(PARAMETERS, parameter, buf);
        }
        if let Some(template_ref) = &self.template_ref {
            scalar::put_string(TEMPLATE_REF, template_ref, buf);
        }
        if let Some(value) = self.is_definition {
            scalar::put_bool(IS_DEFINITION, value, buf);
        }
    }

    fn fields_len(&self) -> usize {
        self.version
            .as_ref()
            .map_or(0, |value| scalar::bytes_len(VERSION, value.len()))
            + self
                .metrics
                .iter()
                .map(|metric| message_len(METRICS, metric))
                .sum::<usize>()
            + self
                .parameters
                .iter()
                .map(|parameter| message_len(PARAMETERS, parameter))
                .sum::<usize>()
            + self
                .template_ref
                .as_ref()
                .map_or(0, |value| scalar::bytes_len(TEMPLATE_REF, value.len()))
            + self
                .is_definition
                .map_or(0, |_| scalar::bool_len(IS_DEFINITION))
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}

const NAME: u32 = 1;
const TYPE: u32 = 2;
const INT_VALUE: u32 = 3;
const LONG_VALUE: u32 = 4;
const FLOAT_VALUE: u32 = 5;
const DOUBLE_VALUE: u32 = 6;
const BOOLEAN_VALUE: u32 = 7;
const STRING_VALUE: u32 = 8;
const EXTENSION_VALUE: u32 = 9;

impl Message for Parameter {
    const EXTENSION_START: u32 = crate::wire::FIELD_NUMBER_LIMIT;

    fn merge_field(&mut self, key: Key, reader: &mut Reader<'_>) -> Result<bool, DecodeError> {
        let value = match key.field {
            NAME => {
                self.name = Some(scalar::read_string(reader, key)?);
                return Ok(true);
            }
            TYPE => {
                self.r#type = Some(scalar::read_uint32(reader, key)?);
                return Ok(true);
            }
            INT_VALUE => ParameterValue::Int(scalar::read_uint32(reader, key)?),
            LONG_VALUE => ParameterValue::Long(scalar::read_uint64(reader, key)?),
            FLOAT_VALUE => ParameterValue::Float(scalar::read_float(reader, key)?),
            DOUBLE_VALUE => ParameterValue::Double(scalar::read_double(reader, key)?),
            BOOLEAN_VALUE => ParameterValue::Boolean(scalar::read_bool(reader, key)?),
            STRING_VALUE => ParameterValue::String(scalar::read_string(reader, key)?),
            EXTENSION_VALUE => {
                let mut extension = match self.value.take() {
                    Some(ParameterValue::Extension(extension)) => extension,
                    _ => ValueExtension::default(),
                };
                merge_message(&mut extension, reader, key)?;
                ParameterValue::Extension(extension)
            }
            _ => return Ok(false),
        };
        self.value = Some(value);
        Ok(true)
    }

    fn encode_fields(&self, buf: &mut impl BufMut) {
        if let Some(name) = &self.name {
            scalar::put_string(NAME, name, buf);
        }
        if let Some(datatype) = self.r#type {
            scalar::put_uint32(TYPE, datatype, buf);
        }
        match &self.value {
            None => {}
            Some(ParameterValue::Int(value)) => scalar::put_uint32(INT_VALUE, *value, buf),
            Some(ParameterValue::Long(value)) => scalar::put_uint64(LONG_VALUE, *value, buf),
            Some(ParameterValue::Float(value)) => scalar::put_float(FLOAT_VALUE, *value, buf),
            Some(ParameterValue::Double(value)) => scalar::put_double(DOUBLE_VALUE, *value, buf),
            Some(ParameterValue::Boolean(value)) => scalar::put_bool(BOOLEAN_VALUE, *value, buf),
            Some(ParameterValue::String(value)) => scalar::put_string(STRING_VALUE, value, buf),
            Some(ParameterValue::Extension(value)) => put_message(EXTENSION_VALUE, value, buf),
        }
    }

    fn fields_len(&self) -> usize {
        let value_len = match &self.value {
            None => 0,
            Some(ParameterValue::Int(value)) => scalar::uint32_len(INT_VALUE, *value),
            Some(ParameterValue::Long(value)) => scalar::uint64_len(LONG_VALUE, *value),
            Some(ParameterValue::Float(_)) => scalar::float_len(FLOAT_VALUE),
            Some(ParameterValue::Double(_)) => scalar::double_len(DOUBLE_VALUE),
            Some(ParameterValue::Boolean(_)) => scalar::bool_len(BOOLEAN_VALUE),
            Some(ParameterValue::String(value)) => scalar::bytes_len(STRING_VALUE, value.len()),
            Some(ParameterValue::Extension(value)) => message_len(EXTENSION_VALUE, value),
        };
        self.name
            .as_ref()
            .map_or(0, |value| scalar::bytes_len(NAME, value.len()))
            + self.r#type.map_or(0, |value| scalar::uint32_len(TYPE, value))
            + value_len
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown_fields
    }
}
