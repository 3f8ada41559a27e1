use super::{ShapeError, UnknownFields, ValueExtension};
use serde::Serialize;

/// 属性集合：`keys` 与 `values` 按下标并列。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertySet {
    pub keys: Vec<String>,
    pub values: Vec<PropertyValue>,
    pub unknown_fields: UnknownFields,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.keys.push(key.into());
        self.values.push(value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.keys
            .iter()
            .position(|candidate| candidate == key)
            .and_then(|index| self.values.get(index))
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.keys.len() != self.values.len() {
            return Err(ShapeError::PropertyCountMismatch {
                keys: self.keys.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertySetList {
    pub propertyset: Vec<PropertySet>,
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyValue {
    pub r#type: Option<u32>,
    pub is_null: Option<bool>,
    pub value: Option<PropertyValueKind>,
    pub unknown_fields: UnknownFields,
}

impl PropertyValue {
    pub fn new(r#type: u32, value: PropertyValueKind) -> Self {
        Self {
            r#type: Some(r#type),
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn null(r#type: u32) -> Self {
        Self {
            r#type: Some(r#type),
            is_null: Some(true),
            ..Self::default()
        }
    }
}

/// `PropertyValue.value` oneof。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyValueKind {
    Int(u32),
    Long(u64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    PropertySet(PropertySet),
    PropertySetList(PropertySetList),
    Extension(ValueExtension),
}
