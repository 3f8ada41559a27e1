use super::{Metric, UnknownFields, ValueExtension};
use serde::Serialize;

/// UDT 模板：定义（`is_definition = true`）或实例（`template_ref` 指向定义）。
///
/// 模板成员本身是 `Metric`，可以再携带 `Template` 值，形成递归结构。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Template {
    pub version: Option<String>,
    pub metrics: Vec<Metric>,
    pub parameters: Vec<Parameter>,
    pub template_ref: Option<String>,
    pub is_definition: Option<bool>,
    pub unknown_fields: UnknownFields,
}

impl Template {
    pub fn definition() -> Self {
        Self {
            is_definition: Some(true),
            ..Self::default()
        }
    }

    pub fn instance_of(template_ref: impl Into<String>) -> Self {
        Self {
            template_ref: Some(template_ref.into()),
            is_definition: Some(false),
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Parameter {
    pub name: Option<String>,
    pub r#type: Option<u32>,
    pub value: Option<ParameterValue>,
    pub unknown_fields: UnknownFields,
}

impl Parameter {
    pub fn new(name: impl Into<String>, r#type: u32, value: ParameterValue) -> Self {
        Self {
            name: Some(name.into()),
            r#type: Some(r#type),
            value: Some(value),
            unknown_fields: UnknownFields::new(),
        }
    }
}

/// `Parameter.value` oneof。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParameterValue {
    Int(u32),
    Long(u64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Extension(ValueExtension),
}
