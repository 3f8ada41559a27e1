use super::{DataSet, PropertySet, Template, UnknownFields};
use crate::DataType;
use serde::Serialize;

/// 报文根节点。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Payload {
    pub timestamp: Option<u64>,
    pub metrics: Vec<Metric>,
    pub seq: Option<u64>,
    pub uuid: Option<String>,
    pub body: Option<Vec<u8>>,
    pub unknown_fields: UnknownFields,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = Some(seq);
        self
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    /// 按名称查找指标（DATA 报文常只带 alias，此时查不到）。
    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics
            .iter()
            .find(|metric| metric.name.as_deref() == Some(name))
    }
}

/// 单个遥测指标。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metric {
    pub name: Option<String>,
    pub alias: Option<u64>,
    pub timestamp: Option<u64>,
    pub datatype: Option<u32>,
    pub is_historical: Option<bool>,
    pub is_transient: Option<bool>,
    pub is_null: Option<bool>,
    pub metadata: Option<MetaData>,
    pub properties: Option<PropertySet>,
    pub value: Option<MetricValue>,
    pub unknown_fields: UnknownFields,
}

impl Metric {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// 仅带 alias 的指标（DATA 报文常见形式）。
    pub fn aliased(alias: u64) -> Self {
        Self {
            alias: Some(alias),
            ..Self::default()
        }
    }

    pub fn with_alias(mut self, alias: u64) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_value(mut self, data_type: DataType, value: MetricValue) -> Self {
        self.datatype = Some(data_type.code());
        self.value = Some(value);
        self
    }

    /// 显式空值：带 datatype 与 `is_null = true`，不设置 value。
    pub fn with_null(mut self, data_type: DataType) -> Self {
        self.datatype = Some(data_type.code());
        self.is_null = Some(true);
        self.value = None;
        self
    }

    pub fn with_metadata(mut self, metadata: MetaData) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn data_type(&self) -> DataType {
        self.datatype.map(DataType::from_code).unwrap_or_default()
    }

    pub fn is_null(&self) -> bool {
        self.is_null.unwrap_or(false)
    }
}

/// `Metric.value` oneof。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MetricValue {
    Int(u32),
    Long(u64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Bytes(Vec<u8>),
    DataSet(DataSet),
    Template(Template),
    Extension(ValueExtension),
}

/// 各类 `*ValueExtension` 占位消息：没有已知字段，只承载扩展字段。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValueExtension {
    pub unknown_fields: UnknownFields,
}

/// 文件类指标的元数据。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetaData {
    pub is_multi_part: Option<bool>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub seq: Option<u64>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub md5: Option<String>,
    pub description: Option<String>,
    pub unknown_fields: UnknownFields,
}
