//! Sparkplug B 领域模型。
//!
//! - [`sparkplug`]：Payload 报文树（Metric、DataSet、Template、PropertySet ...），
//!   不含任何编解码逻辑，编解码见 `spb-codec`。
//! - [`DataType`]：Sparkplug B 数据类型编码。
//! - [`data`]：原始事件与规范化后的点位值。

pub mod data;
pub mod datatype;
pub mod sparkplug;

pub use data::{MessageType, PointValue, PointValueData, RawEvent, TOPIC_NAMESPACE, TopicError};
pub use datatype::DataType;
pub use sparkplug::{
    DataSet, DataSetValue, DataSetValueKind, MetaData, Metric, MetricValue, Parameter,
    ParameterValue, Payload, PropertySet, PropertySetList, PropertyValue, PropertyValueKind, Row,
    ShapeError, Template, UnknownField, UnknownFields, ValueExtension,
};
