//! Sparkplug B 数据类型编码（`Metric.datatype`、`Parameter.type` 等字段的取值）。

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    Unknown,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    Boolean,
    String,
    DateTime,
    Text,
    Uuid,
    DataSet,
    Bytes,
    File,
    Template,
    PropertySet,
    PropertySetList,
    Int8Array,
    Int16Array,
    Int32Array,
    Int64Array,
    UInt8Array,
    UInt16Array,
    UInt32Array,
    UInt64Array,
    FloatArray,
    DoubleArray,
    BooleanArray,
    StringArray,
    DateTimeArray,
}

const ALL: [DataType; 35] = [
    DataType::Unknown,
    DataType::Int8,
    DataType::Int16,
    DataType::Int32,
    DataType::Int64,
    DataType::UInt8,
    DataType::UInt16,
    DataType::UInt32,
    DataType::UInt64,
    DataType::Float,
    DataType::Double,
    DataType::Boolean,
    DataType::String,
    DataType::DateTime,
    DataType::Text,
    DataType::Uuid,
    DataType::DataSet,
    DataType::Bytes,
    DataType::File,
    DataType::Template,
    DataType::PropertySet,
    DataType::PropertySetList,
    DataType::Int8Array,
    DataType::Int16Array,
    DataType::Int32Array,
    DataType::Int64Array,
    DataType::UInt8Array,
    DataType::UInt16Array,
    DataType::UInt32Array,
    DataType::UInt64Array,
    DataType::FloatArray,
    DataType::DoubleArray,
    DataType::BooleanArray,
    DataType::StringArray,
    DataType::DateTimeArray,
];

impl DataType {
    /// 线上编码值；未定义的编码映射为 `Unknown`。
    pub fn from_code(code: u32) -> Self {
        ALL.get(code as usize).copied().unwrap_or(Self::Unknown)
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn is_array(self) -> bool {
        self.code() >= Self::Int8Array.code()
    }
}

impl Default for DataType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<u32> for DataType {
    fn from(code: u32) -> Self {
        Self::from_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_declaration_order() {
        for (index, data_type) in ALL.iter().enumerate() {
            assert_eq!(data_type.code(), index as u32);
            assert_eq!(DataType::from_code(index as u32), *data_type);
        }
    }

    #[test]
    fn well_known_codes() {
        assert_eq!(DataType::Float.code(), 9);
        assert_eq!(DataType::Boolean.code(), 11);
        assert_eq!(DataType::Template.code(), 19);
        assert_eq!(DataType::DateTimeArray.code(), 34);
        assert_eq!(DataType::from_code(35), DataType::Unknown);
        assert_eq!(DataType::from_code(u32::MAX), DataType::Unknown);
    }

    #[test]
    fn array_types() {
        assert!(DataType::Int8Array.is_array());
        assert!(DataType::StringArray.is_array());
        assert!(!DataType::PropertySetList.is_array());
        assert!(!DataType::Bytes.is_array());
    }
}
