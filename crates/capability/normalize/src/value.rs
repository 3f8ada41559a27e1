use crate::NormalizeError;
use crate::array::{decode_array, encode_array, widen_f32};
use domain::{DataType, Metric, MetricValue, PointValueData};

/// 按 datatype 读取指标值。
///
/// - `is_null` 为真时返回 `None`；
/// - DataSet / Template / File 不展开，返回 `None`；
/// - 有符号整数按位宽做符号扩展，超出 `i64` 的 UInt64 以十进制字符串表示；
/// - Bytes 与数组类型转为 JSON 数组文本。
pub fn metric_to_point_value(metric: &Metric) -> Result<Option<PointValueData>, NormalizeError> {
    if metric.is_null() {
        return Ok(None);
    }
    let data_type = metric.data_type();
    let code = metric.datatype.unwrap_or_default();

    let value = match (data_type, &metric.value) {
        (DataType::Unknown | DataType::PropertySet | DataType::PropertySetList, _) => {
            return Err(NormalizeError::UnsupportedDataType(code));
        }
        (DataType::DataSet | DataType::Template | DataType::File, _) => return Ok(None),
        (DataType::Boolean, Some(MetricValue::Boolean(value))) => PointValueData::Bool(*value),
        (DataType::Int8, Some(MetricValue::Int(value))) => {
            PointValueData::I64(i64::from(*value as i8))
        }
        (DataType::Int16, Some(MetricValue::Int(value))) => {
            PointValueData::I64(i64::from(*value as i16))
        }
        (DataType::Int32, Some(MetricValue::Int(value))) => {
            PointValueData::I64(i64::from(*value as i32))
        }
        (DataType::UInt8, Some(MetricValue::Int(value))) => {
            PointValueData::I64(i64::from(*value as u8))
        }
        (DataType::UInt16, Some(MetricValue::Int(value))) => {
            PointValueData::I64(i64::from(*value as u16))
        }
        (DataType::UInt32 | DataType::UInt64, Some(MetricValue::Int(value))) => {
            PointValueData::I64(i64::from(*value))
        }
        (DataType::UInt32 | DataType::UInt64, Some(MetricValue::Long(value))) => unsigned(*value),
        (DataType::Int64 | DataType::DateTime, Some(MetricValue::Long(value))) => {
            PointValueData::I64(*value as i64)
        }
        (DataType::Float, Some(MetricValue::Float(value))) => {
            PointValueData::F64(widen_f32(*value))
        }
        (DataType::Double, Some(MetricValue::Double(value))) => PointValueData::F64(*value),
        (
            DataType::String | DataType::Text | DataType::Uuid,
            Some(MetricValue::String(value)),
        ) => PointValueData::String(value.clone()),
        (data_type, Some(MetricValue::Bytes(bytes)))
            if data_type == DataType::Bytes || data_type.is_array() =>
        {
            PointValueData::Json(decode_array(data_type, bytes)?.to_string())
        }
        _ => return Err(NormalizeError::ValueMismatch(code)),
    };
    Ok(Some(value))
}

fn unsigned(value: u64) -> PointValueData {
    match i64::try_from(value) {
        Ok(value) => PointValueData::I64(value),
        Err(_) => PointValueData::String(value.to_string()),
    }
}

/// 由点位值构造带 name / timestamp / datatype 的指标，[`metric_to_point_value`] 的逆过程。
pub fn create_metric(
    name: impl Into<String>,
    timestamp: u64,
    value: &PointValueData,
    data_type: DataType,
) -> Result<Metric, NormalizeError> {
    let code = data_type.code();
    let mismatch = || NormalizeError::ValueMismatch(code);

    let metric_value = match (data_type, value) {
        (
            DataType::Unknown
            | DataType::DataSet
            | DataType::Template
            | DataType::File
            | DataType::PropertySet
            | DataType::PropertySetList,
            _,
        ) => return Err(NormalizeError::UnsupportedDataType(code)),
        (DataType::Boolean, PointValueData::Bool(value)) => MetricValue::Boolean(*value),
        (DataType::Int8, PointValueData::I64(value)) => {
            MetricValue::Int(i8::try_from(*value).map_err(|_| mismatch())? as u32)
        }
        (DataType::Int16, PointValueData::I64(value)) => {
            MetricValue::Int(i16::try_from(*value).map_err(|_| mismatch())? as u32)
        }
        (DataType::Int32, PointValueData::I64(value)) => {
            MetricValue::Int(i32::try_from(*value).map_err(|_| mismatch())? as u32)
        }
        (DataType::UInt8, PointValueData::I64(value)) => {
            MetricValue::Int(u32::from(u8::try_from(*value).map_err(|_| mismatch())?))
        }
        (DataType::UInt16, PointValueData::I64(value)) => {
            MetricValue::Int(u32::from(u16::try_from(*value).map_err(|_| mismatch())?))
        }
        (DataType::UInt32, PointValueData::I64(value)) => {
            MetricValue::Int(u32::try_from(*value).map_err(|_| mismatch())?)
        }
        (DataType::UInt64, PointValueData::I64(value)) => {
            MetricValue::Long(u64::try_from(*value).map_err(|_| mismatch())?)
        }
        (DataType::UInt64, PointValueData::String(value)) => {
            MetricValue::Long(value.parse::<u64>().map_err(|_| mismatch())?)
        }
        (DataType::Int64 | DataType::DateTime, PointValueData::I64(value)) => {
            MetricValue::Long(*value as u64)
        }
        (DataType::Float, PointValueData::F64(value)) => MetricValue::Float(*value as f32),
        (DataType::Float, PointValueData::I64(value)) => MetricValue::Float(*value as f32),
        (DataType::Double, PointValueData::F64(value)) => MetricValue::Double(*value),
        (DataType::Double, PointValueData::I64(value)) => MetricValue::Double(*value as f64),
        (
            DataType::String | DataType::Text | DataType::Uuid,
            PointValueData::String(value),
        ) => MetricValue::String(value.clone()),
        (data_type, PointValueData::Json(text))
            if data_type == DataType::Bytes || data_type.is_array() =>
        {
            let parsed: serde_json::Value = serde_json::from_str(text)?;
            MetricValue::Bytes(encode_array(data_type, &parsed)?)
        }
        _ => return Err(mismatch()),
    };

    Ok(Metric::new(name)
        .with_timestamp(timestamp)
        .with_value(data_type, metric_value))
}
