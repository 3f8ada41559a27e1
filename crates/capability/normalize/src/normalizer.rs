use crate::alias::{AliasScope, AliasTable};
use crate::{NormalizeError, metric_to_point_value};
use domain::{MessageType, Metric, MetricValue, Payload, PointValue, RawEvent};
use spb_codec::Codec;
use tracing::{debug, warn};

/// RawEvent -> PointValue 的 Sparkplug B 规范化实现。
///
/// 内部维护按边缘节点/设备划分的 alias 表，因此同一会话的报文需按到达顺序交给同一个实例。
#[derive(Debug, Default)]
pub struct SparkplugNormalizer {
    codec: Codec,
    validate_shapes: bool,
    aliases: AliasTable,
}

impl SparkplugNormalizer {
    pub fn new(codec: Codec, validate_shapes: bool) -> Self {
        Self {
            codec,
            validate_shapes,
            aliases: AliasTable::new(),
        }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// 解码报文并转换其中的指标。
    ///
    /// 报文本身无法解码时返回错误；单个指标无法转换时记录日志并跳过。
    pub fn normalize(&mut self, event: &RawEvent) -> Result<Vec<PointValue>, NormalizeError> {
        if event.message_type == MessageType::State {
            // STATE 报文是 JSON，不走 protobuf
            debug!(target: "spb.normalize", topic = %event.topic(), "state message skipped");
            return Ok(Vec::new());
        }

        let payload: Payload = self.codec.decode(&event.payload)?;
        let scope = AliasScope::of(event);
        if event.message_type.is_birth() {
            let learned = self.aliases.learn(scope.clone(), &payload);
            debug!(target: "spb.normalize", topic = %event.topic(), aliases = learned, "birth aliases learned");
        }

        let mut points = Vec::with_capacity(payload.metrics.len());
        for metric in &payload.metrics {
            match self.point_for(event, &scope, &payload, metric) {
                Some(point) => {
                    spb_telemetry::record_metric_normalized();
                    points.push(point);
                }
                None => spb_telemetry::record_metric_skipped(),
            }
        }

        if event.message_type.is_death() {
            self.aliases.forget(&scope);
        }
        Ok(points)
    }

    fn point_for(
        &self,
        event: &RawEvent,
        scope: &AliasScope,
        payload: &Payload,
        metric: &Metric,
    ) -> Option<PointValue> {
        let Some(key) = self.key_for(scope, metric) else {
            warn!(
                target: "spb.normalize",
                topic = %event.topic(),
                alias = ?metric.alias,
                "metric without resolvable name skipped"
            );
            return None;
        };

        if self.validate_shapes {
            if let Err(err) = check_shapes(metric) {
                warn!(target: "spb.normalize", key = %key, "metric shape rejected: {}", err);
                return None;
            }
        }

        let value = match metric_to_point_value(metric) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(target: "spb.normalize", key = %key, "metric has no scalar value");
                return None;
            }
            Err(err) => {
                warn!(target: "spb.normalize", key = %key, "metric value skipped: {}", err);
                return None;
            }
        };

        let ts_ms = metric
            .timestamp
            .or(payload.timestamp)
            .and_then(|ts| i64::try_from(ts).ok())
            .unwrap_or(event.received_at_ms);

        Some(PointValue {
            group_id: event.group_id.clone(),
            edge_node_id: event.edge_node_id.clone(),
            device_id: event.device_id.clone(),
            key,
            ts_ms,
            value,
        })
    }

    fn key_for(&self, scope: &AliasScope, metric: &Metric) -> Option<String> {
        if let Some(name) = &metric.name {
            return Some(name.clone());
        }
        let alias = metric.alias?;
        self.aliases.resolve(scope, alias).map(str::to_string)
    }
}

fn check_shapes(metric: &Metric) -> Result<(), NormalizeError> {
    if let Some(properties) = &metric.properties {
        properties.validate()?;
    }
    if let Some(MetricValue::DataSet(dataset)) = &metric.value {
        dataset.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{DataSet, DataType, PointValueData, PropertySet, PropertyValue};

    fn event(message_type: MessageType, device: Option<&str>, payload: &Payload) -> RawEvent {
        RawEvent {
            group_id: "plant".into(),
            edge_node_id: "edge1".into(),
            device_id: device.map(str::to_string),
            message_type,
            payload: spb_codec::encode(payload).to_vec(),
            received_at_ms: 5_000,
        }
    }

    #[test]
    fn data_metrics_resolve_through_birth_aliases() {
        let mut normalizer = SparkplugNormalizer::default();
        let birth = Payload::new().with_timestamp(1_000).with_metric(
            Metric::new("temp")
                .with_alias(7)
                .with_value(DataType::Float, MetricValue::Float(20.0)),
        );
        let points = normalizer
            .normalize(&event(MessageType::DBirth, Some("pump"), &birth))
            .unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].ts_ms, 1_000);

        let data = Payload::new().with_metric(
            Metric::aliased(7)
                .with_timestamp(2_000)
                .with_value(DataType::Float, MetricValue::Float(21.5)),
        );
        let points = normalizer
            .normalize(&event(MessageType::DData, Some("pump"), &data))
            .unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].key, "temp");
        assert_eq!(points[0].device_id.as_deref(), Some("pump"));
        assert_eq!(points[0].ts_ms, 2_000);
        assert_eq!(points[0].value, PointValueData::F64(21.5));
    }

    #[test]
    fn unknown_alias_is_skipped() {
        let mut normalizer = SparkplugNormalizer::default();
        let data = Payload::new()
            .with_metric(Metric::aliased(3).with_value(DataType::Int32, MetricValue::Int(1)))
            .with_metric(Metric::new("ok").with_value(DataType::Int32, MetricValue::Int(2)));
        let points = normalizer
            .normalize(&event(MessageType::NData, None, &data))
            .unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].key, "ok");
        assert_eq!(points[0].ts_ms, 5_000);
    }

    #[test]
    fn node_death_forgets_aliases() {
        let mut normalizer = SparkplugNormalizer::default();
        let birth = Payload::new().with_metric(
            Metric::new("rpm")
                .with_alias(1)
                .with_value(DataType::UInt32, MetricValue::Int(0)),
        );
        normalizer
            .normalize(&event(MessageType::NBirth, None, &birth))
            .unwrap();
        assert_eq!(normalizer.aliases().len(), 1);

        normalizer
            .normalize(&event(MessageType::NDeath, None, &Payload::new()))
            .unwrap();
        assert!(normalizer.aliases().is_empty());
    }

    #[test]
    fn undecodable_payload_is_an_error() {
        let mut normalizer = SparkplugNormalizer::default();
        let mut raw = event(MessageType::NData, None, &Payload::new());
        raw.payload = vec![0x12, 0x05];
        assert!(matches!(
            normalizer.normalize(&raw),
            Err(NormalizeError::Decode(_))
        ));
    }

    #[test]
    fn shape_validation_rejects_ragged_metrics() {
        let ragged = PropertySet {
            keys: vec!["a".into(), "b".into()],
            values: vec![PropertyValue::null(3)],
            ..PropertySet::default()
        };
        let payload = Payload::new().with_metric(
            Metric::new("m")
                .with_value(DataType::Int32, MetricValue::Int(1))
                .with_properties(ragged),
        );

        let mut lenient = SparkplugNormalizer::new(Codec::default(), false);
        assert_eq!(
            lenient
                .normalize(&event(MessageType::NData, None, &payload))
                .unwrap()
                .len(),
            1
        );

        let mut strict = SparkplugNormalizer::new(Codec::default(), true);
        assert!(
            strict
                .normalize(&event(MessageType::NData, None, &payload))
                .unwrap()
                .is_empty()
        );
        assert!(check_shapes(&Metric::new("d").with_value(
            DataType::DataSet,
            MetricValue::DataSet(DataSet::new(vec!["a".into()], vec![])),
        ))
        .is_err());
    }

    #[test]
    fn state_messages_are_ignored() {
        let mut normalizer = SparkplugNormalizer::default();
        let mut raw = event(MessageType::State, None, &Payload::new());
        raw.payload = br#"{"online":true}"#.to_vec();
        assert!(normalizer.normalize(&raw).unwrap().is_empty());
    }
}
