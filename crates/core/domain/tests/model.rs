use domain::{
    DataSet, DataSetValueKind, DataType, MessageType, Metric, MetricValue, Payload, RawEvent,
    Template, TopicError,
};

#[test]
fn payload_builds() {
    let payload = Payload::new()
        .with_timestamp(1000)
        .with_seq(0)
        .with_metric(
            Metric::new("temp")
                .with_alias(1)
                .with_value(DataType::Float, MetricValue::Float(21.5)),
        );

    assert_eq!(payload.timestamp, Some(1000));
    assert_eq!(payload.seq, Some(0));
    assert_eq!(payload.metrics.len(), 1);
    assert!(payload.uuid.is_none());
    assert!(payload.unknown_fields.is_empty());
}

#[test]
fn template_nests_metrics() {
    let inner = Template::instance_of("Motor").with_metric(
        Metric::new("rpm").with_value(DataType::UInt32, MetricValue::Int(1500)),
    );
    let outer = Metric::new("line/motor1").with_value(DataType::Template, MetricValue::Template(inner));

    match outer.value {
        Some(MetricValue::Template(template)) => {
            assert_eq!(template.template_ref.as_deref(), Some("Motor"));
            assert_eq!(template.metrics.len(), 1);
        }
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn payload_serializes_to_json() {
    let dataset = DataSet::new(vec!["a".into()], vec![DataType::Int32.code()])
        .with_row(vec![DataSetValueKind::Int(1).into()]);
    let payload = Payload::new().with_metric(
        Metric::new("table").with_value(DataType::DataSet, MetricValue::DataSet(dataset)),
    );

    let value = serde_json::to_value(&payload).expect("serialize");
    let metric = &value["metrics"][0];
    assert_eq!(metric["name"], "table");
    assert_eq!(metric["datatype"], 16);
    assert_eq!(metric["value"]["DataSet"]["columns"][0], "a");
    assert!(value["unknown_fields"].as_array().expect("array").is_empty());
}

#[test]
fn message_type_parses_topic_segment() {
    let parsed: MessageType = "DBIRTH".parse().expect("parse");
    assert_eq!(parsed, MessageType::DBirth);
    assert!(parsed.is_birth());
    assert!(!MessageType::NData.is_birth());
    assert!("BOGUS".parse::<MessageType>().is_err());
}

#[test]
fn raw_event_from_device_topic() {
    let event = RawEvent::from_topic("spBv1.0/plant/DDATA/edge1/pump", vec![0x18, 0x00], 42)
        .expect("topic");
    assert_eq!(event.group_id, "plant");
    assert_eq!(event.edge_node_id, "edge1");
    assert_eq!(event.device_id.as_deref(), Some("pump"));
    assert_eq!(event.message_type, MessageType::DData);
    assert_eq!(event.received_at_ms, 42);
    assert_eq!(event.topic(), "spBv1.0/plant/DDATA/edge1/pump");
}

#[test]
fn raw_event_rejects_bad_topics() {
    assert!(matches!(
        RawEvent::from_topic("spAv1.0/plant/NDATA/edge1", Vec::new(), 0),
        Err(TopicError::Namespace(_))
    ));
    assert!(matches!(
        RawEvent::from_topic("spBv1.0/plant/NDATA", Vec::new(), 0),
        Err(TopicError::Malformed(_))
    ));
    assert!(matches!(
        RawEvent::from_topic("spBv1.0/plant/NOPE/edge1", Vec::new(), 0),
        Err(TopicError::MessageType(_))
    ));

    let node = RawEvent::from_topic("spBv1.0/plant/NDEATH/edge1", Vec::new(), 0).expect("topic");
    assert!(node.device_id.is_none());
    assert!(node.message_type.is_death());
}
