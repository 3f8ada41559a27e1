use domain::{DataType, Metric, MetricValue, Payload, Template};
use spb_codec::{Codec, CodecOptions, DecodeError, decode, encode};

fn is_truncated(result: &Result<Payload, DecodeError>) -> bool {
    matches!(result, Err(DecodeError::TruncatedMessage { .. }))
}

#[test]
fn every_prefix_of_a_metric_is_truncated() {
    let payload = Payload::new().with_metric(
        Metric::new("temp")
            .with_alias(1)
            .with_value(DataType::Float, MetricValue::Float(21.5)),
    );
    let bytes = encode(&payload);
    assert_eq!(bytes.len(), 17);

    for len in 1..bytes.len() {
        let result = decode(&bytes[..len]);
        assert!(is_truncated(&result), "prefix {len}: {result:?}");
    }
    assert_eq!(decode(&bytes).unwrap(), payload);
}

#[test]
fn cut_body_is_truncated() {
    let bytes = encode(&Payload::new().with_body(vec![1, 2, 3, 4, 5, 6, 7, 8]));
    assert_eq!(bytes.len(), 10);

    for cut in 1..=9 {
        let result = decode(&bytes[..bytes.len() - cut]);
        assert!(is_truncated(&result), "cut {cut}: {result:?}");
    }
}

#[test]
fn truncated_error_reports_field() {
    // body 声明 8 字节，只给 2 字节
    let result = decode(&[0x2A, 0x08, 0x01, 0x02]);
    assert_eq!(
        result,
        Err(DecodeError::TruncatedMessage {
            offset: 4,
            field: Some(5)
        })
    );
}

#[test]
fn bytes_after_end_tag_are_rejected() {
    let payload = decode(&[0x08, 0x01, 0x00]).unwrap();
    assert_eq!(payload.timestamp, Some(1));

    let result = decode(&[0x08, 0x01, 0x00, 0x08, 0x02]);
    assert_eq!(
        result,
        Err(DecodeError::TruncatedMessage {
            offset: 3,
            field: None
        })
    );
}

#[test]
fn known_field_with_wrong_wire_type() {
    // timestamp 以 FIXED32 出现
    let result = decode(&[0x0D, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(
        result,
        Err(DecodeError::InvalidWireType {
            offset: 0,
            field: 1,
            wire_type: 5
        })
    );
}

#[test]
fn group_wire_types_are_rejected() {
    for (tag, field, wire_type) in [(0x0B, 1, 3), (0x34, 6, 4), (0x3E, 7, 6), (0x0F, 1, 7)] {
        let result = decode(&[tag, 0x00]);
        assert_eq!(
            result,
            Err(DecodeError::InvalidWireType {
                offset: 0,
                field,
                wire_type
            })
        );
    }
}

#[test]
fn field_number_zero_is_invalid() {
    assert_eq!(
        decode(&[0x02, 0x00]),
        Err(DecodeError::InvalidTag { offset: 0, tag: 2 })
    );
}

#[test]
fn invalid_utf8_in_uuid() {
    let result = decode(&[0x22, 0x02, 0xC3, 0x28]);
    assert_eq!(
        result,
        Err(DecodeError::InvalidUtf8 {
            offset: 2,
            field: 4
        })
    );
}

#[test]
fn overlong_varint_is_malformed() {
    let mut bytes = vec![0x08];
    bytes.extend_from_slice(&[0xFF; 10]);
    bytes.push(0x01);
    assert_eq!(
        decode(&bytes),
        Err(DecodeError::MalformedVarint { offset: 1 })
    );
}

fn nested_metric(templates: usize) -> Metric {
    if templates == 0 {
        return Metric::new("leaf").with_value(DataType::UInt32, MetricValue::Int(1));
    }
    let template = Template::instance_of("T").with_metric(nested_metric(templates - 1));
    Metric::new("node").with_value(DataType::Template, MetricValue::Template(template))
}

#[test]
fn recursion_limit_counts_nested_messages() {
    // Payload > Metric > Template > Metric > Template > Metric：5 层
    let payload = Payload::new().with_metric(nested_metric(2));
    let bytes = encode(&payload);

    let codec = |limit| {
        Codec::new(CodecOptions {
            recursion_limit: limit,
            ..CodecOptions::default()
        })
    };
    assert_eq!(codec(5).decode::<Payload>(&bytes).unwrap(), payload);
    assert!(matches!(
        codec(4).decode::<Payload>(&bytes),
        Err(DecodeError::RecursionLimitExceeded { limit: 4, .. })
    ));
}

#[test]
fn default_limit_rejects_deep_templates() {
    let shallow = encode(&Payload::new().with_metric(nested_metric(49)));
    assert!(decode(&shallow).is_ok());

    let deep = encode(&Payload::new().with_metric(nested_metric(60)));
    assert!(matches!(
        decode(&deep),
        Err(DecodeError::RecursionLimitExceeded { limit: 100, .. })
    ));
}

#[test]
fn oversized_input_is_rejected_before_parsing() {
    let codec = Codec::new(CodecOptions {
        max_payload_bytes: Some(4),
        ..CodecOptions::default()
    });
    let result = codec.decode::<Payload>(&[0xFF; 5]);
    assert_eq!(result, Err(DecodeError::PayloadTooLarge { size: 5, limit: 4 }));
    assert!(codec.decode::<Payload>(&[0x18, 0x00]).is_ok());
}

#[test]
fn error_accessors() {
    let err = DecodeError::InvalidUtf8 {
        offset: 9,
        field: 1,
    };
    assert_eq!(err.offset(), 9);
    assert_eq!(err.field(), Some(1));
    assert!(err.to_string().contains("field 1"));
}
