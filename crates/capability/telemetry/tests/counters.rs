use spb_telemetry::{
    metrics, record_decode_failure, record_decoded, record_encoded, record_unknown_fields,
};

// 全局计数器被同进程内其他测试共享，只断言增量下界。
#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();

    record_encoded(10);
    record_decoded(12);
    record_decode_failure();
    record_unknown_fields(3);

    let after = metrics().snapshot();
    assert!(after.payloads_encoded >= before.payloads_encoded + 1);
    assert!(after.bytes_encoded >= before.bytes_encoded + 10);
    assert!(after.payloads_decoded >= before.payloads_decoded + 1);
    assert!(after.bytes_decoded >= before.bytes_decoded + 12);
    assert!(after.decode_failures >= before.decode_failures + 1);
    assert!(after.unknown_fields >= before.unknown_fields + 3);
}

#[test]
fn init_tracing_is_idempotent() {
    spb_telemetry::init_tracing();
    spb_telemetry::init_tracing();
}
