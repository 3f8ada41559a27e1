//! 日志初始化与编解码计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 编解码指标快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub payloads_encoded: u64,
    pub bytes_encoded: u64,
    pub payloads_decoded: u64,
    pub bytes_decoded: u64,
    pub decode_failures: u64,
    pub unknown_fields: u64,
    pub metrics_normalized: u64,
    pub metrics_skipped: u64,
}

/// 编解码计数器。
pub struct TelemetryMetrics {
    payloads_encoded: AtomicU64,
    bytes_encoded: AtomicU64,
    payloads_decoded: AtomicU64,
    bytes_decoded: AtomicU64,
    decode_failures: AtomicU64,
    unknown_fields: AtomicU64,
    metrics_normalized: AtomicU64,
    metrics_skipped: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            payloads_encoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            payloads_decoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            unknown_fields: AtomicU64::new(0),
            metrics_normalized: AtomicU64::new(0),
            metrics_skipped: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            payloads_encoded: self.payloads_encoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            payloads_decoded: self.payloads_decoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            unknown_fields: self.unknown_fields.load(Ordering::Relaxed),
            metrics_normalized: self.metrics_normalized.load(Ordering::Relaxed),
            metrics_skipped: self.metrics_skipped.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 记录一次编码及输出字节数。
pub fn record_encoded(bytes: usize) {
    let metrics = metrics();
    metrics.payloads_encoded.fetch_add(1, Ordering::Relaxed);
    metrics
        .bytes_encoded
        .fetch_add(bytes as u64, Ordering::Relaxed);
}

/// 记录一次成功解码及输入字节数。
pub fn record_decoded(bytes: usize) {
    let metrics = metrics();
    metrics.payloads_decoded.fetch_add(1, Ordering::Relaxed);
    metrics
        .bytes_decoded
        .fetch_add(bytes as u64, Ordering::Relaxed);
}

/// 记录解码失败次数。
pub fn record_decode_failure() {
    metrics().decode_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录解码时保留的未知字段数。
pub fn record_unknown_fields(count: usize) {
    metrics()
        .unknown_fields
        .fetch_add(count as u64, Ordering::Relaxed);
}

/// 记录转换为点位值的指标数。
pub fn record_metric_normalized() {
    metrics().metrics_normalized.fetch_add(1, Ordering::Relaxed);
}

/// 记录被跳过的指标数（空值、无法解析 alias、复合类型）。
pub fn record_metric_skipped() {
    metrics().metrics_skipped.fetch_add(1, Ordering::Relaxed);
}
