//! Sparkplug B 报文解析工具：解码二进制 Payload，输出 JSON 与规范化点位值。
//!
//! 用法：`spb-dump [--topic <spBv1.0/...>] [FILE]`，未给出 FILE 时从 stdin 读取。

use domain::{Payload, RawEvent};
use spb_codec::{Codec, CodecOptions};
use spb_config::CodecConfig;
use spb_normalize::SparkplugNormalizer;
use spb_telemetry::{init_tracing, metrics};
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

struct Args {
    topic: Option<String>,
    path: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    // 从环境变量加载编解码配置
    let config = CodecConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let args = parse_args(std::env::args().skip(1))?;
    let bytes = read_input(args.path.as_deref())?;
    let codec = Codec::new(CodecOptions::from(&config));

    let payload: Payload = codec.decode(&bytes)?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    // 重新编码校验（packed 列类型会被改写为非 packed，此时字节不同但语义一致）
    let reencoded = codec.encode(&payload);
    if reencoded.as_ref() == bytes.as_slice() {
        info!(target: "spb.dump", bytes = bytes.len(), "re-encoded payload is byte-identical");
    } else {
        warn!(
            target: "spb.dump",
            input = bytes.len(),
            output = reencoded.len(),
            "re-encoded payload differs from input"
        );
    }

    if let Some(topic) = args.topic {
        let event = RawEvent::from_topic(&topic, bytes, now_ms())?;
        let mut normalizer = SparkplugNormalizer::new(codec, config.validate_shapes);
        let points = normalizer.normalize(&event)?;
        println!("{}", serde_json::to_string_pretty(&points)?);
    }

    let snapshot = metrics().snapshot();
    info!(
        target: "spb.dump",
        metrics = payload.metrics.len(),
        unknown_fields = snapshot.unknown_fields,
        normalized = snapshot.metrics_normalized,
        skipped = snapshot.metrics_skipped,
        "done"
    );
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args {
        topic: None,
        path: None,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--topic" | "-t" => {
                let topic = args.next().ok_or("--topic requires a value")?;
                parsed.topic = Some(topic);
            }
            "-" => parsed.path = None,
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            other => parsed.path = Some(other.to_string()),
        }
    }
    Ok(parsed)
}

fn read_input(path: Option<&str>) -> std::io::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Result<Args, String> {
        parse_args(values.iter().map(|value| value.to_string()))
    }

    #[test]
    fn parses_topic_and_path() {
        let parsed = args(&["--topic", "spBv1.0/g/NDATA/e", "payload.bin"]).unwrap();
        assert_eq!(parsed.topic.as_deref(), Some("spBv1.0/g/NDATA/e"));
        assert_eq!(parsed.path.as_deref(), Some("payload.bin"));
    }

    #[test]
    fn stdin_by_default() {
        let parsed = args(&[]).unwrap();
        assert!(parsed.topic.is_none());
        assert!(parsed.path.is_none());
    }

    #[test]
    fn rejects_unknown_options() {
        assert!(args(&["--hex"]).is_err());
        assert!(args(&["--topic"]).is_err());
    }
}
