use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Sparkplug B 消息类型（topic 中的 message_type 段）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    NBirth,
    NDeath,
    DBirth,
    DDeath,
    NData,
    DData,
    NCmd,
    DCmd,
    State,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NBirth => "NBIRTH",
            Self::NDeath => "NDEATH",
            Self::DBirth => "DBIRTH",
            Self::DDeath => "DDEATH",
            Self::NData => "NDATA",
            Self::DData => "DDATA",
            Self::NCmd => "NCMD",
            Self::DCmd => "DCMD",
            Self::State => "STATE",
        }
    }

    /// BIRTH 消息携带 name 与 alias 的完整映射。
    pub fn is_birth(&self) -> bool {
        matches!(self, Self::NBirth | Self::DBirth)
    }

    pub fn is_death(&self) -> bool {
        matches!(self, Self::NDeath | Self::DDeath)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "NBIRTH" => Ok(Self::NBirth),
            "NDEATH" => Ok(Self::NDeath),
            "DBIRTH" => Ok(Self::DBirth),
            "DDEATH" => Ok(Self::DDeath),
            "NDATA" => Ok(Self::NData),
            "DDATA" => Ok(Self::DData),
            "NCMD" => Ok(Self::NCmd),
            "DCMD" => Ok(Self::DCmd),
            "STATE" => Ok(Self::State),
            other => Err(format!("unknown sparkplug message type: {other}")),
        }
    }
}

/// 传输层交付的原始报文（未解码）。
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub group_id: String,
    pub edge_node_id: String,
    pub device_id: Option<String>,
    pub message_type: MessageType,
    pub payload: Vec<u8>,
    pub received_at_ms: i64,
}

/// Sparkplug B topic 命名空间前缀。
pub const TOPIC_NAMESPACE: &str = "spBv1.0";

/// topic 解析错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopicError {
    #[error("topic namespace must be {TOPIC_NAMESPACE}: {0}")]
    Namespace(String),
    #[error("malformed sparkplug topic: {0}")]
    Malformed(String),
    #[error("{0}")]
    MessageType(String),
}

impl RawEvent {
    /// 按 `spBv1.0/{group}/{type}/{edge}[/{device}]` 解析 topic 并构造事件。
    pub fn from_topic(
        topic: &str,
        payload: Vec<u8>,
        received_at_ms: i64,
    ) -> Result<Self, TopicError> {
        let parts: Vec<&str> = topic.split('/').collect();
        if parts.first() != Some(&TOPIC_NAMESPACE) {
            return Err(TopicError::Namespace(topic.to_string()));
        }
        let (group_id, message_type, edge_node_id, device_id) = match parts.as_slice() {
            [_, group, kind, edge] => (*group, *kind, *edge, None),
            [_, group, kind, edge, device] => (*group, *kind, *edge, Some(*device)),
            _ => return Err(TopicError::Malformed(topic.to_string())),
        };
        if group_id.is_empty() || edge_node_id.is_empty() || device_id == Some("") {
            return Err(TopicError::Malformed(topic.to_string()));
        }
        let message_type = message_type
            .parse::<MessageType>()
            .map_err(TopicError::MessageType)?;

        Ok(Self {
            group_id: group_id.to_string(),
            edge_node_id: edge_node_id.to_string(),
            device_id: device_id.map(str::to_string),
            message_type,
            payload,
            received_at_ms,
        })
    }

    /// `spBv1.0/{group}/{type}/{edge}[/{device}]`
    pub fn topic(&self) -> String {
        match &self.device_id {
            Some(device) => format!(
                "{TOPIC_NAMESPACE}/{}/{}/{}/{device}",
                self.group_id, self.message_type, self.edge_node_id
            ),
            None => format!(
                "{TOPIC_NAMESPACE}/{}/{}/{}",
                self.group_id, self.message_type, self.edge_node_id
            ),
        }
    }
}

/// 点位值的数据类型。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PointValueData {
    I64(i64),
    F64(f64),
    Bool(bool),
    String(String),
    /// 数组类指标，序列化后的 JSON 数组文本
    Json(String),
}

/// 规范化后的点位值。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointValue {
    pub group_id: String,
    pub edge_node_id: String,
    pub device_id: Option<String>,
    pub key: String,
    pub ts_ms: i64,
    pub value: PointValueData,
}
