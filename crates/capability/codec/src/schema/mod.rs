//! 各 Sparkplug B 消息的字段编号与 [`Message`](crate::Message) 实现。
//!
//! oneof 字段解码时后到者覆盖先到者（不论线上类型）；同一子消息变体重复出现时合并。

mod dataset;
mod metric;
mod payload;
mod property;
mod template;
