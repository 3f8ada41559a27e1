use serde::Serialize;

/// 无法识别的字段：原始 tag 与 tag 之后的原始字节。
///
/// length-delimited 字段的 `data` 包含长度前缀，重新编码时直接写回。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownField {
    pub tag: u32,
    pub data: Vec<u8>,
}

impl UnknownField {
    pub fn new(tag: u32, data: Vec<u8>) -> Self {
        Self { tag, data }
    }

    pub fn field_number(&self) -> u32 {
        self.tag >> 3
    }

    pub fn wire_type(&self) -> u8 {
        (self.tag & 0x7) as u8
    }
}

/// 单个消息实例上的未知字段列表（保持线上顺序）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnknownFields(Vec<UnknownField>);

impl UnknownFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: UnknownField) {
        self.0.push(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnknownField> {
        self.0.iter()
    }

    /// 位于扩展区间 `[start, 536_870_912)` 的字段。
    pub fn extensions(&self, start: u32) -> impl Iterator<Item = &UnknownField> {
        self.0
            .iter()
            .filter(move |field| field.field_number() >= start)
    }
}

impl<'a> IntoIterator for &'a UnknownFields {
    type Item = &'a UnknownField;
    type IntoIter = std::slice::Iter<'a, UnknownField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<UnknownField>> for UnknownFields {
    fn from(fields: Vec<UnknownField>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_parts() {
        let field = UnknownField::new((1000 << 3) | 2, vec![1, 0xAA]);
        assert_eq!(field.field_number(), 1000);
        assert_eq!(field.wire_type(), 2);
    }

    #[test]
    fn extensions_filter_by_range_start() {
        let fields = UnknownFields::from(vec![
            UnknownField::new(4 << 3, vec![1]),
            UnknownField::new(6 << 3, vec![2]),
            UnknownField::new(900 << 3, vec![3]),
        ]);
        let numbers: Vec<u32> = fields.extensions(6).map(|f| f.field_number()).collect();
        assert_eq!(numbers, vec![6, 900]);
        assert_eq!(fields.len(), 3);
    }
}
