use super::{ShapeError, UnknownFields, ValueExtension};
use serde::Serialize;

/// 表格型指标值：`columns`、`types` 与每行 `elements` 按列并列。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataSet {
    pub num_of_columns: Option<u64>,
    pub columns: Vec<String>,
    pub types: Vec<u32>,
    pub rows: Vec<Row>,
    pub unknown_fields: UnknownFields,
}

impl DataSet {
    /// 按列名与列类型建表，`num_of_columns` 取列数。
    pub fn new(columns: Vec<String>, types: Vec<u32>) -> Self {
        Self {
            num_of_columns: Some(columns.len() as u64),
            columns,
            types,
            ..Self::default()
        }
    }

    pub fn with_row(mut self, elements: Vec<DataSetValue>) -> Self {
        self.rows.push(Row {
            elements,
            ..Row::default()
        });
        self
    }

    /// 校验列/类型/行宽一致。
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.columns.len() != self.types.len() {
            return Err(ShapeError::ColumnTypeMismatch {
                columns: self.columns.len(),
                types: self.types.len(),
            });
        }
        if let Some(declared) = self.num_of_columns {
            if declared != self.columns.len() as u64 {
                return Err(ShapeError::ColumnCountMismatch {
                    declared,
                    actual: self.columns.len(),
                });
            }
        }
        for (index, row) in self.rows.iter().enumerate() {
            if row.elements.len() != self.types.len() {
                return Err(ShapeError::RowWidthMismatch {
                    row: index,
                    elements: row.elements.len(),
                    expected: self.types.len(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    pub elements: Vec<DataSetValue>,
    pub unknown_fields: UnknownFields,
}

/// 单元格。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataSetValue {
    pub value: Option<DataSetValueKind>,
    pub unknown_fields: UnknownFields,
}

impl DataSetValue {
    pub fn new(value: DataSetValueKind) -> Self {
        Self {
            value: Some(value),
            unknown_fields: UnknownFields::new(),
        }
    }
}

impl From<DataSetValueKind> for DataSetValue {
    fn from(value: DataSetValueKind) -> Self {
        Self::new(value)
    }
}

/// `DataSetValue.value` oneof。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DataSetValueKind {
    Int(u32),
    Long(u64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Extension(ValueExtension),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: u32) -> DataSetValue {
        DataSetValueKind::Int(value).into()
    }

    #[test]
    fn well_formed_dataset_validates() {
        let dataset = DataSet::new(vec!["a".into(), "b".into()], vec![3, 3])
            .with_row(vec![int(1), int(2)]);
        assert_eq!(dataset.num_of_columns, Some(2));
        assert!(dataset.validate().is_ok());
    }

    #[test]
    fn short_row_is_reported() {
        let dataset =
            DataSet::new(vec!["a".into(), "b".into()], vec![3, 3]).with_row(vec![int(1)]);
        assert_eq!(
            dataset.validate(),
            Err(ShapeError::RowWidthMismatch {
                row: 0,
                elements: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn column_type_mismatch_is_reported() {
        let dataset = DataSet {
            columns: vec!["a".into()],
            types: vec![],
            ..DataSet::default()
        };
        assert_eq!(
            dataset.validate(),
            Err(ShapeError::ColumnTypeMismatch {
                columns: 1,
                types: 0
            })
        );
    }
}
