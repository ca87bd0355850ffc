use std::fmt;

/// One cell of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

/// A bounded batch of records, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Zero-based position of this chunk in the source.
    pub index: usize,
    /// 1-based data row number of `rows[0]`.
    pub first_row: u64,
    /// Header names, one per field.
    pub columns: Vec<String>,
    /// Each record, always `columns.len()` wide.
    pub rows: Vec<Vec<Value>>,
}

impl Chunk {
    pub fn new(index: usize, first_row: u64, columns: Vec<String>) -> Self {
        Self {
            index,
            first_row,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
