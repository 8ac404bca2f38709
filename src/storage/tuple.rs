//! Tuple and Value types for the storage manager
//!
//! Rows are encoded as fixed-width concatenations driven by the table
//! schema: INT columns take 4 bytes little-endian, TEXT columns exactly 10
//! bytes (space-padded, truncated when longer).

use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

use crate::catalog::{Column, DataType};
use crate::catalog::types::TEXT_WIDTH;
use crate::error::{Error, Result};

/// A single column value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// 32-bit integer value
    Integer(i32),
    /// Text value
    Text(String),
}

impl Value {
    /// The data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Text(_) => DataType::Text,
        }
    }

    /// Parse a raw string (e.g. a CSV field) as a value of the given type
    pub fn parse(raw: &str, ty: DataType) -> Result<Self> {
        match ty {
            DataType::Integer => raw
                .trim()
                .parse::<i32>()
                .map(Value::Integer)
                .map_err(|_| Error::InvalidValue {
                    value: raw.to_string(),
                    ty: ty.to_string(),
                }),
            DataType::Text => Ok(Value::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// An in-memory row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    values: Vec<Value>,
}

impl Tuple {
    /// Create a tuple from values
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// The values of this tuple
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Encode the tuple against a schema
    pub fn encode(&self, columns: &[Column]) -> Result<Vec<u8>> {
        if self.values.len() != columns.len() {
            return Err(Error::ArityMismatch {
                expected: columns.len(),
                got: self.values.len(),
            });
        }

        let mut bytes = Vec::with_capacity(columns.iter().map(|c| c.data_type.size()).sum());
        for (value, column) in self.values.iter().zip(columns) {
            match (value, column.data_type) {
                (Value::Integer(v), DataType::Integer) => {
                    let mut buf = [0u8; 4];
                    LittleEndian::write_i32(&mut buf, *v);
                    bytes.extend_from_slice(&buf);
                }
                (Value::Text(v), DataType::Text) => {
                    let mut field = v.as_bytes().to_vec();
                    field.resize(TEXT_WIDTH, b' ');
                    bytes.extend_from_slice(&field[..TEXT_WIDTH]);
                }
                (value, ty) => {
                    return Err(Error::InvalidValue {
                        value: value.to_string(),
                        ty: ty.to_string(),
                    });
                }
            }
        }
        Ok(bytes)
    }

    /// Decode a tuple from page bytes against a schema
    pub fn decode(bytes: &[u8], columns: &[Column]) -> Result<Self> {
        let need: usize = columns.iter().map(|c| c.data_type.size()).sum();
        if bytes.len() < need {
            return Err(Error::TupleTooShort {
                need,
                have: bytes.len(),
            });
        }

        let mut values = Vec::with_capacity(columns.len());
        let mut pos = 0;
        for column in columns {
            let size = column.data_type.size();
            let field = &bytes[pos..pos + size];
            let value = match column.data_type {
                DataType::Integer => Value::Integer(LittleEndian::read_i32(field)),
                DataType::Text => {
                    let text = String::from_utf8_lossy(field).trim_end().to_string();
                    Value::Text(text)
                }
            };
            values.push(value);
            pos += size;
        }
        Ok(Self { values })
    }
}
