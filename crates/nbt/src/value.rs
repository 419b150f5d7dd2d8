use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("expected {expected} tag, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing field: {0}")]
    MissingField(String),
}

type Result<T> = std::result::Result<T, TagError>;

/// One node of a decoded tag tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(HashMap<String, Tag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    /// Tag kind name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "byte",
            Tag::Short(_) => "short",
            Tag::Int(_) => "int",
            Tag::Long(_) => "long",
            Tag::Float(_) => "float",
            Tag::Double(_) => "double",
            Tag::ByteArray(_) => "byte array",
            Tag::String(_) => "string",
            Tag::List(_) => "list",
            Tag::Compound(_) => "compound",
            Tag::IntArray(_) => "int array",
            Tag::LongArray(_) => "long array",
        }
    }

    pub fn compound(&self) -> Result<&HashMap<String, Tag>> {
        match self {
            Tag::Compound(map) => Ok(map),
            other => Err(TagError::TypeMismatch {
                expected: "compound",
                found: other.kind(),
            }),
        }
    }

    pub fn list(&self) -> Result<&[Tag]> {
        match self {
            Tag::List(items) => Ok(items),
            other => Err(TagError::TypeMismatch {
                expected: "list",
                found: other.kind(),
            }),
        }
    }

    pub fn string(&self) -> Result<&str> {
        match self {
            Tag::String(s) => Ok(s),
            other => Err(TagError::TypeMismatch {
                expected: "string",
                found: other.kind(),
            }),
        }
    }

    /// Integer value of any integral tag
    pub fn int(&self) -> Result<i32> {
        match self {
            Tag::Byte(v) => Ok(i32::from(*v)),
            Tag::Short(v) => Ok(i32::from(*v)),
            Tag::Int(v) => Ok(*v),
            other => Err(TagError::TypeMismatch {
                expected: "int",
                found: other.kind(),
            }),
        }
    }

    /// Numeric value of any numeric tag, widened to f64
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Tag::Byte(v) => Ok(f64::from(*v)),
            Tag::Short(v) => Ok(f64::from(*v)),
            Tag::Int(v) => Ok(f64::from(*v)),
            Tag::Long(v) => Ok(*v as f64),
            Tag::Float(v) => Ok(f64::from(*v)),
            Tag::Double(v) => Ok(*v),
            other => Err(TagError::TypeMismatch {
                expected: "numeric",
                found: other.kind(),
            }),
        }
    }

    /// Look up a field of a compound tag, failing if absent
    pub fn child(&self, name: &str) -> Result<&Tag> {
        self.compound()?
            .get(name)
            .ok_or_else(|| TagError::MissingField(name.to_string()))
    }

    /// Look up a field of a compound tag, `None` if absent or not a compound
    pub fn get(&self, name: &str) -> Option<&Tag> {
        match self {
            Tag::Compound(map) => map.get(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_compound() -> Tag {
        let mut map = HashMap::new();
        map.insert("count".to_string(), Tag::Int(7));
        map.insert("name".to_string(), Tag::String("stone".to_string()));
        Tag::Compound(map)
    }

    #[test]
    fn test_child_lookup() {
        let tag = sample_compound();
        assert_eq!(tag.child("count").unwrap().int().unwrap(), 7);
        assert_eq!(tag.child("name").unwrap().string().unwrap(), "stone");
    }

    #[test]
    fn test_missing_field() {
        let tag = sample_compound();
        assert_eq!(
            tag.child("absent").unwrap_err(),
            TagError::MissingField("absent".to_string())
        );
    }

    #[test]
    fn test_type_mismatch() {
        let tag = Tag::String("not a list".to_string());
        assert_eq!(
            tag.list().unwrap_err(),
            TagError::TypeMismatch {
                expected: "list",
                found: "string"
            }
        );
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(Tag::Byte(3).int().unwrap(), 3);
        assert_eq!(Tag::Short(-2).int().unwrap(), -2);
        assert!(Tag::Long(1).int().is_err());
    }

    #[test]
    fn test_numeric_widening() {
        assert_eq!(Tag::Long(5).as_f64().unwrap(), 5.0);
        assert_eq!(Tag::Double(2.5).as_f64().unwrap(), 2.5);
        assert!(Tag::String("5".to_string()).as_f64().is_err());
    }
}
