use crate::parser::{KeyWord, TypeName};
use std::fmt;

/// Operand text as it appears in an instruction: a variable name, a
/// temporary, a literal lexeme or an element reference such as `a[t1]`.
pub type Place = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Byte,
    Short,
    Long,
    Char,
    Float,
    Double,
    Boolean,
    Str,
    Null,
    Class(String),
    Array(Box<Type>),
}

impl Type {
    pub fn from_type_name(ty: &TypeName) -> Type {
        match ty {
            TypeName::Primitive(keyword) => match keyword {
                KeyWord::Int => Type::Int,
                KeyWord::Byte => Type::Byte,
                KeyWord::Short => Type::Short,
                KeyWord::Long => Type::Long,
                KeyWord::Char => Type::Char,
                KeyWord::Float => Type::Float,
                KeyWord::Double => Type::Double,
                KeyWord::Boolean => Type::Boolean,
                other => Type::Class(format!("{:?}", other).to_lowercase()),
            },
            // reads from a scanner are modelled as integers
            TypeName::Class(name) if name.last() == "Scanner" => Type::Int,
            TypeName::Class(name) if name.last() == "String" => Type::Str,
            TypeName::Class(name) => Type::Class(name.to_string()),
            TypeName::Array(elem) => Type::Array(Box::new(Type::from_type_name(elem))),
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int)
    }

    /// Integers and booleans, the two types a branch can test.
    pub fn is_truth_value(&self) -> bool {
        matches!(self, Type::Int | Type::Boolean)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Str | Type::Class(_) | Type::Array(_) | Type::Null)
    }

    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) => Some(elem),
            _ => None,
        }
    }

    fn numeric_rank(&self) -> Option<u8> {
        match self {
            Type::Byte => Some(1),
            Type::Short | Type::Char => Some(2),
            Type::Int => Some(3),
            Type::Long => Some(4),
            Type::Float => Some(5),
            Type::Double => Some(6),
            _ => None,
        }
    }

    /// Whether a place of this type can be assigned a value of type `other`.
    pub fn accepts(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }

        match (self, other) {
            // integer literals fit every numeric place
            (_, Type::Int) if self.numeric_rank().is_some() => true,
            (Type::Boolean, Type::Int) => true,
            (Type::Class(_), Type::Class(_) | Type::Str | Type::Array(_)) => true,
            (_, Type::Null) => self.is_reference(),
            _ => match (self.numeric_rank(), other.numeric_rank()) {
                (Some(to), Some(from)) => from <= to,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Byte => write!(f, "byte"),
            Type::Short => write!(f, "short"),
            Type::Long => write!(f, "long"),
            Type::Char => write!(f, "char"),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::Boolean => write!(f, "boolean"),
            Type::Str => write!(f, "String"),
            Type::Null => write!(f, "null"),
            Type::Class(name) => write!(f, "{}", name),
            Type::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}

/// The record synthesized for every evaluated expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar { place: Place, ty: Type },
    /// A freshly created one-dimensional array, not yet bound to a name.
    Array { size: Place, elem: Type },
    /// `base[index]`, still addressable.
    ArrayAccess { base: Place, index: Place, ty: Type },
    /// A value read from the scanner.
    Input,
    /// Parsed but not lowered, such as a method call or a field access.
    Opaque { what: String },
    TypeError,
}

impl Value {
    pub fn scalar(place: impl Into<Place>, ty: Type) -> Self {
        Value::Scalar { place: place.into(), ty }
    }

    pub fn opaque(what: impl Into<String>) -> Self {
        Value::Opaque { what: what.into() }
    }

    pub fn is_poisoned(&self) -> bool {
        matches!(self, Value::TypeError)
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Value::Opaque { .. })
    }

    pub fn ty(&self) -> Option<Type> {
        match self {
            Value::Scalar { ty, .. } | Value::ArrayAccess { ty, .. } => Some(ty.clone()),
            Value::Array { elem, .. } => Some(Type::Array(Box::new(elem.clone()))),
            Value::Input => Some(Type::Int),
            Value::Opaque { .. } | Value::TypeError => None,
        }
    }

    /// Text naming this value in diagnostics and as an assignment target.
    pub fn describe(&self) -> String {
        match self {
            Value::Scalar { place, .. } => place.clone(),
            Value::Array { size, elem } => format!("new {}[{}]", elem, size),
            Value::ArrayAccess { base, index, .. } => format!("{}[{}]", base, index),
            Value::Input => "input".to_string(),
            Value::Opaque { what } => what.clone(),
            Value::TypeError => "<error>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Name;
    use pretty_assertions::assert_eq;

    #[test]
    fn scanner_is_read_as_an_int() {
        let scanner = TypeName::Class(Name::simple("Scanner"));
        let matrix = TypeName::Primitive(KeyWord::Int).with_dims(2);

        assert_eq!(Type::from_type_name(&scanner), Type::Int);
        assert_eq!(Type::from_type_name(&matrix).to_string(), "int[][]");
    }

    #[test]
    fn assignment_compatibility() {
        assert!(Type::Long.accepts(&Type::Int));
        assert!(Type::Double.accepts(&Type::Char));
        assert!(Type::Boolean.accepts(&Type::Int));
        assert!(Type::Str.accepts(&Type::Null));
        assert!(!Type::Int.accepts(&Type::Double));
        assert!(!Type::Int.accepts(&Type::Boolean));
        assert!(!Type::Int.accepts(&Type::Null));
        assert!(!Type::Array(Box::new(Type::Int)).accepts(&Type::Int));
    }

    #[test]
    fn element_reference_is_described_with_its_index() {
        let value = Value::ArrayAccess {
            base: "a".to_string(),
            index: "t1".to_string(),
            ty: Type::Int,
        };

        assert_eq!(value.describe(), "a[t1]");
        assert_eq!(value.ty(), Some(Type::Int));
        assert_eq!(Value::opaque("this").ty(), None);
    }
}
