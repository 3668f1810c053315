use std::fmt;
use std::rc::Rc;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ObjectType {
    #[strum(to_string = "INTEGER")]
    Integer,
    #[strum(to_string = "BOOLEAN")]
    Boolean,
    #[strum(to_string = "NULL")]
    Null,
    #[strum(to_string = "RETURN_VALUE")]
    ReturnValue,
    #[strum(to_string = "ERROR")]
    Error,
}

/// Runtime values. Booleans and null are only ever handed out as shared
/// handles to the evaluator's singletons, so they may be compared with
/// `Rc::ptr_eq`. Integers are allocated per result and compare by value.
#[derive(Debug, PartialEq)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    ReturnValue(Rc<Object>),
    Error(String),
}

impl Object {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
        }
    }
    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(x) => write!(f, "{}", x),
            Object::Boolean(x) => write!(f, "{}", x),
            Object::Null => write!(f, "null"),
            Object::ReturnValue(x) => write!(f, "{}", x),
            Object::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}

#[cfg(test)]
mod object_tests {
    use crate::object::{Object, ObjectType};
    use std::rc::Rc;

    #[test]
    fn inspect() {
        assert_eq!(Object::Integer(-7).to_string(), "-7");
        assert_eq!(Object::Boolean(false).to_string(), "false");
        assert_eq!(Object::Null.to_string(), "null");
        assert_eq!(
            Object::ReturnValue(Rc::new(Object::Integer(3))).to_string(),
            "3"
        );
        assert_eq!(
            Object::Error(String::from("division by zero")).to_string(),
            "ERROR: division by zero"
        );
    }

    #[test]
    fn type_names() {
        assert_eq!(Object::Integer(1).object_type().to_string(), "INTEGER");
        assert_eq!(ObjectType::ReturnValue.to_string(), "RETURN_VALUE");
        assert!(Object::Error(String::new()).is_error());
        assert!(!Object::Null.is_error());
    }
}
