use std::fmt;

use mirror_model::source_name;
use mirror_signature::Signature;

/// Body of a synthesized method, as a structured directive.
///
/// The `Display` form is the Java statement list with simple type names;
/// an emitter that qualifies names itself matches on the variants instead.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodBody {
    Empty,
    /// `return getFieldByClass(X.class);`
    FieldByClass(Signature),
    /// `return getPropertyByClass(X.class);`
    PropertyByClass(Signature),
    /// Reads the value of a property holder, substituting `default` for null.
    PropertyValue {
        accessor: String,
        default: Option<&'static str>,
    },
    /// `getXProperty().setValue(x);`
    SetPropertyValue { accessor: String, argument: String },
    /// `return (Cast) super.method(args);`
    CastSuperCall {
        cast: Signature,
        method: String,
        args: Vec<String>,
    },
    /// `super.method(args);`
    SuperCall { method: String, args: Vec<String> },
    /// `return new X();`
    Instantiate(Signature),
    /// Anonymous subclass with its own serial version.
    AnonymousInstance(Signature),
    /// `return X.class;`
    ClassLiteral(Signature),
    /// `return m_x;`
    ReturnField(String),
    /// `m_x = value;`
    AssignField { field: String, value: String },
}

impl fmt::Display for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodBody::Empty => Ok(()),
            MethodBody::FieldByClass(sig) => {
                write!(f, "return getFieldByClass({}.class);", source_name(sig))
            }
            MethodBody::PropertyByClass(sig) => {
                write!(f, "return getPropertyByClass({}.class);", source_name(sig))
            }
            MethodBody::PropertyValue {
                accessor,
                default: Some(default),
            } => write!(
                f,
                "return ({accessor}().getValue() == null) ? ({default}) : ({accessor}().getValue());"
            ),
            MethodBody::PropertyValue {
                accessor,
                default: None,
            } => write!(f, "return {accessor}().getValue();"),
            MethodBody::SetPropertyValue { accessor, argument } => {
                write!(f, "{accessor}().setValue({argument});")
            }
            MethodBody::CastSuperCall { cast, method, args } => write!(
                f,
                "return ({}) super.{method}({});",
                source_name(cast),
                args.join(", ")
            ),
            MethodBody::SuperCall { method, args } => {
                write!(f, "super.{method}({});", args.join(", "))
            }
            MethodBody::Instantiate(sig) => write!(f, "return new {}();", source_name(sig)),
            MethodBody::AnonymousInstance(sig) => write!(
                f,
                "return new {}(){{ private static final long serialVersionUID = 1L; }};",
                source_name(sig)
            ),
            MethodBody::ClassLiteral(sig) => write!(f, "return {}.class;", source_name(sig)),
            MethodBody::ReturnField(field) => write!(f, "return {field};"),
            MethodBody::AssignField { field, value } => write!(f, "{field} = {value};"),
        }
    }
}
