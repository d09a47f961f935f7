use crate::error::{Error, Result};
use crate::schema::{Parameter, ParameterFormat, ParameterType};
use log::debug;
use std::fmt;

/// Annotation of `utils.format_date`'s argument
pub const DATE_ANNOTATION: &str = "datetime.date | Literal['today'] | Annotated[str, 'yyyy-MM-dd']";

/// Annotation of `utils.format_time`'s argument
pub const TIME_ANNOTATION: &str = "datetime.time | Annotated[str, 'HH:mm']";

/// Python type a parameter is annotated with in the generated signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PyType {
    Bool,
    Int,
    Str,
    /// The date-like scalar accepted by `format_date`
    Date,
    /// The time-like scalar accepted by `format_time`
    Time,
    /// The date-like scalar or a raw timestamp string
    DateOrTimestamp,
    /// A closed set of literal strings, in declared order
    Literal(Vec<String>),
}

impl PyType {
    /// Defaults of these types are emitted as-is rather than quoted
    pub fn renders_default_verbatim(&self) -> bool {
        matches!(self, PyType::Bool | PyType::Int | PyType::Date)
    }
}

/// Quotes `value` as a single-quoted Python string literal
pub fn py_str_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

impl fmt::Display for PyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PyType::Bool => f.write_str("bool"),
            PyType::Int => f.write_str("int"),
            PyType::Str => f.write_str("str"),
            PyType::Date => f.write_str(DATE_ANNOTATION),
            PyType::Time => f.write_str(TIME_ANNOTATION),
            PyType::DateOrTimestamp => write!(f, "{} | str", DATE_ANNOTATION),
            PyType::Literal(values) => {
                let quoted: Vec<String> = values.iter().map(|v| py_str_literal(v)).collect();
                write!(f, "Literal[{}]", quoted.join(", "))
            }
        }
    }
}

/// Lookup table for formats; `None` means there is no entry
fn format_type(format: ParameterFormat) -> Option<PyType> {
    match format {
        ParameterFormat::Date => Some(PyType::Date),
        ParameterFormat::Time => Some(PyType::Time),
        ParameterFormat::DateOrTimestamp => Some(PyType::DateOrTimestamp),
        ParameterFormat::Timestamp => None,
    }
}

fn scalar_type(kind: ParameterType) -> PyType {
    match kind {
        ParameterType::Boolean => PyType::Bool,
        ParameterType::Integer => PyType::Int,
        ParameterType::String => PyType::Str,
    }
}

/// Resolves the annotation of `param`.
///
/// Precedence is `enum`, then `format`, then `type`. A format without a table
/// entry, or a parameter declaring none of the three, is an error rather than
/// a fallback to `Any`.
pub fn resolve(param: &Parameter, operation_id: &str) -> Result<PyType> {
    let fail = |reason: String| Error::TypeResolution {
        operation_id: operation_id.to_string(),
        parameter: param.name.clone(),
        reason,
    };

    let resolved = if let Some(values) = &param.enum_values {
        PyType::Literal(values.clone())
    } else if let Some(format) = param.format {
        format_type(format).ok_or_else(|| fail(format!("no type for format {}", format)))?
    } else if let Some(kind) = param.kind {
        scalar_type(kind)
    } else {
        return Err(fail("no enum, format or type declared".to_string()));
    };

    debug!("Resolved {}.{} as {}", operation_id, param.name, resolved);
    Ok(resolved)
}

/// Name of the `utils` helper that converts values of `format` for the wire
pub fn formatter_for(format: ParameterFormat) -> &'static str {
    match format {
        ParameterFormat::Date => "format_date",
        ParameterFormat::Time => "format_time",
        ParameterFormat::Timestamp => "format_timestamp",
        ParameterFormat::DateOrTimestamp => "format_date_or_timestamp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ParameterLocation;

    fn param(
        kind: Option<ParameterType>,
        format: Option<ParameterFormat>,
        enum_values: Option<&[&str]>,
    ) -> Parameter {
        Parameter {
            name: "p".to_string(),
            location: ParameterLocation::Query,
            description: None,
            required: true,
            deprecated: false,
            allow_empty_value: false,
            kind,
            format,
            enum_values: enum_values.map(|v| v.iter().map(|s| s.to_string()).collect()),
            default: None,
        }
    }

    #[test]
    fn test_resolve_scalars() {
        assert_eq!(resolve(&param(Some(ParameterType::Boolean), None, None), "op").unwrap(), PyType::Bool);
        assert_eq!(resolve(&param(Some(ParameterType::Integer), None, None), "op").unwrap(), PyType::Int);
        assert_eq!(resolve(&param(Some(ParameterType::String), None, None), "op").unwrap(), PyType::Str);
    }

    #[test]
    fn test_format_overrides_type() {
        let p = param(Some(ParameterType::String), Some(ParameterFormat::Date), None);
        assert_eq!(resolve(&p, "op").unwrap(), PyType::Date);

        let p = param(Some(ParameterType::String), Some(ParameterFormat::Time), None);
        assert_eq!(resolve(&p, "op").unwrap(), PyType::Time);

        let p = param(None, Some(ParameterFormat::DateOrTimestamp), None);
        assert_eq!(resolve(&p, "op").unwrap(), PyType::DateOrTimestamp);
    }

    #[test]
    fn test_enum_overrides_everything() {
        let p = param(
            Some(ParameterType::Integer),
            Some(ParameterFormat::Date),
            Some(&["asc", "desc"]),
        );
        let resolved = resolve(&p, "op").unwrap();
        assert_eq!(resolved, PyType::Literal(vec!["asc".to_string(), "desc".to_string()]));
        assert_eq!(resolved.to_string(), "Literal['asc', 'desc']");
    }

    #[test]
    fn test_missing_table_entry_is_fatal() {
        let p = param(Some(ParameterType::String), Some(ParameterFormat::Timestamp), None);
        match resolve(&p, "getThing") {
            Err(Error::TypeResolution { operation_id, parameter, reason }) => {
                assert_eq!(operation_id, "getThing");
                assert_eq!(parameter, "p");
                assert!(reason.contains("timestamp"));
            }
            other => panic!("expected a type resolution error, got {:?}", other),
        }

        let p = param(None, None, None);
        assert!(matches!(resolve(&p, "op"), Err(Error::TypeResolution { .. })));
    }

    #[test]
    fn test_annotations() {
        assert_eq!(
            PyType::Date.to_string(),
            "datetime.date | Literal['today'] | Annotated[str, 'yyyy-MM-dd']"
        );
        assert_eq!(PyType::Time.to_string(), "datetime.time | Annotated[str, 'HH:mm']");
        assert_eq!(
            PyType::DateOrTimestamp.to_string(),
            "datetime.date | Literal['today'] | Annotated[str, 'yyyy-MM-dd'] | str"
        );
    }

    #[test]
    fn test_renders_default_verbatim() {
        assert!(PyType::Bool.renders_default_verbatim());
        assert!(PyType::Int.renders_default_verbatim());
        assert!(PyType::Date.renders_default_verbatim());
        assert!(!PyType::Str.renders_default_verbatim());
        assert!(!PyType::Time.renders_default_verbatim());
        assert!(!PyType::DateOrTimestamp.renders_default_verbatim());
        assert!(!PyType::Literal(vec!["a".to_string()]).renders_default_verbatim());
    }

    #[test]
    fn test_py_str_literal_escapes() {
        assert_eq!(py_str_literal("asc"), "'asc'");
        assert_eq!(py_str_literal("it's"), "'it\\'s'");
        assert_eq!(py_str_literal("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_formatter_for() {
        assert_eq!(formatter_for(ParameterFormat::Date), "format_date");
        assert_eq!(formatter_for(ParameterFormat::DateOrTimestamp), "format_date_or_timestamp");
    }
}
