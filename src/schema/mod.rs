//! Validated, strongly typed model of a Swagger 2.0 document.
//!
//! The model is produced once per run by [`parse`] from the patched raw
//! document and is read-only afterwards. Mappings that carry meaning through
//! their order (paths, methods, security schemes) are kept as ordered vectors
//! so the generator can walk them in declaration order.
//!
//! Every type derives [`Deserialize`]; unknown fields are ignored and an
//! explicit `null` counts as an absent field.

mod parse;

pub use parse::parse;

use parse::{entries, keys, nullable, path_items};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::fmt;

/// Root of the validated document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDescription {
    /// Swagger version string
    pub swagger: String,
    /// API info
    pub info: Info,
    /// Host serving the API
    pub host: Option<String>,
    /// Transfer protocols
    #[serde(default, deserialize_with = "nullable")]
    pub schemes: Vec<Scheme>,
    /// Documentation tags
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<Tag>,
    /// Path templates in declaration order
    #[serde(deserialize_with = "path_items")]
    pub paths: Vec<PathItem>,
    /// Named security schemes in declaration order
    #[serde(default, deserialize_with = "entries")]
    pub security_definitions: Vec<(String, SecurityDefinition)>,
    /// Named object definitions in declaration order
    #[serde(default, deserialize_with = "entries")]
    pub definitions: Vec<(String, Definition)>,
    /// Top-level external documentation
    pub external_docs: Option<ExternalDocs>,
}

/// API info object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub title: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub version: String,
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contact {
    pub name: String,
    pub url: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct License {
    pub name: String,
    pub identifier: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocs>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExternalDocs {
    pub description: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

/// All operations declared under one path template
#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    /// URL template with `{name}` placeholders
    pub template: String,
    /// Operations in declaration order, at most one per method
    pub operations: Vec<(Method, Operation)>,
}

impl PathItem {
    /// Returns the operation bound to `method`, if declared
    pub fn operation(&self, method: Method) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, op)| op)
    }
}

/// HTTP methods accepted under a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    /// Parses a lowercase method key of a path item
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Method::Get),
            "post" => Some(Method::Post),
            "put" => Some(Method::Put),
            "delete" => Some(Method::Delete),
            "patch" => Some(Method::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Delete => "delete",
            Method::Patch => "patch",
        }
    }
}

impl TryFrom<String> for Method {
    type Error = String;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        Method::from_key(&key).ok_or_else(|| {
            format!(
                "unknown HTTP method `{}`, expected one of get, post, put, delete, patch",
                key
            )
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// One HTTP verb bound to one path template
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocs>,
    #[serde(default, deserialize_with = "nullable")]
    pub consumes: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub produces: Vec<String>,
    /// Source identifier the generated method name is derived from
    pub operation_id: Option<String>,
    /// Parameters in declaration order
    #[serde(default, deserialize_with = "nullable")]
    pub parameters: Vec<ParameterOrRef>,
    /// Responses keyed by status code, in declaration order
    #[serde(default, deserialize_with = "entries")]
    pub responses: Vec<(StatusCode, Response)>,
    #[serde(default, deserialize_with = "nullable")]
    pub deprecated: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub security: Vec<SecurityRequirement>,
    #[serde(default, deserialize_with = "nullable")]
    pub servers: Vec<Server>,
}

/// A parameter declared inline or as an unresolved `$ref`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "parse::ParameterDecl")]
pub enum ParameterOrRef {
    Parameter(Parameter),
    Reference(Reference),
}

/// A `$ref` pointer, kept verbatim
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub target: String,
    pub summary: Option<String>,
    pub description: Option<String>,
}

/// One input of an operation
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Source name, may contain hyphens
    pub name: String,
    pub location: ParameterLocation,
    pub description: Option<String>,
    pub required: bool,
    pub deprecated: bool,
    pub allow_empty_value: bool,
    pub kind: Option<ParameterType>,
    pub format: Option<ParameterFormat>,
    /// Allowed literal values in declared order
    pub enum_values: Option<Vec<String>>,
    pub default: Option<DefaultValue>,
}

impl Parameter {
    /// A parameter that needs no explicit argument at the call site
    pub fn is_optional_argument(&self) -> bool {
        self.default.is_some() || !self.required
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
    FormData,
    Body,
}

/// Scalar kind of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Boolean,
    Integer,
    String,
}

/// Refinement of a parameter's scalar kind.
///
/// Declared either as a single name or as the pair `["date", "timestamp"]`;
/// see the `Deserialize` impl in the `parse` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterFormat {
    Date,
    Time,
    Timestamp,
    /// Declared as the pair `["date", "timestamp"]`: either one, told apart at runtime
    DateOrTimestamp,
}

impl ParameterFormat {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "date" => Some(ParameterFormat::Date),
            "time" => Some(ParameterFormat::Time),
            "timestamp" => Some(ParameterFormat::Timestamp),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterFormat::Date => f.write_str("date"),
            ParameterFormat::Time => f.write_str("time"),
            ParameterFormat::Timestamp => f.write_str("timestamp"),
            ParameterFormat::DateOrTimestamp => f.write_str("(date, timestamp)"),
        }
    }
}

/// Scalar default value of a parameter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged, expecting = "a boolean, number or string default")]
pub enum DefaultValue {
    Bool(bool),
    Number(Number),
    String(String),
}

/// Three-digit HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Accepts exactly `[1-5]\d{2}`
    pub fn from_key(key: &str) -> Option<Self> {
        let bytes = key.as_bytes();
        let well_formed = bytes.len() == 3
            && (b'1'..=b'5').contains(&bytes[0])
            && bytes[1..].iter().all(u8::is_ascii_digit);
        if well_formed {
            key.parse().ok().map(StatusCode)
        } else {
            None
        }
    }
}

impl TryFrom<String> for StatusCode {
    type Error = String;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        StatusCode::from_key(&key).ok_or_else(|| {
            format!(
                "`{}` is not an HTTP status code matching [1-5]\\d{{2}}",
                key
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    pub description: String,
    /// Names of the declared response headers
    #[serde(default, deserialize_with = "keys")]
    pub headers: Vec<String>,
}

/// Security schemes required by an operation, with their scopes
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "parse::SchemeScopes")]
pub struct SecurityRequirement {
    pub schemes: Vec<(String, Vec<String>)>,
}

impl SecurityRequirement {
    /// Scope list of the first scheme named in this requirement
    pub fn first_scopes(&self) -> &[String] {
        self.schemes
            .first()
            .map(|(_, scopes)| scopes.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub authorization_url: Option<String>,
    pub flow: Option<String>,
    #[serde(default, deserialize_with = "entries")]
    pub scopes: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Definition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "entries")]
    pub properties: Vec<(String, DefinitionProperty)>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefinitionProperty {
    #[serde(rename = "type")]
    pub kind: String,
    pub example: Option<Value>,
    pub items: Option<Reference>,
}

impl ApiDescription {
    /// Iterates over `(template, operation)` for every `GET`, in path order
    pub fn get_operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.paths.iter().filter_map(|item| {
            item.operation(Method::Get)
                .map(|op| (item.template.as_str(), op))
        })
    }

    /// Total number of declared operations across all paths
    pub fn operation_count(&self) -> usize {
        self.paths.iter().map(|item| item.operations.len()).sum()
    }
}
