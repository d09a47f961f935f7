use super::*;
use crate::error::{Error, Result};
use log::debug;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_path_to_error::Segment;
use std::marker::PhantomData;

/// Validates a patched raw document into an [`ApiDescription`].
///
/// Unknown fields are ignored. The error names the deepest field path that
/// could be located (e.g. `$.paths["/1/user/-/profile.json"].get.responses["20"]`)
/// and what was wrong there.
pub fn parse(raw: &Value) -> Result<ApiDescription> {
    debug!("Validating schema document");

    let api: ApiDescription = serde_path_to_error::deserialize(raw).map_err(|err| {
        let path = json_path(err.path());
        Error::validation(path, err.into_inner().to_string())
    })?;

    debug!(
        "Validated {} paths with {} operations",
        api.paths.len(),
        api.operation_count()
    );
    Ok(api)
}

/// Renders a location as `$.key["/odd key"][0]`
fn json_path(path: &serde_path_to_error::Path) -> String {
    let mut out = String::from("$");
    for segment in path.iter() {
        match segment {
            Segment::Seq { index } => out.push_str(&format!("[{}]", index)),
            Segment::Map { key } if is_plain_key(key) => {
                out.push('.');
                out.push_str(key);
            }
            Segment::Map { key } => out.push_str(&format!("[{:?}]", key)),
            _ => out.push_str("[?]"),
        }
    }
    out
}

fn is_plain_key(key: &str) -> bool {
    key.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Deserializes a field whose `null` means "use the default"
pub(super) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

struct EntriesVisitor<K, V>(PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for EntriesVisitor<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = Vec<(K, V)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

/// Deserializes an object into its entries, in document order
pub(super) fn entries<'de, D, K, V>(deserializer: D) -> std::result::Result<Vec<(K, V)>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    deserializer.deserialize_any(EntriesVisitor(PhantomData))
}

/// Deserializes an object into its keys, in document order
pub(super) fn keys<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<(String, IgnoredAny)> = entries(deserializer)?;
    Ok(entries.into_iter().map(|(key, _)| key).collect())
}

#[derive(Deserialize)]
struct Operations(#[serde(deserialize_with = "entries")] Vec<(Method, Operation)>);

/// Deserializes the `paths` object, keeping each template with its operations
pub(super) fn path_items<'de, D>(deserializer: D) -> std::result::Result<Vec<PathItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<(String, Operations)> = entries(deserializer)?;
    Ok(items
        .into_iter()
        .map(|(template, Operations(operations))| PathItem {
            template,
            operations,
        })
        .collect())
}

/// One entry of an operation's `security` list
#[derive(Deserialize)]
pub(super) struct SchemeScopes(#[serde(deserialize_with = "entries")] Vec<(String, Vec<String>)>);

impl From<SchemeScopes> for SecurityRequirement {
    fn from(SchemeScopes(schemes): SchemeScopes) -> Self {
        SecurityRequirement { schemes }
    }
}

const FORMAT_EXPECTED: &str = "one of date, time, timestamp or the pair [date, timestamp]";

struct FormatVisitor;

impl<'de> Visitor<'de> for FormatVisitor {
    type Value = ParameterFormat;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(FORMAT_EXPECTED)
    }

    fn visit_str<E: de::Error>(self, name: &str) -> std::result::Result<Self::Value, E> {
        ParameterFormat::from_key(name)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(name), &self))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let mut names = Vec::new();
        while let Some(name) = seq.next_element::<String>()? {
            names.push(name);
        }
        if names == ["date", "timestamp"] {
            Ok(ParameterFormat::DateOrTimestamp)
        } else {
            Err(de::Error::invalid_value(de::Unexpected::Seq, &self))
        }
    }
}

impl<'de> Deserialize<'de> for ParameterFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(FormatVisitor)
    }
}

/// Raw shape shared by inline parameters and `$ref` entries
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ParameterDecl {
    #[serde(rename = "$ref")]
    reference: Option<String>,
    name: Option<String>,
    #[serde(rename = "in")]
    location: Option<ParameterLocation>,
    summary: Option<String>,
    description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    required: bool,
    #[serde(default, deserialize_with = "nullable")]
    deprecated: bool,
    #[serde(default, deserialize_with = "nullable")]
    allow_empty_value: bool,
    #[serde(rename = "type")]
    kind: Option<ParameterType>,
    format: Option<ParameterFormat>,
    #[serde(rename = "enum")]
    enum_values: Option<Vec<String>>,
    default: Option<DefaultValue>,
}

impl TryFrom<ParameterDecl> for ParameterOrRef {
    type Error = String;

    fn try_from(decl: ParameterDecl) -> std::result::Result<Self, Self::Error> {
        if let Some(target) = decl.reference {
            return Ok(ParameterOrRef::Reference(Reference {
                target,
                summary: decl.summary,
                description: decl.description,
            }));
        }
        let name = decl.name.ok_or("missing field `name`")?;
        let location = decl.location.ok_or("missing field `in`")?;
        Ok(ParameterOrRef::Parameter(Parameter {
            name,
            location,
            description: decl.description,
            required: decl.required,
            deprecated: decl.deprecated,
            allow_empty_value: decl.allow_empty_value,
            kind: decl.kind,
            format: decl.format,
            enum_values: decl.enum_values,
            default: decl.default,
        }))
    }
}
