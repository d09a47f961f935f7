//! Python source generation for the read-only client surface.
//!
//! The generator emits one abstract base class holding an abstract `_get`
//! primitive and one concrete method per `GET` operation, in path order.
//! Generation is all-or-nothing: the first operation that cannot be rendered
//! aborts the run and no text is returned.

use crate::error::{Error, Result};
use crate::naming::{camel_to_snake, is_python_identifier, is_python_keyword, parameter_identifier};
use crate::schema::{
    ApiDescription, DefaultValue, Operation, Parameter, ParameterLocation, ParameterOrRef,
};
use crate::type_resolver::{self, py_str_literal, PyType};
use log::{debug, info};
use std::collections::HashMap;

/// Knobs of the emitted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Python module imported `as utils` for the formatting helpers
    pub utils_module: String,
    /// Name of the generated abstract class
    pub class_name: String,
    /// One level of indentation
    pub spacing: String,
    /// API name used in the docstrings; the document's `info.title` when unset
    pub api_name: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            utils_module: "fitbit_web.utils".to_string(),
            class_name: "FitbitWebApi".to_string(),
            spacing: "\t".to_string(),
            api_name: None,
        }
    }
}

/// A parameter together with its generated identifier and annotation
#[derive(Debug, Clone)]
pub struct ResolvedParameter<'a> {
    pub param: &'a Parameter,
    pub ident: String,
    pub py_type: PyType,
}

/// Python source generator
pub struct CodeGenerator {
    options: GeneratorOptions,
}

impl CodeGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        debug!("Initializing CodeGenerator with {:?}", options);
        Self { options }
    }

    fn indent(&self, level: usize) -> String {
        self.options.spacing.repeat(level)
    }

    /// Generates the complete module text for `api`.
    pub fn generate(&self, api: &ApiDescription) -> Result<String> {
        check_method_names(api)?;

        let api_name = self.options.api_name.as_deref().unwrap_or(&api.info.title);
        let mut output = self.render_header(api_name);
        let mut count = 0;
        for (endpoint, operation) in api.get_operations() {
            output.push('\n');
            output.push_str(&self.render_method(endpoint, operation)?);
            output.push('\n');
            count += 1;
        }

        info!("Generated {} methods", count);
        Ok(output)
    }

    /// Module docstring, imports, the class and its abstract `_get`
    pub fn render_header(&self, api_name: &str) -> String {
        let sp = self.indent(1);
        let sp2 = self.indent(2);
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!(
            "\"\"\"Abstract implementations for the {}.\"\"\"\n",
            api_name
        ));
        out.push_str("import abc\n");
        out.push_str("import datetime\n");
        out.push_str("from typing import Any, Literal, Annotated, Union\n");
        out.push_str(&format!("import {} as utils\n", self.options.utils_module));
        out.push('\n');
        out.push_str(&format!("class {}(abc.ABC):\n", self.options.class_name));
        out.push_str(&format!(
            "{}\"\"\"API containing the autogenerated methods for the {}.\"\"\"\n",
            sp, api_name
        ));
        out.push_str(&format!("{}\n", sp));
        out.push_str(&format!("{}@abc.abstractmethod\n", sp));
        out.push_str(&format!("{}def _get(\n", sp));
        out.push_str(&format!("{}self,\n", sp2));
        out.push_str(&format!("{}url: str,\n", sp2));
        out.push_str(&format!("{}param_kwargs: dict[str, Any] | None = None,\n", sp2));
        out.push_str(&format!("{}query_kwargs: dict[str, Any] | None = None,\n", sp2));
        out.push_str(&format!("{}) -> dict[str, Any]:\n", sp));
        out.push_str(&format!("{}...\n", sp2));
        out
    }

    /// Renders one method: signature, docstring and delegating body.
    pub fn render_method(&self, endpoint: &str, operation: &Operation) -> Result<String> {
        let operation_id = operation.operation_id.as_deref().ok_or_else(|| Error::Generation {
            endpoint: endpoint.to_string(),
            message: "operation has no operationId".to_string(),
        })?;
        let method_name = camel_to_snake(operation_id);
        debug!("Rendering {} for GET {}", method_name, endpoint);

        let declared = inline_parameters(endpoint, operation)?;
        check_parameter_identifiers(endpoint, &declared)?;
        let resolved = sort_parameters(&declared)
            .into_iter()
            .map(|param| {
                Ok(ResolvedParameter {
                    param,
                    ident: parameter_identifier(&param.name),
                    py_type: type_resolver::resolve(param, operation_id)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut out = self.render_signature(&method_name, &resolved);
        out.push_str(&self.render_docstring(endpoint, operation, &resolved));
        out.push_str(&self.render_body(endpoint, &resolved));
        Ok(out)
    }

    /// `def name(self, a: T, b: U | None = None):` plus a newline
    pub fn render_signature(&self, method_name: &str, params: &[ResolvedParameter<'_>]) -> String {
        let mut out = format!("{}def {}(self", self.indent(1), method_name);
        for p in params {
            out.push_str(&format!(", {}: {}", p.ident, p.py_type));
            let default = p
                .param
                .default
                .as_ref()
                .map(|d| render_default(d, &p.py_type));
            if !p.param.required {
                out.push_str(&format!(
                    " | None = {}",
                    default.as_deref().unwrap_or("None")
                ));
            } else if let Some(default) = default {
                out.push_str(&format!(" = {}", default));
            }
        }
        out.push_str("):\n");
        out
    }

    /// The docstring, opening quotes through closing quotes and newline
    pub fn render_docstring(
        &self,
        endpoint: &str,
        operation: &Operation,
        params: &[ResolvedParameter<'_>],
    ) -> String {
        let sp2 = self.indent(2);
        let sp3 = self.indent(3);

        let mut out = format!("{}\"\"\"", sp2);
        if let Some(summary) = &operation.summary {
            out.push_str(summary);
            out.push_str("\n\n");
        }
        if let Some(description) = &operation.description {
            out.push_str(&format!("{}{}\n", sp2, description));
        }
        out.push_str(&format!("{}\n", sp2));
        out.push_str(&format!("{}Endpoint: {}\n", sp2, py_str_literal(endpoint)));
        let scopes = operation
            .security
            .first()
            .map(|requirement| requirement.first_scopes())
            .unwrap_or(&[]);
        out.push_str(&format!("{}Scopes: {}", sp2, py_list(scopes)));

        if !params.is_empty() {
            out.push_str(&format!("\n\n{}Parameters\n{}----------\n", sp2, sp2));
            for p in params {
                let optional = if p.param.required { "" } else { ", optional" };
                out.push_str(&format!("{}{} : {}{}\n", sp2, p.ident, p.py_type, optional));
                if let Some(description) = &p.param.description {
                    out.push_str(&format!("{}{}\n", sp3, description));
                }
                out.push('\n');
            }
        }

        out.push_str(&format!("\n{}\"\"\"\n", sp2));
        out
    }

    /// `return self._get(...)`, without a trailing newline
    pub fn render_body(&self, endpoint: &str, params: &[ResolvedParameter<'_>]) -> String {
        let mut out = format!("{}return self._get({}", self.indent(2), py_str_literal(endpoint));
        let path: Vec<_> = params
            .iter()
            .filter(|p| p.param.location == ParameterLocation::Path)
            .collect();
        let query: Vec<_> = params
            .iter()
            .filter(|p| p.param.location == ParameterLocation::Query)
            .collect();
        if !path.is_empty() {
            out.push_str(&format!(", param_kwargs={}", render_kwargs(&path)));
        }
        if !query.is_empty() {
            out.push_str(&format!(", query_kwargs={}", render_kwargs(&query)));
        }
        out.push(')');
        out
    }
}

/// Unwraps inline parameters; `$ref` parameters cannot be generated
fn inline_parameters<'a>(endpoint: &str, operation: &'a Operation) -> Result<Vec<&'a Parameter>> {
    operation
        .parameters
        .iter()
        .map(|p| match p {
            ParameterOrRef::Parameter(param) => Ok(param),
            ParameterOrRef::Reference(reference) => Err(Error::Generation {
                endpoint: endpoint.to_string(),
                message: format!("unresolved parameter reference {}", reference.target),
            }),
        })
        .collect()
}

/// Moves parameters that need no explicit argument after the ones that do,
/// keeping declaration order within each group.
pub fn sort_parameters<'a>(params: &[&'a Parameter]) -> Vec<&'a Parameter> {
    let mut sorted = params.to_vec();
    sorted.sort_by_key(|p| p.is_optional_argument());
    sorted
}

/// The Python literal text of a default value
fn py_value(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Bool(true) => "True".to_string(),
        DefaultValue::Bool(false) => "False".to_string(),
        DefaultValue::Number(n) => n.to_string(),
        DefaultValue::String(s) => s.clone(),
    }
}

/// Renders a default for a parameter annotated with `py_type`.
///
/// `bool`, `int` and date-like defaults are emitted verbatim, everything else
/// as a quoted string.
pub fn render_default(default: &DefaultValue, py_type: &PyType) -> String {
    let value = py_value(default);
    if py_type.renders_default_verbatim() {
        value
    } else {
        py_str_literal(&value)
    }
}

/// Call-site argument mapping, e.g. `{'detail-level': detail_level}`
pub fn render_kwargs(params: &[&ResolvedParameter<'_>]) -> String {
    let entries: Vec<String> = params
        .iter()
        .map(|p| {
            let value = match p.param.format {
                Some(format) => format!("utils.{}({})", type_resolver::formatter_for(format), p.ident),
                None => p.ident.clone(),
            };
            format!("{}: {}", py_str_literal(&p.param.name), value)
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn py_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| py_str_literal(v)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Names the generated method body refers to besides its arguments
const RESERVED_IDENTIFIERS: &[&str] = &["self", "utils"];

/// Rejects parameters whose identifiers would not form a valid signature:
/// non-identifiers, keywords, reserved names and duplicates.
///
/// `params` must be in declaration order; errors point at the offending
/// parameter's `name`.
pub fn check_parameter_identifiers(endpoint: &str, params: &[&Parameter]) -> Result<()> {
    let mut taken: HashMap<String, &str> = HashMap::new();
    for (index, param) in params.iter().enumerate() {
        let ident = parameter_identifier(&param.name);
        let path = format!("$.paths[{:?}].get.parameters[{}].name", endpoint, index);

        if !is_python_identifier(&ident) {
            return Err(Error::validation(
                path,
                format!("`{}` does not map to a Python identifier (got `{}`)", param.name, ident),
            ));
        }
        if is_python_keyword(&ident) || RESERVED_IDENTIFIERS.contains(&ident.as_str()) {
            return Err(Error::validation(
                path,
                format!("`{}` maps to the reserved name `{}`", param.name, ident),
            ));
        }
        if let Some(first) = taken.get(&ident) {
            return Err(Error::validation(
                path,
                format!(
                    "`{}` maps to `{}`, already used by parameter `{}`",
                    param.name, ident, first
                ),
            ));
        }
        taken.insert(ident, &param.name);
    }
    Ok(())
}

/// Rejects `GET` operations whose generated method names would collide.
pub fn check_method_names(api: &ApiDescription) -> Result<()> {
    let mut taken: HashMap<String, &str> = HashMap::new();
    for (endpoint, operation) in api.get_operations() {
        let Some(operation_id) = &operation.operation_id else {
            continue;
        };
        let name = camel_to_snake(operation_id);
        if let Some(first) = taken.get(&name) {
            return Err(Error::validation(
                format!("$.paths[{:?}].get.operationId", endpoint),
                format!("method name `{}` is already used by GET {}", name, first),
            ));
        }
        taken.insert(name, endpoint);
    }
    Ok(())
}
