//! The generation run: drift guard, overrides, validation, generation.

use crate::error::{Error, Result};
use crate::fetch::verify_digest;
use crate::generator::{CodeGenerator, GeneratorOptions};
use crate::patcher::{self, Override};
use crate::schema;
use log::info;
use serde_json::Value;

/// Everything a run needs besides the raw bytes
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// Pinned SHA-256 of the audited raw document
    pub expected_sha256: Option<String>,
    /// Corrections applied before validation, in order
    pub overrides: Vec<Override>,
    pub options: GeneratorOptions,
}

impl Pipeline {
    pub fn new(
        expected_sha256: Option<String>,
        overrides: Vec<Override>,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            expected_sha256,
            overrides,
            options,
        }
    }

    /// Turns the raw document into the generated module text.
    ///
    /// The digest is checked before the bytes are even parsed, so nothing
    /// downstream ever sees an unreviewed document.
    pub fn run(&self, raw: &[u8]) -> Result<String> {
        let digest = verify_digest(raw, self.expected_sha256.as_deref())?;
        info!("Schema digest verified: {}", digest);

        let document: Value = serde_json::from_slice(raw)
            .map_err(|e| Error::validation("$", format!("not a JSON document: {}", e)))?;

        info!("Applying {} overrides...", self.overrides.len());
        let document = patcher::apply(document, &self.overrides)?;

        info!("Validating schema...");
        let api = schema::parse(&document)?;
        info!(
            "Schema has {} paths and {} operations",
            api.paths.len(),
            api.operation_count()
        );

        info!("Generating client methods...");
        CodeGenerator::new(self.options.clone()).generate(&api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::sha256_hex;
    use crate::patcher::PathSegment;
    use serde_json::json;

    fn raw_document() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "swagger": "2.0",
            "info": {"title": "Test API", "version": "1"},
            "paths": {"/x/{id}.json": {"get": {
                "operationId": "getXById",
                "parameters": [{"name": "id", "in": "path", "type": "string", "required": true}],
            }}},
        }))
        .unwrap()
    }

    #[test]
    fn test_run_with_pinned_digest() {
        let raw = raw_document();
        let pipeline = Pipeline::new(Some(sha256_hex(&raw)), vec![], GeneratorOptions::default());
        let output = pipeline.run(&raw).unwrap();
        assert!(output.contains("def get_x_by_id(self, id: str):"));
    }

    #[test]
    fn test_mismatch_stops_before_overrides() {
        let raw = raw_document();
        // Would be a PatchError if it were ever applied
        let overrides = vec![Override::delete(vec![PathSegment::from("nowhere")])];
        let pipeline = Pipeline::new(Some("00".repeat(32)), overrides, GeneratorOptions::default());
        assert!(matches!(
            pipeline.run(&raw),
            Err(Error::DigestMismatch { .. })
        ));
    }

    #[test]
    fn test_unpinned_is_refused() {
        let raw = raw_document();
        let pipeline = Pipeline::default();
        assert!(matches!(
            pipeline.run(&raw),
            Err(Error::DigestUnpinned { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_a_validation_error() {
        let raw = b"not json".to_vec();
        let pipeline = Pipeline::new(Some(sha256_hex(&raw)), vec![], GeneratorOptions::default());
        match pipeline.run(&raw) {
            Err(Error::Validation { path, .. }) => assert_eq!(path, "$"),
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_override_is_a_patch_error() {
        let raw = raw_document();
        let overrides = vec![Override::replace(
            vec![
                PathSegment::from("paths"),
                PathSegment::from("/gone.json"),
                PathSegment::from("get"),
            ],
            json!({}),
        )];
        let pipeline = Pipeline::new(Some(sha256_hex(&raw)), overrides, GeneratorOptions::default());
        assert!(matches!(pipeline.run(&raw), Err(Error::Patch { .. })));
    }
}
