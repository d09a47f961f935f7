//! Swagger client builder - typed Python client methods from a pinned Swagger 2.0 document.
//!
//! This library turns the published Swagger description of a REST API into
//! the source of an abstract Python client class with one method per `GET`
//! operation. Generated methods delegate to a single abstract `_get`
//! primitive implemented by a hand-written HTTP client.
//!
//! # Architecture
//!
//! 1. [`fetch`] - Reads the raw document and checks its SHA-256 against the pin
//! 2. [`patcher`] - Applies path-addressed overrides to the raw document
//! 3. [`schema`] - Validates the patched document into a typed model
//! 4. [`type_resolver`] - Maps parameter type/format/enum to Python annotations
//! 5. [`generator`] - Renders signatures, docstrings and bodies
//! 6. [`pipeline`] - Runs steps 1-5 as one all-or-nothing pass
//! 7. [`writer`] - Writes the generated module to disk
//!
//! [`overrides`] holds the built-in Fitbit preset and [`naming`] the casing
//! helpers.
//!
//! # Example Usage
//!
//! ```no_run
//! use client_from_swagger::{
//!     fetch::{fetch, Source},
//!     generator::GeneratorOptions,
//!     overrides::{fitbit_overrides, FITBIT_API_JSON, FITBIT_API_SHA256},
//!     pipeline::Pipeline,
//! };
//!
//! let raw = fetch(&Source::parse(FITBIT_API_JSON)).unwrap();
//! let pipeline = Pipeline::new(
//!     Some(FITBIT_API_SHA256.to_string()),
//!     fitbit_overrides(),
//!     GeneratorOptions::default(),
//! );
//! let source = pipeline.run(&raw).unwrap();
//! println!("{}", source);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod error;
pub mod fetch;
pub mod generator;
pub mod naming;
pub mod overrides;
pub mod patcher;
pub mod pipeline;
pub mod schema;
pub mod type_resolver;
pub mod writer;
