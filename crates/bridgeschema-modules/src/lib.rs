//! Native module schema extraction.
//!
//! `bridgeschema-modules` reads a TypeScript native module spec (an
//! interface extending `TurboModule` plus the `TurboModuleRegistry` call that
//! loads it) and translates it into a language-neutral schema that native
//! code generators consume.
//!
//! # Architecture
//!
//! ```text
//!   Source             Syntax tree          Schema
//! ──────────        ───────────────      ──────────────────
//! NativeFoo.ts ──>  Program     ──────>  NativeModuleSchema
//!  (input/)          (ast.rs)    module.rs   (ir.rs)
//!                               translate/
//! ```
//!
//! Translation never panics on unsupported input. Faults in a single member
//! or parameter drop that member and are reported next to the schema; faults
//! in the module's shape (missing interface, bad registration call) abort the
//! file. See [`ParserErrorKind::is_recoverable`].
//!
//! # Example
//!
//! ```ignore
//! use bridgeschema_modules::{build_module_schema, input};
//!
//! let program = input::read_typescript(source)?;
//! let parse = build_module_schema("NativeFoo", &program)?;
//! println!("{}", serde_json::to_string_pretty(&parse.schema)?);
//! ```

pub mod ast;
pub mod capture;
pub mod env;
pub mod error;
pub mod input;
pub mod ir;
pub mod module;
pub mod nullable;
pub mod translate;

#[cfg(feature = "combine")]
pub mod combine;

// Re-exports: schema
pub use ir::{
    AliasMap, EnumMemberType, FunctionTypeAnnotation, NamedShape, NativeModuleSchema,
    NullableAnnotation, ObjectTypeAnnotation, Platform, PropertyShape, TypeAnnotation,
    UnionMemberType,
};
pub use nullable::{Nullable, unwrap_nullable, wrap_nullable};

// Re-exports: building
pub use error::{Diagnostic, ParserError, ParserErrorKind};
pub use module::{ModuleParse, PlatformFacts, build_module_schema};

// Re-exports: readers
pub use input::{ReadError, Reader};
#[cfg(feature = "read-typescript")]
pub use input::{TYPESCRIPT_READER, TypeScriptReader, read_typescript};

#[cfg(feature = "combine")]
pub use combine::{
    FileError, FileReport, SchemaSet, module_name_from_path, parse_files, parse_module_source,
};
