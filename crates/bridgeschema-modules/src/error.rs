//! Parser faults raised while building a module schema.

use crate::ast::Span;
use serde::Serialize;

/// A fault tied to a module and to the node that caused it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Module {module_name}: {kind}")]
pub struct ParserError {
    pub module_name: String,
    pub span: Span,
    pub kind: ParserErrorKind,
}

impl ParserError {
    pub fn new(module_name: impl Into<String>, span: Span, kind: ParserErrorKind) -> Self {
        Self {
            module_name: module_name.into(),
            span,
            kind,
        }
    }

    /// Whether the fault can be recorded while translation of siblings continues.
    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic {
            module_name: self.module_name.clone(),
            line: self.span.line,
            column: self.span.column,
            kind: self.kind.code(),
            recoverable: self.is_recoverable(),
            message: self.kind.to_string(),
        }
    }
}

/// Serializable view of a [`ParserError`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub module_name: String,
    pub line: usize,
    pub column: usize,
    pub kind: &'static str,
    pub recoverable: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParserErrorKind {
    // Module discovery (fatal)
    #[error("no interface extending TurboModule was found in this spec file")]
    ModuleInterfaceNotFound,

    #[error(
        "a spec file must declare exactly one interface extending TurboModule, found {}: {}",
        .names.len(),
        .names.join(", ")
    )]
    MoreThanOneModuleInterface { names: Vec<String> },

    #[error("the interface extending TurboModule must be named 'Spec', rename '{name}' to 'Spec'")]
    MisnamedModuleInterface { name: String },

    #[error(
        "unused module interface, load it with TurboModuleRegistry.get<Spec>('<moduleName>') or getEnforcing"
    )]
    UnusedModuleInterface,

    #[error("expected exactly one TurboModuleRegistry call, found {count}")]
    MoreThanOneModuleRegistryCalls { count: usize },

    #[error("TurboModuleRegistry.{method}('{module_name}') is missing its type parameter, write {method}<Spec>")]
    UntypedModuleRegistryCall { method: String, module_name: String },

    #[error("TurboModuleRegistry.{method}('{module_name}') must be called with exactly one type parameter, 'Spec'")]
    IncorrectModuleRegistryCallTypeParameter { method: String, module_name: String },

    #[error("TurboModuleRegistry.{method}() takes exactly one argument, found {arity}")]
    IncorrectModuleRegistryCallArity { method: String, arity: usize },

    #[error("TurboModuleRegistry.{method}() must be called with a string literal, found {found}")]
    IncorrectModuleRegistryCallArgumentType { method: String, found: String },

    // Members and parameters (recoverable)
    #[error("property '{name}' must be a function, found {found}")]
    UnsupportedModuleProperty { name: String, found: String },

    #[error("function parameters must be named and typed")]
    UnnamedFunctionParam,

    #[error("parameter '{name}' cannot have type {found}")]
    UnsupportedFunctionParamTypeAnnotation { name: String, found: String },

    #[error("{found} is not supported as a function return type")]
    UnsupportedFunctionReturnTypeAnnotation { found: String },

    #[error("object members must be property signatures, found {found}")]
    UnsupportedObjectPropertyTypeAnnotation { found: String },

    #[error("object property '{name}' cannot have type {found}")]
    UnsupportedObjectPropertyValueTypeAnnotation { name: String, found: String },

    #[error("array elements cannot have type {found}")]
    UnsupportedArrayElementTypeAnnotation { found: String },

    // Type annotations (recoverable)
    #[error("unsupported generic type '{name}'")]
    UnsupportedGeneric { name: String },

    #[error("generic '{name}' must have exactly one type parameter, found {count}")]
    IncorrectlyParameterizedGeneric { name: String, count: usize },

    #[error("unsupported type annotation: {found}")]
    UnsupportedTypeAnnotation { found: String },

    #[error("enum '{name}' has unsupported member type {found}")]
    UnsupportedEnumDeclaration { name: String, found: String },

    #[error(
        "unsupported union of {}, only Cxx modules accept unions whose members share one kind",
        .member_types.join(", ")
    )]
    UnsupportedUnionTypeAnnotation { member_types: Vec<String> },
}

impl ParserErrorKind {
    /// Faults that only drop the offending member or parameter.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::ModuleInterfaceNotFound
                | Self::MoreThanOneModuleInterface { .. }
                | Self::MisnamedModuleInterface { .. }
                | Self::UnusedModuleInterface
                | Self::MoreThanOneModuleRegistryCalls { .. }
                | Self::UntypedModuleRegistryCall { .. }
                | Self::IncorrectModuleRegistryCallTypeParameter { .. }
                | Self::IncorrectModuleRegistryCallArity { .. }
                | Self::IncorrectModuleRegistryCallArgumentType { .. }
        )
    }

    /// Stable name of the fault kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ModuleInterfaceNotFound => "ModuleInterfaceNotFound",
            Self::MoreThanOneModuleInterface { .. } => "MoreThanOneModuleInterface",
            Self::MisnamedModuleInterface { .. } => "MisnamedModuleInterface",
            Self::UnusedModuleInterface => "UnusedModuleInterface",
            Self::MoreThanOneModuleRegistryCalls { .. } => "MoreThanOneModuleRegistryCalls",
            Self::UntypedModuleRegistryCall { .. } => "UntypedModuleRegistryCall",
            Self::IncorrectModuleRegistryCallTypeParameter { .. } => {
                "IncorrectModuleRegistryCallTypeParameter"
            }
            Self::IncorrectModuleRegistryCallArity { .. } => "IncorrectModuleRegistryCallArity",
            Self::IncorrectModuleRegistryCallArgumentType { .. } => {
                "IncorrectModuleRegistryCallArgumentType"
            }
            Self::UnsupportedModuleProperty { .. } => "UnsupportedModuleProperty",
            Self::UnnamedFunctionParam => "UnnamedFunctionParam",
            Self::UnsupportedFunctionParamTypeAnnotation { .. } => {
                "UnsupportedFunctionParamTypeAnnotation"
            }
            Self::UnsupportedFunctionReturnTypeAnnotation { .. } => {
                "UnsupportedFunctionReturnTypeAnnotation"
            }
            Self::UnsupportedObjectPropertyTypeAnnotation { .. } => {
                "UnsupportedObjectPropertyTypeAnnotation"
            }
            Self::UnsupportedObjectPropertyValueTypeAnnotation { .. } => {
                "UnsupportedObjectPropertyValueTypeAnnotation"
            }
            Self::UnsupportedArrayElementTypeAnnotation { .. } => {
                "UnsupportedArrayElementTypeAnnotation"
            }
            Self::UnsupportedGeneric { .. } => "UnsupportedGeneric",
            Self::IncorrectlyParameterizedGeneric { .. } => "IncorrectlyParameterizedGeneric",
            Self::UnsupportedTypeAnnotation { .. } => "UnsupportedTypeAnnotation",
            Self::UnsupportedEnumDeclaration { .. } => "UnsupportedEnumDeclaration",
            Self::UnsupportedUnionTypeAnnotation { .. } => "UnsupportedUnionTypeAnnotation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_faults_are_fatal() {
        assert!(!ParserErrorKind::ModuleInterfaceNotFound.is_recoverable());
        assert!(!ParserErrorKind::UnusedModuleInterface.is_recoverable());
        assert!(
            !ParserErrorKind::IncorrectModuleRegistryCallArity {
                method: "get".into(),
                arity: 2
            }
            .is_recoverable()
        );
    }

    #[test]
    fn member_faults_are_recoverable() {
        assert!(ParserErrorKind::UnnamedFunctionParam.is_recoverable());
        assert!(
            ParserErrorKind::UnsupportedUnionTypeAnnotation {
                member_types: vec![]
            }
            .is_recoverable()
        );
    }

    #[test]
    fn message_names_module() {
        let err = ParserError::new(
            "NativeFoo",
            Span::new(0, 3, 2, 5),
            ParserErrorKind::MisnamedModuleInterface { name: "Foo".into() },
        );
        assert_eq!(
            err.to_string(),
            "Module NativeFoo: the interface extending TurboModule must be named 'Spec', rename 'Foo' to 'Spec'"
        );
        let diag = err.diagnostic();
        assert_eq!(diag.kind, "MisnamedModuleInterface");
        assert_eq!((diag.line, diag.column), (2, 5));
        assert!(!diag.recoverable);
    }

    #[test]
    fn more_than_one_interface_lists_names() {
        let kind = ParserErrorKind::MoreThanOneModuleInterface {
            names: vec!["Spec".into(), "Other".into()],
        };
        assert_eq!(
            kind.to_string(),
            "a spec file must declare exactly one interface extending TurboModule, found 2: Spec, Other"
        );
    }
}
