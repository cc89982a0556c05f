//! Building one [`NativeModuleSchema`] from a parsed spec file.

use crate::ast::{
    CallExpr, ExprKind, InterfaceDecl, MethodSignature, Program, PropertySignature, Span,
    StatementKind, TypeKind, TypeMemberKind,
};
use crate::capture::ErrorCapturer;
use crate::env::{Declaration, ResolvedType, TypeEnvironment, is_module_interface};
use crate::error::{ParserError, ParserErrorKind};
use crate::ir::{AliasMap, NamedShape, NativeModuleSchema, Platform, PropertyShape};
use crate::nullable::{Nullable, wrap_nullable};
use crate::translate::TypeTranslator;

/// Required name of the module interface.
pub const MODULE_INTERFACE_NAME: &str = "Spec";

/// Object whose `get`/`getEnforcing` call registers the module.
pub const MODULE_REGISTRY: &str = "TurboModuleRegistry";

const REGISTRY_METHODS: [&str; 2] = ["get", "getEnforcing"];

/// A built schema together with the recoverable faults met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleParse {
    pub schema: NativeModuleSchema,
    pub errors: Vec<ParserError>,
}

/// Platform facts derived from module name suffixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformFacts {
    /// `Cxx` modules accept unions, enums, `unknown` and function returns.
    pub cxx_only: bool,
    pub excluded: Vec<Platform>,
}

impl PlatformFacts {
    pub fn from_names<'n>(names: impl IntoIterator<Item = &'n str>) -> Self {
        let mut facts = Self::default();
        for name in names {
            if name.ends_with("Android") {
                facts.exclude(Platform::Ios);
            } else if name.ends_with("IOS") {
                facts.exclude(Platform::Android);
            } else if name.ends_with("Cxx") {
                facts.cxx_only = true;
                facts.exclude(Platform::Ios);
                facts.exclude(Platform::Android);
            }
        }
        facts
    }

    fn exclude(&mut self, platform: Platform) {
        if !self.excluded.contains(&platform) {
            self.excluded.push(platform);
        }
    }
}

/// Build the schema of the module declared in `program`.
///
/// `module_name` is the file's logical name; it labels every fault and its
/// suffix takes part in platform detection. Discovery faults are returned as
/// `Err`; member faults are collected in [`ModuleParse::errors`].
pub fn build_module_schema(module_name: &str, program: &Program) -> Result<ModuleParse, ParserError> {
    let env = TypeEnvironment::new(program);
    let spec = find_module_interface(module_name, program, &env)?;
    let registered = find_registered_name(module_name, program, spec)?;

    let facts = PlatformFacts::from_names([registered.as_str(), module_name]);
    let translator = TypeTranslator::new(module_name, &env, facts.cxx_only);
    let mut capturer = ErrorCapturer::new();
    let mut schema = NativeModuleSchema::new(vec![registered], facts.excluded);

    for member in &spec.members {
        let mut aliases = AliasMap::new();
        let property = match &member.kind {
            TypeMemberKind::Method(method) => capturer.capture(|capturer| {
                build_method(&translator, method, &mut aliases, capturer)
            })?,
            TypeMemberKind::Property(property) => capturer.capture(|capturer| {
                build_function_property(&translator, member.span, property, &mut aliases, capturer)
            })?,
            // Index, call and construct signatures declare no module member.
            _ => continue,
        };
        if let Some(property) = property {
            schema = schema.with_property(aliases, property);
        }
    }

    Ok(ModuleParse {
        schema,
        errors: capturer.into_errors(),
    })
}

fn find_module_interface<'a>(
    module_name: &str,
    program: &'a Program,
    env: &TypeEnvironment<'a>,
) -> Result<&'a InterfaceDecl, ParserError> {
    let candidates: Vec<&InterfaceDecl> = program
        .declarations()
        .filter_map(|stmt| match &stmt.kind {
            StatementKind::Interface(decl) => Some(decl),
            _ => None,
        })
        .filter(|decl| is_module_interface(decl))
        // Shadowed declarations do not count.
        .filter(|decl| match env.get(&decl.name.name) {
            Some(Declaration::Interface(current)) => std::ptr::eq(current, *decl),
            _ => false,
        })
        .collect();

    match candidates.as_slice() {
        [] => Err(ParserError::new(
            module_name,
            program.span,
            ParserErrorKind::ModuleInterfaceNotFound,
        )),
        [spec] if spec.name.name == MODULE_INTERFACE_NAME => Ok(*spec),
        [spec] => Err(ParserError::new(
            module_name,
            spec.name.span,
            ParserErrorKind::MisnamedModuleInterface {
                name: spec.name.name.clone(),
            },
        )),
        [_, second, ..] => Err(ParserError::new(
            module_name,
            second.span,
            ParserErrorKind::MoreThanOneModuleInterface {
                names: candidates.iter().map(|decl| decl.name.name.clone()).collect(),
            },
        )),
    }
}

/// The registry method a call goes through, if it is a registration call.
pub fn registry_method(call: &CallExpr) -> Option<&str> {
    let ExprKind::Member {
        object,
        property,
        computed: false,
    } = &call.callee.kind
    else {
        return None;
    };
    match (&object.kind, &property.kind) {
        (ExprKind::Identifier(object), ExprKind::Identifier(method))
            if object == MODULE_REGISTRY && REGISTRY_METHODS.contains(&method.as_str()) =>
        {
            Some(method.as_str())
        }
        _ => None,
    }
}

fn find_registered_name(
    module_name: &str,
    program: &Program,
    spec: &InterfaceDecl,
) -> Result<String, ParserError> {
    let fault = |span: Span, kind| ParserError::new(module_name, span, kind);

    let calls: Vec<(&CallExpr, Span, &str)> = program
        .call_expressions()
        .into_iter()
        .filter_map(|(call, span)| registry_method(call).map(|method| (call, span, method)))
        .collect();

    let (call, span, method) = match calls.as_slice() {
        [] => return Err(fault(spec.span, ParserErrorKind::UnusedModuleInterface)),
        [single] => *single,
        [_, second, ..] => {
            return Err(fault(
                second.1,
                ParserErrorKind::MoreThanOneModuleRegistryCalls { count: calls.len() },
            ));
        }
    };

    let [argument] = call.arguments.as_slice() else {
        return Err(fault(
            span,
            ParserErrorKind::IncorrectModuleRegistryCallArity {
                method: method.into(),
                arity: call.arguments.len(),
            },
        ));
    };
    let ExprKind::StringLiteral(registered) = &argument.kind else {
        return Err(fault(
            argument.span,
            ParserErrorKind::IncorrectModuleRegistryCallArgumentType {
                method: method.into(),
                found: argument.kind_name().into(),
            },
        ));
    };

    let Some(type_arguments) = &call.type_arguments else {
        return Err(fault(
            span,
            ParserErrorKind::UntypedModuleRegistryCall {
                method: method.into(),
                module_name: registered.clone(),
            },
        ));
    };
    match type_arguments.params.as_slice() {
        [param]
            if matches!(
                &param.kind,
                TypeKind::Reference { name, type_arguments: None } if name == MODULE_INTERFACE_NAME
            ) =>
        {
            Ok(registered.clone())
        }
        _ => Err(fault(
            type_arguments.span,
            ParserErrorKind::IncorrectModuleRegistryCallTypeParameter {
                method: method.into(),
                module_name: registered.clone(),
            },
        )),
    }
}

fn build_method<'a>(
    translator: &TypeTranslator<'a>,
    method: &'a MethodSignature,
    aliases: &mut AliasMap,
    capturer: &mut ErrorCapturer,
) -> Result<PropertyShape, ParserError> {
    let function = translator.translate_function(&method.signature, aliases, capturer)?;
    Ok(NamedShape::new(
        method.name.name.as_str(),
        method.optional,
        Nullable::non_null(function),
    ))
}

/// A property is accepted only when its value resolves to a function type.
fn build_function_property<'a>(
    translator: &TypeTranslator<'a>,
    span: Span,
    property: &'a PropertySignature,
    aliases: &mut AliasMap,
    capturer: &mut ErrorCapturer,
) -> Result<PropertyShape, ParserError> {
    let name = &property.name.name;
    let unsupported = |span: Span, found: String| {
        ParserError::new(
            translator.module_name(),
            span,
            ParserErrorKind::UnsupportedModuleProperty {
                name: name.clone(),
                found,
            },
        )
    };

    let Some(value) = &property.type_annotation else {
        return Err(unsupported(span, "a missing type annotation".into()));
    };
    let resolution = translator.resolve(value);
    match resolution.resolved {
        ResolvedType::Node(node) => match &node.kind {
            TypeKind::Function(signature) => {
                let function = translator.translate_function(signature, aliases, capturer)?;
                Ok(NamedShape::new(
                    name.as_str(),
                    property.optional,
                    wrap_nullable(resolution.nullable, function),
                ))
            }
            _ => Err(unsupported(value.span, node.kind_name())),
        },
        ResolvedType::InterfaceBody(decl) => {
            Err(unsupported(value.span, format!("interface '{}'", decl.name.name)))
        }
    }
}
