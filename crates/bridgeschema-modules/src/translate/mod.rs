//! Translation of type annotations into the IR.
//!
//! [`TypeTranslator`] carries the three facts every recursive call needs: the
//! owning module's name (for diagnostics), the file's [`TypeEnvironment`] and
//! whether the module is native-only (`Cxx`). None of them change while a
//! module is translated. It also tracks the aliases currently being expanded,
//! so that an alias which contains itself (`type List = Array<List>`) fails
//! instead of recursing forever.

mod function;

use crate::ast::{
    EnumDecl, ExprKind, InterfaceDecl, Keyword, LiteralType, Span, TypeArguments, TypeKind,
    TypeMember, TypeMemberKind, TypeNode, TypeOperator,
};
use crate::capture::ErrorCapturer;
use crate::env::{
    Declaration, Resolution, ResolvedType, TypeEnvironment, resolve_type_annotation,
};
use crate::error::{ParserError, ParserErrorKind};
use crate::ir::{
    AliasMap, EnumMemberType, NamedShape, NullableAnnotation, ObjectTypeAnnotation,
    TypeAnnotation, UnionMemberType,
};
use crate::nullable::{unwrap_nullable, wrap_nullable};
use std::cell::RefCell;

pub struct TypeTranslator<'a> {
    module_name: &'a str,
    env: &'a TypeEnvironment<'a>,
    cxx_only: bool,
    expanding: RefCell<Vec<&'a str>>,
}

/// Removes its alias from the expansion stack when dropped.
struct Expansion<'t, 'a> {
    stack: &'t RefCell<Vec<&'a str>>,
}

impl Drop for Expansion<'_, '_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

impl<'a> TypeTranslator<'a> {
    pub fn new(module_name: &'a str, env: &'a TypeEnvironment<'a>, cxx_only: bool) -> Self {
        Self {
            module_name,
            env,
            cxx_only,
            expanding: RefCell::new(Vec::new()),
        }
    }

    pub fn module_name(&self) -> &'a str {
        self.module_name
    }

    pub fn is_cxx_only(&self) -> bool {
        self.cxx_only
    }

    pub fn resolve(&self, node: &'a TypeNode) -> Resolution<'a> {
        resolve_type_annotation(node, self.env)
    }

    pub(crate) fn error(&self, span: Span, kind: ParserErrorKind) -> ParserError {
        ParserError::new(self.module_name, span, kind)
    }

    /// Mark `name` as being expanded until the returned guard is dropped.
    fn expand(&self, name: &'a str, node: &TypeNode) -> Result<Expansion<'_, 'a>, ParserError> {
        if self.expanding.borrow().contains(&name) {
            return Err(self.error(
                node.span,
                ParserErrorKind::UnsupportedGeneric { name: name.into() },
            ));
        }
        self.expanding.borrow_mut().push(name);
        Ok(Expansion {
            stack: &self.expanding,
        })
    }

    /// Translate one type annotation.
    ///
    /// Named object types are registered in `aliases` and returned as
    /// [`TypeAnnotation::TypeAlias`] references. Faults of nested object
    /// members and function parameters are recorded in `capturer`.
    pub fn translate(
        &self,
        node: &'a TypeNode,
        aliases: &mut AliasMap,
        capturer: &mut ErrorCapturer,
    ) -> Result<NullableAnnotation, ParserError> {
        let resolution = self.resolve(node);
        let nullable = resolution.nullable;

        let node = match resolution.resolved {
            ResolvedType::InterfaceBody(decl) => {
                let members = self.interface_members(decl, &mut Vec::new())?;
                let annotation =
                    self.translate_named_object(&decl.name.name, members, aliases, capturer)?;
                return Ok(wrap_nullable(nullable, annotation));
            }
            ResolvedType::Node(node) => node,
        };

        if let TypeKind::ObjectLiteral(members) = &node.kind {
            let annotation = match resolution.alias_name {
                Some(name) => self.translate_named_object(name, members, aliases, capturer)?,
                None => TypeAnnotation::Object(self.translate_object(members, aliases, capturer)?),
            };
            return Ok(wrap_nullable(nullable, annotation));
        }

        if let Some(members) = &resolution.union_members {
            return Ok(wrap_nullable(nullable, self.translate_union(node, members)?));
        }

        let _expansion = match resolution.alias_name {
            Some(name) => Some(self.expand(name, node)?),
            None => None,
        };
        let annotation = match &node.kind {
            TypeKind::Array(element) => self.translate_array(element, aliases, capturer),
            TypeKind::Operator {
                operator: TypeOperator::Readonly,
                operand,
            } => match &operand.kind {
                TypeKind::Array(element) => self.translate_array(element, aliases, capturer),
                _ => {
                    return Err(self.error(
                        node.span,
                        ParserErrorKind::UnsupportedGeneric {
                            name: format!("readonly {}", operand.kind_name()),
                        },
                    ));
                }
            },
            TypeKind::Operator { .. } => {
                return Err(self.error(
                    node.span,
                    ParserErrorKind::UnsupportedGeneric {
                        name: node.kind_name(),
                    },
                ));
            }
            TypeKind::Reference {
                name,
                type_arguments,
            } => self.translate_reference(node, name, type_arguments.as_ref(), aliases, capturer)?,
            TypeKind::Keyword(keyword) => match keyword {
                Keyword::Boolean => TypeAnnotation::Boolean,
                Keyword::Number => TypeAnnotation::Number,
                Keyword::String => TypeAnnotation::String,
                Keyword::Void => TypeAnnotation::Void,
                Keyword::Unknown if self.cxx_only => TypeAnnotation::Mixed,
                _ => return Err(self.unsupported(node)),
            },
            TypeKind::Function(signature) => {
                TypeAnnotation::Function(self.translate_function(signature, aliases, capturer)?)
            }
            TypeKind::Union(members) => {
                let members: Vec<&TypeNode> = members.iter().collect();
                self.translate_union(node, &members)?
            }
            _ => return Err(self.unsupported(node)),
        };

        Ok(wrap_nullable(nullable, annotation))
    }

    fn unsupported(&self, node: &TypeNode) -> ParserError {
        self.error(
            node.span,
            ParserErrorKind::UnsupportedTypeAnnotation {
                found: node.kind_name(),
            },
        )
    }

    /// Element faults never escape: the array survives with its element type
    /// absent. Void, Promise and function elements are reported.
    fn translate_array(
        &self,
        element: &'a TypeNode,
        aliases: &mut AliasMap,
        capturer: &mut ErrorCapturer,
    ) -> TypeAnnotation {
        let mut scratch = ErrorCapturer::discarding();
        let Ok(element_type) = self.translate(element, aliases, &mut scratch) else {
            return TypeAnnotation::array(None);
        };

        match element_type.value {
            TypeAnnotation::Void | TypeAnnotation::Promise | TypeAnnotation::Function(_) => {
                capturer.record(self.error(
                    element.span,
                    ParserErrorKind::UnsupportedArrayElementTypeAnnotation {
                        found: element_type.value.kind_name().to_string(),
                    },
                ));
                TypeAnnotation::array(None)
            }
            _ => TypeAnnotation::array(Some(element_type)),
        }
    }

    fn translate_reference(
        &self,
        node: &'a TypeNode,
        name: &str,
        type_arguments: Option<&'a TypeArguments>,
        aliases: &mut AliasMap,
        capturer: &mut ErrorCapturer,
    ) -> Result<TypeAnnotation, ParserError> {
        let annotation = match name {
            "RootTag" => TypeAnnotation::RootTag,
            "Promise" => {
                self.single_type_argument(node, name, type_arguments)?;
                TypeAnnotation::Promise
            }
            "Array" | "ReadonlyArray" => {
                let element = self.single_type_argument(node, name, type_arguments)?;
                self.translate_array(element, aliases, capturer)
            }
            "Stringish" => TypeAnnotation::Stringish,
            "Int32" => TypeAnnotation::Int32,
            "Double" => TypeAnnotation::Double,
            "Float" => TypeAnnotation::Float,
            "Object" | "UnsafeObject" => TypeAnnotation::GenericObject,
            _ => match self.env.get(name) {
                Some(Declaration::Enum(decl)) if self.cxx_only => self.translate_enum(node, decl)?,
                _ => {
                    return Err(self.error(
                        node.span,
                        ParserErrorKind::UnsupportedGeneric { name: name.into() },
                    ));
                }
            },
        };
        Ok(annotation)
    }

    fn single_type_argument(
        &self,
        node: &TypeNode,
        name: &str,
        type_arguments: Option<&'a TypeArguments>,
    ) -> Result<&'a TypeNode, ParserError> {
        let params = type_arguments.map(|args| args.params.as_slice()).unwrap_or_default();
        match params {
            [single] => Ok(single),
            _ => Err(self.error(
                type_arguments.map_or(node.span, |args| args.span),
                ParserErrorKind::IncorrectlyParameterizedGeneric {
                    name: name.into(),
                    count: params.len(),
                },
            )),
        }
    }

    /// The first member decides the enum's member type.
    fn translate_enum(&self, node: &TypeNode, decl: &EnumDecl) -> Result<TypeAnnotation, ParserError> {
        let unsupported = |found: &str| {
            self.error(
                node.span,
                ParserErrorKind::UnsupportedEnumDeclaration {
                    name: decl.name.name.clone(),
                    found: found.into(),
                },
            )
        };

        let Some(first) = decl.members.first() else {
            return Err(unsupported("no members"));
        };
        let member_type = match first.initializer.as_ref().map(|init| &init.kind) {
            None | Some(ExprKind::NumberLiteral(_)) => EnumMemberType::Number,
            Some(ExprKind::StringLiteral(_)) => EnumMemberType::String,
            Some(_) => {
                let found = first.initializer.as_ref().map_or("", |init| init.kind_name());
                return Err(unsupported(found));
            }
        };
        Ok(TypeAnnotation::Enum { member_type })
    }

    /// Only native-only modules accept unions, and only when every member
    /// normalizes to the same kind.
    fn translate_union(
        &self,
        node: &TypeNode,
        members: &[&TypeNode],
    ) -> Result<TypeAnnotation, ParserError> {
        let mut member_types: Vec<UnionMemberType> = Vec::new();
        for member in members {
            let member_type = match &member.kind {
                TypeKind::Literal(LiteralType::Number(_)) => UnionMemberType::Number,
                TypeKind::Literal(LiteralType::String(_)) => UnionMemberType::String,
                _ => UnionMemberType::Object,
            };
            if !member_types.contains(&member_type) {
                member_types.push(member_type);
            }
        }

        match member_types.as_slice() {
            [member_type] if self.cxx_only => Ok(TypeAnnotation::Union {
                member_type: *member_type,
            }),
            _ => Err(self.error(
                node.span,
                ParserErrorKind::UnsupportedUnionTypeAnnotation {
                    member_types: member_types.iter().map(|t| t.as_str().to_string()).collect(),
                },
            )),
        }
    }

    /// Register a named object type once and refer to it by name.
    ///
    /// The name is reserved before the members are translated so that
    /// self-referencing types terminate.
    fn translate_named_object(
        &self,
        name: &str,
        members: impl IntoIterator<Item = &'a TypeMember>,
        aliases: &mut AliasMap,
        capturer: &mut ErrorCapturer,
    ) -> Result<TypeAnnotation, ParserError> {
        if !aliases.contains_key(name) {
            aliases.insert(name.to_string(), ObjectTypeAnnotation { properties: vec![] });
            let object = self.translate_object(members, aliases, capturer)?;
            aliases.insert(name.to_string(), object);
        }
        Ok(TypeAnnotation::TypeAlias { name: name.into() })
    }

    /// Members of an interface with those of the interfaces it extends.
    ///
    /// Inherited members come first; a member redeclared further down the
    /// chain replaces the inherited one in place. Every base must be a
    /// non-generic interface declared in the same file. `path` holds the
    /// interfaces being flattened, so circular heritage fails.
    fn interface_members(
        &self,
        decl: &'a InterfaceDecl,
        path: &mut Vec<&'a str>,
    ) -> Result<Vec<&'a TypeMember>, ParserError> {
        path.push(decl.name.name.as_str());
        let mut members: Vec<&'a TypeMember> = Vec::new();
        for base in &decl.extends {
            let base_decl = match &base.kind {
                TypeKind::Reference {
                    name,
                    type_arguments: None,
                } if !path.contains(&name.as_str()) => match self.env.get(name) {
                    Some(Declaration::Interface(base_decl)) => Some(base_decl),
                    _ => None,
                },
                _ => None,
            };
            let Some(base_decl) = base_decl else {
                let name = match &base.kind {
                    TypeKind::Reference { name, .. } => name.clone(),
                    _ => base.kind_name(),
                };
                return Err(self.error(base.span, ParserErrorKind::UnsupportedGeneric { name }));
            };
            for member in self.interface_members(base_decl, path)? {
                push_member(&mut members, member);
            }
        }
        for member in &decl.members {
            push_member(&mut members, member);
        }
        path.pop();
        Ok(members)
    }

    fn translate_object(
        &self,
        members: impl IntoIterator<Item = &'a TypeMember>,
        aliases: &mut AliasMap,
        capturer: &mut ErrorCapturer,
    ) -> Result<ObjectTypeAnnotation, ParserError> {
        let mut properties = Vec::new();
        for member in members {
            let property =
                capturer.capture(|capturer| self.translate_object_member(member, aliases, capturer))?;
            properties.extend(property);
        }
        Ok(ObjectTypeAnnotation { properties })
    }

    fn translate_object_member(
        &self,
        member: &'a TypeMember,
        aliases: &mut AliasMap,
        capturer: &mut ErrorCapturer,
    ) -> Result<NamedShape<NullableAnnotation>, ParserError> {
        let TypeMemberKind::Property(property) = &member.kind else {
            return Err(self.error(
                member.span,
                ParserErrorKind::UnsupportedObjectPropertyTypeAnnotation {
                    found: member.kind_name().into(),
                },
            ));
        };
        let name = &property.name.name;
        let Some(value) = &property.type_annotation else {
            return Err(self.error(
                member.span,
                ParserErrorKind::UnsupportedObjectPropertyValueTypeAnnotation {
                    name: name.clone(),
                    found: "a missing type annotation".into(),
                },
            ));
        };

        let (annotation, nullable) = unwrap_nullable(self.translate(value, aliases, capturer)?);
        match annotation {
            TypeAnnotation::Function(_) | TypeAnnotation::Void | TypeAnnotation::Promise => {
                Err(self.error(
                    value.span,
                    ParserErrorKind::UnsupportedObjectPropertyValueTypeAnnotation {
                        name: name.clone(),
                        found: annotation.kind_name().into(),
                    },
                ))
            }
            _ => Ok(NamedShape::new(
                name.as_str(),
                property.optional,
                wrap_nullable(nullable, annotation),
            )),
        }
    }
}

/// Append `member`, replacing an earlier member of the same name.
fn push_member<'a>(members: &mut Vec<&'a TypeMember>, member: &'a TypeMember) {
    let same_name = member.name().and_then(|name| {
        members
            .iter()
            .position(|m| m.name().is_some_and(|n| n.name == name.name))
    });
    match same_name {
        Some(index) => members[index] = member,
        None => members.push(member),
    }
}
