//! Per-file type declarations and alias resolution.

use crate::ast::{
    EnumDecl, InterfaceDecl, Program, StatementKind, TypeAliasDecl, TypeKind, TypeNode,
};
use std::collections::HashMap;

/// A named type declaration.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    Interface(&'a InterfaceDecl),
    TypeAlias(&'a TypeAliasDecl),
    Enum(&'a EnumDecl),
}

/// Every interface, type alias and enum declared at the top level of one file.
///
/// Built once per module and never mutated afterwards. A later declaration
/// with the same name replaces an earlier one.
#[derive(Debug, Default)]
pub struct TypeEnvironment<'a> {
    declarations: HashMap<&'a str, Declaration<'a>>,
}

impl<'a> TypeEnvironment<'a> {
    pub fn new(program: &'a Program) -> Self {
        let mut declarations = HashMap::new();
        for stmt in program.declarations() {
            let (name, decl) = match &stmt.kind {
                StatementKind::Interface(decl) => (&decl.name.name, Declaration::Interface(decl)),
                StatementKind::TypeAlias(decl) => (&decl.name.name, Declaration::TypeAlias(decl)),
                StatementKind::Enum(decl) => (&decl.name.name, Declaration::Enum(decl)),
                _ => continue,
            };
            declarations.insert(name.as_str(), decl);
        }
        Self { declarations }
    }

    pub fn get(&self, name: &str) -> Option<Declaration<'a>> {
        self.declarations.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// A type node after nullability markers and aliases have been peeled off.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedType<'a> {
    /// A node from the tree.
    Node(&'a TypeNode),
    /// The body of an interface reached through a reference; translated like
    /// an object literal.
    InterfaceBody(&'a InterfaceDecl),
}

impl<'a> ResolvedType<'a> {
    pub fn node(self) -> Option<&'a TypeNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::InterfaceBody(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub nullable: bool,
    pub resolved: ResolvedType<'a>,
    /// Name of the last alias followed, if any.
    pub alias_name: Option<&'a str>,
    /// Remaining members of a union that also listed `null` or `undefined`.
    /// Only set when more than one non-null member remains.
    pub union_members: Option<Vec<&'a TypeNode>>,
}

/// Peel nullability markers, parentheses and alias indirections off `node`.
///
/// Does not look inside generic arguments. An alias that is reached a second
/// time ends resolution at the reference to it.
pub fn resolve_type_annotation<'a>(
    node: &'a TypeNode,
    env: &TypeEnvironment<'a>,
) -> Resolution<'a> {
    let mut nullable = false;
    let mut alias_name = None;
    let mut followed: Vec<&'a str> = Vec::new();
    let mut current = node;

    loop {
        match &current.kind {
            TypeKind::Parenthesized(inner) => current = &**inner,
            TypeKind::Union(members) if members.iter().any(TypeNode::is_null_like) => {
                nullable = true;
                let rest: Vec<&TypeNode> = members.iter().filter(|m| !m.is_null_like()).collect();
                if rest.len() > 1 {
                    return resolution(nullable, current, alias_name, Some(rest));
                }
                match rest.first() {
                    Some(single) => current = *single,
                    None => return resolution(nullable, current, alias_name, None),
                }
            }
            TypeKind::Reference {
                name,
                type_arguments: None,
            } => match env.get(name) {
                Some(Declaration::TypeAlias(decl)) => {
                    let name = decl.name.name.as_str();
                    if followed.contains(&name) {
                        return resolution(nullable, current, alias_name, None);
                    }
                    followed.push(name);
                    alias_name = Some(name);
                    current = &decl.value;
                }
                Some(Declaration::Interface(decl)) if !is_module_interface(decl) => {
                    return Resolution {
                        nullable,
                        resolved: ResolvedType::InterfaceBody(decl),
                        alias_name: Some(decl.name.name.as_str()),
                        union_members: None,
                    };
                }
                _ => return resolution(nullable, current, alias_name, None),
            },
            _ => return resolution(nullable, current, alias_name, None),
        }
    }
}

/// Name of the interface every module spec extends.
pub const MODULE_BASE_INTERFACE: &str = "TurboModule";

/// Whether `decl` extends exactly the module base interface.
pub fn is_module_interface(decl: &InterfaceDecl) -> bool {
    let mut names = decl.extended_names();
    decl.extends.len() == 1 && names.next() == Some(MODULE_BASE_INTERFACE)
}

fn resolution<'a>(
    nullable: bool,
    node: &'a TypeNode,
    alias_name: Option<&'a str>,
    union_members: Option<Vec<&'a TypeNode>>,
) -> Resolution<'a> {
    Resolution {
        nullable,
        resolved: ResolvedType::Node(node),
        alias_name,
        union_members,
    }
}
