//! Closed syntax tree consumed by the schema builder.
//!
//! Readers (see [`crate::input`]) lower concrete source syntax into these
//! types. Every node that can be blamed in a diagnostic carries a [`Span`].
//! Shapes the builder never inspects are kept as `Other` variants so that
//! unsupported syntax fails loudly during translation instead of vanishing.

use serde::Serialize;

/// Source position of a node. `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An identifier with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A parsed source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            statements,
            span: Span::default(),
        }
    }

    /// Top-level declarations, looking through `export` wrappers.
    pub fn declarations(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter().map(Statement::unexported)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    Enum(EnumDecl),
    /// `export <declaration>`
    Export(Box<Statement>),
    /// `export default <expression>`
    ExportDefault(Expr),
    Expression(Expr),
    Variable(Vec<VariableDeclarator>),
    /// `import ...`
    Import,
    /// Any other statement. Sub-expressions are kept for tree-wide searches.
    Other { kind: String, children: Vec<Expr> },
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The declaration behind an `export` wrapper, or the statement itself.
    pub fn unexported(&self) -> &Statement {
        match &self.kind {
            StatementKind::Export(inner) => inner.unexported(),
            _ => self,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: Ident,
    /// Heritage clause entries (`extends A, B<T>`).
    pub extends: Vec<TypeNode>,
    pub members: Vec<TypeMember>,
    pub span: Span,
}

impl InterfaceDecl {
    /// Names listed in the `extends` clause.
    pub fn extended_names(&self) -> impl Iterator<Item = &str> {
        self.extends.iter().filter_map(|ty| match &ty.kind {
            TypeKind::Reference { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: Ident,
    pub value: TypeNode,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Ident,
    pub members: Vec<EnumMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: Ident,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: Ident,
    pub type_annotation: Option<TypeNode>,
    pub init: Option<Expr>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Identifier(String),
    StringLiteral(String),
    NumberLiteral(f64),
    /// `object.property` or, when `computed`, `object[property]`.
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
    Call(CallExpr),
    /// Any other expression, with its sub-expressions.
    Other { kind: String, children: Vec<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    /// `None` when the call has no `<...>` clause at all.
    pub type_arguments: Option<TypeArguments>,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeArguments {
    pub params: Vec<TypeNode>,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Short description of the expression kind, used in diagnostics.
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            ExprKind::Identifier(_) => "identifier",
            ExprKind::StringLiteral(_) => "string literal",
            ExprKind::NumberLiteral(_) => "number literal",
            ExprKind::Member { .. } => "member expression",
            ExprKind::Call(_) => "call expression",
            ExprKind::Other { kind, .. } => kind.as_str(),
        }
    }

    /// Visit this expression and every expression nested inside it, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match &self.kind {
            ExprKind::Identifier(_) | ExprKind::StringLiteral(_) | ExprKind::NumberLiteral(_) => {}
            ExprKind::Member {
                object, property, ..
            } => {
                object.walk(visit);
                property.walk(visit);
            }
            ExprKind::Call(call) => {
                call.callee.walk(visit);
                for arg in &call.arguments {
                    arg.walk(visit);
                }
            }
            ExprKind::Other { children, .. } => {
                for child in children {
                    child.walk(visit);
                }
            }
        }
    }
}

impl Statement {
    /// Visit every expression reachable from this statement.
    pub fn walk_exprs<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        match &self.kind {
            StatementKind::Export(inner) => inner.walk_exprs(visit),
            StatementKind::ExportDefault(expr) | StatementKind::Expression(expr) => {
                expr.walk(visit)
            }
            StatementKind::Variable(declarators) => {
                for init in declarators.iter().filter_map(|d| d.init.as_ref()) {
                    init.walk(visit);
                }
            }
            StatementKind::Enum(decl) => {
                for init in decl.members.iter().filter_map(|m| m.initializer.as_ref()) {
                    init.walk(visit);
                }
            }
            StatementKind::Other { children, .. } => {
                for child in children {
                    child.walk(visit);
                }
            }
            StatementKind::Interface(_) | StatementKind::TypeAlias(_) | StatementKind::Import => {}
        }
    }
}

impl Program {
    /// Every call expression in the file, in source order.
    pub fn call_expressions(&self) -> Vec<(&CallExpr, Span)> {
        let mut calls = Vec::new();
        for stmt in &self.statements {
            stmt.walk_exprs(&mut |expr| {
                if let ExprKind::Call(call) = &expr.kind {
                    calls.push((call, expr.span));
                }
            });
        }
        calls
    }
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Any,
    BigInt,
    Boolean,
    Never,
    Null,
    Number,
    Object,
    String,
    Symbol,
    Undefined,
    Unknown,
    Void,
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "any" => Self::Any,
            "bigint" => Self::BigInt,
            "boolean" => Self::Boolean,
            "never" => Self::Never,
            "null" => Self::Null,
            "number" => Self::Number,
            "object" => Self::Object,
            "string" => Self::String,
            "symbol" => Self::Symbol,
            "undefined" => Self::Undefined,
            "unknown" => Self::Unknown,
            "void" => Self::Void,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::BigInt => "bigint",
            Self::Boolean => "boolean",
            Self::Never => "never",
            Self::Null => "null",
            Self::Number => "number",
            Self::Object => "object",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Undefined => "undefined",
            Self::Unknown => "unknown",
            Self::Void => "void",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralType {
    String(String),
    Number(f64),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOperator {
    Readonly,
    Keyof,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Keyword(Keyword),
    /// `Name`, `A.B` or `Name<Args>`. `type_arguments` is `None` without `<...>`.
    Reference {
        name: String,
        type_arguments: Option<TypeArguments>,
    },
    /// `T[]`
    Array(Box<TypeNode>),
    /// `readonly T`, `keyof T`
    Operator {
        operator: TypeOperator,
        operand: Box<TypeNode>,
    },
    /// `{ a: T; b(): U }`
    ObjectLiteral(Vec<TypeMember>),
    /// `(a: T) => U`
    Function(FunctionSignature),
    Union(Vec<TypeNode>),
    Literal(LiteralType),
    Parenthesized(Box<TypeNode>),
    Tuple(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    /// Syntax the builder has no mapping for, named by its grammar kind.
    Other(String),
}

impl TypeNode {
    pub fn new(kind: TypeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn keyword(keyword: Keyword) -> Self {
        Self::new(TypeKind::Keyword(keyword), Span::default())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(
            TypeKind::Reference {
                name: name.into(),
                type_arguments: None,
            },
            Span::default(),
        )
    }

    /// Whether this is the `null` or `undefined` keyword.
    pub fn is_null_like(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Keyword(Keyword::Null | Keyword::Undefined)
        )
    }

    /// Human-readable name of the node's syntactic kind.
    pub fn kind_name(&self) -> String {
        match &self.kind {
            TypeKind::Keyword(keyword) => keyword.as_str().to_string(),
            TypeKind::Reference { name, .. } => format!("reference to '{}'", name),
            TypeKind::Array(_) => "array type".into(),
            TypeKind::Operator { operator, .. } => match operator {
                TypeOperator::Readonly => "readonly operator".into(),
                TypeOperator::Keyof => "keyof operator".into(),
            },
            TypeKind::ObjectLiteral(_) => "object literal type".into(),
            TypeKind::Function(_) => "function type".into(),
            TypeKind::Union(_) => "union type".into(),
            TypeKind::Literal(LiteralType::String(_)) => "string literal type".into(),
            TypeKind::Literal(LiteralType::Number(_)) => "number literal type".into(),
            TypeKind::Literal(LiteralType::Boolean(_)) => "boolean literal type".into(),
            TypeKind::Parenthesized(_) => "parenthesized type".into(),
            TypeKind::Tuple(_) => "tuple type".into(),
            TypeKind::Intersection(_) => "intersection type".into(),
            TypeKind::Other(kind) => kind.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeMember {
    pub kind: TypeMemberKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeMemberKind {
    /// `name?: T`
    Property(PropertySignature),
    /// `name?(params): T`
    Method(MethodSignature),
    /// `[key: K]: V`
    Index,
    /// `(params): T`
    Call,
    /// `new (params): T`
    Construct,
}

impl TypeMember {
    /// Name of the member, when it has one.
    pub fn name(&self) -> Option<&Ident> {
        match &self.kind {
            TypeMemberKind::Property(prop) => Some(&prop.name),
            TypeMemberKind::Method(method) => Some(&method.name),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TypeMemberKind::Property(_) => "property signature",
            TypeMemberKind::Method(_) => "method signature",
            TypeMemberKind::Index => "index signature",
            TypeMemberKind::Call => "call signature",
            TypeMemberKind::Construct => "construct signature",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    pub name: Ident,
    pub optional: bool,
    pub type_annotation: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: Ident,
    pub optional: bool,
    pub signature: FunctionSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub params: Vec<Param>,
    pub return_type: Option<Box<TypeNode>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub optional: bool,
    pub type_annotation: Option<TypeNode>,
    pub span: Span,
}
