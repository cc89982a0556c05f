//! Tree-sitter based TypeScript reader.
//!
//! Only the parts of the language a module spec can use are modelled; other
//! statements and expressions keep their sub-expressions so that the
//! registration call can be found anywhere in the file.

use super::{ReadError, Reader};
use crate::ast::*;
use tree_sitter::{Node, Parser, Tree};

/// Static instance of the TypeScript reader.
pub static TYPESCRIPT_READER: TypeScriptReader = TypeScriptReader;

/// TypeScript reader using tree-sitter.
pub struct TypeScriptReader;

impl Reader for TypeScriptReader {
    fn language(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ts", "tsx"]
    }

    fn read(&self, source: &str) -> Result<Program, ReadError> {
        read_typescript(source)
    }
}

/// Parse TypeScript source into the syntax tree.
pub fn read_typescript(source: &str) -> Result<Program, ReadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_typescript::language().into())
        .map_err(|err| ReadError::Parse(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ReadError::Parse("failed to parse".into()))?;

    let ctx = ReadContext::new(source);
    ctx.read_program(&tree)
}

struct ReadContext<'a> {
    source: &'a str,
}

impl<'a> ReadContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn span(&self, node: Node) -> Span {
        let start = node.start_position();
        Span::new(node.start_byte(), node.end_byte(), start.row + 1, start.column + 1)
    }

    fn ident(&self, node: Node) -> Ident {
        Ident::new(self.node_text(node), self.span(node))
    }

    /// Named children, comments excluded.
    fn named_children<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect()
    }

    fn first_named_child<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        self.named_children(node).into_iter().next()
    }

    fn has_question_mark(&self, node: Node) -> bool {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() && self.node_text(child) == "?" {
                return true;
            }
        }
        false
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>, ReadError> {
        node.child_by_field_name(name).ok_or_else(|| {
            ReadError::Unsupported(format!("{} without {} at {}", node.kind(), name, self.span(node)))
        })
    }

    fn read_program(&self, tree: &Tree) -> Result<Program, ReadError> {
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).map_or(self.span(root), |node| self.span(node));
            return Err(ReadError::Parse(format!("syntax error at {}", at)));
        }

        let mut statements = Vec::new();
        for child in self.named_children(root) {
            statements.push(self.read_stmt(child)?);
        }

        let mut program = Program::new(statements);
        program.span = self.span(root);
        Ok(program)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn read_stmt(&self, node: Node) -> Result<Statement, ReadError> {
        let span = self.span(node);
        let kind = match node.kind() {
            "interface_declaration" => StatementKind::Interface(self.read_interface(node)?),
            "type_alias_declaration" => StatementKind::TypeAlias(TypeAliasDecl {
                name: self.ident(self.field(node, "name")?),
                value: self.read_type(self.field(node, "value")?)?,
                span,
            }),
            "enum_declaration" => StatementKind::Enum(self.read_enum(node)?),
            "export_statement" => {
                if let Some(decl) = node.child_by_field_name("declaration") {
                    StatementKind::Export(Box::new(self.read_stmt(decl)?))
                } else if let Some(value) = node.child_by_field_name("value") {
                    StatementKind::ExportDefault(self.read_expr(value)?)
                } else {
                    self.read_other_stmt(node)?
                }
            }
            "import_statement" => StatementKind::Import,
            "lexical_declaration" | "variable_declaration" => {
                let mut declarators = Vec::new();
                for child in self.named_children(node) {
                    if child.kind() == "variable_declarator" {
                        declarators.push(self.read_variable_declarator(child)?);
                    }
                }
                StatementKind::Variable(declarators)
            }
            "expression_statement" => match self.first_named_child(node) {
                Some(expr) => StatementKind::Expression(self.read_expr(expr)?),
                None => self.read_other_stmt(node)?,
            },
            _ => self.read_other_stmt(node)?,
        };
        Ok(Statement::new(kind, span))
    }

    fn read_other_stmt(&self, node: Node) -> Result<StatementKind, ReadError> {
        Ok(StatementKind::Other {
            kind: node.kind().to_string(),
            children: self.read_child_exprs(node)?,
        })
    }

    fn read_interface(&self, node: Node) -> Result<InterfaceDecl, ReadError> {
        let name = self.ident(self.field(node, "name")?);

        let mut extends = Vec::new();
        for child in self.named_children(node) {
            if child.kind() == "extends_type_clause" {
                for base in self.named_children(child) {
                    extends.push(self.read_type(base)?);
                }
            }
        }

        let members = self.read_members(self.field(node, "body")?)?;
        Ok(InterfaceDecl {
            name,
            extends,
            members,
            span: self.span(node),
        })
    }

    fn read_enum(&self, node: Node) -> Result<EnumDecl, ReadError> {
        let name = self.ident(self.field(node, "name")?);
        let mut members = Vec::new();
        for child in self.named_children(self.field(node, "body")?) {
            let member = match child.kind() {
                "enum_assignment" => EnumMember {
                    name: self.property_name(self.field(child, "name")?),
                    initializer: Some(self.read_expr(self.field(child, "value")?)?),
                },
                _ => EnumMember {
                    name: self.property_name(child),
                    initializer: None,
                },
            };
            members.push(member);
        }
        Ok(EnumDecl {
            name,
            members,
            span: self.span(node),
        })
    }

    fn read_variable_declarator(&self, node: Node) -> Result<VariableDeclarator, ReadError> {
        let type_annotation = match node.child_by_field_name("type") {
            Some(annotation) => self.read_type_annotation(annotation)?,
            None => None,
        };
        let init = match node.child_by_field_name("value") {
            Some(value) => Some(self.read_expr(value)?),
            None => None,
        };
        Ok(VariableDeclarator {
            name: self.ident(self.field(node, "name")?),
            type_annotation,
            init,
        })
    }

    /// Property key with string quotes removed.
    fn property_name(&self, node: Node) -> Ident {
        let text = match node.kind() {
            "string" => unquote(self.node_text(node)),
            _ => self.node_text(node),
        };
        Ident::new(text, self.span(node))
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn read_members(&self, body: Node) -> Result<Vec<TypeMember>, ReadError> {
        let mut members = Vec::new();
        for child in self.named_children(body) {
            members.push(self.read_member(child)?);
        }
        Ok(members)
    }

    fn read_member(&self, node: Node) -> Result<TypeMember, ReadError> {
        let kind = match node.kind() {
            "property_signature" => {
                let type_annotation = match node.child_by_field_name("type") {
                    Some(annotation) => self.read_type_annotation(annotation)?,
                    None => None,
                };
                TypeMemberKind::Property(PropertySignature {
                    name: self.property_name(self.field(node, "name")?),
                    optional: self.has_question_mark(node),
                    type_annotation,
                })
            }
            "method_signature" => TypeMemberKind::Method(MethodSignature {
                name: self.property_name(self.field(node, "name")?),
                optional: self.has_question_mark(node),
                signature: self.read_signature(node)?,
            }),
            "index_signature" => TypeMemberKind::Index,
            "construct_signature" => TypeMemberKind::Construct,
            _ => TypeMemberKind::Call,
        };
        Ok(TypeMember {
            kind,
            span: self.span(node),
        })
    }

    /// Parameters and return type of a method signature or function type.
    fn read_signature(&self, node: Node) -> Result<FunctionSignature, ReadError> {
        let parameters = node.child_by_field_name("parameters").or_else(|| {
            self.named_children(node)
                .into_iter()
                .find(|child| child.kind() == "formal_parameters")
        });

        let mut params = Vec::new();
        if let Some(parameters) = parameters {
            for param in self.named_children(parameters) {
                params.push(self.read_param(param)?);
            }
        }

        let return_type = match node.child_by_field_name("return_type") {
            Some(ret) if ret.kind() == "type_annotation" => self.read_type_annotation(ret)?,
            Some(ret) => Some(self.read_type(ret)?),
            None => None,
        };

        Ok(FunctionSignature {
            params,
            return_type: return_type.map(Box::new),
            span: self.span(node),
        })
    }

    fn read_param(&self, node: Node) -> Result<Param, ReadError> {
        let name = match node.child_by_field_name("pattern") {
            Some(pattern) => self.ident(pattern),
            None => self.ident(node),
        };
        let type_annotation = match node.child_by_field_name("type") {
            Some(annotation) => self.read_type_annotation(annotation)?,
            None => None,
        };
        Ok(Param {
            name,
            optional: node.kind() == "optional_parameter",
            type_annotation,
            span: self.span(node),
        })
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// The type inside a `: T` annotation.
    fn read_type_annotation(&self, node: Node) -> Result<Option<TypeNode>, ReadError> {
        match self.first_named_child(node) {
            Some(ty) => Ok(Some(self.read_type(ty)?)),
            None => Ok(None),
        }
    }

    fn read_type(&self, node: Node) -> Result<TypeNode, ReadError> {
        let kind = match node.kind() {
            "predefined_type" => {
                let text = self.node_text(node);
                match Keyword::from_name(text) {
                    Some(keyword) => TypeKind::Keyword(keyword),
                    None => TypeKind::Other(text.to_string()),
                }
            }
            "type_identifier" | "nested_type_identifier" | "identifier" => {
                let text = self.node_text(node);
                match text {
                    "undefined" => TypeKind::Keyword(Keyword::Undefined),
                    _ => TypeKind::Reference {
                        name: text.to_string(),
                        type_arguments: None,
                    },
                }
            }
            "generic_type" => TypeKind::Reference {
                name: self.node_text(self.field(node, "name")?).to_string(),
                type_arguments: match node.child_by_field_name("type_arguments") {
                    Some(args) => Some(self.read_type_arguments(args)?),
                    None => None,
                },
            },
            "array_type" => match self.first_named_child(node) {
                Some(element) => TypeKind::Array(Box::new(self.read_type(element)?)),
                None => TypeKind::Other(node.kind().to_string()),
            },
            "readonly_type" => self.read_operator(node, TypeOperator::Readonly)?,
            "index_type_query" => self.read_operator(node, TypeOperator::Keyof)?,
            "object_type" => TypeKind::ObjectLiteral(self.read_members(node)?),
            "function_type" => TypeKind::Function(self.read_signature(node)?),
            "union_type" => {
                let mut members = Vec::new();
                self.flatten(node, "union_type", &mut members)?;
                TypeKind::Union(members)
            }
            "intersection_type" => {
                let mut members = Vec::new();
                self.flatten(node, "intersection_type", &mut members)?;
                TypeKind::Intersection(members)
            }
            "literal_type" => self.read_literal_type(node),
            "parenthesized_type" => match self.first_named_child(node) {
                Some(inner) => TypeKind::Parenthesized(Box::new(self.read_type(inner)?)),
                None => TypeKind::Other(node.kind().to_string()),
            },
            "tuple_type" => {
                let mut elements = Vec::new();
                for child in self.named_children(node) {
                    elements.push(self.read_type(child)?);
                }
                TypeKind::Tuple(elements)
            }
            other => TypeKind::Other(other.to_string()),
        };
        Ok(TypeNode::new(kind, self.span(node)))
    }

    fn read_operator(&self, node: Node, operator: TypeOperator) -> Result<TypeKind, ReadError> {
        match self.first_named_child(node) {
            Some(operand) => Ok(TypeKind::Operator {
                operator,
                operand: Box::new(self.read_type(operand)?),
            }),
            None => Ok(TypeKind::Other(node.kind().to_string())),
        }
    }

    fn read_type_arguments(&self, node: Node) -> Result<TypeArguments, ReadError> {
        let mut params = Vec::new();
        for child in self.named_children(node) {
            params.push(self.read_type(child)?);
        }
        Ok(TypeArguments {
            params,
            span: self.span(node),
        })
    }

    /// Binary union and intersection nodes nest to the left.
    fn flatten(&self, node: Node, kind: &str, out: &mut Vec<TypeNode>) -> Result<(), ReadError> {
        for child in self.named_children(node) {
            if child.kind() == kind {
                self.flatten(child, kind, out)?;
            } else {
                out.push(self.read_type(child)?);
            }
        }
        Ok(())
    }

    fn read_literal_type(&self, node: Node) -> TypeKind {
        let Some(literal) = self.first_named_child(node) else {
            return TypeKind::Other(node.kind().to_string());
        };
        match literal.kind() {
            "null" => TypeKind::Keyword(Keyword::Null),
            "undefined" => TypeKind::Keyword(Keyword::Undefined),
            "true" => TypeKind::Literal(LiteralType::Boolean(true)),
            "false" => TypeKind::Literal(LiteralType::Boolean(false)),
            "string" => TypeKind::Literal(LiteralType::String(
                unquote(self.node_text(literal)).to_string(),
            )),
            "number" => TypeKind::Literal(LiteralType::Number(parse_number(
                self.node_text(literal),
            ))),
            "unary_expression" => match self.read_negative_number(literal) {
                Some(n) => TypeKind::Literal(LiteralType::Number(n)),
                None => TypeKind::Other(literal.kind().to_string()),
            },
            other => TypeKind::Other(other.to_string()),
        }
    }

    /// `-1` as a single number.
    fn read_negative_number(&self, node: Node) -> Option<f64> {
        let operator = node.child_by_field_name("operator")?;
        let argument = node.child_by_field_name("argument")?;
        (self.node_text(operator) == "-" && argument.kind() == "number")
            .then(|| -parse_number(self.node_text(argument)))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn read_child_exprs(&self, node: Node) -> Result<Vec<Expr>, ReadError> {
        let mut children = Vec::new();
        for child in self.named_children(node) {
            children.push(self.read_expr(child)?);
        }
        Ok(children)
    }

    fn read_expr(&self, node: Node) -> Result<Expr, ReadError> {
        let kind = match node.kind() {
            "identifier" | "property_identifier" => {
                ExprKind::Identifier(self.node_text(node).to_string())
            }
            "string" => ExprKind::StringLiteral(unquote(self.node_text(node)).to_string()),
            "number" => ExprKind::NumberLiteral(parse_number(self.node_text(node))),
            "unary_expression" => match self.read_negative_number(node) {
                Some(n) => ExprKind::NumberLiteral(n),
                None => self.read_other_expr(node)?,
            },
            "member_expression" => ExprKind::Member {
                object: Box::new(self.read_expr(self.field(node, "object")?)?),
                property: Box::new(self.read_expr(self.field(node, "property")?)?),
                computed: false,
            },
            "subscript_expression" => ExprKind::Member {
                object: Box::new(self.read_expr(self.field(node, "object")?)?),
                property: Box::new(self.read_expr(self.field(node, "index")?)?),
                computed: true,
            },
            "call_expression" => {
                let type_arguments = match node.child_by_field_name("type_arguments") {
                    Some(args) => Some(self.read_type_arguments(args)?),
                    None => None,
                };
                let arguments = match node.child_by_field_name("arguments") {
                    Some(args) if args.kind() == "arguments" => self.read_child_exprs(args)?,
                    Some(args) => vec![self.read_expr(args)?],
                    None => Vec::new(),
                };
                ExprKind::Call(CallExpr {
                    callee: Box::new(self.read_expr(self.field(node, "function")?)?),
                    type_arguments,
                    arguments,
                })
            }
            _ => self.read_other_expr(node)?,
        };
        Ok(Expr::new(kind, self.span(node)))
    }

    fn read_other_expr(&self, node: Node) -> Result<ExprKind, ReadError> {
        Ok(ExprKind::Other {
            kind: node.kind().to_string(),
            children: self.read_child_exprs(node)?,
        })
    }
}

/// First error or missing node, depth first.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('\'' | '"' | '`')), Some(close)) if open == close => &text[1..text.len() - 1],
        _ => text,
    }
}

fn parse_number(text: &str) -> f64 {
    let text = text.replace('_', "");
    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    match radix {
        Some(radix) => u64::from_str_radix(&text[2..], radix).map_or(f64::NAN, |n| n as f64),
        None => text.parse().unwrap_or(f64::NAN),
    }
}
