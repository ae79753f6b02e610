//! Lowering from the tree-sitter C# syntax tree to the engine's node model.
//!
//! Every named CST node becomes exactly one [`Node`]. Constructs the rules
//! inspect get a dedicated variant; everything else becomes
//! [`Node::Other`] carrying the CST kind, with its children lowered below
//! it so rules still reach nested code.
//!
//! Declarations are recorded into a [`FileModel`] on the way.

use std::path::Path;

use strict_lint_core::syntax::{ComparisonOp, LiteralKind, Pattern};
use strict_lint_core::{Node, NodeId, Span, SymbolKind, SyntaxTree, SyntaxTreeBuilder};
use tree_sitter::Node as CstNode;

use crate::symbols::{ClassInfo, FileModel, MemberInfo, MethodInfo};

/// Lowers one parsed file.
pub struct Lowerer<'s> {
    src: &'s [u8],
    builder: SyntaxTreeBuilder,
    model: FileModel,
    namespaces: Vec<String>,
    file_namespace: Option<String>,
}

impl<'s> Lowerer<'s> {
    /// Creates a lowerer for `source`, read from `path`.
    #[must_use]
    pub fn new(path: &Path, source: &'s str) -> Self {
        Self {
            src: source.as_bytes(),
            builder: SyntaxTreeBuilder::new(path),
            model: FileModel::default(),
            namespaces: Vec::new(),
            file_namespace: None,
        }
    }

    /// Lowers the tree rooted at `root`.
    #[must_use]
    pub fn lower(mut self, root: CstNode<'_>) -> (SyntaxTree, FileModel) {
        let mut cursor = root.walk();
        self.file_namespace = root
            .named_children(&mut cursor)
            .find(|c| c.kind() == "file_scoped_namespace_declaration")
            .and_then(|c| c.child_by_field_name("name"))
            .map(|n| compact(self.text(n)));

        let id = self.lower_node(root);
        (self.builder.finish(id), self.model)
    }

    fn text(&self, node: CstNode<'_>) -> &'s str {
        node.utf8_text(self.src).unwrap_or("")
    }

    fn span(node: CstNode<'_>) -> Span {
        let start = node.start_position();
        Span::new(node.start_byte(), node.end_byte(), start.row + 1, start.column + 1)
    }

    fn push(&mut self, node: Node, cst: CstNode<'_>, extra: Vec<NodeId>) -> NodeId {
        self.builder.push(node, Self::span(cst), extra)
    }

    fn current_namespace(&self) -> Option<String> {
        if self.namespaces.is_empty() {
            self.file_namespace.clone()
        } else {
            Some(self.namespaces.join("."))
        }
    }

    /// Lowers every named child of `node` except those in `skip`.
    fn lower_children_except(&mut self, node: CstNode<'_>, skip: &[Option<CstNode<'_>>]) -> Vec<NodeId> {
        let skip: Vec<usize> = skip.iter().flatten().map(CstNode::id).collect();
        let mut cursor = node.walk();
        let children: Vec<CstNode<'_>> = node
            .named_children(&mut cursor)
            .filter(|c| !skip.contains(&c.id()))
            .collect();
        children.into_iter().map(|c| self.lower_node(c)).collect()
    }

    fn lower_other(&mut self, node: CstNode<'_>) -> NodeId {
        let children = self.lower_children_except(node, &[]);
        self.push(
            Node::Other {
                kind: node.kind().to_string(),
            },
            node,
            children,
        )
    }

    fn lower_node(&mut self, node: CstNode<'_>) -> NodeId {
        match node.kind() {
            "compilation_unit" => {
                let children = self.lower_children_except(node, &[]);
                self.push(Node::CompilationUnit, node, children)
            }
            "using_directive" => {
                self.record_using(node);
                self.lower_other(node)
            }
            "namespace_declaration" => self.lower_namespace(node),
            "file_scoped_namespace_declaration" => {
                let name = node.child_by_field_name("name");
                let children = self.lower_children_except(node, &[name]);
                self.push(
                    Node::Other {
                        kind: node.kind().to_string(),
                    },
                    node,
                    children,
                )
            }
            "class_declaration" | "struct_declaration" | "record_declaration"
            | "record_struct_declaration" => self.lower_class(node),
            "method_declaration" => self.lower_method(node),
            "if_statement" => self.lower_if(node),
            "invocation_expression" => self.lower_invocation(node),
            "member_access_expression" => self.lower_member_access(node),
            "conditional_access_expression" => self.lower_conditional(node, node),
            "member_binding_expression" => self.lower_binding(node),
            "binary_expression" => self.lower_binary(node),
            "is_pattern_expression" => self.lower_is_pattern(node),
            "identifier" => self.push(
                Node::Identifier {
                    name: self.text(node).to_string(),
                },
                node,
                Vec::new(),
            ),
            "generic_name" => {
                let name = first_identifier(node).map_or("", |n| self.text(n)).to_string();
                self.push(Node::GenericName { name }, node, Vec::new())
            }
            "null_literal" => self.push(Node::Literal(LiteralKind::Null), node, Vec::new()),
            kind if kind.ends_with("_literal") => {
                let children = self.lower_children_except(node, &[]);
                self.push(Node::Literal(LiteralKind::Other), node, children)
            }
            _ => self.lower_other(node),
        }
    }

    fn lower_namespace(&mut self, node: CstNode<'_>) -> NodeId {
        let name = node.child_by_field_name("name");
        let pushed = name.is_some();
        if let Some(name) = name {
            let namespace = compact(self.text(name));
            self.namespaces.push(namespace);
        }
        let children = self.lower_children_except(node, &[name]);
        if pushed {
            self.namespaces.pop();
        }
        self.push(
            Node::Other {
                kind: node.kind().to_string(),
            },
            node,
            children,
        )
    }

    fn lower_class(&mut self, node: CstNode<'_>) -> NodeId {
        let name_node = node.child_by_field_name("name");
        let name = name_node.map_or("", |n| self.text(n)).to_string();
        let info = self.class_info(node, &name);

        let children = self.lower_children_except(node, &[name_node]);
        let id = self.push(Node::ClassDeclaration { name }, node, children);
        self.model.classes.insert(id, info);
        id
    }

    fn class_info(&self, node: CstNode<'_>, name: &str) -> ClassInfo {
        let mut info = ClassInfo {
            name: name.to_string(),
            namespace: self.current_namespace(),
            ..ClassInfo::default()
        };

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "base_list" {
                let mut base_cursor = child.walk();
                info.base = child
                    .named_children(&mut base_cursor)
                    .find(|b| b.kind() != "argument_list")
                    .map(|b| {
                        let text = self.text(b);
                        text.split('(').next().unwrap_or(text).trim().to_string()
                    });
            }
        }

        let body = node.child_by_field_name("body").or_else(|| {
            let mut cursor = node.walk();
            let found = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "declaration_list");
            found
        });
        let Some(body) = body else {
            return info;
        };
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "field_declaration" => {
                    let attributes = self.attributes(member);
                    for name in self.declarator_names(member) {
                        info.members.push(MemberInfo {
                            name,
                            kind: SymbolKind::Field,
                            attributes: attributes.clone(),
                        });
                    }
                }
                "property_declaration" => {
                    if let Some(name) = member.child_by_field_name("name") {
                        info.members.push(MemberInfo {
                            name: self.text(name).to_string(),
                            kind: SymbolKind::Property,
                            attributes: self.attributes(member),
                        });
                    }
                }
                "method_declaration" => {
                    if let Some(name) = member.child_by_field_name("name") {
                        info.methods.push(self.text(name).to_string());
                    }
                }
                _ => {}
            }
        }
        info
    }

    /// Attribute class names on a declaration: `[Inject]`, `[field: SerializeField]`.
    fn attributes(&self, decl: CstNode<'_>) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = decl.walk();
        for list in decl.named_children(&mut cursor) {
            if list.kind() != "attribute_list" {
                continue;
            }
            let mut list_cursor = list.walk();
            for attr in list.named_children(&mut list_cursor) {
                if attr.kind() != "attribute" {
                    continue;
                }
                if let Some(name) = attr.child_by_field_name("name") {
                    let text = self.text(name);
                    let text = text.split('<').next().unwrap_or(text);
                    let simple = text.rsplit(['.', ':']).next().unwrap_or(text).trim();
                    names.push(simple.to_string());
                }
            }
        }
        names
    }

    /// Names declared by the `variable_declaration` of a field.
    fn declarator_names(&self, decl: CstNode<'_>) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = decl.walk();
        for child in decl.named_children(&mut cursor) {
            if child.kind() != "variable_declaration" {
                continue;
            }
            let mut inner = child.walk();
            for declarator in child.named_children(&mut inner) {
                if declarator.kind() == "variable_declarator" {
                    if let Some(name) = declarator_name(declarator) {
                        names.push(self.text(name).to_string());
                    }
                }
            }
        }
        names
    }

    fn lower_method(&mut self, node: CstNode<'_>) -> NodeId {
        let name_node = node.child_by_field_name("name");
        let name = name_node.map_or("", |n| self.text(n)).to_string();

        let mut info = MethodInfo::default();
        self.collect_locals(node, &mut info);

        let children = self.lower_children_except(node, &[name_node]);
        let id = self.push(Node::MethodDeclaration { name }, node, children);
        self.model.methods.insert(id, info);
        id
    }

    fn collect_locals(&self, node: CstNode<'_>, info: &mut MethodInfo) {
        let field_text = |field: &str| node.child_by_field_name(field).map(|n| self.text(n).to_string());
        match node.kind() {
            "parameter" => info.parameters.extend(field_text("name")),
            "implicit_parameter" => {
                info.parameters.insert(self.text(node).to_string());
            }
            "variable_declarator" => {
                info.locals
                    .extend(declarator_name(node).map(|n| self.text(n).to_string()));
            }
            "foreach_statement" => {
                if let Some(left) = node.child_by_field_name("left") {
                    if left.kind() == "identifier" {
                        info.locals.insert(self.text(left).to_string());
                    }
                }
            }
            "declaration_expression" | "declaration_pattern" | "catch_declaration" => {
                info.locals.extend(field_text("name"));
            }
            "local_function_statement" => info.local_functions.extend(field_text("name")),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect_locals(child, info);
        }
    }

    fn lower_if(&mut self, node: CstNode<'_>) -> NodeId {
        let Some(condition_node) = node.child_by_field_name("condition") else {
            return self.lower_other(node);
        };
        let condition = self.lower_node(condition_node);
        let rest = self.lower_children_except(node, &[Some(condition_node)]);
        self.push(Node::IfStatement { condition }, node, rest)
    }

    fn lower_invocation(&mut self, node: CstNode<'_>) -> NodeId {
        if let Some(access) = conditional_root(node) {
            return self.lower_conditional(node, access);
        }
        let Some(function) = node.child_by_field_name("function") else {
            return self.lower_other(node);
        };
        let callee = self.lower_node(function);
        let arguments = self.lower_children_except(node, &[Some(function)]);
        self.push(Node::Invocation { callee }, node, arguments)
    }

    fn lower_member_access(&mut self, node: CstNode<'_>) -> NodeId {
        if let Some(access) = conditional_root(node) {
            return self.lower_conditional(node, access);
        }
        let (Some(receiver_node), Some(name_node)) = (
            node.child_by_field_name("expression"),
            node.child_by_field_name("name"),
        ) else {
            return self.lower_other(node);
        };
        let receiver = self.lower_node(receiver_node);
        let name = self.lower_node(name_node);
        self.push(Node::MemberAccess { receiver, name }, node, Vec::new())
    }

    /// Lowers the postfix chain `top`, whose innermost link is the
    /// conditional access `access`, into one [`Node::ConditionalAccess`]
    /// spanning the whole chain.
    fn lower_conditional(&mut self, top: CstNode<'_>, access: CstNode<'_>) -> NodeId {
        let condition_node = access
            .child_by_field_name("condition")
            .or_else(|| access.named_child(0));
        let Some(condition_node) = condition_node else {
            return self.lower_other(top);
        };
        let expression = self.lower_node(condition_node);
        let when_not_null = self.lower_chain_tail(top, access, condition_node);
        self.push(
            Node::ConditionalAccess {
                expression,
                when_not_null,
            },
            top,
            Vec::new(),
        )
    }

    fn lower_chain_tail(
        &mut self,
        node: CstNode<'_>,
        access: CstNode<'_>,
        condition: CstNode<'_>,
    ) -> Option<NodeId> {
        if node.id() == access.id() {
            let mut bound = self.lower_children_except(node, &[Some(condition)]);
            return match bound.len() {
                0 => None,
                1 => bound.pop(),
                _ => Some(self.push(
                    Node::Other {
                        kind: node.kind().to_string(),
                    },
                    node,
                    bound,
                )),
            };
        }

        match node.kind() {
            "invocation_expression" => {
                let function = node.child_by_field_name("function")?;
                let callee = self.lower_chain_tail(function, access, condition)?;
                let arguments = self.lower_children_except(node, &[Some(function)]);
                Some(self.push(Node::Invocation { callee }, node, arguments))
            }
            "member_access_expression" => {
                let expression = node.child_by_field_name("expression")?;
                let name_node = node.child_by_field_name("name")?;
                let receiver = self.lower_chain_tail(expression, access, condition)?;
                let name = self.lower_node(name_node);
                Some(self.push(Node::MemberAccess { receiver, name }, node, Vec::new()))
            }
            _ => {
                let expression = node.child_by_field_name("expression")?;
                let inner = self.lower_chain_tail(expression, access, condition)?;
                let rest = self.lower_children_except(node, &[Some(expression)]);
                Some(self.push(
                    Node::Other {
                        kind: node.kind().to_string(),
                    },
                    node,
                    std::iter::once(inner).chain(rest).collect::<Vec<_>>(),
                ))
            }
        }
    }

    fn lower_binding(&mut self, node: CstNode<'_>) -> NodeId {
        let Some(name_node) = node.child_by_field_name("name") else {
            return self.lower_other(node);
        };
        let name = self.lower_node(name_node);
        self.push(Node::MemberBinding { name }, node, Vec::new())
    }

    fn lower_binary(&mut self, node: CstNode<'_>) -> NodeId {
        let op = match node.child_by_field_name("operator").map(|o| self.text(o)) {
            Some("==") => ComparisonOp::Equals,
            Some("!=") => ComparisonOp::NotEquals,
            _ => return self.lower_other(node),
        };
        let (Some(left_node), Some(right_node)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return self.lower_other(node);
        };
        let left = self.lower_node(left_node);
        let right = self.lower_node(right_node);
        self.push(Node::BinaryComparison { op, left, right }, node, Vec::new())
    }

    fn lower_is_pattern(&mut self, node: CstNode<'_>) -> NodeId {
        let (Some(expression_node), Some(pattern_node)) = (
            node.child_by_field_name("expression"),
            node.child_by_field_name("pattern"),
        ) else {
            return self.lower_other(node);
        };
        let expression = self.lower_node(expression_node);
        let mut extra = Vec::new();
        let pattern = self.lower_pattern(pattern_node, &mut extra);
        self.push(
            Node::IsPattern {
                expression,
                pattern,
            },
            node,
            extra,
        )
    }

    /// Lowers a pattern; nodes not referenced from the result go to `extra`.
    fn lower_pattern(&mut self, node: CstNode<'_>, extra: &mut Vec<NodeId>) -> Pattern {
        match node.kind() {
            "constant_pattern" | "parenthesized_pattern" => match node.named_child(0) {
                Some(inner) => self.lower_pattern(inner, extra),
                None => Pattern::Other,
            },
            "negated_pattern" => match node.named_child(0) {
                Some(inner) => Pattern::Not(Box::new(self.lower_pattern(inner, extra))),
                None => Pattern::Other,
            },
            kind if kind.ends_with("_pattern") || kind == "discard" => {
                extra.push(self.lower_node(node));
                Pattern::Other
            }
            _ => Pattern::Constant(self.lower_node(node)),
        }
    }

    fn record_using(&mut self, node: CstNode<'_>) {
        let text = self.text(node).trim().trim_end_matches(';').trim();
        let text = text.strip_prefix("global").map_or(text, str::trim_start);
        let Some(rest) = text.strip_prefix("using") else {
            return;
        };
        let rest = rest.trim();
        if rest.starts_with("static ") {
            return;
        }
        match rest.split_once('=') {
            Some((alias, target)) => {
                self.model
                    .aliases
                    .insert(alias.trim().to_string(), compact(target));
            }
            None => self.model.usings.push(compact(rest)),
        }
    }
}

/// Innermost conditional access of a postfix chain, if the chain has one.
fn conditional_root(node: CstNode<'_>) -> Option<CstNode<'_>> {
    let mut current = node;
    loop {
        let next = match current.kind() {
            "invocation_expression" => current.child_by_field_name("function"),
            "member_access_expression" | "element_access_expression" => {
                current.child_by_field_name("expression")
            }
            "conditional_access_expression" => return Some(current),
            _ => None,
        }?;
        current = next;
    }
}

fn first_identifier(node: CstNode<'_>) -> Option<CstNode<'_>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "identifier");
    found
}

fn declarator_name(declarator: CstNode<'_>) -> Option<CstNode<'_>> {
    declarator
        .child_by_field_name("name")
        .or_else(|| first_identifier(declarator))
}

/// Removes whitespace from a dotted name.
fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
