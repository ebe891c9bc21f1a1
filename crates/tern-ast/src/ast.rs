//! Analyzed syntax tree definitions for Tern.

use std::sync::Arc;

use tern_core::{ElementaryType, Span, Type, TypeOp};

use crate::SymbolTable;

/// Kind of an analyzed node, for consumers that dispatch on node category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    FunctionImplementation,
    FunctionDeclaration,
    TypeDeclaration,
    Block,
    VarDecl,
    Assign,
    Return,
    If,
    ExpressionStatement,
    Constant,
    StringLiteral,
    Identifier,
    BinaryOperation,
    Call,
    Match,
}

/// A complete analyzed module (compilation unit).
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub items: Vec<Item>,
    /// Module-level names: functions and user-defined types
    pub symbols: SymbolTable,
}

impl Module {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            symbols: SymbolTable::new(),
        }
    }

    /// Adds an item and declares its name in the module symbol table.
    ///
    /// # Errors
    /// Returns an error if the name is already declared in this module.
    pub fn add_item(&mut self, item: Item) -> Result<(), String> {
        self.symbols.declare(item.name(), item.ty())?;
        self.items.push(item);
        Ok(())
    }

    pub fn child_count(&self) -> usize {
        self.items.len()
    }

    pub fn child(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }
}

/// Top-level items of a module.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Function with a body
    Function(FnImpl),
    /// Function declared without a body (imported from elsewhere)
    Foreign(FnDecl),
    /// User-defined type
    TypeDecl(TypeDecl),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => &f.decl.name,
            Self::Foreign(decl) => &decl.name,
            Self::TypeDecl(t) => &t.name,
        }
    }

    /// Resolved type of the item: the function type or the defined type.
    pub fn ty(&self) -> Arc<Type> {
        match self {
            Self::Function(f) => f.decl.ty(),
            Self::Foreign(decl) => decl.ty(),
            Self::TypeDecl(t) => t.ty.clone(),
        }
    }

    pub const fn span(&self) -> Span {
        match self {
            Self::Function(f) => f.span,
            Self::Foreign(decl) => decl.span,
            Self::TypeDecl(t) => t.span,
        }
    }

    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Function(_) => NodeKind::FunctionImplementation,
            Self::Foreign(_) => NodeKind::FunctionDeclaration,
            Self::TypeDecl(_) => NodeKind::TypeDeclaration,
        }
    }
}

/// Function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Arc<Type>,
    pub span: Span,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Arc<Type>, span: Span) -> Self {
        Self {
            name: name.into(),
            ty,
            span,
        }
    }
}

/// Function signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<Param>,
    /// `None` for functions returning nothing
    pub return_type: Option<Arc<Type>>,
    pub span: Span,
}

impl FnDecl {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Option<Arc<Type>>,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            span,
        }
    }

    pub fn args_num(&self) -> usize {
        self.params.len()
    }

    /// Return type, with `nil` standing in for an absent one
    pub fn return_type_or_nil(&self) -> Arc<Type> {
        self.return_type
            .clone()
            .unwrap_or_else(|| Type::elementary(ElementaryType::Nil))
    }

    /// The function type `args -> ret` as analysis resolved it
    pub fn ty(&self) -> Arc<Type> {
        let args = match self.params.as_slice() {
            [] => Type::elementary(ElementaryType::Nil),
            [single] => Type::leaf(single.name.clone(), single.ty.clone()),
            params => Type::product(
                params
                    .iter()
                    .map(|p| Type::leaf(p.name.clone(), p.ty.clone()))
                    .collect(),
            ),
        };
        Type::implication(args, self.return_type_or_nil())
    }
}

/// Function with a body.
#[derive(Debug, Clone, PartialEq)]
pub struct FnImpl {
    pub decl: FnDecl,
    pub body: Block,
    pub span: Span,
}

impl FnImpl {
    pub fn new(decl: FnDecl, body: Block) -> Self {
        let span = decl.span.merge(body.span);
        Self { decl, body, span }
    }
}

/// User-defined type declaration: `type name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    /// Always a [`Type::Defined`]
    pub ty: Arc<Type>,
    pub span: Span,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, body: Arc<Type>, span: Span) -> Self {
        let name = name.into();
        Self {
            ty: Type::defined(name.clone(), body),
            name,
            span,
        }
    }
}

/// A block of statements with its own scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub symbols: SymbolTable,
    pub span: Span,
}

impl Block {
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self {
            statements,
            symbols: SymbolTable::new(),
            span,
        }
    }

    pub fn with_symbols(statements: Vec<Statement>, symbols: SymbolTable, span: Span) -> Self {
        Self {
            statements,
            symbols,
            span,
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }
}

/// Statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Variable declaration: `name:type [= expr]`
    VarDecl {
        name: String,
        ty: Arc<Type>,
        initializer: Option<Expr>,
        span: Span,
    },

    /// Assignment to a declared variable: `name = expr`
    Assign { name: String, value: Expr, span: Span },

    /// `return [expr]`
    Return { value: Option<Expr>, span: Span },

    /// `if cond { ... } [else { ... }]`
    If {
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
        span: Span,
    },

    /// Expression evaluated for its effects
    Expression(Expr),
}

impl Statement {
    pub const fn span(&self) -> Span {
        match self {
            Self::VarDecl { span, .. }
            | Self::Assign { span, .. }
            | Self::Return { span, .. }
            | Self::If { span, .. } => *span,
            Self::Expression(expr) => expr.span,
        }
    }

    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::VarDecl { .. } => NodeKind::VarDecl,
            Self::Assign { .. } => NodeKind::Assign,
            Self::Return { .. } => NodeKind::Return,
            Self::If { .. } => NodeKind::If,
            Self::Expression(_) => NodeKind::ExpressionStatement,
        }
    }
}

/// Compile-time constant value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant {
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

/// A typed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// Type resolved by semantic analysis
    pub ty: Arc<Type>,
    pub span: Span,
}

/// Expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Constant(Constant),
    StringLiteral(String),
    Identifier(String),
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call(Call),
    Match(MatchExpr),
}

impl Expr {
    pub const fn kind(&self) -> NodeKind {
        match &self.kind {
            ExprKind::Constant(_) => NodeKind::Constant,
            ExprKind::StringLiteral(_) => NodeKind::StringLiteral,
            ExprKind::Identifier(_) => NodeKind::Identifier,
            ExprKind::Binary { .. } => NodeKind::BinaryOperation,
            ExprKind::Call(_) => NodeKind::Call,
            ExprKind::Match(_) => NodeKind::Match,
        }
    }

    pub fn ty(&self) -> &Arc<Type> {
        &self.ty
    }

    /// Direct sub-expressions in evaluation order.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Constant(_) | ExprKind::StringLiteral(_) | ExprKind::Identifier(_) => {
                Vec::new()
            }
            ExprKind::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            ExprKind::Call(call) => call.args.iter().collect(),
            ExprKind::Match(m) => std::iter::once(m.scrutinee.as_ref())
                .chain(m.cases.iter().map(|c| &c.body))
                .collect(),
        }
    }
}

/// Function or constructor call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
    /// Resolved type of the callee: a function type, or a defined type for
    /// constructor calls
    pub callee: Arc<Type>,
    /// True for explicit conversions such as `u64(a)`
    pub is_explicit_conversion: bool,
}

impl Call {
    /// Returns true if this call constructs a user-defined type
    pub fn is_constructor(&self) -> bool {
        self.callee.is_defined()
    }

    /// Parameter type at `index` according to the callee's function type
    pub fn param_type(&self, index: usize) -> Option<&Arc<Type>> {
        let Type::Operator { operands, .. } = self.callee.strip_leaf() else {
            return None;
        };
        match operands.first()?.as_ref() {
            Type::Operator {
                op: TypeOp::Product,
                operands: params,
            } => params.get(index),
            args if index == 0 && !args.is_nil() => operands.first(),
            _ => None,
        }
    }
}

/// `match scrutinee { cases }`
#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpr {
    pub scrutinee: Box<Expr>,
    pub cases: Vec<MatchCase>,
}

/// One case of a match expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    /// Matched type, `None` for the wildcard `_`
    pub pattern: Option<Arc<Type>>,
    /// Name bound to the matched payload, e.g. `a` in `a:i32 => ...`
    pub binding: Option<String>,
    pub body: Expr,
    /// Scope of the case, containing the binding
    pub symbols: SymbolTable,
    pub span: Span,
}

impl MatchCase {
    pub fn new(pattern: Option<Arc<Type>>, body: Expr, span: Span) -> Self {
        Self {
            pattern,
            binding: None,
            body,
            symbols: SymbolTable::new(),
            span,
        }
    }

    /// Binds `name` to the payload of the matched member.
    ///
    /// # Errors
    /// Fails for wildcard cases, which have no single payload type.
    pub fn bind(mut self, name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        let ty = self
            .pattern
            .clone()
            .ok_or_else(|| format!("Cannot bind '{name}' in a wildcard case"))?;
        self.symbols.declare(name.clone(), ty)?;
        self.binding = Some(name);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExprBuilder;

    fn elem(etype: ElementaryType) -> Arc<Type> {
        Type::elementary(etype)
    }

    #[test]
    fn test_fn_decl_type() {
        let span = Span::default();
        let decl = FnDecl::new(
            "boo",
            vec![
                Param::new("a", elem(ElementaryType::U32), span),
                Param::new("b", elem(ElementaryType::String), span),
            ],
            Some(elem(ElementaryType::U64)),
            span,
        );
        assert_eq!(decl.args_num(), 2);
        assert_eq!(decl.ty().unique_type_str(), "(a:u32,b:string)->u64");
    }

    #[test]
    fn test_call_param_types() {
        let span = Span::default();
        let decl = FnDecl::new(
            "f",
            vec![
                Param::new("a", elem(ElementaryType::U32), span),
                Param::new("b", elem(ElementaryType::Bool), span),
            ],
            None,
            span,
        );
        let call = Call {
            name: "f".to_string(),
            args: vec![],
            callee: decl.ty(),
            is_explicit_conversion: false,
        };
        assert_eq!(
            call.param_type(1).and_then(|t| t.as_elementary()),
            Some(ElementaryType::Bool)
        );
        assert!(call.param_type(2).is_none());
        assert!(!call.is_constructor());
    }

    #[test]
    fn test_module_rejects_duplicate_items() {
        let span = Span::default();
        let mut module = Module::new("m");
        let decl = FnDecl::new("print", vec![], None, span);
        module.add_item(Item::Foreign(decl.clone())).unwrap();
        assert!(module.add_item(Item::Foreign(decl)).is_err());
        assert_eq!(module.child_count(), 1);
        assert_eq!(module.child(0).map(Item::kind), Some(NodeKind::FunctionDeclaration));
    }

    #[test]
    fn test_expression_children() {
        let span = Span::default();
        let u64_t = elem(ElementaryType::U64);
        let sum = ExprBuilder::binary(
            BinaryOperator::Add,
            ExprBuilder::int(45, u64_t.clone(), span),
            ExprBuilder::ident("a", elem(ElementaryType::U32), span),
            u64_t,
            span,
        );
        assert_eq!(sum.kind(), NodeKind::BinaryOperation);
        let kinds: Vec<_> = sum.children().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::Constant, NodeKind::Identifier]);
    }

    #[test]
    fn test_wildcard_case_cannot_bind() {
        let span = Span::default();
        let body = ExprBuilder::string("other", span);
        assert!(MatchCase::new(None, body, span).bind("x").is_err());
    }
}
