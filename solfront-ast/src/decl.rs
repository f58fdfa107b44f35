use crate::{
    expr::Expr,
    statement::Block,
    token::Token,
    ty::{DataLocation, Mutability, ParamList, Ty, Visibility},
};
use serde::{Deserialize, Serialize};
use solfront_types::{Ident, Span, Spanned};

/// The declaration family.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decl {
    Contract(ContractDecl),
    Function(FunctionDecl),
    StateVariable(StateVariableDecl),
    Event(EventDecl),
    UsingFor(UsingForDirective),
}

impl Spanned for Decl {
    fn span(&self) -> Span {
        match self {
            Decl::Contract(contract) => contract.span.clone(),
            Decl::Function(function) => function.span.clone(),
            Decl::StateVariable(state_var) => state_var.span.clone(),
            Decl::Event(event) => event.span.clone(),
            Decl::UsingFor(using_for) => using_for.span.clone(),
        }
    }
}

/// `contract Name is Parent, ... { body }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractDecl {
    pub name: Ident,
    pub parents: Vec<Ident>,
    pub body: ContractBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractBody {
    pub decls: Vec<Decl>,
    pub span: Span,
}

impl Spanned for ContractBody {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// `function name(params) modifiers... [returns (results)] { body }`
///
/// `body` is `None` for interface-style declarations ending in `;`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: ParamList,
    pub visibility: Option<Visibility>,
    pub mutability: Option<Mutability>,
    pub is_virtual: bool,
    pub results: Option<ParamList>,
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateVariableDecl {
    pub ty: Ty,
    pub visibility: Option<Visibility>,
    pub mutability: Option<Mutability>,
    pub location: DataLocation,
    pub name: Ident,
    pub initializer: Option<Expr>,
    pub span: Span,
}

/// `event Name(type [indexed] [name], ...) [anonymous];`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDecl {
    pub name: Ident,
    pub params: Vec<EventParam>,
    pub is_anonymous: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventParam {
    pub ty: Ty,
    pub is_indexed: bool,
    pub name: Option<Ident>,
    pub span: Span,
}

impl Spanned for EventParam {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// The three using-for forms:
///
/// - `using Library for SomeType;`
/// - `using Library for *;` (wildcard: `for_type` is `None`)
/// - `using {add as +, isEqual as ==, sub} for SomeType global;`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsingForDirective {
    pub target: UsingTarget,
    pub for_type: Option<Ty>,
    pub is_global: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsingTarget {
    Library(Ident),
    List(Vec<UsingItem>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsingItem {
    pub name: Ident,
    pub alias: Option<UsingAlias>,
}

impl Spanned for UsingItem {
    fn span(&self) -> Span {
        match &self.alias {
            Some(alias) => Span::join(self.name.span(), alias.span()),
            None => self.name.span(),
        }
    }
}

/// The `as` alias of a using-list item: either a plain identifier or an
/// operator symbol bound as a user-defined operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsingAlias {
    Ident(Ident),
    Operator(Token),
}

impl Spanned for UsingAlias {
    fn span(&self) -> Span {
        match self {
            UsingAlias::Ident(name) => name.span(),
            UsingAlias::Operator(token) => token.span(),
        }
    }
}
