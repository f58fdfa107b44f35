use crate::token::Token;
use serde::{Deserialize, Serialize};
use solfront_types::{Ident, Span, Spanned};
use std::fmt;

/// The type family: elementary (built-in value types), function types, and
/// user-defined type references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ty {
    Elementary(ElementaryTy),
    Function(FunctionTy),
    UserDefined(Ident),
}

impl Spanned for Ty {
    fn span(&self) -> Span {
        match self {
            Ty::Elementary(elementary) => elementary.span(),
            Ty::Function(function) => function.span.clone(),
            Ty::UserDefined(name) => name.span(),
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ty::Elementary(elementary) => write!(f, "{elementary}"),
            Ty::Function(function) => write!(f, "{function}"),
            Ty::UserDefined(name) => write!(f, "{name}"),
        }
    }
}

/// A built-in value type keyword. Dual-natured: it appears both as a type
/// and, in cast position, as an expression (`uint256(x)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementaryTy {
    pub token: Token,
}

impl Spanned for ElementaryTy {
    fn span(&self) -> Span {
        self.token.span()
    }
}

impl fmt::Display for ElementaryTy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token.literal())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionTy {
    pub params: ParamList,
    pub visibility: Option<Visibility>,
    pub mutability: Option<Mutability>,
    pub results: Option<ParamList>,
    pub span: Span,
}

impl Spanned for FunctionTy {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl fmt::Display for FunctionTy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "function{}", self.params)?;
        if let Some(visibility) = self.visibility {
            write!(f, " {visibility}")?;
        }
        if let Some(mutability) = self.mutability {
            write!(f, " {mutability}")?;
        }
        if let Some(results) = &self.results {
            write!(f, " returns{results}")?;
        }
        Ok(())
    }
}

/// A parenthesized, comma-separated parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamList {
    pub params: Vec<Param>,
    pub span: Span,
}

impl Spanned for ParamList {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl fmt::Display for ParamList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    pub ty: Ty,
    pub location: DataLocation,
    pub name: Option<Ident>,
    pub span: Span,
}

impl Spanned for Param {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        if self.location != DataLocation::None {
            write!(f, " {}", self.location)?;
        }
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Internal,
    External,
    Private,
    Public,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Visibility::Internal => "internal",
            Visibility::External => "external",
            Visibility::Private => "private",
            Visibility::Public => "public",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mutability {
    Pure,
    View,
    Payable,
    Constant,
    Immutable,
    Transient,
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Mutability::Pure => "pure",
            Mutability::View => "view",
            Mutability::Payable => "payable",
            Mutability::Constant => "constant",
            Mutability::Immutable => "immutable",
            Mutability::Transient => "transient",
        };
        write!(f, "{s}")
    }
}

/// Where a parameter or variable's data physically resides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataLocation {
    #[default]
    None,
    Storage,
    Memory,
    Calldata,
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            DataLocation::None => "",
            DataLocation::Storage => "storage",
            DataLocation::Memory => "memory",
            DataLocation::Calldata => "calldata",
        };
        write!(f, "{s}")
    }
}
