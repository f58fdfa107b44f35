use serde::{Deserialize, Serialize};
use solfront_types::{Span, Spanned};
use std::fmt;

/// Every kind of token the scanner can produce.
///
/// Declaration order matters: the keyword and elementary-type groups are
/// contiguous ranges, and the classification helpers below compare
/// discriminants against the range bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenKind {
    // Punctuators and delimiters.
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Comma,
    Question,
    Dot,
    Arrow,
    // Assignment operators.
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    SarAssign,
    // Binary operators.
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Shl,
    Shr,
    Sar,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    // Comparison operators.
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    // Unary operators.
    Not,
    BitNot,
    Inc,
    Dec,
    // Inline-assembly-only operator.
    AssemblyAssign,
    // Keywords.
    Contract,
    Function,
    Event,
    Returns,
    Return,
    If,
    Else,
    Using,
    For,
    Is,
    As,
    Global,
    Anonymous,
    Indexed,
    Unchecked,
    Virtual,
    True,
    False,
    Internal,
    External,
    Private,
    Public,
    Pure,
    View,
    Payable,
    Constant,
    Immutable,
    Transient,
    Storage,
    Memory,
    Calldata,
    // Elementary type keywords.
    Address,
    Bool,
    StringType,
    Bytes,
    Uint,
    Int,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    Uint256,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Int256,
    Bytes1,
    Bytes2,
    Bytes4,
    Bytes8,
    Bytes16,
    Bytes32,
    // Literals.
    DecimalNumber,
    HexNumber,
    StringLiteral,
    Comment,
    Identifier,
    Eof,
    Illegal,
}

/// Keyword lookup table, built once at compile time and shared read-only
/// across all parses.
pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "contract" => TokenKind::Contract,
    "function" => TokenKind::Function,
    "event" => TokenKind::Event,
    "returns" => TokenKind::Returns,
    "return" => TokenKind::Return,
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "using" => TokenKind::Using,
    "for" => TokenKind::For,
    "is" => TokenKind::Is,
    "as" => TokenKind::As,
    "global" => TokenKind::Global,
    "anonymous" => TokenKind::Anonymous,
    "indexed" => TokenKind::Indexed,
    "unchecked" => TokenKind::Unchecked,
    "virtual" => TokenKind::Virtual,
    "true" => TokenKind::True,
    "false" => TokenKind::False,
    "internal" => TokenKind::Internal,
    "external" => TokenKind::External,
    "private" => TokenKind::Private,
    "public" => TokenKind::Public,
    "pure" => TokenKind::Pure,
    "view" => TokenKind::View,
    "payable" => TokenKind::Payable,
    "constant" => TokenKind::Constant,
    "immutable" => TokenKind::Immutable,
    "transient" => TokenKind::Transient,
    "storage" => TokenKind::Storage,
    "memory" => TokenKind::Memory,
    "calldata" => TokenKind::Calldata,
};

/// Elementary-type lookup table, the second bounded keyword range.
pub static ELEMENTARY_TYPES: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "address" => TokenKind::Address,
    "bool" => TokenKind::Bool,
    "string" => TokenKind::StringType,
    "bytes" => TokenKind::Bytes,
    "uint" => TokenKind::Uint,
    "int" => TokenKind::Int,
    "uint8" => TokenKind::Uint8,
    "uint16" => TokenKind::Uint16,
    "uint32" => TokenKind::Uint32,
    "uint64" => TokenKind::Uint64,
    "uint128" => TokenKind::Uint128,
    "uint256" => TokenKind::Uint256,
    "int8" => TokenKind::Int8,
    "int16" => TokenKind::Int16,
    "int32" => TokenKind::Int32,
    "int64" => TokenKind::Int64,
    "int128" => TokenKind::Int128,
    "int256" => TokenKind::Int256,
    "bytes1" => TokenKind::Bytes1,
    "bytes2" => TokenKind::Bytes2,
    "bytes4" => TokenKind::Bytes4,
    "bytes8" => TokenKind::Bytes8,
    "bytes16" => TokenKind::Bytes16,
    "bytes32" => TokenKind::Bytes32,
};

/// Classifies a scanned word: keyword, elementary type, or plain identifier.
pub fn lookup_ident(word: &str) -> TokenKind {
    if let Some(kind) = KEYWORDS.get(word) {
        return *kind;
    }
    if let Some(kind) = ELEMENTARY_TYPES.get(word) {
        return *kind;
    }
    TokenKind::Identifier
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        (TokenKind::Contract as u8..=TokenKind::Calldata as u8).contains(&(self as u8))
    }

    pub fn is_elementary_type(self) -> bool {
        (TokenKind::Address as u8..=TokenKind::Bytes32 as u8).contains(&(self as u8))
    }

    pub fn is_assign_op(self) -> bool {
        (TokenKind::Assign as u8..=TokenKind::SarAssign as u8).contains(&(self as u8))
    }

    pub fn is_comparison_op(self) -> bool {
        (TokenKind::Eq as u8..=TokenKind::GtEq as u8).contains(&(self as u8))
    }

    pub fn is_number(self) -> bool {
        matches!(self, TokenKind::DecimalNumber | TokenKind::HexNumber)
    }

    /// The canonical text of the token kind, used in diagnostics. Kinds
    /// without a fixed spelling (identifiers, literals) describe themselves.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Question => "?",
            TokenKind::Dot => ".",
            TokenKind::Arrow => "->",
            TokenKind::Assign => "=",
            TokenKind::AddAssign => "+=",
            TokenKind::SubAssign => "-=",
            TokenKind::MulAssign => "*=",
            TokenKind::DivAssign => "/=",
            TokenKind::ModAssign => "%=",
            TokenKind::AndAssign => "&=",
            TokenKind::OrAssign => "|=",
            TokenKind::XorAssign => "^=",
            TokenKind::ShlAssign => "<<=",
            TokenKind::ShrAssign => ">>=",
            TokenKind::SarAssign => ">>>=",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Div => "/",
            TokenKind::Mod => "%",
            TokenKind::Pow => "**",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Sar => ">>>",
            TokenKind::BitAnd => "&",
            TokenKind::BitOr => "|",
            TokenKind::BitXor => "^",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Not => "!",
            TokenKind::BitNot => "~",
            TokenKind::Inc => "++",
            TokenKind::Dec => "--",
            TokenKind::AssemblyAssign => ":=",
            TokenKind::Contract => "contract",
            TokenKind::Function => "function",
            TokenKind::Event => "event",
            TokenKind::Returns => "returns",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Using => "using",
            TokenKind::For => "for",
            TokenKind::Is => "is",
            TokenKind::As => "as",
            TokenKind::Global => "global",
            TokenKind::Anonymous => "anonymous",
            TokenKind::Indexed => "indexed",
            TokenKind::Unchecked => "unchecked",
            TokenKind::Virtual => "virtual",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Internal => "internal",
            TokenKind::External => "external",
            TokenKind::Private => "private",
            TokenKind::Public => "public",
            TokenKind::Pure => "pure",
            TokenKind::View => "view",
            TokenKind::Payable => "payable",
            TokenKind::Constant => "constant",
            TokenKind::Immutable => "immutable",
            TokenKind::Transient => "transient",
            TokenKind::Storage => "storage",
            TokenKind::Memory => "memory",
            TokenKind::Calldata => "calldata",
            TokenKind::Address => "address",
            TokenKind::Bool => "bool",
            TokenKind::StringType => "string",
            TokenKind::Bytes => "bytes",
            TokenKind::Uint => "uint",
            TokenKind::Int => "int",
            TokenKind::Uint8 => "uint8",
            TokenKind::Uint16 => "uint16",
            TokenKind::Uint32 => "uint32",
            TokenKind::Uint64 => "uint64",
            TokenKind::Uint128 => "uint128",
            TokenKind::Uint256 => "uint256",
            TokenKind::Int8 => "int8",
            TokenKind::Int16 => "int16",
            TokenKind::Int32 => "int32",
            TokenKind::Int64 => "int64",
            TokenKind::Int128 => "int128",
            TokenKind::Int256 => "int256",
            TokenKind::Bytes1 => "bytes1",
            TokenKind::Bytes2 => "bytes2",
            TokenKind::Bytes4 => "bytes4",
            TokenKind::Bytes8 => "bytes8",
            TokenKind::Bytes16 => "bytes16",
            TokenKind::Bytes32 => "bytes32",
            TokenKind::DecimalNumber => "decimal number",
            TokenKind::HexNumber => "hex number",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Comment => "comment",
            TokenKind::Identifier => "identifier",
            TokenKind::Eof => "end of file",
            TokenKind::Illegal => "illegal token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scanned token: its kind and the span it covers. The literal text is
/// the zero-copy slice of the source the span addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn literal(&self) -> &str {
        self.span.as_str()
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span.clone()
    }
}
