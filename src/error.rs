use thiserror::Error;

/// Errors raised while converting or compiling a collation element tree.
///
/// Every structural variant carries the LDML element name that triggered it
/// so a malformed source document can be diagnosed without a debugger.
#[derive(Error, Debug)]
pub enum CollationError {
    #[error("expected a <collation> element, found <{found}>")]
    NotACollation { found: String },

    #[error("no <collation> element found in document")]
    MissingCollation,

    #[error("failed to parse LDML document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("invalid collation strength setting: '{value}'")]
    InvalidStrength { value: String },

    #[error("invalid backwards setting: '{value}' (expected 'on' or 'off')")]
    InvalidBackwards { value: String },

    #[error("invalid before specifier on <reset>: '{value}'")]
    InvalidBefore { value: String },

    #[error("invalid hexadecimal character code '{hex}' in <{element}>")]
    InvalidHex { element: String, hex: String },

    #[error("invalid Unicode code point U+{value:04X} in <{element}>")]
    InvalidCodePoint { element: String, value: u32 },

    #[error("invalid collation rule element: <{name}>")]
    InvalidRuleElement { name: String },

    #[error("invalid node in extended collation rule: <{name}>")]
    InvalidExtendedElement { name: String },

    #[error("extended collation rule needs exactly one relation element, found {found}")]
    ExtendedRelationCount { found: usize },

    #[error("extended collation rule has more than one <{name}>")]
    DuplicateExtendedElement { name: String },

    #[error("unexpected element <{name}> in text data of <{element}>")]
    UnexpectedElement { element: String, name: String },

    #[error("empty collation rule: <{element}>")]
    EmptyRule { element: String },
}

pub type Result<T> = std::result::Result<T, CollationError>;
