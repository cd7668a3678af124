//! Lexical grammars for the supported languages.

/// Raw string flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawStrings {
    /// No raw strings.
    None,
    /// C++ `R"delim(...)delim"`.
    Delimited,
    /// Python `r"..."`: ordinary quoting without escapes.
    Verbatim,
    /// Rust `r#"..."#`.
    Hashed,
}

/// Table-driven description of a language's lexical surface.
#[derive(Debug)]
pub struct Grammar {
    /// Canonical language tag.
    pub tag: &'static str,
    /// Additional tags accepted in fenced code blocks.
    pub aliases: &'static [&'static str],
    /// Human readable name.
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    pub line_comments: &'static [&'static str],
    /// Line comment prefixes treated as documentation (checked first).
    pub doc_line_comments: &'static [&'static str],
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Block comment openers treated as documentation.
    pub doc_block_comments: &'static [&'static str],
    /// `#` at line start starts a preprocessor line.
    pub preprocessor: bool,
    /// `'x'` is a character literal rather than a string.
    pub char_literals: bool,
    /// `"""` / `'''` strings.
    pub triple_quotes: bool,
    /// Identifiers that may directly precede a string quote (`L"..."`, `b'...'`).
    pub string_prefixes: &'static [&'static str],
    /// How prefixes containing `r`/`R` are lexed.
    pub raw_strings: RawStrings,
    /// Plain quoted strings may span lines.
    pub multiline_strings: bool,
    /// JavaScript template literals.
    pub template_strings: bool,
    /// `\` escapes inside single-quoted strings.
    pub single_quote_escapes: bool,
}

const C_KEYWORDS: &[&str] = &[
    "_Alignas", "_Alignof", "_Atomic", "_Bool", "_Complex", "_Generic", "_Imaginary",
    "_Noreturn", "_Static_assert", "_Thread_local", "auto", "bool", "break", "case", "char",
    "const", "continue", "default", "do", "double", "else", "enum", "extern", "false", "float",
    "for", "goto", "if", "inline", "int", "long", "register", "restrict", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "true", "typedef", "union", "unsigned",
    "void", "volatile", "while",
];

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "char8_t", "class", "co_await",
    "co_return", "co_yield", "compl", "concept", "const", "const_cast", "consteval",
    "constexpr", "constinit", "continue", "decltype", "default", "delete", "do", "double",
    "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false", "final", "float",
    "for", "friend", "goto", "if", "import", "inline", "int", "long", "module", "mutable",
    "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator", "or", "or_eq",
    "override", "private", "protected", "public", "register", "reinterpret_cast", "requires",
    "return", "short", "signed", "sizeof", "static", "static_assert", "static_cast", "struct",
    "switch", "template", "this", "thread_local", "throw", "true", "try", "typedef", "typeid",
    "typename", "union", "unsigned", "using", "virtual", "void", "volatile", "wchar_t",
    "while", "xor", "xor_eq",
];

const C_TYPES: &[&str] = &[
    "FILE", "int8_t", "int16_t", "int32_t", "int64_t", "intmax_t", "intptr_t", "ptrdiff_t",
    "size_t", "ssize_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "uintmax_t",
    "uintptr_t", "va_list", "wchar_t",
];

const CPP_TYPES: &[&str] = &[
    "int8_t", "int16_t", "int32_t", "int64_t", "intmax_t", "intptr_t", "nullptr_t",
    "ptrdiff_t", "size_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "uintmax_t",
    "uintptr_t",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "match", "nonlocal", "not", "or", "pass", "raise",
    "return", "try", "while", "with", "yield",
];

const PYTHON_TYPES: &[&str] = &[
    "bool", "bytearray", "bytes", "complex", "dict", "float", "frozenset", "int", "list",
    "object", "set", "str", "tuple", "type",
];

const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "let", "new", "null", "of", "return",
    "static", "super", "switch", "this", "throw", "true", "try", "typeof", "undefined", "var",
    "void", "while", "with", "yield",
];

const JS_TYPES: &[&str] = &[
    "Array", "BigInt", "Boolean", "Date", "Error", "Map", "Number", "Object", "Promise",
    "RegExp", "Set", "String", "Symbol",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

const RUST_TYPES: &[&str] = &[
    "Box", "Option", "Result", "Self", "String", "Vec", "bool", "char", "f32", "f64", "i8",
    "i16", "i32", "i64", "i128", "isize", "str", "u8", "u16", "u32", "u64", "u128", "usize",
];

const BASH_KEYWORDS: &[&str] = &[
    "case", "do", "done", "elif", "else", "esac", "export", "fi", "for", "function", "if",
    "in", "local", "readonly", "return", "select", "then", "until", "while",
];

pub(crate) static GRAMMARS: &[Grammar] = &[
    Grammar {
        tag: "cpp",
        aliases: &["c++", "cxx", "cc", "hpp"],
        label: "C++",
        keywords: CPP_KEYWORDS,
        types: CPP_TYPES,
        line_comments: &["//"],
        doc_line_comments: &["///", "//!"],
        block_comment: Some(("/*", "*/")),
        doc_block_comments: &["/**", "/*!"],
        preprocessor: true,
        char_literals: true,
        triple_quotes: false,
        string_prefixes: &["L", "LR", "R", "U", "UR", "u", "u8", "u8R", "uR"],
        raw_strings: RawStrings::Delimited,
        multiline_strings: false,
        template_strings: false,
        single_quote_escapes: true,
    },
    Grammar {
        tag: "c",
        aliases: &["h"],
        label: "C",
        keywords: C_KEYWORDS,
        types: C_TYPES,
        line_comments: &["//"],
        doc_line_comments: &["///"],
        block_comment: Some(("/*", "*/")),
        doc_block_comments: &["/**"],
        preprocessor: true,
        char_literals: true,
        triple_quotes: false,
        string_prefixes: &["L", "U", "u", "u8"],
        raw_strings: RawStrings::None,
        multiline_strings: false,
        template_strings: false,
        single_quote_escapes: true,
    },
    Grammar {
        tag: "python",
        aliases: &["py", "python3"],
        label: "Python",
        keywords: PYTHON_KEYWORDS,
        types: PYTHON_TYPES,
        line_comments: &["#"],
        doc_line_comments: &[],
        block_comment: None,
        doc_block_comments: &[],
        preprocessor: false,
        char_literals: false,
        triple_quotes: true,
        string_prefixes: &["B", "F", "R", "U", "b", "br", "f", "fr", "r", "rb", "rf", "u"],
        raw_strings: RawStrings::Verbatim,
        multiline_strings: false,
        template_strings: false,
        single_quote_escapes: true,
    },
    Grammar {
        tag: "javascript",
        aliases: &["js", "mjs"],
        label: "JavaScript",
        keywords: JS_KEYWORDS,
        types: JS_TYPES,
        line_comments: &["//"],
        doc_line_comments: &[],
        block_comment: Some(("/*", "*/")),
        doc_block_comments: &["/**"],
        preprocessor: false,
        char_literals: false,
        triple_quotes: false,
        string_prefixes: &[],
        raw_strings: RawStrings::None,
        multiline_strings: false,
        template_strings: true,
        single_quote_escapes: true,
    },
    Grammar {
        tag: "rust",
        aliases: &["rs"],
        label: "Rust",
        keywords: RUST_KEYWORDS,
        types: RUST_TYPES,
        line_comments: &["//"],
        doc_line_comments: &["///", "//!"],
        block_comment: Some(("/*", "*/")),
        doc_block_comments: &["/**", "/*!"],
        preprocessor: false,
        char_literals: true,
        triple_quotes: false,
        string_prefixes: &["b", "br", "r"],
        raw_strings: RawStrings::Hashed,
        multiline_strings: true,
        template_strings: false,
        single_quote_escapes: true,
    },
    Grammar {
        tag: "bash",
        aliases: &["sh", "shell", "console"],
        label: "Bash",
        keywords: BASH_KEYWORDS,
        types: &[],
        line_comments: &["#"],
        doc_line_comments: &[],
        block_comment: None,
        doc_block_comments: &[],
        preprocessor: false,
        char_literals: false,
        triple_quotes: false,
        string_prefixes: &[],
        raw_strings: RawStrings::None,
        multiline_strings: true,
        template_strings: false,
        single_quote_escapes: false,
    },
];

/// Tags rendered without highlighting and without a warning.
pub(crate) const PLAIN_TEXT_TAGS: &[&str] = &[
    "", "markdown", "md", "none", "plain", "plaintext", "text", "txt",
];

/// Look up a grammar by tag or alias (case-insensitive).
pub fn grammar_for(tag: &str) -> Option<&'static Grammar> {
    let tag = tag.to_ascii_lowercase();
    GRAMMARS
        .iter()
        .find(|g| g.tag == tag || g.aliases.contains(&tag.as_str()))
}

/// Whether `tag` is known to need no highlighting.
pub fn is_plain_text(tag: &str) -> bool {
    PLAIN_TEXT_TAGS.contains(&tag.to_ascii_lowercase().as_str())
}
