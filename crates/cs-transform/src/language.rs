//! Language classifier: filename -> comment family plus dialect switches.

use cs_core::LanguageFamily;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// An extra block comment pair for dialects outside the C family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDelims {
    pub open: &'static str,
    pub close: &'static str,
    /// Blocks nest (`{- {- -} -}`).
    pub nested: bool,
    /// The opener must start a line, and the rest of the closing line is
    /// part of the comment (Ruby `=begin` / `=end`).
    pub line_start: bool,
}

/// Where a `;` starts a line comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPlacement {
    LineStart,
    Anywhere,
}

/// Everything the scanners need to know about one kind of file.
///
/// `family` picks the state machine; the flags tune it for dialects that
/// share a family but differ in detail (CSS has no `//` comments, PHP
/// accepts `#`, Rust has lifetimes that look like char literals).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    pub family: LanguageFamily,
    /// `//` in C-style files.
    pub line_comments: bool,
    /// `/* */` in C-style and SQL files.
    pub block_comments: bool,
    /// `#` as a line comment.
    pub hash_comments: bool,
    /// `<!-- -->` as a block comment in C-style files.
    pub markup_comments: bool,
    /// Block comments beyond `/* */`: Haskell, Ruby, PowerShell.
    pub block_delims: Option<BlockDelims>,
    /// `/.../flags` literals after an operator or keyword.
    pub regex_literals: bool,
    /// `'a` without a closing quote is a lifetime, not a char literal.
    pub lifetimes: bool,
    /// Rust `r#"..."#` raw strings.
    pub raw_strings: bool,
    /// `'''` / `"""` strings.
    pub triple_quotes: bool,
    /// `'` delimits strings. Off where it is an operator (Lisp quote).
    pub single_quotes: bool,
    /// Double-quoted strings may span lines.
    pub multiline_strings: bool,
    /// A `'` right after an identifier is part of it (`foldl'`).
    pub primes: bool,
    /// Lua `[[ ]]` strings and `--[[ ]]` comments.
    pub long_brackets: bool,
    /// `#` only starts a comment at a word boundary.
    pub hash_word_boundary: bool,
    pub semicolon_comments: Option<CommentPlacement>,
    /// Batch `REM` and `::` lines.
    pub rem_comments: bool,
    /// Leading indentation carries meaning; minify must keep it.
    pub whitespace_sensitive: bool,
    /// Try a strict JSON round trip when minifying.
    pub json: bool,
    /// Collapse whitespace between tags when minifying.
    pub markup: bool,
}

const C_STYLE: LanguageProfile = LanguageProfile {
    family: LanguageFamily::CStyle,
    line_comments: true,
    block_comments: true,
    hash_comments: false,
    markup_comments: false,
    block_delims: None,
    regex_literals: false,
    lifetimes: false,
    raw_strings: false,
    triple_quotes: false,
    single_quotes: true,
    multiline_strings: false,
    primes: false,
    long_brackets: false,
    hash_word_boundary: false,
    semicolon_comments: None,
    rem_comments: false,
    whitespace_sensitive: false,
    json: false,
    markup: false,
};

const JS_STYLE: LanguageProfile = LanguageProfile { regex_literals: true, ..C_STYLE };

const PYTHON_STYLE: LanguageProfile = LanguageProfile {
    family: LanguageFamily::PythonStyle,
    line_comments: false,
    block_comments: false,
    hash_comments: true,
    triple_quotes: true,
    whitespace_sensitive: true,
    ..C_STYLE
};

const HASH_STYLE: LanguageProfile = LanguageProfile {
    triple_quotes: false,
    hash_word_boundary: true,
    whitespace_sensitive: false,
    ..PYTHON_STYLE
};

const LISP_STYLE: LanguageProfile = LanguageProfile {
    hash_comments: false,
    single_quotes: false,
    multiline_strings: true,
    semicolon_comments: Some(CommentPlacement::Anywhere),
    ..HASH_STYLE
};

const BATCH_STYLE: LanguageProfile = LanguageProfile {
    hash_comments: false,
    single_quotes: false,
    rem_comments: true,
    ..HASH_STYLE
};

const HTML_STYLE: LanguageProfile = LanguageProfile {
    family: LanguageFamily::HtmlStyle,
    line_comments: false,
    block_comments: false,
    markup: true,
    ..C_STYLE
};

const SQL_STYLE: LanguageProfile = LanguageProfile { family: LanguageFamily::SqlStyle, ..C_STYLE };

const LUA_STYLE: LanguageProfile = LanguageProfile {
    family: LanguageFamily::LuaStyle,
    block_comments: false,
    long_brackets: true,
    ..C_STYLE
};

const HASKELL_STYLE: LanguageProfile = LanguageProfile {
    long_brackets: false,
    primes: true,
    block_delims: Some(BlockDelims { open: "{-", close: "-}", nested: true, line_start: false }),
    ..LUA_STYLE
};

const UNKNOWN: LanguageProfile = LanguageProfile { family: LanguageFamily::Unknown, ..JS_STYLE };

static EXTENSIONS: LazyLock<HashMap<&'static str, LanguageProfile>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    for ext in ["js", "mjs", "cjs", "ts", "mts", "cts", "tsx", "jsx"] {
        map.insert(ext, JS_STYLE);
    }
    for ext in ["vue", "svelte", "astro"] {
        map.insert(ext, LanguageProfile { markup_comments: true, ..JS_STYLE });
    }
    for ext in [
        "c", "h", "cpp", "hpp", "cc", "cxx", "hh", "cs", "java", "go", "swift", "kt", "kts",
        "dart", "scala", "groovy", "proto", "prisma", "graphql", "gql", "scss", "less",
    ] {
        map.insert(ext, C_STYLE);
    }
    map.insert("rs", LanguageProfile { lifetimes: true, raw_strings: true, ..C_STYLE });
    map.insert("php", LanguageProfile { hash_comments: true, ..C_STYLE });
    map.insert("css", LanguageProfile { line_comments: false, ..C_STYLE });
    map.insert("sass", LanguageProfile { block_comments: false, whitespace_sensitive: true, ..C_STYLE });
    for ext in ["json", "jsonc"] {
        map.insert(ext, LanguageProfile { json: true, ..C_STYLE });
    }

    for ext in ["py", "pyw", "pyx"] {
        map.insert(ext, PYTHON_STYLE);
    }
    for ext in [
        "sh", "bash", "zsh", "fish", "r", "toml", "conf", "pl", "pm", "cfg", "env",
        "dockerfile", "containerfile", "cmake", "gitignore", "gitattributes", "editorconfig",
        "npmrc",
    ] {
        map.insert(ext, HASH_STYLE);
    }
    map.insert(
        "rb",
        LanguageProfile {
            block_delims: Some(BlockDelims { open: "=begin", close: "\n=end", nested: false, line_start: true }),
            ..HASH_STYLE
        },
    );
    for ext in ["ps1", "psm1"] {
        map.insert(
            ext,
            LanguageProfile {
                block_delims: Some(BlockDelims { open: "<#", close: "#>", nested: false, line_start: false }),
                ..HASH_STYLE
            },
        );
    }
    for ext in ["yaml", "yml", "coffee", "makefile", "mk"] {
        map.insert(ext, LanguageProfile { whitespace_sensitive: true, ..HASH_STYLE });
    }
    map.insert("ini", LanguageProfile { semicolon_comments: Some(CommentPlacement::LineStart), ..HASH_STYLE });
    for ext in ["clj", "cljs", "lisp", "el", "scm"] {
        map.insert(ext, LISP_STYLE);
    }
    for ext in ["bat", "cmd"] {
        map.insert(ext, BATCH_STYLE);
    }

    for ext in ["html", "htm", "xml", "svg", "xhtml"] {
        map.insert(ext, HTML_STYLE);
    }
    map.insert("sql", SQL_STYLE);
    map.insert("lua", LUA_STYLE);
    map.insert("hs", HASKELL_STYLE);

    // Indentation-sensitive templates with no comment syntax we handle.
    for ext in ["pug", "haml"] {
        map.insert(ext, LanguageProfile { whitespace_sensitive: true, ..UNKNOWN });
    }
    map
});

/// Well-known extensionless filenames, matched case-insensitively.
static FILENAMES: LazyLock<HashMap<&'static str, LanguageProfile>> = LazyLock::new(|| {
    let makefile = LanguageProfile { whitespace_sensitive: true, ..HASH_STYLE };
    let mut map = HashMap::new();
    map.insert("dockerfile", HASH_STYLE);
    map.insert("containerfile", HASH_STYLE);
    map.insert("cmakelists.txt", HASH_STYLE);
    map.insert("makefile", makefile);
    map.insert("gnumakefile", makefile);
    map.insert("rakefile", HASH_STYLE);
    map.insert("gemfile", HASH_STYLE);
    map
});

impl LanguageProfile {
    /// Default profile for a bare family.
    pub fn for_family(family: LanguageFamily) -> Self {
        match family {
            LanguageFamily::CStyle => C_STYLE,
            LanguageFamily::PythonStyle => PYTHON_STYLE,
            LanguageFamily::HtmlStyle => HTML_STYLE,
            LanguageFamily::SqlStyle => SQL_STYLE,
            LanguageFamily::LuaStyle => LUA_STYLE,
            LanguageFamily::Unknown => UNKNOWN,
        }
    }

    /// Literal forms the protector must treat as opaque for this profile.
    pub fn literal_syntax(&self) -> crate::protect::LiteralSyntax {
        crate::protect::LiteralSyntax {
            backticks: matches!(
                self.family,
                LanguageFamily::CStyle | LanguageFamily::SqlStyle | LanguageFamily::Unknown
            ),
            triple_quotes: self.triple_quotes,
            long_brackets: self.long_brackets,
            lifetimes: self.lifetimes,
            raw_strings: self.raw_strings,
            regex_literals: self.regex_literals,
        }
    }
}

/// Full profile lookup for a filename or path. Never fails.
pub fn profile(filename: &str) -> LanguageProfile {
    let path = Path::new(filename);
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename)
        .to_ascii_lowercase();

    if let Some(p) = FILENAMES.get(name.as_str()) {
        return *p;
    }
    // Dotfiles: `.gitignore`, `.env`, `.env.local`.
    if let Some(rest) = name.strip_prefix('.') {
        if rest == "env" || rest.starts_with("env.") {
            return HASH_STYLE;
        }
        if !rest.contains('.') {
            return EXTENSIONS.get(rest).copied().unwrap_or(UNKNOWN);
        }
    }
    match name.rsplit_once('.') {
        Some((_, ext)) => EXTENSIONS.get(ext).copied().unwrap_or(UNKNOWN),
        None => UNKNOWN,
    }
}

/// Map a filename to its comment family.
pub fn classify(filename: &str) -> LanguageFamily {
    profile(filename).family
}
