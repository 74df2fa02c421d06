//! Tokenizer collaborator boundary.
//!
//! The core never parses source text itself; it consumes an external lexer
//! through the [`Tokenizer`] trait: split one statement's text into a flat
//! token sequence, and classify a token as a known primitive or class type
//! name. [`DefaultTokenizer`] is a reference implementation for hosts that
//! do not bring their own lexer; it splits identifiers, literals, and
//! operators deterministically and keeps dotted access paths (such as
//! `this.total`) together as one token so the scope analyzer sees the
//! instance-scope prefix intact.

use std::collections::HashSet;

use crate::tree::is_ident_char;

/// The external lexer consumed by the scope analyzer.
pub trait Tokenizer {
    /// Split one statement's text into an ordered token sequence.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Whether the token names a known primitive or class type.
    fn is_type_name(&self, token: &str) -> bool;
}

/// Primitive type names recognized out of the box.
const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "double", "float", "int", "long", "short", "String", "var",
];

/// Multi-character operators, longest first within each table.
const THREE_CHAR_OPS: &[&str] = &["<<=", ">>=", ">>>"];
const TWO_CHAR_OPS: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=",
    "^=", "->", "::", "<<", ">>",
];

/// Reference lexer: primitive types built in, class names registered by the
/// host.
#[derive(Debug, Clone)]
pub struct DefaultTokenizer {
    type_names: HashSet<String>,
}

impl Default for DefaultTokenizer {
    fn default() -> Self {
        DefaultTokenizer {
            type_names: PRIMITIVE_TYPES.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

impl DefaultTokenizer {
    /// Create a tokenizer knowing only the primitive type names.
    pub fn new() -> Self {
        DefaultTokenizer::default()
    }

    /// Create a tokenizer with additional class/type names registered.
    pub fn with_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokenizer = DefaultTokenizer::default();
        for ty in types {
            tokenizer.type_names.insert(ty.into());
        }
        tokenizer
    }

    /// Register one additional type name.
    pub fn register_type(&mut self, name: impl Into<String>) {
        self.type_names.insert(name.into());
    }
}

impl Tokenizer for DefaultTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() {
                i += 1;
            } else if c.is_alphabetic() || c == '_' {
                tokens.push(lex_identifier(&chars, &mut i));
            } else if c.is_ascii_digit() {
                tokens.push(lex_number(&chars, &mut i));
            } else if c == '"' || c == '\'' {
                tokens.push(lex_quoted(&chars, &mut i));
            } else {
                tokens.push(lex_operator(&chars, &mut i));
            }
        }
        tokens
    }

    fn is_type_name(&self, token: &str) -> bool {
        self.type_names.contains(token)
    }
}

/// An identifier, continued across `.` when the next segment is itself an
/// identifier, so access paths arrive as one token.
fn lex_identifier(chars: &[char], i: &mut usize) -> String {
    let mut token = String::new();
    while *i < chars.len() {
        let c = chars[*i];
        let dotted_continuation = c == '.'
            && chars
                .get(*i + 1)
                .is_some_and(|n| n.is_alphabetic() || *n == '_');
        if is_ident_char(c) || dotted_continuation {
            token.push(c);
            *i += 1;
        } else {
            break;
        }
    }
    token
}

/// A numeric literal, including radix prefixes, suffixes, separators, and a
/// fractional part.
fn lex_number(chars: &[char], i: &mut usize) -> String {
    let mut token = String::new();
    while *i < chars.len() {
        let c = chars[*i];
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
            token.push(c);
            *i += 1;
        } else {
            break;
        }
    }
    token
}

/// A quoted literal including its quotes, honoring backslash escapes. An
/// unterminated literal runs to the end of the statement text.
fn lex_quoted(chars: &[char], i: &mut usize) -> String {
    let quote = chars[*i];
    let mut token = String::from(quote);
    *i += 1;
    while *i < chars.len() {
        let c = chars[*i];
        token.push(c);
        *i += 1;
        if c == '\\' {
            if let Some(escaped) = chars.get(*i) {
                token.push(*escaped);
                *i += 1;
            }
        } else if c == quote {
            break;
        }
    }
    token
}

/// An operator or punctuation token, longest match first.
fn lex_operator(chars: &[char], i: &mut usize) -> String {
    for table in [THREE_CHAR_OPS, TWO_CHAR_OPS] {
        for op in table {
            let len = op.chars().count();
            if chars[*i..].len() >= len && chars[*i..*i + len].iter().collect::<String>() == *op {
                *i += len;
                return (*op).to_string();
            }
        }
    }
    let token = chars[*i].to_string();
    *i += 1;
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(text: &str) -> Vec<String> {
        DefaultTokenizer::new().tokenize(text)
    }

    mod splitting_tests {
        use super::*;

        #[test]
        fn splits_declaration_into_identifiers_and_operators() {
            assert_eq!(toks("int total = base + 1;"), [
                "int", "total", "=", "base", "+", "1", ";"
            ]);
        }

        #[test]
        fn keeps_instance_paths_as_one_token() {
            assert_eq!(toks("this.total += amount;"), [
                "this.total",
                "+=",
                "amount",
                ";"
            ]);
        }

        #[test]
        fn multi_char_operators_lex_greedily() {
            assert_eq!(toks("a==b!=c>>=d"), ["a", "==", "b", "!=", "c", ">>=", "d"]);
            assert_eq!(toks("i++"), ["i", "++"]);
        }

        #[test]
        fn quoted_literals_stay_whole() {
            assert_eq!(toks(r#"log("a + b");"#), ["log", "(", r#""a + b""#, ")", ";"]);
        }

        #[test]
        fn trailing_dot_is_not_swallowed() {
            assert_eq!(toks("a. "), ["a", "."]);
        }

        #[test]
        fn numeric_literals_keep_suffix_and_fraction() {
            assert_eq!(toks("x = 3.14f + 0xFF;"), [
                "x", "=", "3.14f", "+", "0xFF", ";"
            ]);
        }
    }

    mod type_name_tests {
        use super::*;

        #[test]
        fn primitives_are_known() {
            let t = DefaultTokenizer::new();
            assert!(t.is_type_name("int"));
            assert!(t.is_type_name("String"));
            assert!(!t.is_type_name("total"));
        }

        #[test]
        fn registered_class_names_are_known() {
            let mut t = DefaultTokenizer::with_types(["Buffer"]);
            assert!(t.is_type_name("Buffer"));
            t.register_type("Reader");
            assert!(t.is_type_name("Reader"));
        }
    }
}
