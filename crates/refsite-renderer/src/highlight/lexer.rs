//! Single-pass lexer emitting highlighted HTML.
//!
//! Tokens become `<span class="...">` elements; everything else is copied
//! through HTML-escaped. The lexer never fails: unterminated comments and
//! strings extend to the end of the line (or input) and unknown characters
//! are passed through as plain text.

use std::sync::LazyLock;

use regex::Regex;

use super::grammar::{Grammar, RawStrings};
use crate::escape::escape_html_into;

/// Integer and floating literals with digit separators and type suffixes.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:0[xX][0-9a-fA-F'_]+|0[bB][01'_]+|(?:[0-9][0-9'_]*(?:\.[0-9][0-9'_]*)?|\.[0-9][0-9'_]*)(?:[eE][+-]?[0-9]+)?)[A-Za-z0-9_]*",
    )
    .unwrap()
});

/// Longest accepted raw string delimiter (`R"delim(`).
const MAX_RAW_DELIMITER: usize = 16;

/// Highlight `code` with `grammar`.
pub(crate) fn highlight(code: &str, grammar: &Grammar) -> String {
    let mut lexer = Lexer {
        src: code,
        pos: 0,
        grammar,
        out: String::with_capacity(code.len() * 2),
        line_start: true,
    };
    lexer.run();
    lexer.out
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    grammar: &'a Grammar,
    out: String,
    /// Only blanks seen since the last newline.
    line_start: bool,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn run(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            let at_line_start = self.line_start;
            if self.comment()
                || (at_line_start && self.preprocessor())
                || self.quoted(0, true)
                || self.number()
                || self.word()
            {
                self.line_start = false;
                continue;
            }
            self.plain(c.len_utf8());
            self.line_start = c == '\n' || (at_line_start && (c == ' ' || c == '\t'));
        }
    }

    fn comment(&mut self) -> bool {
        let rest = self.rest();
        let grammar = self.grammar;

        if let Some((open, close)) = grammar.block_comment
            && rest.starts_with(open)
        {
            let body = &rest[open.len()..];
            let doc = grammar.doc_block_comments.iter().any(|d| rest.starts_with(d))
                && !body.starts_with(close);
            let end = body
                .find(close)
                .map_or(rest.len(), |i| open.len() + i + close.len());
            self.emit(if doc { "com_multi_dox" } else { "com_multi" }, end);
            return true;
        }

        let line_end = rest.find('\n').unwrap_or(rest.len());
        if grammar.doc_line_comments.iter().any(|p| rest.starts_with(p)) {
            self.emit("com_single_dox", line_end);
            return true;
        }
        let Some(prefix) = grammar.line_comments.iter().find(|p| rest.starts_with(**p)) else {
            return false;
        };
        // `$#` and `${#var}` are parameter expansions in shell code.
        if *prefix == "#" && grammar.tag == "bash" && !self.at_word_boundary() {
            return false;
        }
        self.emit("com_single", line_end);
        true
    }

    fn at_word_boundary(&self) -> bool {
        self.src[..self.pos]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || matches!(c, ';' | '|' | '&' | '(' | ')'))
    }

    fn preprocessor(&mut self) -> bool {
        if !self.grammar.preprocessor || !self.rest().starts_with('#') {
            return false;
        }
        self.emit("pp_hash", 1);
        self.blanks();

        let directive_len = ident_len(self.rest());
        if directive_len > 0 {
            let includes = matches!(
                &self.rest()[..directive_len],
                "include" | "include_next" | "import"
            );
            self.emit("pp_directive", directive_len);
            if includes {
                self.blanks();
                self.header();
            }
        }

        // Remainder of the logical line, up to a trailing comment.
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut end = 0;
        while end < bytes.len() {
            match bytes[end] {
                b'\n' if end > 0 && bytes[end - 1] == b'\\' => end += 1,
                b'\n' => break,
                b'/' if matches!(bytes.get(end + 1), Some(b'/' | b'*')) => break,
                _ => end += 1,
            }
        }
        let line = &rest[..end];
        let leading = line.len() - line.trim_start().len();
        let body = line.trim().len();
        self.plain(leading);
        if body > 0 {
            self.emit("pp_other", body);
        }
        self.plain(end - leading - body);
        true
    }

    fn header(&mut self) {
        let rest = self.rest();
        let len = match rest.as_bytes().first() {
            Some(b'<') => rest.find('>').map(|i| i + 1),
            Some(b'"') => rest[1..].find('"').map(|i| i + 2),
            _ => None,
        };
        if let Some(len) = len
            && !rest[..len].contains('\n')
        {
            self.emit("pp_header", len);
        }
    }

    fn blanks(&mut self) {
        let len = self
            .rest()
            .bytes()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count();
        self.plain(len);
    }

    /// Lex a string or character literal whose quote follows `prefix_len`
    /// bytes of prefix.
    fn quoted(&mut self, prefix_len: usize, escapes: bool) -> bool {
        let rest = self.rest();
        let grammar = self.grammar;
        let Some(&quote) = rest.as_bytes().get(prefix_len) else {
            return false;
        };
        match quote {
            b'"' | b'\'' => {}
            b'`' if grammar.template_strings => {}
            _ => return false,
        }

        if quote == b'\'' && grammar.char_literals {
            return self.char_literal(prefix_len);
        }

        let body_start = prefix_len + 1;
        if grammar.triple_quotes
            && rest.as_bytes().get(body_start..body_start + 2) == Some(&[quote, quote][..])
        {
            let delimiter = &rest[prefix_len..prefix_len + 3];
            let end = rest[prefix_len + 3..]
                .find(delimiter)
                .map_or(rest.len(), |i| prefix_len + 3 + i + 3);
            self.emit_string("lit_str", end, escapes);
            return true;
        }

        let honors_escapes = quote != b'\'' || grammar.single_quote_escapes;
        let multiline = grammar.multiline_strings || quote == b'`';
        let bytes = rest.as_bytes();
        let mut i = body_start;
        let end = loop {
            match bytes.get(i) {
                None => break bytes.len(),
                Some(b'\\') if honors_escapes => i += 2,
                Some(&b) if b == quote => break i + 1,
                Some(b'\n') if !multiline => break i,
                Some(_) => i += 1,
            }
        };
        // An escape at the very end can step past the input.
        let end = end.min(bytes.len());
        self.emit_string("lit_str", end, escapes && honors_escapes);
        true
    }

    fn char_literal(&mut self, prefix_len: usize) -> bool {
        let rest = self.rest();
        let body = &rest[prefix_len + 1..];
        let len = if let Some(escaped) = body.strip_prefix('\\') {
            // The escaped character itself may be a quote (`'\''`).
            escaped
                .chars()
                .next()
                .filter(|&c| c != '\n')
                .and_then(|first| {
                    let skip = first.len_utf8();
                    escaped[skip..].find(['\'', '\n']).map(|i| i + skip)
                })
                .filter(|&i| escaped.as_bytes()[i] == b'\'' && i < 12)
                .map(|i| i + 1)
        } else {
            body.chars()
                .next()
                .filter(|c| *c != '\'' && *c != '\n')
                .map(char::len_utf8)
                .filter(|&n| body[n..].starts_with('\''))
        };
        // Lifetimes and digit separators are not literals.
        let Some(len) = len else {
            return false;
        };
        self.emit_string("lit_chr", prefix_len + 1 + len + 1, true);
        true
    }

    fn number(&mut self) -> bool {
        let rest = self.rest();
        let starts_number = match rest.as_bytes() {
            [b'0'..=b'9', ..] => true,
            [b'.', b'0'..=b'9', ..] => true,
            _ => false,
        };
        if !starts_number {
            return false;
        }
        match NUMBER_RE.find(rest) {
            Some(m) if m.end() > 0 => {
                self.emit("lit_num", m.end());
                true
            }
            _ => false,
        }
    }

    fn word(&mut self) -> bool {
        let rest = self.rest();
        let len = ident_len(rest);
        if len == 0 {
            return false;
        }
        let word = &rest[..len];
        let grammar = self.grammar;

        if grammar.string_prefixes.contains(&word) && self.prefixed_string(word) {
            return true;
        }

        let class = if grammar.keywords.binary_search(&word).is_ok() {
            Some("keyword")
        } else if grammar.types.contains(&word) {
            Some("type")
        } else if rest[len..].starts_with('(') {
            Some("func")
        } else {
            None
        };
        match class {
            Some(class) => self.emit(class, len),
            None => self.plain(len),
        }
        true
    }

    fn prefixed_string(&mut self, prefix: &str) -> bool {
        let raw = prefix.contains(['r', 'R']);
        match self.grammar.raw_strings {
            RawStrings::Delimited if raw => self.delimited_raw(prefix.len()),
            RawStrings::Hashed if raw => self.hashed_raw(prefix.len()),
            RawStrings::Verbatim => self.quoted(prefix.len(), !raw),
            _ => self.quoted(prefix.len(), true),
        }
    }

    /// `R"delim( ... )delim"`
    fn delimited_raw(&mut self, prefix_len: usize) -> bool {
        let rest = self.rest();
        let Some(after) = rest[prefix_len..].strip_prefix('"') else {
            return false;
        };
        let Some(open) = after
            .find(['(', '"', '\\', ' ', '\n'])
            .filter(|&i| after.as_bytes()[i] == b'(' && i <= MAX_RAW_DELIMITER)
        else {
            return false;
        };
        let closing = format!("){}\"", &after[..open]);
        let body_start = prefix_len + 1 + open + 1;
        let end = rest[body_start..]
            .find(&closing)
            .map_or(rest.len(), |i| body_start + i + closing.len());
        self.emit_string("lit_str", end, false);
        true
    }

    /// `r#"..."#`
    fn hashed_raw(&mut self, prefix_len: usize) -> bool {
        let rest = self.rest();
        let hashes = rest[prefix_len..].bytes().take_while(|b| *b == b'#').count();
        let quote_at = prefix_len + hashes;
        if rest.as_bytes().get(quote_at) != Some(&b'"') {
            return false;
        }
        let closing = format!("\"{}", "#".repeat(hashes));
        let body_start = quote_at + 1;
        let end = rest[body_start..]
            .find(&closing)
            .map_or(rest.len(), |i| body_start + i + closing.len());
        self.emit_string("lit_str", end, false);
        true
    }

    fn plain(&mut self, len: usize) {
        escape_html_into(&self.src[self.pos..self.pos + len], &mut self.out);
        self.pos += len;
    }

    fn emit(&mut self, class: &str, len: usize) {
        push_span(&mut self.out, class, &self.src[self.pos..self.pos + len]);
        self.pos += len;
    }

    /// Emit a literal, marking escape sequences when `escapes` is set.
    fn emit_string(&mut self, class: &str, len: usize, escapes: bool) {
        let text = &self.src[self.pos..self.pos + len];
        self.pos += len;

        self.out.push_str("<span class=\"");
        self.out.push_str(class);
        self.out.push_str("\">");
        let mut rest = text;
        if escapes {
            while let Some(i) = rest.find('\\') {
                escape_html_into(&rest[..i], &mut self.out);
                let n = escape_len(&rest[i..]);
                push_span(&mut self.out, "esc_seq", &rest[i..i + n]);
                rest = &rest[i + n..];
            }
        }
        escape_html_into(rest, &mut self.out);
        self.out.push_str("</span>");
    }
}

fn push_span(out: &mut String, class: &str, text: &str) {
    out.push_str("<span class=\"");
    out.push_str(class);
    out.push_str("\">");
    escape_html_into(text, out);
    out.push_str("</span>");
}

/// Length in bytes of an ASCII identifier at the start of `s`.
fn ident_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count(),
        _ => 0,
    }
}

/// Length in bytes of the escape sequence at the start of `s` (which begins
/// with a backslash).
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let count = |start: usize, max: usize, pred: fn(&u8) -> bool| {
        start + bytes[start..].iter().take(max).take_while(|b| pred(b)).count()
    };
    match bytes.get(1) {
        None => 1,
        Some(b'x') => count(2, usize::MAX, u8::is_ascii_hexdigit),
        Some(b'u') if bytes.get(2) == Some(&b'{') => s.find('}').map_or(s.len(), |i| i + 1),
        Some(b'u') => count(2, 4, u8::is_ascii_hexdigit),
        Some(b'U') => count(2, 8, u8::is_ascii_hexdigit),
        Some(b'0'..=b'7') => count(1, 3, |b| (b'0'..=b'7').contains(b)),
        Some(_) => 1 + s[1..].chars().next().map_or(0, char::len_utf8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::grammar::grammar_for;
    use pretty_assertions::assert_eq;

    fn hl(code: &str, tag: &str) -> String {
        highlight(code, grammar_for(tag).unwrap())
    }

    #[test]
    fn test_keywords_and_functions() {
        assert_eq!(
            hl("int main(){}", "cpp"),
            r#"<span class="keyword">int</span> <span class="func">main</span>(){}"#
        );
    }

    #[test]
    fn test_types() {
        assert_eq!(
            hl("size_t n;", "c"),
            r#"<span class="type">size_t</span> n;"#
        );
    }

    #[test]
    fn test_include_line() {
        assert_eq!(
            hl("#include <vector>\n", "cpp"),
            concat!(
                r#"<span class="pp_hash">#</span><span class="pp_directive">include</span> "#,
                r#"<span class="pp_header">&lt;vector&gt;</span>"#,
                "\n"
            )
        );
    }

    #[test]
    fn test_define_line_with_trailing_comment() {
        assert_eq!(
            hl("  # define N 10 // size", "c"),
            concat!(
                r#"  <span class="pp_hash">#</span> <span class="pp_directive">define</span> "#,
                r#"<span class="pp_other">N 10</span> <span class="com_single">// size</span>"#
            )
        );
    }

    #[test]
    fn test_hash_mid_line_is_not_preprocessor() {
        assert_eq!(hl("a # b", "c"), "a # b");
    }

    #[test]
    fn test_string_with_escape() {
        assert_eq!(
            hl(r#""a\n""#, "cpp"),
            r#"<span class="lit_str">&quot;a<span class="esc_seq">\n</span>&quot;</span>"#
        );
    }

    #[test]
    fn test_hex_and_octal_escapes() {
        assert_eq!(
            hl(r#""\x41\101""#, "c"),
            concat!(
                r#"<span class="lit_str">&quot;<span class="esc_seq">\x41</span>"#,
                r#"<span class="esc_seq">\101</span>&quot;</span>"#
            )
        );
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(
            hl("'x' '\\0'", "cpp"),
            concat!(
                r#"<span class="lit_chr">&#39;x&#39;</span> "#,
                r#"<span class="lit_chr">&#39;<span class="esc_seq">\0</span>&#39;</span>"#
            )
        );
    }

    #[test]
    fn test_escaped_quote_char_literal() {
        assert_eq!(
            hl("c == '\\'';", "cpp"),
            concat!(
                "c == ",
                r#"<span class="lit_chr">&#39;<span class="esc_seq">\&#39;</span>&#39;</span>;"#
            )
        );
        assert_eq!(
            hl("'\\\\'", "cpp"),
            r#"<span class="lit_chr">&#39;<span class="esc_seq">\\</span>&#39;</span>"#
        );
    }

    #[test]
    fn test_rust_lifetime_is_not_char() {
        assert_eq!(
            hl("&'a str", "rust"),
            r#"&amp;&#39;a <span class="type">str</span>"#
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            hl("1'000'000 0xFFu 3.14f 1e-9 .5", "cpp"),
            concat!(
                r#"<span class="lit_num">1&#39;000&#39;000</span> "#,
                r#"<span class="lit_num">0xFFu</span> "#,
                r#"<span class="lit_num">3.14f</span> "#,
                r#"<span class="lit_num">1e-9</span> "#,
                r#"<span class="lit_num">.5</span>"#
            )
        );
    }

    #[test]
    fn test_identifier_with_digits_is_not_number() {
        assert_eq!(hl("x1 = 2", "python"), r#"x1 = <span class="lit_num">2</span>"#);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            hl("// a\n/* b */", "cpp"),
            "<span class=\"com_single\">// a</span>\n<span class=\"com_multi\">/* b */</span>"
        );
    }

    #[test]
    fn test_doc_comments() {
        assert_eq!(
            hl("/// a\n/** b */ /**/", "cpp"),
            concat!(
                "<span class=\"com_single_dox\">/// a</span>\n",
                r#"<span class="com_multi_dox">/** b */</span> "#,
                r#"<span class="com_multi">/**/</span>"#
            )
        );
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        assert_eq!(
            hl("/* open\nint", "c"),
            "<span class=\"com_multi\">/* open\nint</span>"
        );
    }

    #[test]
    fn test_cpp_raw_string() {
        assert_eq!(
            hl(r#"R"x(a")b)x";"#, "cpp"),
            r#"<span class="lit_str">R&quot;x(a&quot;)b)x&quot;</span>;"#
        );
    }

    #[test]
    fn test_cpp_prefixed_string() {
        assert_eq!(
            hl(r#"u8"s""#, "cpp"),
            r#"<span class="lit_str">u8&quot;s&quot;</span>"#
        );
    }

    #[test]
    fn test_identifier_named_like_prefix() {
        assert_eq!(hl("R + L", "cpp"), "R + L");
    }

    #[test]
    fn test_python_triple_quotes_and_comment() {
        assert_eq!(
            hl("\"\"\"doc\nmore\"\"\" # c", "python"),
            concat!(
                "<span class=\"lit_str\">&quot;&quot;&quot;doc\nmore&quot;&quot;&quot;</span> ",
                r#"<span class="com_single"># c</span>"#
            )
        );
    }

    #[test]
    fn test_python_raw_string_has_no_escapes() {
        assert_eq!(
            hl(r#"r"\d""#, "python"),
            r#"<span class="lit_str">r&quot;\d&quot;</span>"#
        );
    }

    #[test]
    fn test_rust_hashed_raw_string() {
        assert_eq!(
            hl(r####"r#"a"b"#"####, "rust"),
            r#"<span class="lit_str">r#&quot;a&quot;b&quot;#</span>"#
        );
    }

    #[test]
    fn test_javascript_template_string() {
        assert_eq!(
            hl("`a\nb`", "javascript"),
            "<span class=\"lit_str\">`a\nb`</span>"
        );
    }

    #[test]
    fn test_bash_parameter_count_is_not_comment() {
        assert_eq!(
            hl("echo $# # n", "bash"),
            r#"echo $# <span class="com_single"># n</span>"#
        );
    }

    #[test]
    fn test_bash_single_quotes_have_no_escapes() {
        assert_eq!(
            hl(r"'a\'", "bash"),
            r#"<span class="lit_str">&#39;a\&#39;</span>"#
        );
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        assert_eq!(
            hl("\"abc\nint", "c"),
            "<span class=\"lit_str\">&quot;abc</span>\n<span class=\"keyword\">int</span>"
        );
    }

    #[test]
    fn test_html_is_escaped() {
        assert_eq!(hl("a < b && c", "c"), "a &lt; b &amp;&amp; c");
    }

    #[test]
    fn test_non_ascii_passthrough() {
        assert_eq!(hl("// é\nπ", "cpp"), "<span class=\"com_single\">// é</span>\nπ");
    }

    #[test]
    fn test_escape_len() {
        assert_eq!(escape_len(r"\n"), 2);
        assert_eq!(escape_len(r"\x41z"), 4);
        assert_eq!(escape_len("\\é"), 3);
        assert_eq!(escape_len(r"\u{1F600}x"), 9);
        assert_eq!(escape_len(r"\0123"), 4);
        assert_eq!(escape_len("\\"), 1);
    }
}
