/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    escape_html_into(s, &mut result);
    result
}

/// Escape HTML special characters, appending to `out`.
pub fn escape_html_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_special_characters() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("\"hello\""), "&quot;hello&quot;");
        assert_eq!(escape_html("'c'"), "&#39;c&#39;");
    }

    #[test]
    fn escape_into_appends() {
        let mut out = String::from("x");
        escape_html_into("<y>", &mut out);
        assert_eq!(out, "x&lt;y&gt;");
    }
}
