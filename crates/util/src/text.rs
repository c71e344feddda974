/// Collapse whitespace and cap a response body for log lines and error messages.
pub fn truncate_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

/// First eight characters of a confirmation token, enough to correlate log lines.
pub fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(8) {
        Some((index, _)) => &token[..index],
        None => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bodies_render_placeholder() {
        assert_eq!(truncate_preview("  \n", 10), "<empty>");
    }

    #[test]
    fn long_bodies_are_cut_with_ellipsis() {
        let preview = truncate_preview("line one\nline two\tand more", 8);
        assert_eq!(preview, "line one...");
    }

    #[test]
    fn token_prefix_handles_short_tokens() {
        assert_eq!(token_prefix("abc"), "abc");
        assert_eq!(token_prefix("0123456789abcdef"), "01234567");
    }
}
