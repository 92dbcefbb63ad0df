// Argument tokenizer: turns one raw input line into the list of words the
// dispatcher works with. Whitespace and `.` split words, double quotes
// group them. There are no escape sequences.

/// Split a raw line into tokens.
///
/// - Outside quotes, whitespace and `.` end the current token.
/// - A `"` opens a quoted section; inside it whitespace and `.` are kept.
/// - The closing `"` ends the token right away, so `"a b"c` gives `a b`
///   and `c`.
/// - Empty tokens are dropped. An unterminated quote keeps whatever was
///   collected as the last token.
pub fn parse_arguments(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in raw.chars() {
        match c {
            '"' if quoted => {
                quoted = false;
                push_token(&mut tokens, &mut current);
            }
            '"' => quoted = true,
            c if !quoted && (c.is_whitespace() || c == '.') => {
                push_token(&mut tokens, &mut current);
            }
            c => current.push(c),
        }
    }
    push_token(&mut tokens, &mut current);

    tokens
}

fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}
