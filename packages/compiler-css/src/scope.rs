/// Replace each standalone `selector` word in `css` with `target`.
///
/// `selector` inside a longer identifier (`.my-selector`, `selectors`) is
/// left alone.
pub fn scope_custom_css(css: &str, target: &str) -> String {
    const KEYWORD: &str = "selector";

    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    let mut prev: Option<char> = None;

    while let Some(pos) = rest.find(KEYWORD) {
        let before = rest[..pos].chars().next_back().or(prev);
        let after = rest[pos + KEYWORD.len()..].chars().next();

        out.push_str(&rest[..pos]);
        if is_boundary(before) && is_boundary(after) {
            out.push_str(target);
        } else {
            out.push_str(KEYWORD);
        }
        prev = Some('r');
        rest = &rest[pos + KEYWORD.len()..];
    }
    out.push_str(rest);
    out
}

fn is_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '-' || c == '_'),
    }
}
