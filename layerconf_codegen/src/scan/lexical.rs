//! Line-level helpers for recognising declarations without a full parse.

/// Whether `text` is a plain `//` comment (doc comments excluded).
pub(crate) fn is_line_comment(text: &str) -> bool {
    text.starts_with("//") && !is_doc_comment(text)
}

/// Whether `text` is an outer or inner doc comment.
pub(crate) fn is_doc_comment(text: &str) -> bool {
    text.starts_with("///") || text.starts_with("//!")
}

/// Whether `text` opens an outer attribute.
pub(crate) fn is_attribute(text: &str) -> bool {
    text.starts_with("#[")
}

/// Split `text` into its code and trailing `//` comment, ignoring `//`
/// inside string literals.
pub(crate) fn split_comment(text: &str) -> (&str, Option<&str>) {
    let mut in_string = false;
    let mut escaped = false;
    let mut previous_slash = false;
    for (index, ch) in text.char_indices() {
        if in_string {
            match (escaped, ch) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                previous_slash = false;
            }
            '/' if previous_slash => {
                let start = index.saturating_sub(1);
                let code = text.get(..start).unwrap_or(text);
                let comment = text.get(index + 1..).unwrap_or_default();
                return (code, Some(comment));
            }
            '/' => previous_slash = true,
            _ => previous_slash = false,
        }
    }
    (text, None)
}

/// The code part of `text` with the contents of string literals removed.
/// The quotes themselves are kept.
pub(crate) fn code_outside_strings(text: &str) -> String {
    let (code, _) = split_comment(text);
    let mut out = String::with_capacity(code.len());
    let mut in_string = false;
    let mut escaped = false;
    for ch in code.chars() {
        if in_string {
            match (escaped, ch) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => {
                    in_string = false;
                    out.push(ch);
                }
                _ => {}
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
        }
        out.push(ch);
    }
    out
}

/// Net change in `open`/`close` nesting across the code part of `text`.
pub(crate) fn nesting_delta(text: &str, open: char, close: char) -> i64 {
    code_outside_strings(text).chars().fold(0, |depth, ch| {
        if ch == open {
            depth + 1
        } else if ch == close {
            depth - 1
        } else {
            depth
        }
    })
}

/// Remove a leading visibility qualifier such as `pub` or `pub(crate)`.
pub(crate) fn strip_visibility(text: &str) -> &str {
    let trimmed = text.trim_start();
    if let Some(rest) = trimmed.strip_prefix("pub") {
        let rest_trimmed = rest.trim_start();
        if rest_trimmed.starts_with('(') {
            return rest_trimmed
                .split_once(')')
                .map_or(rest_trimmed, |(_, tail)| tail.trim_start());
        }
        if rest.starts_with(char::is_whitespace) {
            return rest_trimmed;
        }
    }
    trimmed
}

/// Whether `text` is a single Rust identifier (raw identifiers included).
pub(crate) fn is_ident(text: &str) -> bool {
    syn::parse_str::<syn::Ident>(text).is_ok()
}

/// Leading identifier characters of `text` and the remainder.
fn split_ident(text: &str) -> (&str, &str) {
    let end = text
        .find(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
        .unwrap_or(text.len());
    text.split_at_checked(end).unwrap_or((text, ""))
}

/// The head of a struct declaration.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct StructHead {
    pub(crate) name: String,
    pub(crate) unit: bool,
}

/// Parse `[vis] struct Name ...`, rejecting forms the merge cannot express.
pub(crate) fn parse_struct_head(text: &str) -> Result<StructHead, String> {
    let (code, _) = split_comment(text);
    let Some(rest) = strip_visibility(code).strip_prefix("struct ") else {
        return Err(format!(
            "configuration marker must precede a struct declaration, found `{text}`"
        ));
    };
    let (name, raw_tail) = split_ident(rest.trim_start());
    if !is_ident(name) {
        return Err(format!("invalid struct name in `{text}`"));
    }
    let tail = raw_tail.trim();
    if tail.starts_with('<') {
        return Err(format!("generic configuration type `{name}` is not supported"));
    }
    if tail.starts_with('(') {
        return Err(format!("tuple struct `{name}` is not supported"));
    }
    Ok(StructHead {
        name: name.to_owned(),
        unit: tail.starts_with(';'),
    })
}

/// The head of a function declaration.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FnHead {
    pub(crate) name: String,
    pub(crate) params: String,
    pub(crate) returns: Option<String>,
}

/// Parse `[vis] fn name(params) [-> Type] {`. Parameters that continue on
/// later lines are reported as non-empty.
pub(crate) fn parse_fn_head(text: &str) -> Option<FnHead> {
    let (code, _) = split_comment(text);
    let rest = strip_visibility(code).strip_prefix("fn ")?;
    let (raw_name, after_name) = rest.split_once('(')?;
    let name = raw_name.trim();
    if !is_ident(name) {
        return None;
    }
    let (params, tail) = after_name
        .split_once(')')
        .unwrap_or((after_name, ""));
    let returns = tail
        .trim()
        .strip_prefix("->")
        .map(|ret| {
            let before_body = ret.split_once('{').map_or(ret, |(ty, _)| ty);
            let before_where = before_body
                .split_once(" where")
                .map_or(before_body, |(ty, _)| ty);
            before_where.trim().to_owned()
        })
        .filter(|ret| !ret.is_empty());
    let params = if after_name.contains(')') {
        params.trim().to_owned()
    } else {
        String::from("..")
    };
    Some(FnHead {
        name: name.to_owned(),
        params,
        returns,
    })
}
