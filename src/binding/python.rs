//! Python source snippets carried by bindings.

/// `def name(cursor: Cursor, a: T) -> R`
///
/// No returns render as `None`; several returns become a `tuple[...]`.
pub fn funcdef(name: &str, params: &[String], returns: &[String]) -> String {
    let mut args = vec!["cursor: Cursor".to_string()];
    args.extend(params.iter().cloned());
    format!("def {name}({}) -> {}", args.join(", "), returns_of(returns))
}

/// `def name(self, cursor: Cursor) -> R`
pub fn methoddef(name: &str, returns: &str) -> String {
    format!("def {name}(self, cursor: Cursor) -> {returns}")
}

fn returns_of(returns: &[String]) -> String {
    match returns {
        [] => "None".to_string(),
        [one] => one.clone(),
        many => format!("tuple[{}]", many.join(", ")),
    }
}

/// `name: T  # sql_name`
pub fn field_def(name: &str, ty: &str, sql_name: &str) -> String {
    format!("{name}: {ty}  # {sql_name}")
}

/// `name: T`
pub fn param_decl(name: &str, ty: &str) -> String {
    format!("{name}: {ty}")
}

/// Multi-line query text as a parenthesized Python string expression.
///
/// Blank lines are dropped. Every line but the last keeps a trailing space
/// so the concatenated statement stays tokenized.
pub fn query_str(lines: &[String], comments: &[String]) -> String {
    let kept: Vec<(&str, &str)> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (l.as_str(), comments.get(i).map_or("", |c| c.trim())))
        .collect();

    let mut out = String::from("sqlstr = (\n");
    for (i, (line, comment)) in kept.iter().enumerate() {
        let space = if i + 1 < kept.len() { " " } else { "" };
        out.push_str(&format!("    '''{line}{space}'''"));
        if !comment.is_empty() {
            out.push_str(&format!("  # {comment}"));
        }
        out.push('\n');
    }
    out.push(')');
    out
}
