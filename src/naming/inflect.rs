//! English singular/plural inflection for table and type names.

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
];

const UNCOUNTABLE: &[&str] = &[
    "data", "equipment", "information", "metadata", "news", "series", "species", "status",
];

/// Singularize the last `_`-separated word of `s`.
pub fn singularize(s: &str) -> String {
    match s.rfind('_') {
        Some(i) => format!("{}{}", &s[..=i], singular_word(&s[i + 1..])),
        None => singular_word(s),
    }
}

/// Pluralize the last `_`-separated word of `s`.
pub fn pluralize(s: &str) -> String {
    match s.rfind('_') {
        Some(i) => format!("{}{}", &s[..=i], plural_word(&s[i + 1..])),
        None => plural_word(s),
    }
}

fn singular_word(w: &str) -> String {
    let lower = w.to_ascii_lowercase();
    if w.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return w.to_string();
    }
    if let Some((single, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == lower) {
        return keep_case(w, single);
    }
    if lower.ends_with("ies") && lower.len() > 3 {
        let y = if is_upper(w) { "Y" } else { "y" };
        return format!("{}{y}", &w[..w.len() - 3]);
    }
    if lower.ends_with("sses")
        || lower.ends_with("xes")
        || lower.ends_with("ches")
        || lower.ends_with("shes")
        || lower.ends_with("zzes")
    {
        return w[..w.len() - 2].to_string();
    }
    let keeps_s = ["ss", "us", "is"].iter().any(|e| lower.ends_with(e));
    if lower.ends_with('s') && !keeps_s {
        return w[..w.len() - 1].to_string();
    }
    w.to_string()
}

fn plural_word(w: &str) -> String {
    let lower = w.to_ascii_lowercase();
    if w.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return w.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(single, _)| *single == lower) {
        return keep_case(w, plural);
    }
    let upper = is_upper(w);
    let consonant_y = lower.ends_with('y')
        && !["ay", "ey", "oy", "uy"].iter().any(|v| lower.ends_with(v));
    if consonant_y {
        let ies = if upper { "IES" } else { "ies" };
        return format!("{}{ies}", &w[..w.len() - 1]);
    }
    let suffix = if ["s", "x", "z", "ch", "sh"].iter().any(|e| lower.ends_with(e)) {
        "es"
    } else {
        "s"
    };
    if upper {
        format!("{w}{}", suffix.to_ascii_uppercase())
    } else {
        format!("{w}{suffix}")
    }
}

fn is_upper(w: &str) -> bool {
    w.len() > 1 && w.chars().all(|c| !c.is_ascii_lowercase())
}

fn keep_case(original: &str, replacement: &str) -> String {
    let mut chars = original.chars();
    match chars.next() {
        Some(c) if c.is_uppercase() => {
            let mut out = replacement.to_string();
            if let Some(first) = out.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            out
        }
        _ => replacement.to_string(),
    }
}
