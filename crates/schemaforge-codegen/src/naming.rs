//! Identifier sanitization for generated members and types.

/// Substitutions applied before camel-casing, in order.
const RAW_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("\"", ""),
    ("@", ""),
    ("?", ""),
    ("$", ""),
    ("[", ""),
    ("]", ""),
    ("(", "_"),
    (")", ""),
    (".", "-"),
    ("=", "-"),
    ("+", "plus"),
];

/// Substitutions applied after camel-casing, in order.
const CASED_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("*", "Star"),
    (":", "_"),
    ("-", "_"),
    ("#", "_"),
    ("&", "And"),
];

/// Turns a raw member name into a legal upper-camel-case identifier.
///
/// An override (the property's `name` extension) is returned untouched.
/// Never fails: input that sanitizes to nothing yields `_`.
pub fn sanitize(raw_name: &str, override_value: Option<&str>) -> String {
    if let Some(name) = override_value {
        return name.to_string();
    }

    let substituted = RAW_SUBSTITUTIONS
        .iter()
        .fold(raw_name.to_string(), |acc, (from, to)| acc.replace(from, to));

    let cased = to_upper_camel_case(&substituted);

    // upper-casing may expand into combining marks, which are not identifier characters
    let result: String = CASED_SUBSTITUTIONS
        .iter()
        .fold(cased, |acc, (from, to)| acc.replace(from, to))
        .chars()
        .filter(|c| *c == '_' || c.is_alphanumeric())
        .collect();

    if result.is_empty() {
        "_".to_string()
    } else if result.starts_with(|c: char| c.is_numeric()) {
        format!("_{}", result)
    } else {
        result
    }
}

/// Characters that survive camel-casing so the second substitution pass
/// can translate them.
fn is_escaped_later(c: char) -> bool {
    matches!(c, '*' | ':' | '#' | '&')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_escaped_later(c)
}

/// Upper-camel-cases `s`, treating every character that is neither
/// alphanumeric nor handled by the second substitution pass as a word
/// boundary. A leading digit is prefixed with `_`.
pub fn to_upper_camel_case(s: &str) -> String {
    let cased: String = s
        .split(|c: char| !is_word_char(c))
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect();

    if cased.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", cased)
    } else {
        cased
    }
}

/// Derives a type identifier from a name hint: alphanumerics are kept,
/// everything else separates words. `None` when nothing is left.
pub fn type_identifier(hint: &str) -> Option<String> {
    let cased: String = hint
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .flat_map(|word| {
            let mut chars = word.chars();
            let first = chars.next().into_iter().flat_map(char::to_uppercase);
            first.chain(chars).collect::<Vec<_>>()
        })
        .filter(|c| c.is_alphanumeric())
        .collect();

    if cased.is_empty() {
        None
    } else if cased.starts_with(|c: char| !c.is_alphabetic()) {
        Some(format!("_{}", cased))
    } else {
        Some(cased)
    }
}

/// Appends the smallest integer `n >= start` to `base` such that the result
/// is not taken.
pub fn with_free_suffix<F>(base: &str, start: usize, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut number = start;
    loop {
        let candidate = format!("{}{}", base, number);
        if !is_taken(&candidate) {
            return candidate;
        }
        number += 1;
    }
}
