//! `var()` substitution.

use std::collections::HashMap;

/// Custom properties in scope for an element, keyed by `--name`.
pub type CustomProperties = HashMap<String, String>;

/// Replace every `var(--name[, fallback])` in `value`.
///
/// Returns `None` when a reference cannot be resolved and has no usable
/// fallback; the declaration is then invalid at computed-value time.
/// `stack` holds the custom properties currently being expanded so that
/// `--a: var(--b); --b: var(--a)` terminates.
pub fn substitute_vars(
    value: &str,
    custom: &CustomProperties,
    stack: &mut Vec<String>,
) -> Option<String> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = find_var(rest) {
        out.push_str(&rest[..start]);
        let args_start = start + "var(".len();
        let args_len = closing_paren(&rest[args_start..])?;
        let args = &rest[args_start..args_start + args_len];

        out.push_str(&resolve_reference(args, custom, stack)?);
        rest = &rest[args_start + args_len + 1..];
    }

    out.push_str(rest);
    Some(out)
}

fn resolve_reference(
    args: &str,
    custom: &CustomProperties,
    stack: &mut Vec<String>,
) -> Option<String> {
    let (name, fallback) = match top_level_comma(args) {
        Some(idx) => (args[..idx].trim(), Some(args[idx + 1..].trim())),
        None => (args.trim(), None),
    };

    let referenced = if name.starts_with("--") && !stack.iter().any(|s| s == name) {
        custom.get(name).and_then(|raw| {
            stack.push(name.to_string());
            let expanded = substitute_vars(raw, custom, stack);
            stack.pop();
            expanded
        })
    } else {
        None
    };

    referenced.or_else(|| fallback.and_then(|f| substitute_vars(f, custom, stack)))
}

fn find_var(text: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets intact.
    text.to_ascii_lowercase().find("var(")
}

/// Offset of the `)` closing an already opened parenthesis.
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(idx),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn top_level_comma(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> CustomProperties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sub(value: &str, custom: &CustomProperties) -> Option<String> {
        substitute_vars(value, custom, &mut Vec::new())
    }

    #[test]
    fn test_simple_and_nested_references() {
        let custom = props(&[("--brand", "#0a0"), ("--accent", "var(--brand)")]);
        assert_eq!(sub("var(--accent)", &custom).as_deref(), Some("#0a0"));
        assert_eq!(
            sub("1px solid var(--brand)", &custom).as_deref(),
            Some("1px solid #0a0")
        );
    }

    #[test]
    fn test_fallback_with_commas_and_functions() {
        let custom = props(&[]);
        assert_eq!(
            sub("var(--missing, rgb(1, 2, 3))", &custom).as_deref(),
            Some("rgb(1, 2, 3)")
        );
        assert_eq!(
            sub("calc(var(--gap, 4px) * 2)", &custom).as_deref(),
            Some("calc(4px * 2)")
        );
    }

    #[test]
    fn test_unresolvable_reference_is_invalid() {
        assert_eq!(sub("var(--missing)", &props(&[])), None);
        assert_eq!(sub("var(--unterminated", &props(&[])), None);
    }

    #[test]
    fn test_cycles_terminate() {
        let custom = props(&[("--a", "var(--b)"), ("--b", "var(--a)")]);
        assert_eq!(sub("var(--a)", &custom), None);
        assert_eq!(sub("var(--a, red)", &custom).as_deref(), Some("red"));
    }

    #[test]
    fn test_value_without_references_is_unchanged() {
        assert_eq!(sub("10px 20px", &props(&[])).as_deref(), Some("10px 20px"));
    }
}
