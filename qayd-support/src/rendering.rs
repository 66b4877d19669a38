//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to shorten fully qualified type names and to format
//! "did you mean?" suggestion lists in error output.

/// Strips module paths from a fully qualified type name, including the
/// paths of generic parameters.
///
/// # Examples
/// ```
/// use qayd_support::rendering::short_type_name;
///
/// assert_eq!(short_type_name("alloc::string::String"), "String");
/// assert_eq!(
///     short_type_name("alloc::sync::Arc<dyn app::counters::Counter>"),
///     "Arc<dyn Counter>"
/// );
/// ```
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut path = String::new();

    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            path.push(ch);
        } else {
            out.push_str(last_segment(&path));
            path.clear();
            out.push(ch);
        }
    }
    out.push_str(last_segment(&path));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Renders a suggestion block for "did you mean?" error output.
///
/// Returns an empty string when there is nothing to suggest, so callers
/// can append it unconditionally.
///
/// # Examples
/// ```
/// use qayd_support::rendering::render_suggestions;
///
/// let block = render_suggestions(&["String (name=\"primary\")"]);
/// assert!(block.contains("Did you mean one of:"));
/// assert!(block.contains("- String"));
/// ```
pub fn render_suggestions(suggestions: &[impl AsRef<str>]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n  Did you mean one of:");
    for suggestion in suggestions {
        out.push_str("\n    - ");
        out.push_str(suggestion.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plain_paths() {
        assert_eq!(short_type_name("core::primitive::i32"), "i32");
        assert_eq!(short_type_name("String"), "String");
    }

    #[test]
    fn strips_paths_inside_generics() {
        assert_eq!(
            short_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec<String>"
        );
        assert_eq!(
            short_type_name("std::collections::HashMap<alloc::string::String, core::primitive::u64>"),
            "HashMap<String, u64>"
        );
    }

    #[test]
    fn keeps_dyn_and_spaces() {
        assert_eq!(
            short_type_name("alloc::sync::Arc<dyn app::Counter>"),
            "Arc<dyn Counter>"
        );
    }

    #[test]
    fn empty_name_stays_empty() {
        assert_eq!(short_type_name(""), "");
    }

    #[test]
    fn renders_suggestion_list() {
        let block = render_suggestions(&["a", "b"]);
        assert_eq!(block, "\n  Did you mean one of:\n    - a\n    - b");
    }

    #[test]
    fn no_suggestions_renders_nothing() {
        let none: [&str; 0] = [];
        assert_eq!(render_suggestions(&none), "");
    }
}
