//! Wrapper-Name Detection
//!
//! Higher-order wrappers show up as decorator-shaped display names like
//! `Memo(Connect(Widget))`. While the wrapper filter is active the engine
//! peels one layer per tree level, accumulating wrapper names until the
//! first node that is actually emitted, which carries them as attached
//! metadata. The forwarding marker (`ForwardRef(...)`) is not a conceptual
//! layer of its own: its name is unwrapped in place and never accumulated.

/// Display-name prefix of forwarding wrapper nodes.
pub const FORWARD_REF_PREFIX: &str = "ForwardRef";

/// Fallback display name for an anonymous forwarded inner component.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Outer wrapper name of a decorator-shaped display name.
///
/// `Memo(Widget)` yields `Memo`; plain names and names opening with a
/// parenthesis yield `None`.
pub fn wrapper_name(name: &str) -> Option<&str> {
    let open = name.find('(')?;
    if open == 0 {
        return None;
    }
    Some(&name[..open])
}

/// Whether the name carries the forwarding-marker prefix.
pub fn is_forwarding_name(name: &str) -> bool {
    name.starts_with(FORWARD_REF_PREFIX)
}

/// Inner name of a forwarding wrapper, [`ANONYMOUS_NAME`] when empty.
///
/// Only the outermost layer is peeled: `ForwardRef(Memo(X))` yields
/// `Memo(X)`.
pub fn unwrap_forwarded(name: &str) -> String {
    let inner = match name.find('(') {
        Some(open) => {
            let rest = &name[open + 1..];
            rest.strip_suffix(')').unwrap_or(rest)
        }
        None => "",
    };
    if inner.is_empty() {
        ANONYMOUS_NAME.to_string()
    } else {
        inner.to_string()
    }
}

/// Apply one tree level's wrapper handling to a display name.
///
/// Forwarding names are replaced by their inner name without adding a
/// layer; other decorator-shaped names push their outer layer onto
/// `pending` and keep the full name (the node itself is normally hidden by
/// the wrapper filter). Plain names pass through untouched.
pub fn peel(name: String, pending: &mut Vec<String>) -> String {
    if is_forwarding_name(&name) {
        if name.contains('(') {
            return unwrap_forwarded(&name);
        }
        return name;
    }
    if let Some(wrapper) = wrapper_name(&name) {
        pending.push(wrapper.to_string());
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_name_takes_outer_layer() {
        assert_eq!(wrapper_name("Memo(Widget)"), Some("Memo"));
        assert_eq!(wrapper_name("Connect(Memo(Widget))"), Some("Connect"));
        assert_eq!(wrapper_name("Widget"), None);
        assert_eq!(wrapper_name("(anonymous)"), None);
    }

    #[test]
    fn test_unwrap_forwarded_peels_one_layer() {
        assert_eq!(unwrap_forwarded("ForwardRef(Input)"), "Input");
        assert_eq!(unwrap_forwarded("ForwardRef(Memo(X))"), "Memo(X)");
        assert_eq!(unwrap_forwarded("ForwardRef()"), "Anonymous");
        assert_eq!(unwrap_forwarded("ForwardRef"), "Anonymous");
    }

    #[test]
    fn test_peel_accumulates_outer_to_inner() {
        let mut pending = Vec::new();
        let name = peel("Memo(Connect(Widget))".to_string(), &mut pending);
        assert_eq!(name, "Memo(Connect(Widget))");
        let name = peel("Connect(Widget)".to_string(), &mut pending);
        assert_eq!(name, "Connect(Widget)");
        let name = peel("Widget".to_string(), &mut pending);
        assert_eq!(name, "Widget");
        assert_eq!(pending, vec!["Memo", "Connect"]);
    }

    #[test]
    fn test_peel_unwraps_forwarding_without_accumulating() {
        let mut pending = Vec::new();
        let name = peel("ForwardRef(Input)".to_string(), &mut pending);
        assert_eq!(name, "Input");
        assert!(pending.is_empty());
    }
}
