//! Static style fallback for script-less web embeddings.
//!
//! When the widget is served to an environment where none of its dynamic
//! behavior can run, the hidden native input must still be usable as a
//! plain text field. This payload restyles it into a visible, legible
//! input. It is purely presentational and not part of the core contract;
//! web hosts emit it inside a `<noscript>` block.

/// Attribute selector the stylesheet targets by default.
pub const FALLBACK_SELECTOR: &str = "[data-otp-input]";

/// The fallback stylesheet, scoped to [`FALLBACK_SELECTOR`].
pub const FALLBACK_STYLE: &str = "
[data-otp-input] {
  --nojs-bg: white !important;
  --nojs-fg: black !important;

  background-color: var(--nojs-bg) !important;
  color: var(--nojs-fg) !important;
  caret-color: var(--nojs-fg) !important;
  letter-spacing: .25em !important;
  text-align: center !important;
  border: 1px solid var(--nojs-fg) !important;
  border-radius: 4px !important;
  width: 100% !important;
}
@media (prefers-color-scheme: dark) {
  [data-otp-input] {
    --nojs-bg: black !important;
    --nojs-fg: white !important;
  }
}";

/// Returns the fallback stylesheet rescoped to a custom selector, for hosts
/// that mount the input under their own class or attribute.
pub fn style_for(selector: &str) -> String {
    FALLBACK_STYLE.replace(FALLBACK_SELECTOR, selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_payload_is_scoped() {
        assert!(FALLBACK_STYLE.contains(FALLBACK_SELECTOR));
    }

    #[test]
    fn test_rescoping_replaces_every_occurrence() {
        let css = style_for(".my-otp");
        assert!(!css.contains(FALLBACK_SELECTOR));
        assert_eq!(css.matches(".my-otp").count(), 2);
    }
}
