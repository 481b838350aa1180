//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings, cut on a char boundary.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

/// `None` for absent or whitespace-only strings, trimmed text otherwise.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
  s.map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{a} and {a} but not {b}", &[("a", "x")]);
    assert_eq!(out, "x and x but not {b}");
  }

  #[test]
  fn trunc_for_log_respects_char_boundaries() {
    let s = "Anfänger";
    let out = trunc_for_log(s, 4);
    assert!(out.starts_with("Anf"));
    assert!(out.ends_with("(9 bytes total)"));
    assert_eq!(trunc_for_log("kurz", 10), "kurz");
  }

  #[test]
  fn non_blank_filters_whitespace() {
    assert_eq!(non_blank(None), None);
    assert_eq!(non_blank(Some("   ")), None);
    assert_eq!(non_blank(Some(" Reisen ")), Some("Reisen"));
  }
}
