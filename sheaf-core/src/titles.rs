//! Duplicate-title policy for clone-and-rename.
//!
//! Historical summaries were typed inconsistently: `[tag] Title`,
//! `[tag]Title`, and either form with a leading space. A candidate summary is
//! treated as already existing when it equals an existing summary under any of
//! four variants. The rule is kept exactly as operators rely on it.

/// The four comparison variants of an existing summary.
///
/// 1. the summary itself
/// 2. `"] " + new_title` swapped for `"]" + new_title` when present,
///    otherwise `"]" + new_title` swapped for `"] " + new_title`
/// 3. variant 1 with one leading space
/// 4. variant 2 with one leading space
pub fn summary_variants(existing: &str, new_title: &str) -> [String; 4] {
  let spaced = format!("] {new_title}");
  let tight = format!("]{new_title}");

  let first = existing.to_string();
  let second = if existing.contains(&spaced) {
    existing.replace(&spaced, &tight)
  } else {
    existing.replace(&tight, &spaced)
  };
  let third = format!(" {first}");
  let fourth = format!(" {second}");

  [first, second, third, fourth]
}

/// Whether `candidate` names the same issue as `existing`
pub fn is_same_summary(candidate: &str, existing: &str, new_title: &str) -> bool {
  summary_variants(existing, new_title)
    .iter()
    .any(|variant| variant == candidate)
}

/// Replace every occurrence of `old_title` in a summary
pub fn rename_summary(summary: &str, old_title: &str, new_title: &str) -> String {
  if old_title.is_empty() {
    return summary.to_string();
  }
  summary.replace(old_title, new_title)
}
