//! Text edits applied to `debian/rules` and `debian/control`.

use serde::{Deserialize, Serialize};

use super::scheme::Substitution;

/// How literal substitutions find their targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionMode {
    /// Plain substring replacement across the whole file, any match counts
    #[default]
    Anywhere,
    /// Only inside the value of a field or variable assignment, and only
    /// where the match is not glued to a surrounding version token
    Strict,
}

/// Apply `substitutions` in a single left-to-right scan.
///
/// At each position the first listed substitution that matches wins, and
/// replaced text is never scanned again, so a replacement that contains a
/// later pattern is left alone.
pub fn apply(content: &str, substitutions: &[Substitution], mode: SubstitutionMode) -> String {
    let active: Vec<&Substitution> = substitutions.iter().filter(|s| !s.from.is_empty()).collect();
    if active.is_empty() {
        return content.to_string();
    }

    match mode {
        SubstitutionMode::Anywhere => replace_tokens(content, &active, false),
        SubstitutionMode::Strict => replace_in_fields(content, &active),
    }
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '~')
}

/// Replace every match in `text`. With `bounded`, a match glued to a version
/// character on either side is skipped.
fn replace_tokens(text: &str, substitutions: &[&Substitution], bounded: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut previous: Option<char> = None;

    'scan: while let Some(c) = rest.chars().next() {
        for s in substitutions {
            let Some(tail) = rest.strip_prefix(s.from.as_str()) else {
                continue;
            };
            let glued = previous.is_some_and(is_version_char)
                || tail.chars().next().is_some_and(is_version_char);
            if bounded && glued {
                continue;
            }
            out.push_str(&s.to);
            previous = s.from.chars().next_back();
            rest = tail;
            continue 'scan;
        }

        out.push(c);
        previous = Some(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Byte offset where the value of an assignment line starts.
///
/// Recognises `Key: value` (control files) and `NAME = value`, `NAME := value`,
/// `NAME ?= value`, `NAME += value`, `export NAME=value` (makefiles).
fn value_start(line: &str) -> Option<usize> {
    let body = line.strip_prefix("export ").unwrap_or(line);
    let offset = line.len() - body.len();

    let name_end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        .filter(|&end| end > 0)?;
    let rest = &body[name_end..];
    let trimmed = rest.trim_start_matches([' ', '\t']);
    let operator_at = offset + name_end + (rest.len() - trimmed.len());

    ["::=", ":=", "?=", "+=", "=", ":"]
        .iter()
        .find(|op| trimmed.starts_with(*op))
        .map(|op| operator_at + op.len())
}

/// Whether `line` opens a control-file field (`Field-Name: value`).
///
/// Control field names start with an uppercase letter and hold no `_`, which
/// keeps makefile targets such as `override_dh_auto_build:` out.
fn opens_control_field(line: &str) -> bool {
    let name_end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(line.len());
    let rest = &line[name_end..];

    line.starts_with(|c: char| c.is_ascii_uppercase())
        && rest.starts_with(':')
        && !rest.starts_with(":=")
        && !rest.starts_with("::")
}

fn replace_in_fields(content: &str, substitutions: &[&Substitution]) -> String {
    let mut out = String::with_capacity(content.len());
    // previous line opened or folded a control field
    let mut folding = false;
    // previous assignment line ended with a backslash
    let mut continued = false;

    for line in content.split_inclusive('\n') {
        let folded = folding && line.starts_with([' ', '\t']);
        let start = if folded || continued {
            Some(0)
        } else {
            value_start(line)
        };

        match start {
            Some(start) => {
                let (head, value) = line.split_at(start);
                out.push_str(head);
                out.push_str(&replace_tokens(value, substitutions, true));
            }
            None => out.push_str(line),
        }

        continued = start.is_some() && line.trim_end_matches(['\n', '\r']).ends_with('\\');
        folding = folded || opens_control_field(line);
    }

    out
}

/// Replace the whole line beginning with `tag` by `<tag> <value>`.
///
/// Only the first such line is rewritten. Returns `None` when no line starts
/// with `tag`.
pub fn rewrite_field(content: &str, tag: &str, value: &str) -> Option<String> {
    let mut found = false;
    let mut out = String::with_capacity(content.len());

    for line in content.split_inclusive('\n') {
        if !found && line.starts_with(tag) {
            found = true;
            out.push_str(tag);
            out.push(' ');
            out.push_str(value);
            if line.ends_with('\n') {
                out.push('\n');
            }
        } else {
            out.push_str(line);
        }
    }

    found.then_some(out)
}

/// Insert `<tag> <value>` after the first `Source:` line, or at the top when
/// there is none.
pub fn insert_field(content: &str, tag: &str, value: &str) -> String {
    let field = format!("{} {}\n", tag, value);
    let mut out = String::with_capacity(content.len() + field.len());
    let mut inserted = false;

    for line in content.split_inclusive('\n') {
        out.push_str(line);
        if !inserted && line.starts_with("Source:") {
            if !line.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&field);
            inserted = true;
        }
    }

    if inserted {
        out
    } else {
        field + content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "\
#!/usr/bin/make -f
KERNELRELEASE = 5.10.9+abc123
export KDEB_PKGVERSION=5.10.9+abc123-2

override_dh_auto_build:
\tcp linux-5.10.9+abc123.config .config
";

    #[test]
    fn test_anywhere_replaces_every_occurrence() {
        let subs = [Substitution::new("5.10.9+abc123", "5.10.9+def456")];
        let out = apply(RULES, &subs, SubstitutionMode::Anywhere);
        assert_eq!(out.matches("5.10.9+def456").count(), 3);
        assert!(!out.contains("abc123"));
    }

    #[test]
    fn test_anywhere_replaces_accidental_matches() {
        let subs = [Substitution::new("5.10", "6.1")];
        let out = apply("Version: 5.10.9\nComment: 15.10\n", &subs, SubstitutionMode::Anywhere);
        assert_eq!(out, "Version: 6.1.9\nComment: 16.1\n");
    }

    #[test]
    fn test_strict_only_touches_field_values() {
        let subs = [Substitution::new("5.10.9+abc123", "5.10.9+def456")];
        let out = apply(RULES, &subs, SubstitutionMode::Strict);
        assert!(out.contains("KERNELRELEASE = 5.10.9+def456\n"));
        assert!(out.contains("export KDEB_PKGVERSION=5.10.9+def456-2\n"));
        // recipe lines are not assignments
        assert!(out.contains("cp linux-5.10.9+abc123.config"));
    }

    #[test]
    fn test_strict_respects_token_boundaries() {
        let subs = [Substitution::new("5.10", "6.1")];
        let out = apply(
            "Version: 5.10\nOther: 15.10 5.10.9 linux-5.10\n",
            &subs,
            SubstitutionMode::Strict,
        );
        assert_eq!(out, "Version: 6.1\nOther: 15.10 5.10.9 linux-6.1\n");
    }

    #[test]
    fn test_strict_field_name_not_replaced() {
        let subs = [Substitution::new("abc", "xyz")];
        let out = apply("abc: abc\n", &subs, SubstitutionMode::Strict);
        assert_eq!(out, "abc: xyz\n");
    }

    #[test]
    fn test_substitutions_apply_in_order() {
        let subs = [
            Substitution::new("5.10.9-var3+abc-1", "6.1.0-var1+def-1"),
            Substitution::new("5.10.9", "6.1.0"),
        ];
        let out = apply(
            "Depends: linux-image-5.10.9-var3+abc-1\nProvides: linux-5.10.9\n",
            &subs,
            SubstitutionMode::Anywhere,
        );
        assert_eq!(
            out,
            "Depends: linux-image-6.1.0-var1+def-1\nProvides: linux-6.1.0\n"
        );
    }

    #[test]
    fn test_replacement_is_not_rescanned() {
        let subs = [
            Substitution::new("6.1-var3+abc-1", "6.1.20-var1+def-1"),
            Substitution::new("6.1", "6.1.20"),
        ];
        let text = "KDEB_PKGVERSION = 6.1-var3+abc-1\nKERNELRELEASE = 6.1\n";
        let expected = "KDEB_PKGVERSION = 6.1.20-var1+def-1\nKERNELRELEASE = 6.1.20\n";

        assert_eq!(apply(text, &subs, SubstitutionMode::Anywhere), expected);
        assert_eq!(apply(text, &subs, SubstitutionMode::Strict), expected);
    }

    #[test]
    fn test_strict_patches_folded_control_fields() {
        let subs = [Substitution::new("5.10.9+abc", "5.10.9+def")];
        let control = "Package: linux\nDepends: foo,\n linux-image-5.10.9+abc,\n\tlinux-headers-5.10.9+abc\nSection: kernel\n";
        assert_eq!(
            apply(control, &subs, SubstitutionMode::Strict),
            "Package: linux\nDepends: foo,\n linux-image-5.10.9+def,\n\tlinux-headers-5.10.9+def\nSection: kernel\n"
        );
    }

    #[test]
    fn test_strict_patches_backslash_continued_assignments() {
        let subs = [Substitution::new("5.10.9", "6.1.0")];
        let rules = "FLAVOURS := \\\n\tlinux-5.10.9 \\\n\tlinux-5.10.9-rt\n\nbuild:\n\tmake linux-5.10.9\n";
        assert_eq!(
            apply(rules, &subs, SubstitutionMode::Strict),
            "FLAVOURS := \\\n\tlinux-6.1.0 \\\n\tlinux-6.1.0-rt\n\nbuild:\n\tmake linux-5.10.9\n"
        );
    }

    #[test]
    fn test_opens_control_field() {
        assert!(opens_control_field("Depends: foo,\n"));
        assert!(opens_control_field("XS-Custom:\n"));
        assert!(!opens_control_field("override_dh_auto_build:\n"));
        assert!(!opens_control_field("build:\n"));
        assert!(!opens_control_field("FOO := bar\n"));
        assert!(!opens_control_field(" continuation\n"));
    }

    #[test]
    fn test_empty_pattern_is_ignored() {
        let subs = [Substitution::new("", "x")];
        assert_eq!(apply("abc", &subs, SubstitutionMode::Anywhere), "abc");
    }

    #[test]
    fn test_value_start() {
        assert_eq!(value_start("Maintainer: A"), Some(11));
        assert_eq!(value_start("FOO := bar"), Some(6));
        assert_eq!(value_start("export FOO=bar"), Some(11));
        assert_eq!(value_start("\tcp a b"), None);
        assert_eq!(value_start(" continuation"), None);
        assert_eq!(value_start("override_dh_auto_build:"), Some(23));
    }

    #[test]
    fn test_rewrite_field() {
        let control = "Source: linux\nMaintainer: Old <old@x>\nSection: kernel\n";
        let out = rewrite_field(control, "Maintainer:", "New <new@x>").unwrap();
        assert_eq!(out, "Source: linux\nMaintainer: New <new@x>\nSection: kernel\n");
    }

    #[test]
    fn test_rewrite_field_replaces_whole_line() {
        let control = "Maintainer:Old garbage, more garbage";
        let out = rewrite_field(control, "Maintainer:", "New <new@x>").unwrap();
        assert_eq!(out, "Maintainer: New <new@x>");
    }

    #[test]
    fn test_rewrite_field_missing() {
        assert_eq!(rewrite_field("Source: linux\n", "Maintainer:", "A"), None);
    }

    #[test]
    fn test_insert_field() {
        let out = insert_field("Source: linux\nSection: kernel\n", "Maintainer:", "A <a@b>");
        assert_eq!(out, "Source: linux\nMaintainer: A <a@b>\nSection: kernel\n");

        let out = insert_field("Section: kernel\n", "Maintainer:", "A <a@b>");
        assert_eq!(out, "Maintainer: A <a@b>\nSection: kernel\n");
    }
}
