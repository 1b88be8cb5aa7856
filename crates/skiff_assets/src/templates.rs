//! Client template precompiler.
//!
//! Turns every template source in a directory into a JS function that
//! concatenates literal chunks with HTML-escaped `{{ident}}`
//! interpolations, and emits one statement assigning the compiled
//! functions to the client's template registry. The client only ships the
//! tiny `skiff.esc` escape helper; all parsing happens at compile time.

use std::path::Path;

use crate::error::AssetError;

/// Precompiles every file in `dir` (sorted by name, keyed by file stem)
/// into a single deterministic JS statement.
pub async fn precompile_dir(dir: &Path) -> Result<String, AssetError> {
    let mut names = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| AssetError::io(dir, e))?;
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| AssetError::io(dir, e))?
    {
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();

    let mut out = String::from("skiff.templates = {");
    for (index, name) in names.iter().enumerate() {
        let path = dir.join(name);
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AssetError::io(&path, e))?;
        let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
        if index > 0 {
            out.push(',');
        }
        out.push_str(&js_string(stem));
        out.push(':');
        out.push_str(&compile_template(&source));
    }
    out.push_str("};");
    Ok(out)
}

/// Compiles one template source to a JS function of one argument `d`.
fn compile_template(source: &str) -> String {
    let mut parts = Vec::new();
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        let (literal, after) = rest.split_at(start);
        if !literal.is_empty() {
            parts.push(js_string(literal));
        }
        match after[2..].find("}}") {
            Some(end) => {
                let ident = after[2..2 + end].trim();
                parts.push(format!("e(d.{ident})"));
                rest = &after[2 + end + 2..];
            }
            None => {
                // Unterminated interpolation; keep the tail literally.
                parts.push(js_string(after));
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        parts.push(js_string(rest));
    }
    if parts.is_empty() {
        parts.push("\"\"".to_string());
    }
    format!("function(d){{var e=skiff.esc;return {};}}", parts.join("+"))
}

/// Emits a JS string literal.
fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literal_only_template() {
        assert_eq!(
            compile_template("<li>item</li>"),
            "function(d){var e=skiff.esc;return \"<li>item</li>\";}"
        );
    }

    #[test]
    fn interpolations_are_escaped_lookups() {
        assert_eq!(
            compile_template("<li>{{ name }}: {{size}}</li>"),
            "function(d){var e=skiff.esc;return \"<li>\"+e(d.name)+\": \"+e(d.size)+\"</li>\";}"
        );
    }

    #[test]
    fn empty_template_returns_empty_string() {
        assert_eq!(
            compile_template(""),
            "function(d){var e=skiff.esc;return \"\";}"
        );
    }

    #[test]
    fn unterminated_interpolation_stays_literal() {
        assert_eq!(
            compile_template("a{{b"),
            "function(d){var e=skiff.esc;return \"a\"+\"{{b\";}"
        );
    }

    #[test]
    fn js_string_escapes_control_characters() {
        assert_eq!(js_string("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }

    #[tokio::test]
    async fn precompile_dir_is_sorted_and_keyed_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("row.html"), "<tr>{{name}}</tr>").unwrap();
        std::fs::write(dir.path().join("empty.html"), "").unwrap();

        let js = precompile_dir(dir.path()).await.unwrap();
        assert_eq!(
            js,
            "skiff.templates = {\"empty\":function(d){var e=skiff.esc;return \"\";},\
             \"row\":function(d){var e=skiff.esc;return \"<tr>\"+e(d.name)+\"</tr>\";}};"
        );
    }

    #[tokio::test]
    async fn precompile_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = precompile_dir(&dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
