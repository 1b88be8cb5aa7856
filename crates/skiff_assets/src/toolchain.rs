//! Startup capability probe for the asset transformation toolchain.
//!
//! The toolchain (vendor prefixer and minifiers) is only needed when a
//! compile actually runs; a process that serves a previously persisted
//! cache can live without it forever. Its availability is therefore probed
//! once at startup and carried as a typed capability instead of being
//! discovered mid-compile: [`CacheStore`] holds a [`ToolchainStatus`] and
//! refuses to compile on [`ToolchainStatus::Missing`].
//!
//! [`CacheStore`]: crate::CacheStore

use crate::error::AssetError;

/// Result of the startup toolchain probe.
#[derive(Debug)]
pub enum ToolchainStatus {
    /// Transformation tooling is compiled in; compiling is permitted.
    Available(Toolchain),
    /// Tooling is absent. Compiling fails; loading a persisted cache works.
    Missing {
        /// Why, and what the operator should do about it.
        reason: String,
    },
}

impl ToolchainStatus {
    /// Borrows the toolchain, or fails with the user-actionable
    /// [`AssetError::MissingToolchain`].
    pub fn require(&self) -> Result<&Toolchain, AssetError> {
        match self {
            ToolchainStatus::Available(toolchain) => Ok(toolchain),
            ToolchainStatus::Missing { reason } => Err(AssetError::MissingToolchain {
                reason: reason.clone(),
            }),
        }
    }
}

/// Capability token for the asset transformers. Only obtainable through
/// [`Toolchain::probe`].
#[derive(Debug)]
pub struct Toolchain(());

impl Toolchain {
    /// Probes for the transformation toolchain.
    pub fn probe() -> ToolchainStatus {
        if cfg!(feature = "toolchain") {
            ToolchainStatus::Available(Toolchain(()))
        } else {
            ToolchainStatus::Missing {
                reason: "this build omits the `toolchain` cargo feature; rebuild skiff with \
                         default features (or `--features skiff_assets/toolchain`) to compile \
                         assets, or deploy a prebuilt cache file"
                    .to_string(),
            }
        }
    }

    /// Adds vendor-prefixed twins for properties that still need them.
    /// Applied to the style bundle in every compile mode.
    pub fn prefix_css(&self, css: &str) -> String {
        transform::prefix_css(css)
    }

    /// Minifies a stylesheet.
    pub fn minify_css(&self, css: &str) -> String {
        transform::minify_css(css)
    }

    /// Minifies a script. Conservative: drops comment-only and blank lines
    /// and trailing whitespace; lines inside a template literal pass
    /// through untouched.
    pub fn minify_js(&self, js: &str) -> String {
        transform::minify_js(js)
    }

    /// Minifies a markup document by collapsing whitespace runs and
    /// dropping inter-tag whitespace.
    pub fn minify_html(&self, html: &str) -> String {
        transform::minify_html(html)
    }
}

mod transform {
    /// Properties that get a `-webkit-` twin.
    const PREFIXED_PROPS: &[&str] = &[
        "user-select",
        "appearance",
        "backdrop-filter",
        "text-size-adjust",
        "mask-image",
    ];

    /// Inserts a `-webkit-` prefixed copy before each declaration whose
    /// property is in [`PREFIXED_PROPS`]. Identity on stylesheets that use
    /// none of them.
    pub fn prefix_css(css: &str) -> String {
        let mut out = String::with_capacity(css.len() + 64);
        let mut at_decl_start = false;
        for (i, c) in css.char_indices() {
            if at_decl_start && !c.is_whitespace() {
                at_decl_start = false;
                if PREFIXED_PROPS.iter().any(|p| starts_declaration(&css[i..], p)) {
                    let end = css[i..]
                        .find([';', '}'])
                        .map(|off| i + off)
                        .unwrap_or(css.len());
                    out.push_str("-webkit-");
                    out.push_str(css[i..end].trim_end());
                    out.push_str("; ");
                }
            }
            if c == '{' || c == ';' {
                at_decl_start = true;
            }
            out.push(c);
        }
        out
    }

    fn starts_declaration(s: &str, prop: &str) -> bool {
        s.strip_prefix(prop)
            .map(|rest| rest.trim_start().starts_with(':'))
            .unwrap_or(false)
    }

    pub fn minify_css(css: &str) -> String {
        let stripped = strip_block_comments(css);
        let mut out = String::with_capacity(stripped.len());
        let mut in_str: Option<char> = None;
        let mut pending_space = false;
        for c in stripped.chars() {
            if let Some(quote) = in_str {
                out.push(c);
                if c == quote {
                    in_str = None;
                }
                continue;
            }
            if c.is_whitespace() {
                pending_space = true;
                continue;
            }
            if pending_space {
                // A space before `:` is a descendant combinator when a
                // pseudo-class selector follows (`.a :hover` is not
                // `.a:hover`), and harmless before a declaration colon,
                // so it is always kept.
                let boundary = "{};,>".contains(c)
                    || out.is_empty()
                    || out.ends_with(['{', '}', ';', ':', ',', '>']);
                if !boundary {
                    out.push(' ');
                }
                pending_space = false;
            }
            if c == '"' || c == '\'' {
                in_str = Some(c);
            }
            out.push(c);
        }
        out
    }

    pub fn minify_js(js: &str) -> String {
        let mut out: Vec<&str> = Vec::new();
        let mut in_template = false;
        for line in js.lines() {
            let ends_in_template = template_state_after(line, in_template);
            if in_template || ends_in_template {
                // Template literal content is byte-significant; a line
                // that merely looks blank or comment-like is payload.
                out.push(line);
            } else {
                let trimmed = line.trim_start();
                if !trimmed.is_empty() && !trimmed.starts_with("//") {
                    out.push(line.trim_end());
                }
            }
            in_template = ends_in_template;
        }
        out.join("\n")
    }

    /// Whether `line` ends inside a template literal, given whether it
    /// started inside one. Ignores `${}` nesting; a backtick inside an
    /// interpolated expression would confuse it, which the conservative
    /// keep-the-line default tolerates.
    fn template_state_after(line: &str, mut in_template: bool) -> bool {
        let mut chars = line.chars().peekable();
        let mut in_str: Option<char> = None;
        while let Some(c) = chars.next() {
            if let Some(quote) = in_str {
                match c {
                    '\\' => {
                        chars.next();
                    }
                    _ if c == quote => in_str = None,
                    _ => {}
                }
                continue;
            }
            if in_template {
                match c {
                    '\\' => {
                        chars.next();
                    }
                    '`' => in_template = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '`' => in_template = true,
                '\'' | '"' => in_str = Some(c),
                '\\' => {
                    chars.next();
                }
                // Backticks in a trailing line comment are not code.
                '/' if chars.peek() == Some(&'/') => break,
                _ => {}
            }
        }
        in_template
    }

    pub fn minify_html(html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut pending_space = false;
        for c in html.chars() {
            if c.is_whitespace() {
                pending_space = true;
                continue;
            }
            if pending_space {
                // Whitespace between a closing and an opening bracket is
                // purely structural.
                if !out.is_empty() && !(out.ends_with('>') && c == '<') {
                    out.push(' ');
                }
                pending_space = false;
            }
            out.push(c);
        }
        out
    }

    fn strip_block_comments(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut chars = input.chars().peekable();
        let mut in_str: Option<char> = None;
        while let Some(c) = chars.next() {
            if let Some(quote) = in_str {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote {
                    in_str = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => {
                    in_str = Some(c);
                    out.push(c);
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    let mut prev = '\0';
                    for cc in chars.by_ref() {
                        if prev == '*' && cc == '/' {
                            break;
                        }
                        prev = cc;
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }

}
