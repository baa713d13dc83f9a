// src/settings/schema.rs - Types of the options the editor accepts

/// The shape a single option's value must have.
#[derive(Debug, Clone, Copy)]
pub enum OptionKind {
    Bool,
    Integer { min: i64 },
    String,
    /// A string holding exactly one grapheme.
    Char,
    Choice(&'static [&'static str]),
    List(&'static OptionKind),
    Group(&'static [OptionSpec]),
    /// `"all"`/`"none"`, or a table of per-character `"all"`/`"none"`.
    WhitespaceRender,
    /// A theme name, or `{ light = .., dark = .. }`.
    Theme,
    Any,
}

#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
}

const fn opt(name: &'static str, kind: OptionKind) -> OptionSpec {
    OptionSpec { name, kind }
}

const BOOL: OptionKind = OptionKind::Bool;
const STRING: OptionKind = OptionKind::String;
const CHAR: OptionKind = OptionKind::Char;
const UNSIGNED: OptionKind = OptionKind::Integer { min: 0 };
const POSITIVE: OptionKind = OptionKind::Integer { min: 1 };

pub const CURSOR_KINDS: &[&str] = &["block", "bar", "underline", "hidden"];

pub const SEVERITIES: &[&str] = &["disable", "hint", "info", "warning", "error"];

pub const STATUSLINE_ELEMENTS: &[&str] = &[
    "mode",
    "spinner",
    "file-name",
    "file-absolute-path",
    "file-base-name",
    "file-modification-indicator",
    "file-encoding",
    "file-line-ending",
    "file-indent-style",
    "file-type",
    "read-only-indicator",
    "diagnostics",
    "workspace-diagnostics",
    "selections",
    "primary-selection-length",
    "position",
    "position-percentage",
    "total-line-numbers",
    "separator",
    "spacer",
    "version-control",
    "register",
];

pub const RENDER_CHOICES: &[&str] = &["all", "none"];

const RENDER_CHOICE: OptionKind = OptionKind::Choice(RENDER_CHOICES);

pub const WHITESPACE_RENDER: &[OptionSpec] = &[
    opt("space", RENDER_CHOICE),
    opt("nbsp", RENDER_CHOICE),
    opt("nnbsp", RENDER_CHOICE),
    opt("tab", RENDER_CHOICE),
    opt("newline", RENDER_CHOICE),
    opt("tabpad", RENDER_CHOICE),
];

pub const THEME_VARIANTS: &[OptionSpec] = &[opt("light", STRING), opt("dark", STRING)];

const STATUSLINE_LIST: OptionKind = OptionKind::List(&OptionKind::Choice(STATUSLINE_ELEMENTS));
const SEVERITY_LIST: OptionKind = OptionKind::List(&OptionKind::Choice(SEVERITIES));

const STATUSLINE_MODE: &[OptionSpec] = &[
    opt("normal", STRING),
    opt("insert", STRING),
    opt("select", STRING),
];

const STATUSLINE: &[OptionSpec] = &[
    opt("left", STATUSLINE_LIST),
    opt("center", STATUSLINE_LIST),
    opt("right", STATUSLINE_LIST),
    opt("separator", STRING),
    opt("mode", OptionKind::Group(STATUSLINE_MODE)),
    opt("diagnostics", SEVERITY_LIST),
    opt("workspace-diagnostics", SEVERITY_LIST),
];

const LSP: &[OptionSpec] = &[
    opt("enable", BOOL),
    opt("display-messages", BOOL),
    opt("display-progress-messages", BOOL),
    opt("auto-signature-help", BOOL),
    opt("display-inlay-hints", BOOL),
    opt("inlay-hints-length", POSITIVE),
    opt("display-color-swatches", BOOL),
    opt("display-signature-help-docs", BOOL),
    opt("snippets", BOOL),
    opt("goto-reference-include-declaration", BOOL),
];

const CURSOR_SHAPE: &[OptionSpec] = &[
    opt("normal", OptionKind::Choice(CURSOR_KINDS)),
    opt("insert", OptionKind::Choice(CURSOR_KINDS)),
    opt("select", OptionKind::Choice(CURSOR_KINDS)),
];

const FILE_PICKER: &[OptionSpec] = &[
    opt("hidden", BOOL),
    opt("follow-symlinks", BOOL),
    opt("deduplicate-links", BOOL),
    opt("parents", BOOL),
    opt("ignore", BOOL),
    opt("git-ignore", BOOL),
    opt("git-global", BOOL),
    opt("git-exclude", BOOL),
    opt("max-depth", UNSIGNED),
];

const SEARCH: &[OptionSpec] = &[opt("smart-case", BOOL), opt("wrap-around", BOOL)];

const WHITESPACE_CHARS: &[OptionSpec] = &[
    opt("space", CHAR),
    opt("nbsp", CHAR),
    opt("nnbsp", CHAR),
    opt("tab", CHAR),
    opt("newline", CHAR),
    opt("tabpad", CHAR),
];

const WHITESPACE: &[OptionSpec] = &[
    opt("render", OptionKind::WhitespaceRender),
    opt("characters", OptionKind::Group(WHITESPACE_CHARS)),
];

const INDENT_GUIDES: &[OptionSpec] = &[
    opt("render", BOOL),
    opt("character", CHAR),
    opt("skip-levels", UNSIGNED),
];

const SOFT_WRAP: &[OptionSpec] = &[
    opt("enable", BOOL),
    opt("max-wrap", UNSIGNED),
    opt("max-indent-retain", UNSIGNED),
    opt("wrap-indicator", STRING),
    opt("wrap-at-text-width", BOOL),
];

const SMART_TAB: &[OptionSpec] = &[opt("enable", BOOL), opt("supersede-menu", BOOL)];

const INLINE_DIAGNOSTICS: &[OptionSpec] = &[
    opt("cursor-line", OptionKind::Choice(SEVERITIES)),
    opt("other-lines", OptionKind::Choice(SEVERITIES)),
    opt("min-diagnostic-width", UNSIGNED),
    opt("prefix-len", UNSIGNED),
    opt("max-wrap", UNSIGNED),
    opt("max-diagnostics", UNSIGNED),
];

pub const EXPLORER_POSITIONS: &[&str] = &["overlay", "left", "right"];

const EXPLORER: &[OptionSpec] = &[
    opt("column-width", POSITIVE),
    opt("position", OptionKind::Choice(EXPLORER_POSITIONS)),
];

pub const EDITOR: &[OptionSpec] = &[
    opt("scrolloff", UNSIGNED),
    opt("mouse", BOOL),
    opt("default-yank-register", CHAR),
    opt("middle-click-paste", BOOL),
    opt("scroll-lines", OptionKind::Integer { min: i64::MIN }),
    opt("shell", OptionKind::List(&STRING)),
    opt("line-number", OptionKind::Choice(&["absolute", "relative"])),
    opt("cursorline", BOOL),
    opt("cursorcolumn", BOOL),
    opt("gutters", OptionKind::Any),
    opt("auto-completion", BOOL),
    opt("path-completion", BOOL),
    opt("auto-format", BOOL),
    opt("auto-save", OptionKind::Any),
    opt("idle-timeout", UNSIGNED),
    opt("completion-timeout", UNSIGNED),
    opt("preview-completion-insert", BOOL),
    opt("completion-trigger-len", UNSIGNED),
    opt("completion-replace", BOOL),
    opt("continue-comments", BOOL),
    opt("auto-info", BOOL),
    opt("true-color", BOOL),
    opt("undercurl", BOOL),
    opt("rulers", OptionKind::List(&POSITIVE)),
    opt("bufferline", OptionKind::Choice(&["never", "always", "multiple"])),
    opt("color-modes", BOOL),
    opt("text-width", POSITIVE),
    opt("workspace-lsp-roots", OptionKind::List(&STRING)),
    opt(
        "default-line-ending",
        OptionKind::Choice(&["native", "lf", "crlf", "ff", "cr", "nel"]),
    ),
    opt("insert-final-newline", BOOL),
    opt("trim-final-newlines", BOOL),
    opt("trim-trailing-whitespace", BOOL),
    opt("popup-border", OptionKind::Choice(&["popup", "menu", "all", "none"])),
    opt(
        "indent-heuristic",
        OptionKind::Choice(&["simple", "tree-sitter", "hybrid"]),
    ),
    opt("jump-label-alphabet", STRING),
    opt("end-of-line-diagnostics", OptionKind::Choice(SEVERITIES)),
    opt("clipboard-provider", OptionKind::Any),
    opt("editor-config", BOOL),
    opt("auto-pairs", OptionKind::Any),
    opt("statusline", OptionKind::Group(STATUSLINE)),
    opt("lsp", OptionKind::Group(LSP)),
    opt("cursor-shape", OptionKind::Group(CURSOR_SHAPE)),
    opt("file-picker", OptionKind::Group(FILE_PICKER)),
    opt("search", OptionKind::Group(SEARCH)),
    opt("whitespace", OptionKind::Group(WHITESPACE)),
    opt("indent-guides", OptionKind::Group(INDENT_GUIDES)),
    opt("soft-wrap", OptionKind::Group(SOFT_WRAP)),
    opt("smart-tab", OptionKind::Group(SMART_TAB)),
    opt("inline-diagnostics", OptionKind::Group(INLINE_DIAGNOSTICS)),
    opt("explorer", OptionKind::Group(EXPLORER)),
];

/// Settings sections covered by the schema. `keys` and the language
/// sections have their own checks.
pub const ROOT: &[OptionSpec] = &[
    opt("theme", OptionKind::Theme),
    opt("editor", OptionKind::Group(EDITOR)),
];

pub fn lookup<'a>(specs: &'a [OptionSpec], name: &str) -> Option<&'a OptionSpec> {
    specs.iter().find(|spec| spec.name == name)
}

/// Resolve a dotted path (`editor.cursor-shape.insert`) to its option.
pub fn resolve(path: &str) -> Option<&'static OptionSpec> {
    let mut specs = ROOT;
    let mut parts = path.split('.').peekable();
    while let Some(part) = parts.next() {
        let spec = lookup(specs, part)?;
        if parts.peek().is_none() {
            return Some(spec);
        }
        match spec.kind {
            OptionKind::Group(children) => specs = children,
            OptionKind::WhitespaceRender => specs = WHITESPACE_RENDER,
            OptionKind::Theme => specs = THEME_VARIANTS,
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_nested_option() {
        let spec = resolve("editor.cursor-shape.insert").unwrap();
        assert!(matches!(spec.kind, OptionKind::Choice(kinds) if kinds == CURSOR_KINDS));
    }

    #[test]
    fn test_resolve_explorer_options() {
        let width = resolve("editor.explorer.column-width").unwrap();
        assert!(matches!(width.kind, OptionKind::Integer { min: 1 }));
        let position = resolve("editor.explorer.position").unwrap();
        assert!(matches!(position.kind, OptionKind::Choice(p) if p == EXPLORER_POSITIONS));
    }

    #[test]
    fn test_resolve_unknown_paths() {
        assert!(resolve("editor.cursor-shape.visual").is_none());
        assert!(resolve("editor.mouse.extra").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn test_resolve_through_whitespace_render_table() {
        let spec = resolve("editor.whitespace.render.tab").unwrap();
        assert!(matches!(spec.kind, OptionKind::Choice(_)));
    }
}
