// src/keymap/command.rs - What a binding can point at

use super::key::{KeyChord, KeyParseError, parse_macro};
use std::fmt;

/// Typable commands whose argument line is handed to a shell as-is.
pub const SHELL_COMMANDS: &[&str] = &[
    "sh",
    "run-shell-command",
    "pipe",
    "pipe-to",
    "insert-output",
    "append-output",
];

/// Static command names the editor ships with.
pub const STATIC_COMMANDS: &[&str] = &[
    "no_op",
    "move_char_left",
    "move_char_right",
    "move_line_up",
    "move_line_down",
    "move_visual_line_up",
    "move_visual_line_down",
    "extend_char_left",
    "extend_char_right",
    "extend_line_up",
    "extend_line_down",
    "extend_visual_line_up",
    "extend_visual_line_down",
    "move_next_word_start",
    "move_prev_word_start",
    "move_next_word_end",
    "move_prev_word_end",
    "move_next_long_word_start",
    "move_prev_long_word_start",
    "move_next_long_word_end",
    "extend_next_word_start",
    "extend_prev_word_start",
    "extend_next_word_end",
    "extend_next_long_word_start",
    "extend_prev_long_word_start",
    "extend_next_long_word_end",
    "find_till_char",
    "find_next_char",
    "till_prev_char",
    "find_prev_char",
    "extend_till_char",
    "extend_next_char",
    "repeat_last_motion",
    "replace",
    "switch_case",
    "switch_to_uppercase",
    "switch_to_lowercase",
    "page_up",
    "page_down",
    "half_page_up",
    "half_page_down",
    "page_cursor_up",
    "page_cursor_down",
    "page_cursor_half_up",
    "page_cursor_half_down",
    "select_all",
    "select_regex",
    "split_selection",
    "split_selection_on_newline",
    "merge_selections",
    "merge_consecutive_selections",
    "search",
    "rsearch",
    "search_next",
    "search_prev",
    "extend_search_next",
    "extend_search_prev",
    "search_selection",
    "global_search",
    "extend_line",
    "extend_line_below",
    "extend_line_above",
    "select_line_below",
    "select_line_above",
    "extend_to_line_bounds",
    "shrink_to_line_bounds",
    "delete_selection",
    "delete_selection_noyank",
    "change_selection",
    "change_selection_noyank",
    "collapse_selection",
    "flip_selections",
    "ensure_selections_forward",
    "insert_mode",
    "append_mode",
    "command_mode",
    "file_picker",
    "file_picker_in_current_buffer_directory",
    "file_picker_in_current_directory",
    "toggle_or_focus_explorer",
    "reveal_current_file",
    "code_action",
    "buffer_picker",
    "jumplist_picker",
    "symbol_picker",
    "changed_file_picker",
    "select_references_to_symbol_under_cursor",
    "workspace_symbol_picker",
    "diagnostics_picker",
    "workspace_diagnostics_picker",
    "last_picker",
    "insert_at_line_start",
    "insert_at_line_end",
    "open_below",
    "open_above",
    "normal_mode",
    "select_mode",
    "exit_select_mode",
    "goto_definition",
    "goto_declaration",
    "add_newline_above",
    "add_newline_below",
    "goto_type_definition",
    "goto_implementation",
    "goto_file_start",
    "goto_file_end",
    "goto_file",
    "goto_file_hsplit",
    "goto_file_vsplit",
    "goto_reference",
    "goto_window_top",
    "goto_window_center",
    "goto_window_bottom",
    "goto_last_accessed_file",
    "goto_last_modified_file",
    "goto_last_modification",
    "goto_line",
    "goto_last_line",
    "goto_first_diag",
    "goto_last_diag",
    "goto_next_diag",
    "goto_prev_diag",
    "goto_next_change",
    "goto_prev_change",
    "goto_first_change",
    "goto_last_change",
    "goto_line_start",
    "goto_line_end",
    "goto_next_buffer",
    "goto_previous_buffer",
    "goto_line_end_newline",
    "goto_first_nonwhitespace",
    "trim_selections",
    "extend_to_line_start",
    "extend_to_first_nonwhitespace",
    "extend_to_line_end",
    "extend_to_line_end_newline",
    "signature_help",
    "smart_tab",
    "insert_tab",
    "insert_newline",
    "delete_char_backward",
    "delete_char_forward",
    "delete_word_backward",
    "delete_word_forward",
    "kill_to_line_start",
    "kill_to_line_end",
    "undo",
    "redo",
    "earlier",
    "later",
    "commit_undo_checkpoint",
    "yank",
    "yank_to_clipboard",
    "yank_to_primary_clipboard",
    "yank_joined",
    "yank_joined_to_clipboard",
    "yank_main_selection_to_clipboard",
    "yank_joined_to_primary_clipboard",
    "yank_main_selection_to_primary_clipboard",
    "replace_with_yanked",
    "replace_selections_with_clipboard",
    "replace_selections_with_primary_clipboard",
    "paste_after",
    "paste_before",
    "paste_clipboard_after",
    "paste_clipboard_before",
    "paste_primary_clipboard_after",
    "paste_primary_clipboard_before",
    "indent",
    "unindent",
    "format_selections",
    "join_selections",
    "join_selections_space",
    "keep_selections",
    "remove_selections",
    "align_selections",
    "keep_primary_selection",
    "remove_primary_selection",
    "completion",
    "hover",
    "toggle_comments",
    "toggle_line_comments",
    "toggle_block_comments",
    "rotate_selections_forward",
    "rotate_selections_backward",
    "rotate_selection_contents_forward",
    "rotate_selection_contents_backward",
    "reverse_selection_contents",
    "expand_selection",
    "shrink_selection",
    "select_next_sibling",
    "select_prev_sibling",
    "select_all_siblings",
    "select_all_children",
    "jump_forward",
    "jump_backward",
    "save_selection",
    "jump_view_right",
    "jump_view_left",
    "jump_view_up",
    "jump_view_down",
    "swap_view_right",
    "swap_view_left",
    "swap_view_up",
    "swap_view_down",
    "transpose_view",
    "rotate_view",
    "rotate_view_reverse",
    "hsplit",
    "hsplit_new",
    "vsplit",
    "vsplit_new",
    "wclose",
    "wonly",
    "select_register",
    "insert_register",
    "align_view_middle",
    "align_view_top",
    "align_view_center",
    "align_view_bottom",
    "scroll_up",
    "scroll_down",
    "match_brackets",
    "surround_add",
    "surround_replace",
    "surround_delete",
    "select_textobject_around",
    "select_textobject_inner",
    "goto_next_function",
    "goto_prev_function",
    "goto_next_class",
    "goto_prev_class",
    "goto_next_parameter",
    "goto_prev_parameter",
    "goto_next_comment",
    "goto_prev_comment",
    "goto_next_test",
    "goto_prev_test",
    "goto_next_paragraph",
    "goto_prev_paragraph",
    "dap_launch",
    "dap_toggle_breakpoint",
    "dap_continue",
    "dap_pause",
    "dap_step_in",
    "dap_step_out",
    "dap_next",
    "dap_variables",
    "dap_terminate",
    "shell_pipe",
    "shell_pipe_to",
    "shell_insert_output",
    "shell_append_output",
    "shell_keep_pipe",
    "suspend",
    "rename_symbol",
    "increment",
    "decrement",
    "record_macro",
    "replay_macro",
    "command_palette",
    "goto_word",
    "extend_to_word",
];

/// A single bound action, classified by its leading sigil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappableCommand {
    /// A built-in command referenced by name, e.g. `move_line_down`.
    Static(String),
    /// `:name args...`. The argument line is kept as written.
    Typable { name: String, line: String },
    /// A typable command that hands its line to an external shell. Kept verbatim.
    Shell { name: String, line: String },
    /// `@keys`: replay a key sequence.
    Macro { keys: String, chords: Vec<KeyChord> },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("missing command name after `:`")]
    MissingTypableName,
    #[error("invalid macro: {0}")]
    Macro(#[from] KeyParseError),
    #[error("`{0}` is not a command name")]
    InvalidName(String),
}

impl MappableCommand {
    pub fn parse(s: &str) -> Result<Self, CommandParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CommandParseError::Empty);
        }

        if let Some(typable) = s.strip_prefix(':') {
            let typable = typable.trim_start();
            let (name, line) = match typable.split_once(char::is_whitespace) {
                Some((name, line)) => (name, line.trim_start()),
                None => (typable, ""),
            };
            if name.is_empty() {
                return Err(CommandParseError::MissingTypableName);
            }
            if SHELL_COMMANDS.contains(&name) {
                return Ok(MappableCommand::Shell {
                    name: name.to_string(),
                    line: line.to_string(),
                });
            }
            return Ok(MappableCommand::Typable {
                name: name.to_string(),
                line: line.to_string(),
            });
        }

        if let Some(keys) = s.strip_prefix('@') {
            let chords = parse_macro(keys)?;
            return Ok(MappableCommand::Macro {
                keys: keys.to_string(),
                chords,
            });
        }

        if s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Ok(MappableCommand::Static(s.to_string()))
        } else {
            Err(CommandParseError::InvalidName(s.to_string()))
        }
    }

    /// Whether the editor would recognise this command. Only static names are
    /// checked; typable and shell names are resolved by the editor at runtime.
    pub fn is_known(&self) -> bool {
        match self {
            MappableCommand::Static(name) => STATIC_COMMANDS.contains(&name.as_str()),
            _ => true,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MappableCommand::Static(_) => "static",
            MappableCommand::Typable { .. } => "typable",
            MappableCommand::Shell { .. } => "shell",
            MappableCommand::Macro { .. } => "macro",
        }
    }
}

impl fmt::Display for MappableCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappableCommand::Static(name) => f.write_str(name),
            MappableCommand::Typable { name, line } | MappableCommand::Shell { name, line }
                if line.is_empty() =>
            {
                write!(f, ":{}", name)
            }
            MappableCommand::Typable { name, line } | MappableCommand::Shell { name, line } => {
                write!(f, ":{} {}", name, line)
            }
            MappableCommand::Macro { keys, .. } => write!(f, "@{}", keys),
        }
    }
}
