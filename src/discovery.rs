use std::path::{Path, PathBuf};

/// Directory name the editor keeps its configuration under.
pub const EDITOR_DIR: &str = "helix";

pub const CONFIG_FILE: &str = "config.toml";
pub const LANGUAGES_FILE: &str = "languages.toml";
pub const TOOL_CONFIG_FILE: &str = "confcheck.toml";

pub fn get_config_dir() -> PathBuf {
    let config_home = dirs::config_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config")
    });
    config_home.join(EDITOR_DIR)
}

/// The editor's documents that exist in `config_dir`, in load order.
pub fn find_documents(config_dir: &Path) -> Vec<PathBuf> {
    [CONFIG_FILE, LANGUAGES_FILE]
        .iter()
        .map(|name| config_dir.join(name))
        .filter(|p| p.exists())
        .collect()
}

pub fn find_tool_config(config_dir: &Path) -> Option<PathBuf> {
    let path = config_dir.join(TOOL_CONFIG_FILE);
    path.exists().then_some(path)
}

pub fn theme_dirs(config_dir: &Path) -> Vec<PathBuf> {
    vec![config_dir.join("themes")]
}

pub fn list_builtin_themes() -> Vec<String> {
    [
        "default",
        "base16_default",
        "base16_terminal",
        "base16_transparent",
        "ayu_dark",
        "ayu_light",
        "ayu_mirage",
        "catppuccin_frappe",
        "catppuccin_latte",
        "catppuccin_macchiato",
        "catppuccin_mocha",
        "dracula",
        "everforest_dark",
        "everforest_light",
        "github_dark",
        "github_light",
        "gruvbox",
        "gruvbox_dark_hard",
        "gruvbox_light",
        "kanagawa",
        "monokai",
        "monokai_pro",
        "nord",
        "onedark",
        "onelight",
        "rose_pine",
        "rose_pine_dawn",
        "solarized_dark",
        "solarized_light",
        "tokyonight",
        "tokyonight_storm",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
