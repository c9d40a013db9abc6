use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::style::Color;
use serde::Deserialize;

use crate::layout::DisplayMode;
use crate::manager::RefocusPolicy;

// ---------------------------------------------------------------------------
// Action enum — all bindable actions
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NewPane,
    ClosePane,
    FocusLeft,
    FocusDown,
    FocusUp,
    FocusRight,
    ResizeGrow,
    ResizeShrink,
    Equalize,
    SwapWithLast,
    ModeTiled,
    ModeStacked,
    ModeTabbed,
    NextPane,
    PrevPane,
    SwitchWorkspace(u8), // 1-indexed
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Theme {
    pub border_active: Color,
    pub border_inactive: Color,
    pub fg: Color,
    pub dim: Color,
    pub bar_active: Color,
    pub bar_inactive: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,
            fg: Color::Reset,
            dim: Color::DarkGray,
            bar_active: Color::Cyan,
            bar_inactive: Color::DarkGray,
        }
    }
}

// ---------------------------------------------------------------------------
// Behavior
// ---------------------------------------------------------------------------

/// Which pane a new pane splits by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnchorPreference {
    /// Split the workspace's focused pane.
    #[default]
    Focused,
    /// Split the most recently inserted pane.
    LastInserted,
}

#[derive(Clone, Debug)]
pub struct Behavior {
    /// Cells left between adjacent panes at every split.
    pub gap: u16,
    pub refocus: RefocusPolicy,
    pub anchor: AnchorPreference,
    pub default_mode: DisplayMode,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            gap: 0,
            refocus: RefocusPolicy::StableIndex,
            anchor: AnchorPreference::Focused,
            default_mode: DisplayMode::Tiled,
        }
    }
}

fn parse_refocus(s: &str) -> Option<RefocusPolicy> {
    match s {
        "stable-index" => Some(RefocusPolicy::StableIndex),
        "most-recent" => Some(RefocusPolicy::MostRecent),
        _ => None,
    }
}

fn parse_anchor(s: &str) -> Option<AnchorPreference> {
    match s {
        "focused" => Some(AnchorPreference::Focused),
        "last-inserted" => Some(AnchorPreference::LastInserted),
        _ => None,
    }
}

fn parse_mode(s: &str) -> Option<DisplayMode> {
    match s {
        "tiled" => Some(DisplayMode::Tiled),
        "stacked" => Some(DisplayMode::Stacked),
        "tabbed" => Some(DisplayMode::Tabbed),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// KeyMap
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct KeyMap {
    map: HashMap<KeyEvent, Action>,
}

impl KeyMap {
    pub fn from_defaults() -> Self {
        let mut map = HashMap::new();

        let defaults: Vec<(&str, Action)> = vec![
            ("ctrl+q", Action::Quit),
            ("ctrl+n", Action::NewPane),
            ("ctrl+x", Action::ClosePane),
            ("ctrl+h", Action::FocusLeft),
            ("ctrl+j", Action::FocusDown),
            ("ctrl+k", Action::FocusUp),
            ("ctrl+l", Action::FocusRight),
            ("alt+left", Action::FocusLeft),
            ("alt+down", Action::FocusDown),
            ("alt+up", Action::FocusUp),
            ("alt+right", Action::FocusRight),
            ("alt+=", Action::ResizeGrow),
            ("alt+-", Action::ResizeShrink),
            ("ctrl+e", Action::Equalize),
            ("ctrl+o", Action::SwapWithLast),
            ("alt+t", Action::ModeTiled),
            ("alt+s", Action::ModeStacked),
            ("alt+b", Action::ModeTabbed),
            ("alt+]", Action::NextPane),
            ("alt+[", Action::PrevPane),
        ];

        for (key_str, action) in defaults {
            if let Some(key) = parse_key(key_str) {
                map.insert(key, action);
            }
        }

        // alt+1..9 → SwitchWorkspace
        for n in 1..=9u8 {
            let ch = (b'0' + n) as char;
            let key = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::ALT);
            map.insert(key, Action::SwitchWorkspace(n));
        }

        Self { map }
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<&Action> {
        self.map.get(key)
    }

    /// Apply user overrides: for each (name, key_str), parse both, remove the
    /// old binding for that action, and insert the new one.
    pub fn merge(&mut self, raw: &HashMap<String, String>) {
        let name_to_action = action_name_map();

        for (name, key_str) in raw {
            let action = match name_to_action.get(name.as_str()) {
                Some(a) => a.clone(),
                None => continue,
            };
            let new_key = match parse_key(key_str) {
                Some(k) => k,
                None => continue,
            };

            self.map.retain(|_, v| *v != action);
            self.map.insert(new_key, action);
        }
    }
}

fn action_name_map() -> HashMap<&'static str, Action> {
    let mut m = HashMap::new();
    m.insert("quit", Action::Quit);
    m.insert("new_pane", Action::NewPane);
    m.insert("close_pane", Action::ClosePane);
    m.insert("focus_left", Action::FocusLeft);
    m.insert("focus_down", Action::FocusDown);
    m.insert("focus_up", Action::FocusUp);
    m.insert("focus_right", Action::FocusRight);
    m.insert("resize_grow", Action::ResizeGrow);
    m.insert("resize_shrink", Action::ResizeShrink);
    m.insert("equalize", Action::Equalize);
    m.insert("swap_with_last", Action::SwapWithLast);
    m.insert("mode_tiled", Action::ModeTiled);
    m.insert("mode_stacked", Action::ModeStacked);
    m.insert("mode_tabbed", Action::ModeTabbed);
    m.insert("next_pane", Action::NextPane);
    m.insert("prev_pane", Action::PrevPane);
    for n in 1..=9u8 {
        // Leak is fine — these are static strings created once at startup
        let name: &'static str = Box::leak(format!("switch_workspace_{}", n).into_boxed_str());
        m.insert(name, Action::SwitchWorkspace(n));
    }
    m
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Config {
    pub theme: Theme,
    pub behavior: Behavior,
    pub keys: KeyMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            behavior: Behavior::default(),
            keys: KeyMap::from_defaults(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let path = dirs::config_dir()
            .map(|d| d.join("trellis").join("config.toml"))
            .unwrap_or_default();

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };

        let raw: RawConfig = match toml::from_str(&content) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("trellis: invalid config at {}: {}", path.display(), e);
                return Self::default();
            }
        };

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Self {
        let mut config = Self::default();

        if let Some(t) = raw.theme {
            if let Some(c) = t.border_active.as_deref().and_then(parse_color) {
                config.theme.border_active = c;
            }
            if let Some(c) = t.border_inactive.as_deref().and_then(parse_color) {
                config.theme.border_inactive = c;
            }
            if let Some(c) = t.fg.as_deref().and_then(parse_color) {
                config.theme.fg = c;
            }
            if let Some(c) = t.dim.as_deref().and_then(parse_color) {
                config.theme.dim = c;
            }
            if let Some(c) = t.bar_active.as_deref().and_then(parse_color) {
                config.theme.bar_active = c;
            }
            if let Some(c) = t.bar_inactive.as_deref().and_then(parse_color) {
                config.theme.bar_inactive = c;
            }
        }

        if let Some(b) = raw.behavior {
            if let Some(v) = b.gap {
                config.behavior.gap = v;
            }
            if let Some(v) = b.refocus.as_deref().and_then(parse_refocus) {
                config.behavior.refocus = v;
            }
            if let Some(v) = b.anchor.as_deref().and_then(parse_anchor) {
                config.behavior.anchor = v;
            }
            if let Some(v) = b.default_mode.as_deref().and_then(parse_mode) {
                config.behavior.default_mode = v;
            }
        }

        if let Some(keys) = raw.keys {
            config.keys.merge(&keys);
        }

        config
    }
}

// ---------------------------------------------------------------------------
// Raw TOML structs (all-optional for merge)
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
struct RawConfig {
    theme: Option<RawTheme>,
    behavior: Option<RawBehavior>,
    keys: Option<HashMap<String, String>>,
}

#[derive(Deserialize, Default)]
struct RawTheme {
    border_active: Option<String>,
    border_inactive: Option<String>,
    fg: Option<String>,
    dim: Option<String>,
    bar_active: Option<String>,
    bar_inactive: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawBehavior {
    gap: Option<u16>,
    refocus: Option<String>,
    anchor: Option<String>,
    default_mode: Option<String>,
}

// ---------------------------------------------------------------------------
// parse_key: "ctrl+shift+d" → crossterm KeyEvent
// ---------------------------------------------------------------------------

pub fn parse_key(s: &str) -> Option<KeyEvent> {
    let s = s.trim().to_lowercase();
    let parts: Vec<&str> = s.split('+').collect();

    let mut mods = KeyModifiers::NONE;
    let mut key_part = "";

    for part in &parts {
        match *part {
            "ctrl" | "control" => mods |= KeyModifiers::CONTROL,
            "alt" | "option" => mods |= KeyModifiers::ALT,
            "shift" => mods |= KeyModifiers::SHIFT,
            _ => key_part = part,
        }
    }

    let code = match key_part {
        "tab" if mods.contains(KeyModifiers::SHIFT) => {
            mods -= KeyModifiers::SHIFT;
            KeyCode::BackTab
        }
        "tab" => KeyCode::Tab,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        s if s.starts_with('f') && s.len() >= 2 => {
            if let Ok(n) = s[1..].parse::<u8>() {
                if (1..=12).contains(&n) {
                    KeyCode::F(n)
                } else {
                    return None;
                }
            } else {
                return None;
            }
        }
        s if s.len() == 1 => {
            let ch = s.chars().next().unwrap();
            if mods.contains(KeyModifiers::SHIFT) && ch.is_ascii_alphabetic() {
                mods -= KeyModifiers::SHIFT;
                KeyCode::Char(ch.to_ascii_uppercase())
            } else {
                KeyCode::Char(ch)
            }
        }
        _ => return None,
    };

    Some(KeyEvent {
        code,
        modifiers: mods,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    })
}

/// Strip kind/state for consistent HashMap matching.
pub fn normalize_key(key: KeyEvent) -> KeyEvent {
    KeyEvent {
        code: key.code,
        modifiers: key.modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

// ---------------------------------------------------------------------------
// parse_color: "cyan", "dark_gray", "#ff0000", "#f00", "reset"
// ---------------------------------------------------------------------------

pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::Rgb(r, g, b))
            }
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Color::Rgb(r, g, b))
            }
            _ => None,
        };
    }

    match s.as_str() {
        "reset" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "white" => Some(Color::White),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
