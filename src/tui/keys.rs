use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub keys: Vec<(KeyCode, KeyModifiers)>,
    pub label: String,
    pub description: String,
}

impl KeyBinding {
    pub fn new(keys: &[(KeyCode, KeyModifiers)], label: &str, description: &str) -> Self {
        Self {
            keys: keys.to_vec(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|(code, modifiers)| {
            *code == event.code && event.modifiers.contains(*modifiers)
        })
    }
}

/// Actions the catalog view responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    CursorUp,
    CursorDown,
    ToggleRow,
    ToggleAll,
    ClearAll,
    BulkSelect,
    PreviousPage,
    NextPage,
    FirstPage,
    LastPage,
    Reload,
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(Action, KeyBinding)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let none = KeyModifiers::NONE;
        let bindings = vec![
            (
                Action::Quit,
                KeyBinding::new(
                    &[(KeyCode::Char('c'), KeyModifiers::CONTROL), (KeyCode::Char('q'), none)],
                    "q",
                    "Quit application",
                ),
            ),
            (
                Action::Help,
                KeyBinding::new(
                    &[(KeyCode::Char('g'), KeyModifiers::CONTROL), (KeyCode::Char('?'), none)],
                    "?",
                    "Show/hide help",
                ),
            ),
            (
                Action::CursorUp,
                KeyBinding::new(&[(KeyCode::Up, none), (KeyCode::Char('k'), none)], "↑/k", "Previous row"),
            ),
            (
                Action::CursorDown,
                KeyBinding::new(&[(KeyCode::Down, none), (KeyCode::Char('j'), none)], "↓/j", "Next row"),
            ),
            (
                Action::ToggleRow,
                KeyBinding::new(&[(KeyCode::Char(' '), none)], "space", "Select/deselect row"),
            ),
            (
                Action::ToggleAll,
                KeyBinding::new(&[(KeyCode::Char('a'), none)], "a", "Select/deselect all on page"),
            ),
            (
                Action::ClearAll,
                KeyBinding::new(&[(KeyCode::Char('c'), none)], "c", "Clear selection on all pages"),
            ),
            (
                Action::BulkSelect,
                KeyBinding::new(&[(KeyCode::Char('n'), none)], "n", "Select the first N rows"),
            ),
            (
                Action::PreviousPage,
                KeyBinding::new(&[(KeyCode::Left, none), (KeyCode::Char('h'), none)], "←/h", "Previous page"),
            ),
            (
                Action::NextPage,
                KeyBinding::new(&[(KeyCode::Right, none), (KeyCode::Char('l'), none)], "→/l", "Next page"),
            ),
            (Action::FirstPage, KeyBinding::new(&[(KeyCode::Home, none)], "home", "First page")),
            (Action::LastPage, KeyBinding::new(&[(KeyCode::End, none)], "end", "Last page")),
            (Action::Reload, KeyBinding::new(&[(KeyCode::Char('r'), none)], "r", "Reload page")),
        ];
        Self { bindings }
    }
}

impl KeyMap {
    /// Resolve a key event to an action. Control bindings are checked first
    /// so Ctrl+C never falls through to plain `c`.
    pub fn action_for(&self, event: &KeyEvent) -> Option<Action> {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        self.bindings
            .iter()
            .filter(|(_, binding)| {
                binding.keys.iter().any(|(code, modifiers)| {
                    *code == event.code && modifiers.contains(KeyModifiers::CONTROL) == ctrl
                })
            })
            .find(|(_, binding)| binding.matches(event))
            .map(|(action, _)| *action)
    }

    /// Get help text for all key bindings
    pub fn help_text(&self) -> String {
        self.bindings
            .iter()
            .map(|(_, binding)| format!("{:>6}  {}", binding.label, binding.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
