#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Last-letter game: the next word must continue from the tail of the
    /// previously submitted word. No automated typing.
    Chain,
    /// WordBomb: buffer-only matching, Tab autocomplete and panic typing.
    Bomb,
}

/// Logical key events, already stripped of terminal details by the capture
/// thread. The panic trigger only exists in bomb mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKey {
    Char(char),
    Backspace,
    Enter,
    Tab,
    Panic,
    NewRound,
    ToggleHide,
    Quit,
}

/// State published to the UI on every draw. The UI holds no game logic; it
/// renders exactly what it is handed.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub mode: Mode,
    pub typed: String,
    pub required_prefix: Option<String>,
    pub suggestions: Vec<String>,
    /// false when the list came from the fallback (prefix-only / substring) rule
    pub strict: bool,
    /// highlight target: first suggestion in chain mode, longest in bomb mode
    pub best: Option<String>,
    pub words_found: usize,
    pub longest_word: usize,
    pub high_score: usize,
    pub remaining: usize,
    pub glow_active: bool,
    pub panicking: bool,
    pub hidden: bool,
    pub panic_key: Option<char>,
}
