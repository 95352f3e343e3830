use std::time::{Duration, Instant};

use crate::config::{Theme, Timing};
use crate::engine::Suggester;
use crate::keys::{InjectedKey, KeyInjector};
use crate::models::{GameKey, Mode, RenderSnapshot};
use crate::round::Round;
use crate::scheduler::{ActionKind, Scheduler};

/// Ties the pure core together: routes logical key events into the round
/// state, queries the suggester, and drives the typing scheduler from the
/// tick loop. Everything here runs on the single state-owning thread.
pub struct App {
    pub should_quit: bool,
    pub hidden: bool,
    pub mode: Mode,
    pub theme: Theme,
    pub suggestion_count: usize,
    pub panic_key: char,
    timing: Timing,
    suggester: Suggester,
    round: Round,
    scheduler: Scheduler,
    injector: Box<dyn KeyInjector>,
}

impl App {
    pub fn new(
        mode: Mode,
        words: Vec<String>,
        suggestion_count: usize,
        panic_key: char,
        theme: Theme,
        timing: Timing,
        injector: Box<dyn KeyInjector>,
    ) -> Self {
        Self {
            should_quit: false,
            hidden: false,
            mode,
            theme,
            suggestion_count,
            panic_key,
            timing,
            suggester: Suggester::new(words),
            round: Round::new(mode),
            scheduler: Scheduler::new(timing),
            injector,
        }
    }

    pub fn handle_key(&mut self, key: GameKey, now: Instant) {
        // chars and backspaces we injected ourselves come back through the
        // same listener; swallow them so the round is not mutated twice.
        // Enter is exempt: mid-plan it is the user's cancel, and the panic
        // plan's own Enter is physical-only with the plan completing in the
        // same tick that injects it
        if matches!(key, GameKey::Char(_) | GameKey::Backspace)
            && self.scheduler.absorb_synthetic()
        {
            return;
        }

        // hidden means frozen: typing is not tracked until the overlay is
        // shown again, only the command keys stay live
        if self.hidden
            && matches!(
                key,
                GameKey::Char(_)
                    | GameKey::Backspace
                    | GameKey::Enter
                    | GameKey::Tab
                    | GameKey::Panic
            )
        {
            return;
        }

        match key {
            GameKey::Quit => self.should_quit = true,
            GameKey::ToggleHide => self.hidden = !self.hidden,
            GameKey::NewRound => {
                if self.mode == Mode::Chain {
                    self.round.new_round(&mut self.suggester);
                }
            }
            GameKey::Char(c) => self.round.on_char(c),
            GameKey::Backspace => self.round.on_backspace(),
            GameKey::Enter => {
                // a real Enter mid-plan cancels it; the submit still goes
                // through, the game sees the keystroke either way
                if self.scheduler.in_flight() {
                    self.scheduler.cancel();
                }
                self.round.on_submit(&mut self.suggester);
            }
            GameKey::Tab => {
                if self.mode == Mode::Bomb {
                    self.start_autocomplete(now);
                }
            }
            GameKey::Panic => {
                if self.mode == Mode::Bomb {
                    self.start_panic(now);
                }
            }
        }
    }

    /// Tab only fires in strict mode and only when the longest candidate
    /// strictly extends what is already typed.
    fn start_autocomplete(&mut self, now: Instant) {
        let (suggestions, strict) = self
            .suggester
            .suggest_bomb(&self.round.buffer, self.suggestion_count);
        if !strict {
            return;
        }
        let Some(target) = longest_of(&suggestions) else {
            return;
        };
        if !target.starts_with(&self.round.buffer) || target.len() <= self.round.buffer.len() {
            return;
        }

        let mut rng = rand::rng();
        match self
            .scheduler
            .start_autocomplete(&self.round.buffer, &target, now, &mut rng)
        {
            Ok(()) => log::debug!("autocompleting {target:?}"),
            Err(err) => log::debug!("autocomplete rejected: {err}"),
        }
    }

    fn start_panic(&mut self, now: Instant) {
        if self.round.buffer.is_empty() {
            return;
        }
        let Some(target) = self.panic_target() else {
            return;
        };
        let mut rng = rand::rng();
        self.scheduler
            .start_panic(&self.round.buffer, &target, now, &mut rng);
    }

    /// Best full word to bail out with: top suggestion for the buffer, then
    /// for its first three letters, then whatever the pool still holds.
    fn panic_target(&self) -> Option<String> {
        let (top, _) = self
            .suggester
            .suggest_bomb(&self.round.buffer, self.suggestion_count);
        if let Some(word) = top.first() {
            return Some(word.clone());
        }

        let head: String = self.round.buffer.chars().take(3).collect();
        let (top, _) = self.suggester.suggest_bomb(&head, self.suggestion_count);
        if let Some(word) = top.first() {
            return Some(word.clone());
        }

        self.suggester.first_remaining().map(str::to_string)
    }

    /// Executes every due plan action: physical injection first, then the
    /// logical dispatch real keystrokes would have caused. A panic plan's
    /// completion pushes exactly one Submit through the normal path.
    pub fn tick(&mut self, now: Instant) {
        let (due, done) = self.scheduler.take_due(now);
        for kind in due {
            self.run_action(kind);
        }
        if let Some(done) = done {
            if done.submit {
                self.round.on_submit(&mut self.suggester);
            }
        }
    }

    fn run_action(&mut self, kind: ActionKind) {
        let key = match kind {
            ActionKind::Backspace => InjectedKey::Backspace,
            ActionKind::Char(c) => InjectedKey::Char(c),
            ActionKind::Enter => InjectedKey::Enter,
        };

        // best effort: a failed injection is logged and the plan moves on, the
        // logical state must not drift from what was already dispatched
        if let Err(err) = self.injector.press(key) {
            log::warn!("key press failed: {err:#}");
        }
        std::thread::sleep(Duration::from_millis(self.timing.key_hold_ms));
        if let Err(err) = self.injector.release(key) {
            log::warn!("key release failed: {err:#}");
        }

        match kind {
            ActionKind::Backspace => self.round.on_backspace(),
            ActionKind::Char(c) => self.round.on_char(c),
            // physical only; the logical submit follows plan completion
            ActionKind::Enter => {}
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let (suggestions, strict) = match self.mode {
            Mode::Chain => self.suggester.suggest_chain(
                self.round.required_prefix.as_deref(),
                &self.round.buffer,
                self.suggestion_count,
                &self.round.used,
            ),
            Mode::Bomb => self
                .suggester
                .suggest_bomb(&self.round.buffer, self.suggestion_count),
        };

        let best = match self.mode {
            Mode::Chain => suggestions.first().cloned(),
            Mode::Bomb => longest_of(&suggestions),
        };

        RenderSnapshot {
            mode: self.mode,
            typed: self.round.buffer.clone(),
            required_prefix: self.round.required_prefix.clone(),
            strict,
            glow_active: best.is_some(),
            best,
            suggestions,
            words_found: self.round.words_found,
            longest_word: self.round.longest_word,
            high_score: self.round.high_score,
            remaining: self.suggester.remaining(),
            panicking: self.scheduler.panicking(),
            hidden: self.hidden,
            panic_key: (self.mode == Mode::Bomb).then_some(self.panic_key),
        }
    }
}

/// Longest word, lexicographically smallest among equals.
fn longest_of(words: &[String]) -> Option<String> {
    words
        .iter()
        .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::NullInjector;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Default)]
    struct Recording {
        presses: Vec<InjectedKey>,
        releases: Vec<InjectedKey>,
    }

    struct RecordingInjector(Rc<RefCell<Recording>>);

    impl KeyInjector for RecordingInjector {
        fn press(&mut self, key: InjectedKey) -> anyhow::Result<()> {
            self.0.borrow_mut().presses.push(key);
            Ok(())
        }
        fn release(&mut self, key: InjectedKey) -> anyhow::Result<()> {
            self.0.borrow_mut().releases.push(key);
            Ok(())
        }
    }

    struct FailingInjector;

    impl KeyInjector for FailingInjector {
        fn press(&mut self, _key: InjectedKey) -> anyhow::Result<()> {
            Err(anyhow!("no injection backend"))
        }
        fn release(&mut self, _key: InjectedKey) -> anyhow::Result<()> {
            Err(anyhow!("no injection backend"))
        }
    }

    fn fast_timing() -> Timing {
        Timing {
            key_hold_ms: 0,
            ..Timing::default()
        }
    }

    fn bomb_app(words: &[&str], injector: Box<dyn KeyInjector>) -> App {
        App::new(
            Mode::Bomb,
            words.iter().map(|w| w.to_string()).collect(),
            5,
            '=',
            Theme::default(),
            fast_timing(),
            injector,
        )
    }

    fn type_word(app: &mut App, word: &str, now: Instant) {
        for c in word.chars() {
            app.handle_key(GameKey::Char(c), now);
        }
    }

    /// Drives ticks far enough into the future to flush any plan.
    fn flush_plan(app: &mut App, now: Instant) {
        app.tick(now + Duration::from_secs(60));
    }

    #[test]
    fn panic_types_the_missing_suffix_and_submits() {
        let recording = Rc::new(RefCell::new(Recording::default()));
        let mut app = bomb_app(&["dog"], Box::new(RecordingInjector(recording.clone())));
        let now = Instant::now();

        type_word(&mut app, "do", now);
        app.handle_key(GameKey::Panic, now);
        flush_plan(&mut app, now);

        let recording = recording.borrow();
        assert_eq!(
            recording.presses,
            vec![InjectedKey::Char('g'), InjectedKey::Enter]
        );
        assert_eq!(recording.presses, recording.releases);

        let snap = app.snapshot();
        assert_eq!(snap.typed, "");
        assert_eq!(snap.high_score, 3);
        assert_eq!(snap.remaining, 0);
        assert!(!snap.panicking);
    }

    #[test]
    fn panic_erases_a_mismatched_buffer_first() {
        let recording = Rc::new(RefCell::new(Recording::default()));
        let mut app = bomb_app(&["cat"], Box::new(RecordingInjector(recording.clone())));
        let now = Instant::now();

        type_word(&mut app, "zzz", now);
        app.handle_key(GameKey::Panic, now);
        flush_plan(&mut app, now);

        assert_eq!(
            recording.borrow().presses,
            vec![
                InjectedKey::Backspace,
                InjectedKey::Backspace,
                InjectedKey::Backspace,
                InjectedKey::Char('c'),
                InjectedKey::Char('a'),
                InjectedKey::Char('t'),
                InjectedKey::Enter,
            ]
        );
        assert_eq!(app.snapshot().high_score, 3);
    }

    #[test]
    fn panic_with_empty_buffer_is_a_noop() {
        let mut app = bomb_app(&["dog"], Box::new(NullInjector));
        let now = Instant::now();
        app.handle_key(GameKey::Panic, now);
        flush_plan(&mut app, now);
        assert_eq!(app.snapshot().remaining, 1);
    }

    #[test]
    fn injection_failure_does_not_derail_the_plan() {
        let mut app = bomb_app(&["dog"], Box::new(FailingInjector));
        let now = Instant::now();

        type_word(&mut app, "do", now);
        app.handle_key(GameKey::Panic, now);
        flush_plan(&mut app, now);

        // logical state completed even though every physical stroke failed
        let snap = app.snapshot();
        assert_eq!(snap.high_score, 3);
        assert_eq!(snap.typed, "");
    }

    #[test]
    fn listener_echoes_of_injected_keys_are_swallowed() {
        let mut app = bomb_app(&["dog"], Box::new(NullInjector));
        let now = Instant::now();

        type_word(&mut app, "do", now);
        app.handle_key(GameKey::Panic, now);

        // the hook observes our own injected 'g' before the plan finishes
        app.handle_key(GameKey::Char('g'), now);
        assert_eq!(app.snapshot().typed, "do");
    }

    #[test]
    fn enter_mid_plan_cancels_and_submits_the_partial_buffer() {
        let mut app = bomb_app(&["dog", "dodge"], Box::new(NullInjector));
        let now = Instant::now();

        type_word(&mut app, "do", now);
        app.handle_key(GameKey::Tab, now);
        assert!(!app.snapshot().panicking);

        app.handle_key(GameKey::Enter, now);
        // plan gone, nothing fires later, "do" was not a pool word
        flush_plan(&mut app, now);
        let snap = app.snapshot();
        assert_eq!(snap.typed, "");
        assert_eq!(snap.high_score, 0);
        assert_eq!(snap.remaining, 2);
    }

    #[test]
    fn tab_is_rejected_in_fallback_mode() {
        let mut app = bomb_app(&["abandon"], Box::new(NullInjector));
        let now = Instant::now();

        type_word(&mut app, "ban", now);
        let snap = app.snapshot();
        assert!(!snap.strict);

        app.handle_key(GameKey::Tab, now);
        flush_plan(&mut app, now);
        assert_eq!(app.snapshot().typed, "ban");
    }

    #[test]
    fn tab_autocompletes_the_longest_candidate() {
        let mut app = bomb_app(&["dot", "dodge"], Box::new(NullInjector));
        let now = Instant::now();

        type_word(&mut app, "do", now);
        app.handle_key(GameKey::Tab, now);
        flush_plan(&mut app, now);

        // no submit for plain autocomplete, the word sits in the buffer
        let snap = app.snapshot();
        assert_eq!(snap.typed, "dodge");
        assert_eq!(snap.high_score, 0);
    }

    #[test]
    fn chain_mode_ignores_tab_and_panic() {
        let mut app = App::new(
            Mode::Chain,
            vec!["cat".to_string()],
            5,
            '=',
            Theme::default(),
            fast_timing(),
            Box::new(NullInjector),
        );
        let now = Instant::now();

        type_word(&mut app, "ca", now);
        app.handle_key(GameKey::Tab, now);
        app.handle_key(GameKey::Panic, now);
        flush_plan(&mut app, now);
        assert_eq!(app.snapshot().typed, "ca");
    }

    #[test]
    fn hidden_overlay_ignores_typing_until_shown_again() {
        let mut app = bomb_app(&["dog"], Box::new(NullInjector));
        let now = Instant::now();

        type_word(&mut app, "d", now);
        app.handle_key(GameKey::ToggleHide, now);
        assert!(app.hidden);

        // keystrokes, submits and plan triggers are all frozen while hidden
        type_word(&mut app, "og", now);
        app.handle_key(GameKey::Tab, now);
        app.handle_key(GameKey::Panic, now);
        app.handle_key(GameKey::Enter, now);
        flush_plan(&mut app, now);
        let snap = app.snapshot();
        assert_eq!(snap.typed, "d");
        assert_eq!(snap.remaining, 1);

        // the command keys still work, and typing resumes after unhiding
        app.handle_key(GameKey::ToggleHide, now);
        assert!(!app.hidden);
        type_word(&mut app, "og", now);
        assert_eq!(app.snapshot().typed, "dog");
    }

    #[test]
    fn snapshot_reports_fallback_and_no_match_states() {
        let mut app = App::new(
            Mode::Chain,
            vec!["cat".to_string(), "tap".to_string(), "pat".to_string()],
            5,
            '=',
            Theme::default(),
            fast_timing(),
            Box::new(NullInjector),
        );
        let now = Instant::now();

        type_word(&mut app, "cat", now);
        app.handle_key(GameKey::Enter, now);

        // nothing starts with "at": explicit no-match state, not an error
        let snap = app.snapshot();
        assert_eq!(snap.required_prefix.as_deref(), Some("at"));
        assert!(snap.suggestions.is_empty());
        assert!(!snap.strict);
        assert!(!snap.glow_active);
    }
}
