use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::mode::Mode;
use crate::session::{Session, SessionEvent, Summary};
use crate::theme::Theme;
use crate::words::WordSource;

/// Presentation-side glue: owns the word source, the current session,
/// and the resolved settings; turns key events into whole-buffer
/// `process_input` calls.
pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub source: WordSource,
    pub mode: Mode,
    pub session: Session,
    pub last_summary: Option<Summary>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, theme: Theme) -> Self {
        let source = WordSource::new();
        if config.fetch_words {
            source.refresh();
        }
        Self::with_source(config, theme, source)
    }

    pub fn with_source(config: Config, theme: Theme, source: WordSource) -> Self {
        let mode = Mode::Words {
            count: config.word_count,
        };
        let session = Session::new(mode, &source);
        Self {
            config,
            theme,
            source,
            mode,
            session,
            last_summary: None,
            should_quit: false,
        }
    }

    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.restart();
    }

    /// A fresh session for the current mode; the old one is dropped
    /// wholesale.
    pub fn restart(&mut self) {
        self.session = Session::new(self.mode, &self.source);
        self.last_summary = None;
    }

    pub fn on_tick(&mut self) {
        let events = self.session.tick();
        self.absorb(events);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Only Press counts; Repeat would inflate the keypress total.
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.restart(),
            KeyCode::Backspace => {
                self.backspace(key.modifiers.contains(KeyModifiers::CONTROL));
            }
            KeyCode::Char(ch) => self.type_char(ch),
            _ => {}
        }
    }

    fn type_char(&mut self, ch: char) {
        // Mode keys are live whenever a run isn't in progress, so a
        // digit typed mid-session stays ordinary input.
        if !self.session.is_running() {
            if let Some(mode) = self.mode_for_key(ch) {
                self.select_mode(mode);
                return;
            }
        }
        if self.session.is_finished() {
            return;
        }

        if ch == ' ' {
            self.jump_word();
            return;
        }

        let buffer = self.session.input_string();
        if self.session.input.len() >= self.session.target.len() {
            return;
        }
        let mut next = buffer;
        next.push(ch);
        self.push_input(next);
    }

    /// Space mid-word skips to the next word, padding the gap with
    /// mismatching filler, like the desktop original. A space at a
    /// space position just types it.
    fn jump_word(&mut self) {
        let buffer = self.session.input_string();
        if buffer.ends_with(' ') {
            return;
        }
        let idx = self.session.input.len();
        let target = &self.session.target;
        let mut next = buffer;
        match target.get(idx) {
            Some(&ch) if ch != ' ' => {
                let stop = target[idx..]
                    .iter()
                    .position(|&c| c == ' ')
                    .map(|p| idx + p)
                    .unwrap_or(target.len());
                for _ in idx..stop {
                    next.push('_');
                }
                next.push(' ');
            }
            _ => next.push(' '),
        }
        self.push_input(next);
    }

    fn backspace(&mut self, whole_word: bool) {
        if self.session.is_finished() {
            return;
        }
        let buffer = self.session.input_string();
        if buffer.is_empty() {
            return;
        }
        let next = if whole_word {
            match buffer.trim_end().rfind(' ') {
                Some(idx) => buffer[..=idx].to_string(),
                None => String::new(),
            }
        } else {
            let mut shorter = buffer;
            shorter.pop();
            shorter
        };
        self.push_input(next);
    }

    fn push_input(&mut self, next: String) {
        let events = self.session.process_input(&next);
        self.absorb(events);
    }

    fn absorb(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            if let SessionEvent::Finished(summary) = event {
                self.last_summary = Some(summary);
            }
        }
    }

    fn mode_for_key(&self, ch: char) -> Option<Mode> {
        match ch {
            '1' => Some(Mode::Words {
                count: self.config.word_count,
            }),
            '2' => Some(Mode::Quote),
            '3' => Some(Mode::Timed {
                seconds: self.config.timed_seconds,
            }),
            '4' => Some(Mode::SuddenDeath),
            '5' => Some(Mode::Drill {
                difficulty: self.config.resolved_difficulty(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let mut config = Config::default();
        config.fetch_words = false;
        config.word_count = 3;
        let source = WordSource::with_pool(vec![
            "alpha".into(),
            "beta".into(),
            "gamma".into(),
        ]);
        App::with_source(config, Theme::default(), source)
    }

    fn press(app: &mut App, ch: char) {
        app.on_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
    }

    #[test]
    fn typing_flows_into_the_session() {
        let mut app = test_app();
        let first = app.session.target[0];
        press(&mut app, first);
        assert_eq!(app.session.input_string(), first.to_string());
        assert!(app.session.is_running());
    }

    #[test]
    fn space_mid_word_jumps_with_filler() {
        let mut app = test_app();
        app.session = Session::with_target(app.mode, "alpha beta".to_string());
        press(&mut app, 'a');
        press(&mut app, ' ');
        assert_eq!(app.session.input_string(), "a____ ");
        assert_eq!(app.session.input.len(), 6);
    }

    #[test]
    fn double_space_is_ignored() {
        let mut app = test_app();
        app.session = Session::with_target(app.mode, "alpha beta".to_string());
        press(&mut app, ' ');
        let after_first = app.session.input_string();
        press(&mut app, ' ');
        assert_eq!(app.session.input_string(), after_first);
    }

    #[test]
    fn ctrl_backspace_drops_the_word() {
        let mut app = test_app();
        app.session = Session::with_target(app.mode, "alpha beta".to_string());
        for ch in "alpha be".chars() {
            press(&mut app, ch);
        }
        app.on_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::CONTROL));
        assert_eq!(app.session.input_string(), "alpha ");
    }

    #[test]
    fn backspace_on_empty_buffer_does_not_start_the_clock() {
        let mut app = test_app();
        app.on_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert!(app.session.started_at.is_none());
    }

    #[test]
    fn input_is_clamped_at_target_length() {
        let mut app = test_app();
        app.session = Session::with_target(app.mode, "ab".to_string());
        press(&mut app, 'a');
        press(&mut app, 'x');
        assert!(app.session.is_finished());
        press(&mut app, 'y');
        assert_eq!(app.session.input_string(), "ax");
    }

    #[test]
    fn mode_keys_only_apply_outside_a_run() {
        let mut app = test_app();
        press(&mut app, '4');
        assert_eq!(app.mode, Mode::SuddenDeath);

        // Mid-run a digit is just (wrong) input.
        app.session = Session::with_target(app.mode, "abc".to_string());
        press(&mut app, 'a');
        press(&mut app, '2');
        assert_ne!(app.mode, Mode::Quote);
    }

    #[test]
    fn tab_restarts_and_clears_the_summary() {
        let mut app = test_app();
        app.session = Session::with_target(app.mode, "ab".to_string());
        press(&mut app, 'a');
        press(&mut app, 'b');
        assert!(app.last_summary.is_some());

        app.on_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert!(app.last_summary.is_none());
        assert!(!app.session.is_finished());
        assert!(app.session.input.is_empty());
    }

    #[test]
    fn finished_summary_is_captured() {
        let mut app = test_app();
        app.session = Session::with_target(app.mode, "hi".to_string());
        press(&mut app, 'h');
        press(&mut app, 'i');
        let summary = app.last_summary.expect("finished");
        assert!(summary.success);
        assert_eq!(summary.accuracy, 100);
    }
}
