use std::time::Instant;

use crate::mode::Mode;
use crate::words::WordSource;

/// Floor applied to elapsed time so the first fraction of a second never
/// divides by (near) zero.
pub const MIN_ELAPSED_SECS: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished { success: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    Cursor,
    Untouched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharCell {
    pub ch: char,
    pub state: CharState,
}

/// Render data handed to the presentation layer on every processed
/// keystroke and every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    pub status: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub cells: Vec<CharCell>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub success: bool,
    pub wpm: u32,
    pub accuracy: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Update(Update),
    Finished(Summary),
}

/// Count of positions where the typed char matches the target char.
pub fn correct_chars(input: &[char], target: &[char]) -> usize {
    input
        .iter()
        .zip(target.iter())
        .filter(|(typed, expected)| typed == expected)
        .count()
}

/// Words per minute at the standard five chars per word, floored.
pub fn wpm(correct_chars: usize, elapsed_secs: f64) -> u32 {
    let elapsed = elapsed_secs.max(MIN_ELAPSED_SECS);
    ((correct_chars as f64 / 5.0) / (elapsed / 60.0)).floor() as u32
}

/// Percentage of typed chars matching their target position, floored.
/// An empty buffer counts as perfect.
pub fn accuracy(correct_chars: usize, input_len: usize) -> u32 {
    if input_len == 0 {
        return 100;
    }
    ((correct_chars as f64 / input_len as f64) * 100.0).floor() as u32
}

/// One typing attempt: target, input buffer, timing, and counters.
/// Replaced wholesale on restart; never partially reset.
pub struct Session {
    pub mode: Mode,
    pub target: Vec<char>,
    pub input: Vec<char>,
    pub started_at: Option<Instant>,
    pub reset_at: Instant,
    pub total_keypresses: u32,
    pub correct: usize,
    pub incorrect: usize,
    pub phase: Phase,
}

impl Session {
    pub fn new(mode: Mode, source: &WordSource) -> Self {
        let target = mode.generate_target(source);
        Self::with_target(mode, target)
    }

    pub fn with_target(mode: Mode, target: String) -> Self {
        Self {
            mode,
            target: target.chars().collect(),
            input: Vec::new(),
            started_at: None,
            reset_at: Instant::now(),
            total_keypresses: 0,
            correct: 0,
            incorrect: 0,
            phase: Phase::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    pub fn input_string(&self) -> String {
        self.input.iter().collect()
    }

    pub fn target_string(&self) -> String {
        self.target.iter().collect()
    }

    /// Elapsed seconds since the first keystroke, floored at
    /// `MIN_ELAPSED_SECS`.
    pub fn elapsed_secs(&self) -> f64 {
        self.started_at
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
            .max(MIN_ELAPSED_SECS)
    }

    pub fn wpm(&self) -> u32 {
        wpm(self.correct, self.elapsed_secs())
    }

    pub fn accuracy(&self) -> u32 {
        accuracy(self.correct, self.input.len())
    }

    /// Whole-buffer input update, one call per keystroke. Appends and
    /// backspace truncations both arrive through here.
    pub fn process_input(&mut self, input: &str) -> Vec<SessionEvent> {
        if self.is_finished() {
            return Vec::new();
        }

        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
            self.phase = Phase::Running;
        }

        let chars: Vec<char> = input.chars().collect();
        // One keypress per delivery; a multi-char append (word skip)
        // counts each inserted char so correct + incorrect never
        // outruns the keypress total.
        let grew = chars.len().saturating_sub(self.input.len());
        self.total_keypresses += grew.max(1) as u32;

        if !self.mode.validate_input(&chars, &self.target) {
            // Keep the offending input visible in the final render.
            self.input = chars;
            self.recount();
            return self.finish(false);
        }

        self.input = chars;
        self.recount();

        if self
            .mode
            .is_finished(&self.input, &self.target, self.completion_clock())
        {
            return self.finish(true);
        }

        vec![SessionEvent::Update(self.snapshot())]
    }

    /// Periodic re-evaluation so a timed session expires without fresh
    /// keystrokes. A no-op once finished, and before the first keystroke
    /// for every mode except Timed.
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        if self.is_finished() {
            return Vec::new();
        }
        if self.phase == Phase::Idle && !matches!(self.mode, Mode::Timed { .. }) {
            return Vec::new();
        }

        if self
            .mode
            .is_finished(&self.input, &self.target, self.completion_clock())
        {
            return self.finish(true);
        }

        vec![SessionEvent::Update(self.snapshot())]
    }

    /// Per-character classification of the whole target.
    pub fn cells(&self) -> Vec<CharCell> {
        let cursor = self.input.len();
        self.target
            .iter()
            .enumerate()
            .map(|(i, &ch)| {
                let state = if i < cursor {
                    if self.input[i] == ch {
                        CharState::Correct
                    } else {
                        CharState::Incorrect
                    }
                } else if i == cursor {
                    CharState::Cursor
                } else {
                    CharState::Untouched
                };
                CharCell { ch, state }
            })
            .collect()
    }

    pub fn snapshot(&self) -> Update {
        let wpm = self.wpm();
        let accuracy = self.accuracy();
        Update {
            status: self.mode.status_text(wpm, accuracy, self.completion_clock()),
            wpm,
            accuracy,
            cells: self.cells(),
        }
    }

    /// Clock for completion checks and countdown display. Before the
    /// first keystroke a Timed session counts from its creation instant,
    /// so it can expire untouched.
    fn completion_clock(&self) -> f64 {
        match self.started_at {
            Some(t) => t.elapsed().as_secs_f64(),
            None => self.reset_at.elapsed().as_secs_f64(),
        }
    }

    fn recount(&mut self) {
        self.correct = correct_chars(&self.input, &self.target);
        self.incorrect = self.input.len() - self.correct;
    }

    fn finish(&mut self, success: bool) -> Vec<SessionEvent> {
        self.phase = Phase::Finished { success };
        let mut update = self.snapshot();
        update.status = format!("FINISH | {}", update.status);
        let summary = Summary {
            success,
            wpm: update.wpm,
            accuracy: update.accuracy,
        };
        vec![
            SessionEvent::Update(update),
            SessionEvent::Finished(summary),
        ]
    }
}
