use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::generator::{Difficulty, WeightedPool};
use crate::words::WordSource;

/// Cosmetic styling hint consumed only by the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Accent {
    #[default]
    Normal,
    Danger,
}

/// Rule set for one game variant: how the target is built, when the
/// session ends, and whether a keystroke can invalidate the attempt.
/// Stateless; the session consults it by reference on every step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Words { count: usize },
    Timed { seconds: u64 },
    Quote,
    SuddenDeath,
    Drill { difficulty: Difficulty },
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Words { count: 25 }
    }
}

impl Mode {
    pub fn generate_target(&self, source: &WordSource) -> String {
        match self {
            Mode::Words { count } => source.get_words(*count).join(" "),
            // Generously long so time runs out before the words do.
            Mode::Timed { .. } => source.get_words(100).join(" "),
            Mode::Quote => source.get_quote(),
            Mode::SuddenDeath => source.get_words(30).join(" "),
            Mode::Drill { difficulty } => {
                let words = source.snapshot();
                let mut rng = SmallRng::from_entropy();
                match WeightedPool::new(&words) {
                    Some(pool) => difficulty.generate(&pool, &mut rng),
                    None => source.get_words(25).join(" "),
                }
            }
        }
    }

    pub fn is_finished(&self, input: &[char], target: &[char], elapsed_secs: f64) -> bool {
        match self {
            Mode::Timed { seconds } => elapsed_secs >= *seconds as f64,
            _ => input.len() >= target.len(),
        }
    }

    /// False means this keystroke invalidates the whole attempt. Only
    /// sudden death cares: the latest typed char must match its target
    /// position.
    pub fn validate_input(&self, input: &[char], target: &[char]) -> bool {
        match self {
            Mode::SuddenDeath => {
                let Some(idx) = input.len().checked_sub(1) else {
                    return true;
                };
                match target.get(idx) {
                    Some(&expected) => input[idx] == expected,
                    None => true,
                }
            }
            _ => true,
        }
    }

    pub fn status_text(&self, wpm: u32, accuracy: u32, elapsed_secs: f64) -> String {
        match self {
            Mode::Words { .. } => format!("WPM: {wpm} | ACC: {accuracy}%"),
            Mode::Timed { seconds } => {
                let remaining = (*seconds as i64 - elapsed_secs as i64).max(0);
                format!("Time: {remaining}s | WPM: {wpm}")
            }
            Mode::Quote => "Quote Mode".to_string(),
            Mode::SuddenDeath => format!("Sudden Death | WPM: {wpm}"),
            Mode::Drill { .. } => format!("Drill | WPM: {wpm} | ACC: {accuracy}%"),
        }
    }

    pub fn accent(&self) -> Accent {
        match self {
            Mode::SuddenDeath => Accent::Danger,
            _ => Accent::Normal,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Mode::Words { count } => format!("{count} Words"),
            Mode::Timed { seconds } => format!("{seconds}s Time"),
            Mode::Quote => "Quote".to_string(),
            Mode::SuddenDeath => "Sudden Death".to_string(),
            Mode::Drill { difficulty } => format!("Drill ({})", difficulty.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn test_source() -> WordSource {
        WordSource::with_pool(vec![
            "alpha".into(),
            "beta".into(),
            "gamma".into(),
            "delta".into(),
        ])
    }

    #[test]
    fn words_target_has_exactly_count_tokens() {
        let source = test_source();
        let target = Mode::Words { count: 5 }.generate_target(&source);
        assert_eq!(target.split(' ').count(), 5);
    }

    #[test]
    fn timed_target_is_one_hundred_tokens() {
        let source = test_source();
        let target = Mode::Timed { seconds: 30 }.generate_target(&source);
        assert_eq!(target.split(' ').count(), 100);
    }

    #[test]
    fn sudden_death_target_is_thirty_tokens() {
        let source = test_source();
        let target = Mode::SuddenDeath.generate_target(&source);
        assert_eq!(target.split(' ').count(), 30);
    }

    #[test]
    fn drill_target_is_nonempty_words() {
        let source = test_source();
        let target = Mode::Drill {
            difficulty: Difficulty::Medium,
        }
        .generate_target(&source);
        assert!(!target.is_empty());
        for token in target.split(' ') {
            assert!(["alpha", "beta", "gamma", "delta"].contains(&token));
        }
    }

    #[test]
    fn length_modes_finish_exactly_at_target_length() {
        let target = chars("abcde");
        for mode in [Mode::Words { count: 1 }, Mode::Quote, Mode::SuddenDeath] {
            assert!(!mode.is_finished(&chars("abcd"), &target, 99.0));
            assert!(mode.is_finished(&chars("abcde"), &target, 0.0));
            assert!(mode.is_finished(&chars("abcdef"), &target, 0.0));
        }
    }

    #[test]
    fn timed_finishes_on_elapsed_only() {
        let mode = Mode::Timed { seconds: 30 };
        let target = chars("ab");
        assert!(!mode.is_finished(&chars("abcdef"), &target, 29.9));
        assert!(mode.is_finished(&chars(""), &target, 30.0));
    }

    #[test]
    fn sudden_death_accepts_correct_and_empty_input() {
        let mode = Mode::SuddenDeath;
        let target = chars("cat");
        assert!(mode.validate_input(&chars(""), &target));
        assert!(mode.validate_input(&chars("c"), &target));
        assert!(mode.validate_input(&chars("ca"), &target));
        assert!(mode.validate_input(&chars("cat"), &target));
    }

    #[test]
    fn sudden_death_rejects_only_the_latest_mismatch() {
        let mode = Mode::SuddenDeath;
        let target = chars("cat");
        assert!(!mode.validate_input(&chars("x"), &target));
        assert!(!mode.validate_input(&chars("cx"), &target));
        // Earlier mistakes don't re-trigger once the cursor moved on
        // (they can't exist in practice, the session ends first).
        assert!(mode.validate_input(&chars("xat"), &target));
    }

    #[test]
    fn other_modes_validate_anything() {
        let target = chars("cat");
        for mode in [
            Mode::Words { count: 3 },
            Mode::Timed { seconds: 5 },
            Mode::Quote,
        ] {
            assert!(mode.validate_input(&chars("zzz"), &target));
        }
    }

    #[test]
    fn timed_status_counts_down() {
        let mode = Mode::Timed { seconds: 30 };
        assert_eq!(mode.status_text(40, 95, 10.2), "Time: 20s | WPM: 40");
        assert_eq!(mode.status_text(40, 95, 99.0), "Time: 0s | WPM: 40");
    }

    #[test]
    fn accent_marks_sudden_death_only() {
        assert_eq!(Mode::SuddenDeath.accent(), Accent::Danger);
        assert_eq!(Mode::default().accent(), Accent::Normal);
    }

    #[test]
    fn default_mode_is_twenty_five_words() {
        assert_eq!(Mode::default(), Mode::Words { count: 25 });
    }
}
