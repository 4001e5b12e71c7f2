use std::time::{Duration, Instant};

use klack::mode::Mode;
use klack::session::{Session, SessionEvent, Summary};
use klack::words::WordSource;

fn test_source() -> WordSource {
    WordSource::with_pool(vec![
        "alpha".into(),
        "beta".into(),
        "gamma".into(),
        "delta".into(),
        "epsilon".into(),
    ])
}

fn drive(session: &mut Session, text: &str) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    let mut buffer = String::new();
    for ch in text.chars() {
        buffer.push(ch);
        events.extend(session.process_input(&buffer));
    }
    events
}

fn summary_of(events: &[SessionEvent]) -> Option<Summary> {
    events.iter().find_map(|e| match e {
        SessionEvent::Finished(s) => Some(*s),
        _ => None,
    })
}

#[test]
fn word_mode_end_to_end() {
    let source = test_source();
    let mode = Mode::Words { count: 5 };
    let mut session = Session::new(mode, &source);

    let target = session.target_string();
    assert_eq!(target.split(' ').count(), 5);

    // Every keystroke before the last produces exactly one update and
    // no summary; the last produces the finish pair.
    let chars: Vec<char> = target.chars().collect();
    let mut buffer = String::new();
    for (i, ch) in chars.iter().enumerate() {
        buffer.push(*ch);
        let events = session.process_input(&buffer);
        if i + 1 < chars.len() {
            assert_eq!(events.len(), 1, "keystroke {i} should only update");
        } else {
            let summary = summary_of(&events).expect("last keystroke finishes");
            assert!(summary.success);
            assert_eq!(summary.accuracy, 100);
        }
    }
    assert!(session.is_finished());
}

#[test]
fn quote_target_works_offline() {
    // Whatever the network state, a quote session must always come up
    // with a usable target.
    let source = test_source();
    let session = Session::new(Mode::Quote, &source);
    assert!(!session.target.is_empty());
}

#[test]
fn sudden_death_aborts_mid_word() {
    let source = test_source();
    let mut session = Session::new(Mode::SuddenDeath, &source);
    let target = session.target_string();

    // Type the first three chars correctly, then slip.
    let good: String = target.chars().take(3).collect();
    let events = drive(&mut session, &good);
    assert!(summary_of(&events).is_none());

    let mut bad = good.clone();
    bad.push(if target.chars().nth(3) == Some('z') { 'q' } else { 'z' });
    let events = session.process_input(&bad);

    let summary = summary_of(&events).expect("mistake ends the run");
    assert!(!summary.success);
    assert!(session.is_finished());

    // Dead session: neither keystrokes nor ticks revive it.
    assert!(session.process_input(&good).is_empty());
    assert!(session.tick().is_empty());
}

#[test]
fn timed_mode_expires_via_ticks_alone() {
    let source = test_source();
    let mut session = Session::new(Mode::Timed { seconds: 5 }, &source);

    assert!(summary_of(&session.tick()).is_none());

    session.reset_at = Instant::now() - Duration::from_secs(6);
    let summary = summary_of(&session.tick()).expect("timer expired");
    assert!(summary.success);
    assert_eq!(summary.wpm, 0);
}

#[test]
fn timed_mode_scores_typed_prefix_at_expiry() {
    let source = test_source();
    let mut session = Session::new(Mode::Timed { seconds: 10 }, &source);
    let target = session.target_string();

    let prefix: String = target.chars().take(10).collect();
    drive(&mut session, &prefix);
    assert!(!session.is_finished());

    session.started_at = Some(Instant::now() - Duration::from_secs(11));
    let summary = summary_of(&session.tick()).expect("expired");
    assert!(summary.success);
    assert_eq!(summary.accuracy, 100);
    assert!(summary.wpm > 0);
}

#[test]
fn restart_replaces_the_session_wholesale() {
    let source = test_source();
    let mode = Mode::Words { count: 4 };
    let mut session = Session::new(mode, &source);
    drive(&mut session, "zzz");
    assert!(session.total_keypresses > 0);

    session = Session::new(mode, &source);
    assert_eq!(session.total_keypresses, 0);
    assert!(session.input.is_empty());
    assert!(!session.is_running());
    assert!(session.started_at.is_none());
}
