use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

const BUNDLED_WORDS: &str = include_str!("../assets/words.txt");

const WORD_LIST_URL: &str =
    "https://raw.githubusercontent.com/first20hours/google-10000-english/master/20k.txt";
const QUOTE_URL: &str = "https://api.quotable.io/random?minLength=50&maxLength=140";

const WORD_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const QUOTE_FETCH_TIMEOUT: Duration = Duration::from_secs(3);

pub const FALLBACK_QUOTE: &str = "The quick brown fox jumps over the lazy dog. — Fallback";

/// Last resort if the bundled list somehow filters down to nothing.
const FALLBACK_WORDS: &[&str] = &[
    "the", "and", "for", "you", "that", "with", "have", "this", "from", "they", "know", "want",
    "good", "much", "some", "time", "very", "when", "come", "here",
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[cfg(feature = "network")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("payload had no usable content")]
    Malformed,
    #[error("built without network support")]
    Disabled,
}

#[derive(Deserialize)]
struct QuotePayload {
    #[serde(default)]
    content: String,
    #[serde(default = "unknown_author")]
    author: String,
}

fn unknown_author() -> String {
    "Unknown".to_string()
}

/// Shared pool of candidate words plus the quote fetcher. One long-lived
/// instance per process; the pool is read under a lock so a background
/// refresh can swap it without ever stalling the typing loop.
pub struct WordSource {
    pool: Arc<Mutex<Vec<String>>>,
}

impl WordSource {
    pub fn new() -> Self {
        let mut pool = filter_words(BUNDLED_WORDS.lines());
        if pool.is_empty() {
            pool = FALLBACK_WORDS.iter().map(|w| w.to_string()).collect();
        }
        Self {
            pool: Arc::new(Mutex::new(pool)),
        }
    }

    pub fn with_pool(words: Vec<String>) -> Self {
        Self {
            pool: Arc::new(Mutex::new(words)),
        }
    }

    pub fn pool_len(&self) -> usize {
        self.lock_pool().len()
    }

    /// Clone of the current pool, for samplers that need the whole list.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock_pool().clone()
    }

    /// Kick off a background fetch of the remote word list. Fire and
    /// forget: the pool is swapped under the lock when (and only when)
    /// the fetch yields usable words, and no caller ever waits on it.
    pub fn refresh(&self) {
        let pool = Arc::clone(&self.pool);
        thread::spawn(move || {
            if let Ok(body) = fetch_text(WORD_LIST_URL, WORD_FETCH_TIMEOUT) {
                let words = filter_words(body.lines());
                if !words.is_empty() {
                    *pool.lock().unwrap_or_else(PoisonError::into_inner) = words;
                }
            }
        });
    }

    /// `count` words sampled with replacement, biased toward the front of
    /// the pool (remote lists are frequency-ordered, so earlier = simpler).
    pub fn get_words(&self, count: usize) -> Vec<String> {
        let pool = self.lock_pool();
        if pool.is_empty() {
            return FALLBACK_WORDS
                .iter()
                .cycle()
                .take(count)
                .map(|w| w.to_string())
                .collect();
        }
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| pool[triangular_index(&mut rng, pool.len())].clone())
            .collect()
    }

    /// A 50-140 character quotation formatted as `"<text> — <author>"`.
    /// Any fetch or parse failure degrades to the fixed fallback sentence.
    pub fn get_quote(&self) -> String {
        fetch_quote().unwrap_or_else(|_| FALLBACK_QUOTE.to_string())
    }

    fn lock_pool(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for WordSource {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch_quote() -> Result<String, FetchError> {
    let body = fetch_text(QUOTE_URL, QUOTE_FETCH_TIMEOUT)?;
    let payload: QuotePayload =
        serde_json::from_str(&body).map_err(|_| FetchError::Malformed)?;
    if payload.content.is_empty() {
        return Err(FetchError::Malformed);
    }
    Ok(format_quote(&payload.content, &payload.author))
}

/// Normalize curly quotes to straight ones and attach the attribution.
fn format_quote(content: &str, author: &str) -> String {
    let content = content
        .replace('\u{2019}', "'")
        .replace('\u{2018}', "'")
        .replace('\u{201c}', "\"")
        .replace('\u{201d}', "\"");
    format!("{content} — {author}")
}

/// Keep 3-10 character purely alphabetic entries, lowercased.
fn filter_words<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    lines
        .map(str::trim)
        .filter(|w| (3..=10).contains(&w.len()) && w.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|w| w.to_ascii_lowercase())
        .collect()
}

/// Index draw from a triangular distribution over `0..len` with its mode
/// at 0, via the inverse CDF.
fn triangular_index(rng: &mut impl Rng, len: usize) -> usize {
    let u: f64 = rng.gen_range(0.0..1.0);
    let idx = (len as f64 * (1.0 - u.sqrt())) as usize;
    idx.min(len - 1)
}

#[cfg(feature = "network")]
fn fetch_text(url: &str, timeout: Duration) -> Result<String, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.text()?)
}

#[cfg(not(feature = "network"))]
fn fetch_text(_url: &str, _timeout: Duration) -> Result<String, FetchError> {
    Err(FetchError::Disabled)
}
