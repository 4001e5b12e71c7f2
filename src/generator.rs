use std::ops::RangeInclusive;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

/// Weighted view over a word pool. Entry `i` gets weight `len - i`, so
/// earlier (simpler) entries win proportionally more draws. The
/// cumulative table is built once here; each draw is a single uniform
/// sample plus a binary search inside `WeightedIndex`.
pub struct WeightedPool<'a> {
    words: &'a [String],
    index: WeightedIndex<usize>,
}

impl<'a> WeightedPool<'a> {
    pub fn new(words: &'a [String]) -> Option<Self> {
        let n = words.len();
        let index = WeightedIndex::new((0..n).map(|i| n - i)).ok()?;
        Some(Self { words, index })
    }

    pub fn draw(&self, rng: &mut impl Rng) -> &'a str {
        &self.words[self.index.sample(rng)]
    }
}

/// A run of weighted words joined by single spaces; the word count is
/// uniform over the given range.
pub fn sentence(pool: &WeightedPool, rng: &mut impl Rng, words: RangeInclusive<usize>) -> String {
    let count = rng.gen_range(words);
    let picked: Vec<&str> = (0..count).map(|_| pool.draw(rng)).collect();
    picked.join(" ")
}

pub fn paragraph(
    pool: &WeightedPool,
    rng: &mut impl Rng,
    sentences: RangeInclusive<usize>,
    words: RangeInclusive<usize>,
) -> String {
    let count = rng.gen_range(sentences);
    let built: Vec<String> = (0..count)
        .map(|_| sentence(pool, rng, words.clone()))
        .collect();
    built.join(" ")
}

/// Flat single-line text: paragraphs joined by spaces, no break characters.
pub fn text(
    pool: &WeightedPool,
    rng: &mut impl Rng,
    paragraphs: RangeInclusive<usize>,
    sentences: RangeInclusive<usize>,
    words: RangeInclusive<usize>,
) -> String {
    let count = rng.gen_range(paragraphs);
    let built: Vec<String> = (0..count)
        .map(|_| paragraph(pool, rng, sentences.clone(), words.clone()))
        .collect();
    built.join(" ")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    fn params(
        self,
    ) -> (
        RangeInclusive<usize>,
        RangeInclusive<usize>,
        RangeInclusive<usize>,
    ) {
        match self {
            Difficulty::Easy => (1..=1, 1..=2, 2..=4),
            Difficulty::Medium => (1..=2, 1..=3, 3..=5),
            Difficulty::Hard => (2..=3, 2..=4, 4..=6),
        }
    }

    pub fn generate(self, pool: &WeightedPool, rng: &mut impl Rng) -> String {
        let (paragraphs, sentences, words) = self.params();
        text(pool, rng, paragraphs, sentences, words)
    }
}
