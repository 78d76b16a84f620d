//! Locale-aware pseudo-random text for demo content

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

const LOREM_WORDS: &[&str] = &[
    "alias", "consequatur", "aut", "perferendis", "sit", "voluptatem", "accusantium", "doloremque",
    "aperiam", "eaque", "ipsa", "quae", "ab", "illo", "inventore", "veritatis", "et", "quasi",
    "architecto", "beatae", "vitae", "dicta", "sunt", "explicabo", "aspernatur", "odit", "fugit",
    "sed", "quia", "consequuntur", "magni", "dolores", "eos", "qui", "ratione", "sequi", "nesciunt",
    "neque", "dolorem", "ipsum", "dolor", "amet", "consectetur", "adipisci", "velit", "non",
    "numquam", "eius", "modi", "tempora", "incidunt", "ut", "labore", "dolore", "magnam", "aliquam",
    "quaerat", "enim", "ad", "minima", "veniam", "quis", "nostrum", "exercitationem", "ullam",
    "corporis", "nemo", "ipsam", "voluptas", "suscipit", "laboriosam", "nisi", "aliquid", "ex",
    "ea", "commodi", "autem", "vel", "eum", "iure", "reprehenderit", "in", "voluptate", "esse",
    "quam", "nihil", "molestiae", "iusto", "odio", "dignissimos", "ducimus", "blanditiis",
    "praesentium", "laudantium", "totam", "rem", "voluptatum", "deleniti", "atque", "corrupti",
];

const GERMAN_WORDS: &[&str] = &[
    "abend", "bühne", "konzert", "stadt", "musik", "freunde", "sommer", "winter", "platz", "halle",
    "besucher", "programm", "karten", "eintritt", "gäste", "woche", "nacht", "tag", "fest", "kunst",
    "kultur", "theater", "lesung", "markt", "garten", "straße", "haus", "zeit", "jahr", "leute",
    "und", "mit", "für", "auf", "unter", "neben", "über", "nach", "vor", "bei", "laut", "leise",
    "groß", "klein", "neu", "alt", "schön", "bunt", "offen", "gemeinsam", "erleben", "feiern",
    "hören", "sehen", "tanzen", "singen", "spielen", "treffen", "entdecken", "genießen",
];

/// Random sentences and paragraphs for a locale.
///
/// A fixed seed makes every run produce the same text.
pub struct FakeContentGenerator {
    locale: String,
    rng: StdRng,
}

impl FakeContentGenerator {
    pub fn new(locale: &str, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            locale: locale.to_string(),
            rng,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn words(&self) -> &'static [&'static str] {
        if self.locale.to_lowercase().starts_with("de") {
            GERMAN_WORDS
        } else {
            LOREM_WORDS
        }
    }

    pub fn word(&mut self) -> &'static str {
        let words = self.words();
        words[self.rng.random_range(0..words.len())]
    }

    /// Around `word_count` words (±40 %), capitalised, ending with a period
    pub fn sentence(&mut self, word_count: usize) -> String {
        let word_count = self.vary(word_count.max(1));
        let words: Vec<&str> = (0..word_count).map(|_| self.word()).collect();
        let mut sentence = capitalize(&words.join(" "));
        sentence.push('.');
        sentence
    }

    pub fn sentences(&mut self, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| {
                let word_count = self.rng.random_range(4..=9);
                self.sentence(word_count)
            })
            .collect()
    }

    /// `count` sentences wrapped as `<p>…</p>` paragraphs
    pub fn paragraphs_html(&mut self, count: usize) -> String {
        format!("<p>{}</p>", self.sentences(count).join("</p><p>"))
    }

    /// Uniformly chosen element, `None` for an empty slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    fn vary(&mut self, count: usize) -> usize {
        let spread = (count * 40) / 100;
        if spread == 0 {
            return count;
        }
        self.rng.random_range(count - spread..=count + spread).max(1)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_shape() {
        let mut generator = FakeContentGenerator::new("en", Some(42));
        for _ in 0..50 {
            let sentence = generator.sentence(5);
            assert!(sentence.ends_with('.'));
            assert!(sentence.chars().next().unwrap().is_uppercase());
            let words = sentence.split_whitespace().count();
            assert!((3..=7).contains(&words), "{} words in {:?}", words, sentence);
        }
    }

    #[test]
    fn test_seed_is_deterministic() {
        let mut first = FakeContentGenerator::new("en", Some(7));
        let mut second = FakeContentGenerator::new("en", Some(7));
        assert_eq!(first.sentences(3), second.sentences(3));
        assert_eq!(first.paragraphs_html(2), second.paragraphs_html(2));
    }

    #[test]
    fn test_paragraphs_html() {
        let mut generator = FakeContentGenerator::new("en", Some(1));
        let html = generator.paragraphs_html(3);
        assert!(html.starts_with("<p>"));
        assert!(html.ends_with("</p>"));
        assert_eq!(html.matches("<p>").count(), 3);
    }

    #[test]
    fn test_german_locale_uses_german_words() {
        let mut generator = FakeContentGenerator::new("de_AT", Some(3));
        let word = generator.word();
        assert!(GERMAN_WORDS.contains(&word));
        assert_eq!(generator.locale(), "de_AT");
    }

    #[test]
    fn test_choose() {
        let mut generator = FakeContentGenerator::new("en", Some(9));
        let empty: [i64; 0] = [];
        assert_eq!(generator.choose(&empty), None);
        assert_eq!(generator.choose(&[7]), Some(&7));
    }

    #[test]
    fn test_capitalize_unicode() {
        assert_eq!(capitalize("über"), "Über");
        assert_eq!(capitalize(""), "");
    }
}
