//! Running transcript of spelled words

use std::collections::VecDeque;

use super::{WordEvent, WordSink};

/// Keeps the most recent finalized words plus the word being spelled
#[derive(Debug, Clone)]
pub struct Transcript {
    words: VecDeque<String>,
    max_words: usize,
    partial: String,
}

impl Transcript {
    pub fn new(max_words: usize) -> Self {
        Self {
            words: VecDeque::with_capacity(max_words),
            max_words,
            partial: String::new(),
        }
    }

    /// Finalized words joined by spaces
    pub fn sentence(&self) -> String {
        self.words
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Letters of the word still being spelled
    pub fn partial(&self) -> &str {
        &self.partial
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl WordSink for Transcript {
    fn handle(&mut self, event: &WordEvent) {
        match event {
            WordEvent::LetterAppended { letter } => self.partial.push_str(letter),
            WordEvent::WordFinalized { word } => {
                self.partial.clear();
                if self.max_words == 0 {
                    return;
                }
                if self.words.len() == self.max_words {
                    self.words.pop_front();
                }
                self.words.push_back(word.clone());
            }
            WordEvent::WordCleared { .. } => self.partial.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(l: &str) -> WordEvent {
        WordEvent::LetterAppended {
            letter: l.to_string(),
        }
    }

    fn finalized(w: &str) -> WordEvent {
        WordEvent::WordFinalized {
            word: w.to_string(),
        }
    }

    #[test]
    fn test_partial_and_sentence() {
        let mut t = Transcript::new(8);
        t.handle(&letter("H"));
        t.handle(&letter("I"));
        assert_eq!(t.partial(), "HI");
        assert_eq!(t.sentence(), "");

        t.handle(&finalized("HI"));
        assert_eq!(t.partial(), "");
        t.handle(&finalized("YOU"));
        assert_eq!(t.sentence(), "HI YOU");
    }

    #[test]
    fn test_bounded_history() {
        let mut t = Transcript::new(2);
        for w in ["A", "B", "C"] {
            t.handle(&finalized(w));
        }
        assert_eq!(t.words().collect::<Vec<_>>(), vec!["B", "C"]);
    }

    #[test]
    fn test_cleared_drops_partial() {
        let mut t = Transcript::new(2);
        t.handle(&letter("Q"));
        t.handle(&WordEvent::WordCleared {
            word: "Q".to_string(),
        });
        assert_eq!(t.partial(), "");
        assert_eq!(t.sentence(), "");
    }
}
