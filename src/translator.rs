//! Text to Morse translation
//!
//! Characters are ASCII case-folded and looked up in the International Morse
//! table (a-z, 0-9). Anything else shows up as `#` in textual output and is
//! silently skipped when playing audio.

use std::thread;
use std::time::Duration;

use crate::audio::ToneSink;
use crate::error::Result;
use crate::player::{MorseSymbol, TonePlayer};

/// Marker written in place of characters with no Morse encoding
pub const UNKNOWN_MARKER: &str = "#";

/// Default pitch of the translator's tones
pub const DEFAULT_FREQUENCY_HZ: f64 = 500.0;

/// Default dot length
pub const DEFAULT_DURATION_MS: i64 = 100;

/// Silence lengths in dot units
const SYMBOL_GAP: u64 = 1;
const CHAR_GAP: u64 = 3;
const WORD_GAP: u64 = 7;

/// Look up the dot/dash code of a character, ignoring case
pub fn morse_for(c: char) -> Option<&'static str> {
    let code = match c.to_ascii_lowercase() {
        'a' => ".-",
        'b' => "-...",
        'c' => "-.-.",
        'd' => "-..",
        'e' => ".",
        'f' => "..-.",
        'g' => "--.",
        'h' => "....",
        'i' => "..",
        'j' => ".---",
        'k' => "-.-",
        'l' => ".-..",
        'm' => "--",
        'n' => "-.",
        'o' => "---",
        'p' => ".--.",
        'q' => "--.-",
        'r' => ".-.",
        's' => "...",
        't' => "-",
        'u' => "..-",
        'v' => "...-",
        'w' => ".--",
        'x' => "-..-",
        'y' => "-.--",
        'z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        _ => return None,
    };
    Some(code)
}

/// Textual Morse encoding of `words`
///
/// Characters are separated by a space and words by `" / "`.
pub fn to_code<W: AsRef<str>>(words: &[W]) -> String {
    words
        .iter()
        .map(|word| {
            word.as_ref()
                .chars()
                .map(|c| morse_for(c).unwrap_or(UNKNOWN_MARKER))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Translates words to Morse text or audio
pub struct Translator<S: ToneSink> {
    player: TonePlayer<S>,
}

impl<S: ToneSink> Translator<S> {
    /// Create a translator playing through `sink`
    ///
    /// Fails with [`Error::InvalidConfig`](crate::Error::InvalidConfig) if
    /// the frequency or dot duration is not strictly positive.
    pub fn new(sink: S, frequency_hz: f64, dot_duration_ms: i64) -> Result<Self> {
        Ok(Self {
            player: TonePlayer::new(sink, frequency_hz, dot_duration_ms)?,
        })
    }

    /// Create a translator with the default pitch and speed
    pub fn with_defaults(sink: S) -> Result<Self> {
        Self::new(sink, DEFAULT_FREQUENCY_HZ, DEFAULT_DURATION_MS)
    }

    pub fn player(&self) -> &TonePlayer<S> {
        &self.player
    }

    pub fn to_code<W: AsRef<str>>(&self, words: &[W]) -> String {
        to_code(words)
    }

    /// Play `words` as Morse audio, blocking until done
    pub fn to_audio<W: AsRef<str>>(&self, words: &[W]) {
        for word in words {
            let word = word.as_ref();
            log::debug!("Playing '{}'", word);
            for c in word.chars() {
                if let Some(code) = morse_for(c) {
                    for symbol in code.chars().filter_map(MorseSymbol::from_char) {
                        self.player.play(symbol);
                        self.pause(SYMBOL_GAP);
                    }
                }
                self.pause(CHAR_GAP);
            }
            self.pause(WORD_GAP);
        }
    }

    fn pause(&self, units: u64) {
        thread::sleep(Duration::from_millis(self.player.dot_duration() * units));
    }
}
