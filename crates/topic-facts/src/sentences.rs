//! Rule-based sentence splitting for Portuguese news text.

/// Abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "dr", "dra", "sr", "sra", "srta", "prof", "profa", "exmo", "exma", "av", "art", "nº", "no",
    "pág", "etc",
];

const MIN_SENTENCE_CHARS: usize = 10;

/// Split text into sentences on `.`, `!` and `?`.
///
/// A period does not split when the preceding word is a known
/// abbreviation or when the next character is alphanumeric (decimals,
/// ordinals, URLs). Fragments shorter than 10 characters are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let boundary = match c {
            '!' | '?' => true,
            '.' => {
                let next_alnum = chars.peek().map_or(false, |n| n.is_alphanumeric());
                !next_alnum && !ends_with_abbreviation(&current)
            }
            _ => false,
        };
        if boundary {
            push_sentence(&mut sentences, &current);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.chars().count() >= MIN_SENTENCE_CHARS {
        sentences.push(trimmed.to_string());
    }
}

/// True when the text ends in "<abbreviation>." for a known entry.
fn ends_with_abbreviation(text: &str) -> bool {
    let before_dot = text.strip_suffix('.').unwrap_or(text);
    let word: String = before_dot
        .chars()
        .rev()
        .take_while(|c| c.is_alphanumeric() || *c == 'º' || *c == 'ª')
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}
