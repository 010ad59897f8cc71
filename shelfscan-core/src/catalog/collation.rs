//! Title collation
//!
//! Approximates the default Unicode collation for Latin titles, which is how a browser's
//! `localeCompare` orders them: compare letters ignoring case and accents first, then
//! accents, then case (lowercase first).

use std::cmp::Ordering;

/// Compare two titles for catalog ordering
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    primary(a)
        .cmp(&primary(b))
        .then_with(|| secondary(a).cmp(secondary(b)))
        .then_with(|| tertiary(a, b))
        .then_with(|| a.cmp(b))
}

/// Sort key for the primary level: (character class, base letter)
///
/// Whitespace and punctuation sort before digits, digits before letters. Ligatures and
/// letters like `ß` expand to the letter sequence they collate as.
fn primary(s: &str) -> Vec<(u8, char)> {
    let mut key = Vec::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match expansion(c) {
            Some(letters) => key.extend(letters.chars().map(|l| (2, l))),
            None => {
                let base = strip_accent(c);
                key.push((class_of(base), base));
            }
        }
    }
    key
}

fn class_of(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

/// Letters that collate as more than one base letter
fn expansion(c: char) -> Option<&'static str> {
    match c {
        'æ' | 'ǽ' | 'ǣ' => Some("ae"),
        'œ' => Some("oe"),
        'ß' => Some("ss"),
        'þ' => Some("th"),
        'ĳ' => Some("ij"),
        _ => None,
    }
}

fn secondary(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

fn tertiary(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) if x.to_lowercase().eq(y.to_lowercase()) => return Ordering::Less,
            (false, true) if x.to_lowercase().eq(y.to_lowercase()) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

/// Map an accented Latin letter to its base letter
fn strip_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' | 'ð' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => c,
    }
}
