use std::sync::LazyLock;

use regex::Regex;

static NON_ASCII: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\x00-\x7F]+").unwrap() // the pattern is a constant
});
static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ -]+").unwrap());

/// Folds Polish diacritics to their ASCII base letter. Any other non-ASCII
/// character is left for [`NON_ASCII`] to drop.
fn fold_diacritic(c: char) -> char {
    match c {
        'ą' => 'a',
        'ć' => 'c',
        'ę' => 'e',
        'ł' => 'l',
        'ń' => 'n',
        'ó' => 'o',
        'ś' => 's',
        'ź' | 'ż' => 'z',
        'Ą' => 'A',
        'Ć' => 'C',
        'Ę' => 'E',
        'Ł' => 'L',
        'Ń' => 'N',
        'Ó' => 'O',
        'Ś' => 'S',
        'Ź' | 'Ż' => 'Z',
        _ => c,
    }
}

/// Turns a station display name into a stable ASCII identifier used as a
/// report key: fold diacritics, drop remaining non-ASCII characters, collapse
/// runs of spaces and hyphens into a single hyphen, lowercase.
pub fn slug(name: &str) -> String {
    let folded: String = name.chars().map(fold_diacritic).collect();
    let ascii = NON_ASCII.replace_all(&folded, "");
    SEPARATOR_RUN.replace_all(&ascii, "-").to_lowercase()
}
