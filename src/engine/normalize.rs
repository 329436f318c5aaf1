//! Text normalisation for book-name matching.
//!
//! Two forms are used:
//!
//! - [`normalize_text`]: diacritics stripped, lowercased, whitespace collapsed.
//!   `"  1  Împăraţi "` becomes `"1 imparati"`.
//! - `alnum_key`: the normalised form with everything but letters and digits
//!   removed, so `"1 Samuel"`, `"1-samuel"` and `"1samuel"` compare equal.
//!
//! Folding is table driven and covers the Latin ranges used by the corpus'
//! translations. Characters outside the table pass through unchanged.

/// Strip diacritics, lowercase and collapse runs of whitespace.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        match fold_char(c) {
            Fold::One(f) => out.push(f),
            Fold::Two(a, b) => {
                out.push(a);
                out.push(b);
            }
            Fold::Drop => {}
        }
    }

    out
}

/// Letters and digits of the normalised text.
pub(crate) fn alnum_key(text: &str) -> String {
    normalize_text(text).chars().filter(|c| c.is_alphanumeric()).collect()
}

enum Fold {
    One(char),
    Two(char, char),
    Drop,
}

/// Map one lowercase character to its unaccented form.
fn fold_char(c: char) -> Fold {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
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
        'ś' | 'ŝ' | 'ş' | 'š' | 'ș' => 's',
        'ţ' | 'ť' | 'ŧ' | 'ț' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        'ß' => return Fold::Two('s', 's'),
        'æ' => return Fold::Two('a', 'e'),
        'œ' => return Fold::Two('o', 'e'),
        // Combining diacritical marks (decomposed input).
        '\u{0300}'..='\u{036F}' => return Fold::Drop,
        other => other,
    };
    Fold::One(base)
}
