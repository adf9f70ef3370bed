#![forbid(unsafe_code)]

//! Accessor-name synthesis helpers.

/// Upper-case the first character of `name`, leaving the rest untouched.
///
/// Multi-character upper-case mappings (e.g. `ß` -> `SS`) are kept whole.
/// An empty input yields an empty string.
#[must_use]
pub fn capitalize_first_letter(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_ascii() {
        assert_eq!(capitalize_first_letter("todo"), "Todo");
        assert_eq!(capitalize_first_letter("Todo"), "Todo");
        assert_eq!(capitalize_first_letter("x"), "X");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(capitalize_first_letter(""), "");
    }

    #[test]
    fn only_first_char_changes() {
        assert_eq!(capitalize_first_letter("userProfile"), "UserProfile");
        assert_eq!(capitalize_first_letter("1st"), "1st");
    }

    #[test]
    fn unicode_first_char() {
        assert_eq!(capitalize_first_letter("élan"), "Élan");
        assert_eq!(capitalize_first_letter("ßtore"), "SStore");
    }
}
