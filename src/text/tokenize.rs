/// Split `text` into words on runs of whitespace.
///
/// Pieces are trimmed and empty pieces dropped, so blank input yields an
/// empty vector. Pure function: the same input always gives the same words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(char::is_whitespace)
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}
