/// Split text into terms on Unicode whitespace.
///
/// No case folding, stemming or stopword removal: a term is exactly the
/// character run between whitespace, so `Rust`, `rust` and `rust,` are three
/// different terms.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split_whitespace()
}
