//! Keyword-in-context snippets.

pub const DEFAULT_WINDOW: usize = 50;

/// Context around the first query term (in query order, not text order) found
/// in `content` by case-insensitive substring search.
///
/// The snippet spans `window` characters either side of the match, clipped to
/// the content, with the matched span upper-cased and surrounding whitespace
/// trimmed. Returns an empty string when no term occurs.
pub fn extract<S: AsRef<str>>(content: &str, query_terms: &[S], window: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    let (lowered, origin) = lowercase_with_origin(&chars);

    for term in query_terms {
        let term = term.as_ref().to_lowercase();
        if term.is_empty() { continue; }
        if let Some(pos) = lowered.find(&term) {
            let start = origin[pos];
            let end = origin[pos + term.len() - 1] + 1;
            let from = start.saturating_sub(window);
            let to = (end + window).min(chars.len());

            let mut snippet = String::with_capacity(to - from);
            snippet.extend(&chars[from..start]);
            snippet.extend(chars[start..end].iter().flat_map(|c| c.to_uppercase()));
            snippet.extend(&chars[end..to]);
            return snippet.trim().to_string();
        }
    }
    String::new()
}

/// Lowercase `chars` exactly as `str::to_lowercase` does (so word-final `Σ`
/// becomes `ς`, matching the labeler and normalizer), recording for every byte
/// of the result the index of the source character it came from.
///
/// The only context-sensitive rule in `str::to_lowercase` picks between `σ`
/// and `ς`, which have the same UTF-8 length, so per-character lengths from
/// `char::to_lowercase` line up with the full-string result.
fn lowercase_with_origin(chars: &[char]) -> (String, Vec<usize>) {
    let lowered = chars.iter().collect::<String>().to_lowercase();
    let mut origin = Vec::with_capacity(lowered.len());
    for (i, c) in chars.iter().enumerate() {
        let len: usize = c.to_lowercase().map(char::len_utf8).sum();
        origin.extend(std::iter::repeat(i).take(len));
    }
    debug_assert_eq!(origin.len(), lowered.len());
    (lowered, origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_clipped_around_the_match() {
        let content = format!("{}rust{}", "a".repeat(100), "b".repeat(96));
        let snippet = extract(&content, &["rust"], 50);
        assert_eq!(snippet, format!("{}RUST{}", "a".repeat(50), "b".repeat(50)));
    }

    #[test]
    fn clips_at_content_bounds() {
        assert_eq!(extract("Rust is fun", &["rust"], 50), "RUST is fun");
        assert_eq!(extract("I like rust", &["rust"], 2), "e RUST");
    }

    #[test]
    fn first_query_term_wins_over_earlier_position() {
        let content = "alpha beta gamma";
        assert_eq!(extract(content, &["gamma", "alpha"], 3), "ta GAMMA");
    }

    #[test]
    fn missing_terms_give_empty_snippet() {
        assert_eq!(extract("nothing here", &["absent"], 50), "");
        assert_eq!(extract::<&str>("nothing here", &[], 50), "");
    }

    #[test]
    fn case_insensitive_and_multibyte_safe() {
        let content = "Ünïcode RUNNING café";
        assert_eq!(extract(content, &["run"], 3), "de RUNNIN");
        assert_eq!(extract(content, &["café"], 2), "G CAFÉ");
    }

    #[test]
    fn final_sigma_matches_like_the_normalizer() {
        let content = "Η ΟΔΟΣ είναι μακριά";
        let terms = crate::tokenizer::normalize("ΟΔΟΣ");
        assert_eq!(terms, vec!["οδος"]);
        assert_eq!(extract(content, &terms, 50), content);
        assert_eq!(extract(content, &terms, 2), "Η ΟΔΟΣ ε");
    }

    #[test]
    fn lowered_text_agrees_with_str_lowercase() {
        let text = "ΟΔΟΣ. ΣΑΣ Σ İstanbul";
        let chars: Vec<char> = text.chars().collect();
        let (lowered, origin) = lowercase_with_origin(&chars);
        assert_eq!(lowered, text.to_lowercase());
        assert_eq!(origin.len(), lowered.len());
    }
}
