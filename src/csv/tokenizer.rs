//! Line tokenizer: splits one CSV line into fields

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Delimiter, quote and escape characters used to split a line
///
/// None of the three need be distinct. `quote_char == escape_char` is the usual
/// CSV convention where a quote inside a quoted field is written twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TokenizerConfig {
    /// Field separator (default `,`)
    pub delimiter: char,
    /// Quote character (default `"`)
    pub quote_char: char,
    /// Escape character (default `"`, i.e. escape by doubling)
    pub escape_char: char,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote_char: '"',
            escape_char: '"',
        }
    }
}

impl TokenizerConfig {
    /// Create a config with all three characters given explicitly
    pub fn new(delimiter: char, quote_char: char, escape_char: char) -> Self {
        Self {
            delimiter,
            quote_char,
            escape_char,
        }
    }

    /// Whether the escape character is recognised at this point of the scan
    #[inline]
    fn escapes(&self, in_quotes: bool) -> bool {
        in_quotes || self.escape_char != self.quote_char
    }
}

/// Splits raw lines into fields
///
/// Splitting is total: every input yields at least one field and nothing
/// here can fail. Malformed quoting is tolerated:
///
/// - an unterminated quote makes the rest of the line literal text
/// - text on either side of a quoted section is kept (`ab"c,d"e` → `abc,de`)
/// - an escape character not followed by a quote is kept as text
///
/// With `escape_char == quote_char`, a doubled quote inside a quoted section
/// is always read as one literal quote before it can close the section, so
/// `"ab""` ends the line still quoted and yields `ab"`.
///
/// # Examples
///
/// ```
/// use streamcsv::csv::{Tokenizer, TokenizerConfig};
///
/// let tokenizer = Tokenizer::default();
/// assert_eq!(tokenizer.split(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
///
/// let backslash = Tokenizer::new(TokenizerConfig::new(',', '"', '\\'));
/// assert_eq!(backslash.split(r#"a,"b\"c",d"#), vec!["a", "b\"c", "d"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    /// Create a tokenizer for the given characters
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    /// The characters this tokenizer splits on
    pub fn config(&self) -> TokenizerConfig {
        self.config
    }

    /// Split one line (without its terminator) into fields
    pub fn split(&self, line: &str) -> Vec<String> {
        let TokenizerConfig {
            delimiter,
            quote_char,
            escape_char,
        } = self.config;

        let mut fields = Vec::new();
        let mut current_field = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        // Escape is checked before quote, quote before delimiter: a quoted
        // delimiter must never end a field.
        while let Some(ch) = chars.next() {
            if ch == escape_char
                && self.config.escapes(in_quotes)
                && chars.peek() == Some(&quote_char)
            {
                current_field.push(quote_char);
                chars.next();
            } else if ch == quote_char {
                in_quotes = !in_quotes;
            } else if ch == delimiter && !in_quotes {
                fields.push(std::mem::take(&mut current_field));
            } else {
                current_field.push(ch);
            }
        }

        fields.push(current_field);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backslash() -> Tokenizer {
        Tokenizer::new(TokenizerConfig::new(',', '"', '\\'))
    }

    #[test]
    fn test_simple() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.split("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_delimiter() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.split(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_doubled_quotes() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.split(r#"a,"b""c",d"#), vec!["a", r#"b"c"#, "d"]);
        assert_eq!(
            tokenizer.split(r#""Say ""Hello""",world"#),
            vec![r#"Say "Hello""#, "world"]
        );
    }

    #[test]
    fn test_backslash_escape() {
        assert_eq!(backslash().split(r#"a,"b\"c",d"#), vec!["a", r#"b"c"#, "d"]);
    }

    #[test]
    fn test_backslash_escape_outside_quotes() {
        assert_eq!(backslash().split(r#"a\"b,c"#), vec![r#"a"b"#, "c"]);
    }

    #[test]
    fn test_lone_escape_is_literal() {
        assert_eq!(backslash().split(r"C:\temp,x"), vec![r"C:\temp", "x"]);
        assert_eq!(backslash().split(r#""a\b",c"#), vec![r"a\b", "c"]);
        assert_eq!(backslash().split("trailing\\"), vec!["trailing\\"]);
    }

    #[test]
    fn test_empty_line() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.split(""), vec![""]);
    }

    #[test]
    fn test_empty_fields() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.split("a,,c"), vec!["a", "", "c"]);
        assert_eq!(tokenizer.split(",,"), vec!["", "", ""]);
        assert_eq!(tokenizer.split(",a"), vec!["", "a"]);
        assert_eq!(tokenizer.split("a,"), vec!["a", ""]);
    }

    #[test]
    fn test_quoted_empty() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.split(r#""","""#), vec!["", ""]);
    }

    #[test]
    fn test_text_around_quotes_is_kept() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.split(r#"ab"c,d"e,f"#), vec!["abc,de", "f"]);
    }

    #[test]
    fn test_unterminated_quote() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.split(r#"a,"b,c"#), vec!["a", "b,c"]);
        assert_eq!(tokenizer.split(r#"""#), vec![""]);
    }

    #[test]
    fn test_trailing_doubled_quote_stays_quoted() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.split(r#""ab"""#), vec![r#"ab""#]);
        assert_eq!(tokenizer.split(r#""ab"","c"#), vec![r#"ab",c"#]);
        assert_eq!(tokenizer.split(r#""ab",c"#), vec!["ab", "c"]);
    }

    #[test]
    fn test_custom_delimiter() {
        let tokenizer = Tokenizer::new(TokenizerConfig::new(';', '"', '"'));
        assert_eq!(tokenizer.split(r#"a;"b;c";d"#), vec!["a", "b;c", "d"]);
        assert_eq!(tokenizer.split("a,b;c"), vec!["a,b", "c"]);
    }

    #[test]
    fn test_custom_quote() {
        let tokenizer = Tokenizer::new(TokenizerConfig::new('\t', '\'', '\''));
        assert_eq!(tokenizer.split("'it''s'\t'x\ty'"), vec!["it's", "x\ty"]);
    }

    #[test]
    fn test_delimiter_equal_to_quote() {
        let tokenizer = Tokenizer::new(TokenizerConfig::new('|', '|', '\\'));
        assert_eq!(tokenizer.split("a|b|c"), vec!["abc"]);
    }

    #[test]
    fn test_escape_wins_over_delimiter() {
        let tokenizer = Tokenizer::new(TokenizerConfig::new(',', '"', ','));
        assert_eq!(tokenizer.split("a,\"b"), vec!["a\"b"]);
        // Not followed by a quote, it is still a delimiter
        assert_eq!(tokenizer.split("a,b"), vec!["a", "b"]);
    }

    #[test]
    fn test_multibyte_text() {
        let tokenizer = Tokenizer::default();
        assert_eq!(
            tokenizer.split("héllo,\"wörld, ünïcode\",日本"),
            vec!["héllo", "wörld, ünïcode", "日本"]
        );
    }

    #[test]
    fn test_bare_literal_is_unchanged() {
        let field = r#"already "stripped", value\with ; stuff"#;
        let tokenizer = Tokenizer::new(TokenizerConfig::new('\u{1}', '\u{2}', '\u{3}'));
        assert_eq!(tokenizer.split(field), vec![field]);
    }

    #[test]
    fn test_never_empty() {
        let configs = [
            TokenizerConfig::default(),
            TokenizerConfig::new(',', '"', '\\'),
            TokenizerConfig::new(',', ',', ','),
            TokenizerConfig::new('"', '"', '"'),
        ];
        let inputs = ["", ",", "\"", "\"\"", ",\",\\", "\\", "a\"\"\"b,,"];
        for config in configs {
            let tokenizer = Tokenizer::new(config);
            for input in inputs {
                assert!(!tokenizer.split(input).is_empty(), "{config:?} {input:?}");
            }
        }
    }

    #[test]
    fn test_field_count_matches_unquoted_delimiters() {
        let tokenizer = Tokenizer::default();
        let fields = tokenizer.split(r#"1,"2,3",4,"5""6",,7"#);
        assert_eq!(fields.len(), 6);
        assert_eq!(fields, vec!["1", "2,3", "4", r#"5"6"#, "", "7"]);
    }
}
