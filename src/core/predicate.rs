//! Rewrites comparison-predicate queries into the `mdfind` query language.
//!
//! Queries are accepted in the format-string predicate grammar
//! (`AND`/`OR`/`NOT`, `CONTAINS[c]`, `BEGINSWITH`, `ENDSWITH`, `LIKE`,
//! single-quoted strings, `[cd]` modifiers) as well as in native `mdfind`
//! syntax. Only the constructs `mdfind` does not understand are rewritten;
//! everything else, whitespace included, is copied through as written.

use super::PredicateError;

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct PredicateToken<'a> {
    kind: PredicateTokenKind<'a>,
    /// Whitespace between the previous token and this one.
    leading: &'a str,
    /// The token exactly as it appears in the input.
    source: &'a str,
    position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PredicateTokenKind<'a> {
    /// Attribute name, keyword, number or function call name.
    Word {
        text: &'a str,
        modifier: Option<&'a str>,
    },
    /// Run of `=!<>&|` characters.
    Operator {
        text: &'a str,
        modifier: Option<&'a str>,
    },
    /// Quoted string with any trailing `mdfind` flags (`"x"cd`).
    Literal {
        quote: char,
        body: &'a str,
        flags: &'a str,
    },
    LParen,
    RParen,
}

/// How a string operator shapes the literal that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchShape {
    Exact,
    Like,
    Contains,
    BeginsWith,
    EndsWith,
}

impl MatchShape {
    fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "CONTAINS" => Some(Self::Contains),
            "BEGINSWITH" => Some(Self::BeginsWith),
            "ENDSWITH" => Some(Self::EndsWith),
            "LIKE" => Some(Self::Like),
            _ => None,
        }
    }

    fn apply(self, body: &str) -> String {
        match self {
            Self::Exact | Self::Like => body.to_string(),
            Self::Contains => format!("*{}*", escape_wildcards(body)),
            Self::BeginsWith => format!("{}*", escape_wildcards(body)),
            Self::EndsWith => format!("*{}", escape_wildcards(body)),
        }
    }
}

/// A rewrite waiting for the next string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingMatch {
    shape: MatchShape,
    flags: String,
}

// ---------------------------------------------------------------------------
// Rewriting
// ---------------------------------------------------------------------------

/// Translates `predicate` into a query `mdfind` accepts.
///
/// A predicate that cannot be tokenized (for example one with an unbalanced
/// quote) is returned unchanged so the backend reports the problem itself.
pub fn to_mdfind_query(predicate: &str) -> String {
    match tokenize_predicate(predicate) {
        Ok(tokens) => render_tokens(predicate, &tokens),
        Err(e) => {
            tracing::debug!("Leaving predicate untranslated: {}", e);
            predicate.to_string()
        }
    }
}

fn render_tokens(input: &str, tokens: &[PredicateToken<'_>]) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    let mut pending: Option<PendingMatch> = None;

    for (index, token) in tokens.iter().enumerate() {
        out.push_str(token.leading);
        let next_is_literal = matches!(
            tokens.get(index + 1).map(|t| &t.kind),
            Some(PredicateTokenKind::Literal { .. })
        );

        match &token.kind {
            PredicateTokenKind::Word { text, modifier } => {
                match MatchShape::from_keyword(text).filter(|_| next_is_literal) {
                    Some(shape) => {
                        out.push_str("==");
                        pending = Some(PendingMatch {
                            shape,
                            flags: modifier_flags(*modifier),
                        });
                    }
                    None => out.push_str(keyword_replacement(text).unwrap_or(token.source)),
                }
            }
            PredicateTokenKind::Operator { text, modifier } => {
                out.push_str(operator_replacement(text));
                if modifier.is_some() && next_is_literal {
                    pending = Some(PendingMatch {
                        shape: MatchShape::Exact,
                        flags: modifier_flags(*modifier),
                    });
                }
            }
            PredicateTokenKind::Literal { quote, body, flags } => {
                match pending.take() {
                    None if *quote == '"' => out.push_str(token.source),
                    rewrite => out.push_str(&render_literal(*quote, body, flags, rewrite)),
                }
            }
            PredicateTokenKind::LParen | PredicateTokenKind::RParen => {
                out.push_str(token.source)
            }
        }
    }

    if let Some(last) = tokens.last() {
        out.push_str(&input[last.position + last.source.len()..]);
    } else {
        out.push_str(input);
    }
    out
}

fn keyword_replacement(word: &str) -> Option<&'static str> {
    match word.to_ascii_uppercase().as_str() {
        "AND" => Some("&&"),
        "OR" => Some("||"),
        "NOT" => Some("!"),
        "TRUE" | "YES" => Some("1"),
        "FALSE" | "NO" => Some("0"),
        _ => None,
    }
}

fn operator_replacement(operator: &str) -> &str {
    match operator {
        "=" => "==",
        "=<" => "<=",
        "=>" => ">=",
        "<>" => "!=",
        other => other,
    }
}

/// Keeps the modifier letters `mdfind` also understands.
fn modifier_flags(modifier: Option<&str>) -> String {
    modifier
        .unwrap_or_default()
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| matches!(c, 'c' | 'd'))
        .collect()
}

fn render_literal(quote: char, body: &str, flags: &str, rewrite: Option<PendingMatch>) -> String {
    let body = if quote == '\'' {
        requote_single(body)
    } else {
        body.to_string()
    };

    let mut flags = flags.to_string();
    let body = match rewrite {
        Some(rewrite) => {
            for flag in rewrite.flags.chars() {
                if !flags.contains(flag) {
                    flags.push(flag);
                }
            }
            rewrite.shape.apply(&body)
        }
        None => body,
    };
    format!("\"{}\"{}", body, flags)
}

/// Turns the body of a `'...'` literal into the body of a `"..."` literal.
fn requote_single(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

fn escape_wildcards(body: &str) -> String {
    body.replace('*', "\\*")
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

fn is_operator_char(ch: char) -> bool {
    matches!(ch, '=' | '!' | '<' | '>' | '&' | '|')
}

fn ends_word(ch: char) -> bool {
    ch.is_whitespace() || is_operator_char(ch) || matches!(ch, '(' | ')' | '"' | '\'' | '[')
}

fn tokenize_predicate(input: &str) -> Result<Vec<PredicateToken<'_>>, PredicateError> {
    let mut tokens = Vec::new();
    let mut cursor = 0usize;
    let mut leading_start = 0usize;

    while let Some(ch) = input[cursor..].chars().next() {
        if ch.is_whitespace() {
            cursor += ch.len_utf8();
            continue;
        }

        let position = cursor;
        let kind = match ch {
            '(' => {
                cursor += 1;
                PredicateTokenKind::LParen
            }
            ')' => {
                cursor += 1;
                PredicateTokenKind::RParen
            }
            '"' | '\'' => {
                let (body, after_quote) = consume_quoted(input, cursor, ch)?;
                let flags_len = input[after_quote..]
                    .chars()
                    .take_while(|c| matches!(c, 'c' | 'd' | 'w' | 't'))
                    .count();
                cursor = after_quote + flags_len;
                PredicateTokenKind::Literal {
                    quote: ch,
                    body,
                    flags: &input[after_quote..cursor],
                }
            }
            _ if is_operator_char(ch) => {
                let len: usize = input[cursor..]
                    .chars()
                    .take_while(|c| is_operator_char(*c))
                    .map(char::len_utf8)
                    .sum();
                let text = &input[cursor..cursor + len];
                cursor += len;
                let modifier = consume_modifier(input, &mut cursor)?;
                PredicateTokenKind::Operator { text, modifier }
            }
            _ => {
                // The first character always belongs to the word, so a stray
                // `[` cannot stall the cursor.
                let len: usize = ch.len_utf8()
                    + input[cursor + ch.len_utf8()..]
                        .chars()
                        .take_while(|c| !ends_word(*c))
                        .map(char::len_utf8)
                        .sum::<usize>();
                let text = &input[cursor..cursor + len];
                cursor += len;
                let modifier = consume_modifier(input, &mut cursor)?;
                PredicateTokenKind::Word { text, modifier }
            }
        };

        tokens.push(PredicateToken {
            kind,
            leading: &input[leading_start..position],
            source: &input[position..cursor],
            position,
        });
        leading_start = cursor;
    }

    Ok(tokens)
}

/// Returns the literal body and the byte offset just past the closing quote.
fn consume_quoted(input: &str, start: usize, quote: char) -> Result<(&str, usize), PredicateError> {
    let body_start = start + quote.len_utf8();
    let mut escaped = false;
    for (offset, ch) in input[body_start..].char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            let end = body_start + offset;
            return Ok((&input[body_start..end], end + quote.len_utf8()));
        }
    }
    Err(PredicateError::UnterminatedString(start))
}

/// Consumes a `[...]` modifier directly after a word or operator.
fn consume_modifier<'a>(
    input: &'a str,
    cursor: &mut usize,
) -> Result<Option<&'a str>, PredicateError> {
    if !input[*cursor..].starts_with('[') {
        return Ok(None);
    }
    let start = *cursor;
    match input[start..].find(']') {
        Some(close) => {
            *cursor = start + close + 1;
            Ok(Some(&input[start + 1..start + close]))
        }
        None => Err(PredicateError::UnterminatedModifier(start)),
    }
}
