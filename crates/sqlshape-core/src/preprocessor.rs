//! Rewrites `${name}` placeholders to positional `$n` markers, per §4.1.

use thiserror::Error;

/// A malformed `${…}` placeholder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed placeholder at offset {offset}: {message}")]
pub struct PreprocessorError {
    pub offset: usize,
    pub message: String,
}

/// The preprocessor's output: the rewritten SQL (with `${name}` replaced by
/// `$k`) and the ordered list of distinct parameter names, index `i`
/// (0-based in the vector) corresponding to `$  {i + 1}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    pub rewritten_sql: String,
    pub parameter_names: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    InString,
    InQuotedIdent,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Rewrites `sql`'s `${name}` placeholders into `$1, $2, …`, assigning
/// indices in first-appearance order and reusing the same index for every
/// repeated occurrence of a name.
///
/// # Errors
///
/// Returns [`PreprocessorError`] if a `${` is not followed by a valid
/// identifier and a closing `}`.
pub fn preprocess(sql: &str) -> Result<Preprocessed, PreprocessorError> {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut names: Vec<String> = Vec::new();
    let mut mode = Mode::Normal;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        match mode {
            Mode::Normal => match c {
                '\'' => {
                    mode = Mode::InString;
                    out.push(c);
                    i += 1;
                }
                '"' => {
                    mode = Mode::InQuotedIdent;
                    out.push(c);
                    i += 1;
                }
                '$' if chars.get(i + 1) == Some(&'{') => {
                    let start = i;
                    let mut j = i + 2;
                    let ident_start = j;
                    if j >= chars.len() || !is_ident_start(chars[j]) {
                        return Err(PreprocessorError {
                            offset: start,
                            message: "expected identifier after '${'".into(),
                        });
                    }
                    while j < chars.len() && is_ident_continue(chars[j]) {
                        j += 1;
                    }
                    let ident: String = chars[ident_start..j].iter().collect();
                    if chars.get(j) != Some(&'}') {
                        return Err(PreprocessorError {
                            offset: start,
                            message: format!("unterminated placeholder '${{{ident}'"),
                        });
                    }
                    let index = match names.iter().position(|n| n == &ident) {
                        Some(pos) => pos + 1,
                        None => {
                            names.push(ident);
                            names.len()
                        }
                    };
                    out.push('$');
                    out.push_str(&index.to_string());
                    i = j + 1;
                }
                _ => {
                    out.push(c);
                    i += 1;
                }
            },
            Mode::InString => {
                out.push(c);
                if c == '\\' {
                    if let Some(&next) = chars.get(i + 1) {
                        out.push(next);
                        i += 2;
                        continue;
                    }
                } else if c == '\'' {
                    mode = Mode::Normal;
                }
                i += 1;
            }
            Mode::InQuotedIdent => {
                out.push(c);
                if c == '\\' {
                    if let Some(&next) = chars.get(i + 1) {
                        out.push(next);
                        i += 2;
                        continue;
                    }
                } else if c == '"' {
                    mode = Mode::Normal;
                }
                i += 1;
            }
        }
    }

    Ok(Preprocessed {
        rewritten_sql: out,
        parameter_names: names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_placeholder() {
        let p = preprocess("SELECT * FROM t WHERE id = ${id}").unwrap();
        assert_eq!(p.rewritten_sql, "SELECT * FROM t WHERE id = $1");
        assert_eq!(p.parameter_names, vec!["id"]);
    }

    #[test]
    fn test_repeated_name_reuses_index() {
        let p = preprocess("WHERE a = ${x} OR b = ${x}").unwrap();
        assert_eq!(p.rewritten_sql, "WHERE a = $1 OR b = $1");
        assert_eq!(p.parameter_names, vec!["x"]);
    }

    #[test]
    fn test_first_appearance_order() {
        let p = preprocess("${b} ${a} ${b} ${c}").unwrap();
        assert_eq!(p.rewritten_sql, "$1 $2 $1 $3");
        assert_eq!(p.parameter_names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_placeholder_inside_string_literal_untouched() {
        let p = preprocess("SELECT '${not_a_param}' WHERE x = ${real}").unwrap();
        assert_eq!(p.rewritten_sql, "SELECT '${not_a_param}' WHERE x = $1");
        assert_eq!(p.parameter_names, vec!["real"]);
    }

    #[test]
    fn test_placeholder_inside_quoted_identifier_untouched() {
        let p = preprocess(r#"SELECT "col${x}" FROM t"#).unwrap();
        assert_eq!(p.rewritten_sql, r#"SELECT "col${x}" FROM t"#);
        assert!(p.parameter_names.is_empty());
    }

    #[test]
    fn test_literal_dollar_n_preserved() {
        let p = preprocess("SELECT $1 WHERE x = ${y}").unwrap();
        assert_eq!(p.rewritten_sql, "SELECT $1 WHERE x = $1");
        assert_eq!(p.parameter_names, vec!["y"]);
    }

    #[test]
    fn test_escaped_quote_inside_string_does_not_end_it() {
        let p = preprocess(r"SELECT 'it\'s ${x}' WHERE y = ${z}").unwrap();
        assert_eq!(p.rewritten_sql, r"SELECT 'it\'s ${x}' WHERE y = $1");
        assert_eq!(p.parameter_names, vec!["z"]);
    }

    #[test]
    fn test_malformed_placeholder_missing_identifier() {
        let err = preprocess("WHERE x = ${}").unwrap_err();
        assert_eq!(err.offset, 10);
    }

    #[test]
    fn test_malformed_placeholder_unterminated() {
        let err = preprocess("WHERE x = ${id").unwrap_err();
        assert_eq!(err.offset, 10);
    }
}
