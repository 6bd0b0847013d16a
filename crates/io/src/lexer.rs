//! Hand-rolled tokenizer for the IL text format (spec §4.1).
//!
//! Line-oriented like the format it lexes: a `Newline` token marks the end
//! of a top-level entry or an instruction, the same way the grammar's
//! "each [instruction] terminated by newline" reads. `;` starts a
//! line comment (not in spec.md's grammar sketch, but every textual-IR
//! dialect in the surrounding corpus carries one and the grammar never
//! claims `;` means anything else, so canonical output uses it for nothing
//! and the reader simply discards it).

use viper_il::{Anchor, Diagnostic};

#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    Ident(String),
    At(String),
    Percent(u32),
    Int(i64),
    Float(f64),
    Str(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Arrow,
    Eq,
    Newline,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokKind,
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

pub fn tokenize(src: &str) -> Result<Vec<Token>, Diagnostic> {
    let bytes = src.as_bytes();
    let mut i = 0usize;
    let mut line = 1u32;
    let mut col = 1u32;
    let mut out = Vec::new();

    macro_rules! push {
        ($kind:expr, $start_off:expr, $start_line:expr, $start_col:expr) => {
            out.push(Token {
                kind: $kind,
                offset: $start_off,
                line: $start_line,
                col: $start_col,
            })
        };
    }

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\r' => {
                i += 1;
                col += 1;
            }
            '\n' => {
                push!(TokKind::Newline, i, line, col);
                i += 1;
                line += 1;
                col = 1;
            }
            ';' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            '(' => {
                push!(TokKind::LParen, i, line, col);
                i += 1;
                col += 1;
            }
            ')' => {
                push!(TokKind::RParen, i, line, col);
                i += 1;
                col += 1;
            }
            '{' => {
                push!(TokKind::LBrace, i, line, col);
                i += 1;
                col += 1;
            }
            '}' => {
                push!(TokKind::RBrace, i, line, col);
                i += 1;
                col += 1;
            }
            ',' => {
                push!(TokKind::Comma, i, line, col);
                i += 1;
                col += 1;
            }
            ':' => {
                push!(TokKind::Colon, i, line, col);
                i += 1;
                col += 1;
            }
            '=' => {
                push!(TokKind::Eq, i, line, col);
                i += 1;
                col += 1;
            }
            '-' if bytes.get(i + 1) == Some(&b'>') => {
                push!(TokKind::Arrow, i, line, col);
                i += 2;
                col += 2;
            }
            '@' => {
                let (name, consumed) = read_ident(&bytes[i + 1..]);
                if name.is_empty() {
                    return Err(lex_error(i, line, col, "expected a name after '@'"));
                }
                push!(TokKind::At(name), i, line, col);
                i += 1 + consumed;
                col += 1 + consumed as u32;
            }
            '%' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && (bytes[end] as char).is_ascii_digit() {
                    end += 1;
                }
                if end == start {
                    return Err(lex_error(i, line, col, "expected a numeric id after '%'"));
                }
                let text = std::str::from_utf8(&bytes[start..end]).unwrap();
                let id: u32 = text
                    .parse()
                    .map_err(|_| lex_error(i, line, col, "SSA id does not fit in u32"))?;
                push!(TokKind::Percent(id), i, line, col);
                let consumed = (end - start) as u32;
                i = end;
                col += 1 + consumed;
            }
            '"' => {
                let (s, consumed) = read_string(&bytes[i..])
                    .map_err(|msg| lex_error(i, line, col, &msg))?;
                push!(TokKind::Str(s), i, line, col);
                i += consumed;
                col += consumed as u32;
            }
            c if c.is_ascii_digit() || (c == '-' && next_is_digit(bytes, i + 1)) => {
                let (kind, consumed) = read_number(&bytes[i..]);
                push!(kind, i, line, col);
                i += consumed;
                col += consumed as u32;
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '.' => {
                let (name, consumed) = read_ident(&bytes[i..]);
                push!(TokKind::Ident(name), i, line, col);
                i += consumed;
                col += consumed as u32;
            }
            other => {
                return Err(lex_error(i, line, col, &format!("unexpected character '{other}'")));
            }
        }
    }
    out.push(Token {
        kind: TokKind::Eof,
        offset: bytes.len(),
        line,
        col,
    });
    Ok(out)
}

fn next_is_digit(bytes: &[u8], i: usize) -> bool {
    bytes.get(i).is_some_and(|b| (*b as char).is_ascii_digit())
}

fn read_ident(bytes: &[u8]) -> (String, usize) {
    let mut end = 0;
    while end < bytes.len() {
        let c = bytes[end] as char;
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            end += 1;
        } else {
            break;
        }
    }
    (String::from_utf8_lossy(&bytes[..end]).into_owned(), end)
}

fn read_number(bytes: &[u8]) -> (TokKind, usize) {
    let mut end = 0;
    if bytes[0] == b'-' {
        end += 1;
    }
    let mut is_float = false;
    while end < bytes.len() {
        let c = bytes[end] as char;
        if c.is_ascii_digit() {
            end += 1;
        } else if (c == '.' || c == 'e' || c == 'E') && !is_float {
            is_float = true;
            end += 1;
            if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
                end += 1;
            }
        } else {
            break;
        }
    }
    let text = std::str::from_utf8(&bytes[..end]).unwrap();
    if is_float {
        (TokKind::Float(text.parse().unwrap_or(0.0)), end)
    } else {
        (TokKind::Int(text.parse().unwrap_or(0)), end)
    }
}

/// Reads a C-style-escaped string literal starting at `bytes[0] == '"'`.
/// Returns the decoded string and the number of source bytes consumed
/// (including both quotes).
fn read_string(bytes: &[u8]) -> Result<(String, usize), String> {
    let mut i = 1; // skip opening quote
    let mut s = String::new();
    loop {
        match bytes.get(i) {
            None => return Err("unterminated string literal".to_string()),
            Some(b'"') => {
                i += 1;
                break;
            }
            Some(b'\\') => {
                let esc = bytes.get(i + 1).copied().ok_or("dangling escape in string literal")?;
                let decoded = match esc {
                    b'n' => '\n',
                    b't' => '\t',
                    b'r' => '\r',
                    b'0' => '\0',
                    b'\\' => '\\',
                    b'"' => '"',
                    other => return Err(format!("unknown escape '\\{}'", other as char)),
                };
                s.push(decoded);
                i += 2;
            }
            Some(_) => {
                let start = i;
                while !matches!(bytes.get(i), None | Some(b'"') | Some(b'\\')) {
                    i += 1;
                }
                let chunk = std::str::from_utf8(&bytes[start..i])
                    .map_err(|_| "invalid utf-8 in string literal".to_string())?;
                s.push_str(chunk);
            }
        }
    }
    Ok((s, i))
}

fn lex_error(offset: usize, line: u32, col: u32, message: &str) -> Diagnostic {
    Diagnostic::error(Anchor::Source { offset, line, col }, message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_a_call_instruction() {
        let toks = kinds("call @X(1)\n");
        assert_eq!(
            toks,
            vec![
                TokKind::Ident("call".into()),
                TokKind::At("X".into()),
                TokKind::LParen,
                TokKind::Int(1),
                TokKind::RParen,
                TokKind::Newline,
                TokKind::Eof,
            ]
        );
    }

    #[test]
    fn dotted_opcode_mnemonics_are_single_identifiers() {
        let toks = kinds("sdiv.chk0");
        assert_eq!(toks[0], TokKind::Ident("sdiv.chk0".into()));
    }

    #[test]
    fn strings_decode_escapes() {
        let toks = kinds("\"a\\nb\"");
        assert_eq!(toks[0], TokKind::Str("a\nb".to_string()));
    }

    #[test]
    fn strings_preserve_multibyte_utf8() {
        let toks = kinds("\"caf\u{e9} \u{1f600}\"");
        assert_eq!(toks[0], TokKind::Str("caf\u{e9} \u{1f600}".to_string()));
    }

    #[test]
    fn negative_integers_lex_as_one_token() {
        let toks = kinds("-7");
        assert_eq!(toks[0], TokKind::Int(-7));
    }

    #[test]
    fn unterminated_string_is_a_lex_error() {
        assert!(tokenize("\"abc").is_err());
    }
}
