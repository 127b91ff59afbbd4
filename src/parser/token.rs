//! Tokenizer for CMake language files.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Unknown,
    Identifier,
    /// Quoted `"..."` or bracket `[[...]]` argument; value holds the content
    String,
    LeftParen,
    RightParen,
    /// `# ...` to end of line, or a bracket comment `#[[...]]`
    Comment,
    /// One whitespace character
    Space,
    /// `${NAME}` reference, value holds the full text
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub start: usize,
    /// Length in bytes of the source text
    pub len: usize,
    /// 1-based line of the first character
    pub line: usize,
    pub value: String,
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    /// `[[`, `[=[`, `[==[` ... at the current position; returns the `=` count.
    fn bracket_open(&self) -> Option<usize> {
        let rest = self.rest().strip_prefix('[')?;
        let eqs = rest.chars().take_while(|&c| c == '=').count();
        rest[eqs..].starts_with('[').then_some(eqs)
    }

    /// Consume a bracket block whose opener is at the current position and
    /// return its content. Runs to end of input when unterminated.
    fn bracket_body(&mut self, eqs: usize) -> String {
        for _ in 0..eqs + 2 {
            self.bump();
        }
        let close = format!("]{}]", "=".repeat(eqs));
        let body_start = self.pos;
        let body_end = match self.rest().find(&close) {
            Some(offset) => body_start + offset,
            None => self.src.len(),
        };
        while self.pos < body_end {
            self.bump();
        }
        if self.rest().starts_with(&close) {
            self.pos += close.len();
        }
        self.src[body_start..body_end].to_string()
    }

    fn quoted(&mut self) -> String {
        self.bump();
        let mut value = String::new();
        while let Some(c) = self.bump() {
            match c {
                '"' => break,
                '\\' => match self.bump() {
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => value.push('\\'),
                },
                c => value.push(c),
            }
        }
        value
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let c = self.peek()?;
        let start = self.pos;
        let line = self.line;
        let mut value = None;

        let kind = match c {
            '#' => {
                self.bump();
                if let Some(eqs) = self.bracket_open() {
                    value = Some(self.bracket_body(eqs));
                } else {
                    self.eat_while(|c| c != '\n');
                    value = Some(self.src[start..self.pos].to_string());
                    // newline ends the comment and isn't part of it
                    self.bump();
                }
                TokenKind::Comment
            }
            '(' => {
                self.bump();
                TokenKind::LeftParen
            }
            ')' => {
                self.bump();
                TokenKind::RightParen
            }
            ' ' | '\t' | '\r' | '\n' => {
                self.bump();
                TokenKind::Space
            }
            '"' => {
                value = Some(self.quoted());
                TokenKind::String
            }
            '[' if self.bracket_open().is_some() => {
                let eqs = self.bracket_open().unwrap_or(0);
                value = Some(self.bracket_body(eqs));
                TokenKind::String
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
                TokenKind::Identifier
            }
            '$' => {
                self.bump();
                if self.peek() == Some('{') {
                    self.bump();
                    self.eat_while(|c| c.is_ascii_alphanumeric() || "_./-+".contains(c));
                    if self.peek() == Some('}') {
                        self.bump();
                    }
                    TokenKind::Variable
                } else {
                    TokenKind::Unknown
                }
            }
            '\\' => {
                // escape sequence: keep both characters together
                self.bump();
                self.bump();
                TokenKind::Unknown
            }
            _ => {
                self.bump();
                TokenKind::Unknown
            }
        };

        let len = self.pos - start;
        let value = value.unwrap_or_else(|| self.src[start..self.pos].to_string());

        Some(Token {
            kind,
            start,
            len,
            line,
            value,
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

pub fn tokenize(src: &str) -> Vec<Token> {
    Lexer::new(src).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(src: &str) -> Vec<(TokenKind, std::string::String)> {
        tokenize(src)
            .into_iter()
            .map(|t| (t.kind, t.value))
            .collect()
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(
            kinds("set(A 1)"),
            vec![
                (Identifier, "set".into()),
                (LeftParen, "(".into()),
                (Identifier, "A".into()),
                (Space, " ".into()),
                (Unknown, "1".into()),
                (RightParen, ")".into()),
            ]
        );
    }

    #[test]
    fn test_comment_excludes_newline() {
        let tokens = tokenize("# hello\nx");
        assert_eq!(tokens[0].kind, Comment);
        assert_eq!(tokens[0].value, "# hello");
        assert_eq!(tokens[1].kind, Identifier);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_variable_reference() {
        assert_eq!(kinds("${FOO_1}"), vec![(Variable, "${FOO_1}".into())]);
        // unterminated reference stops at the first foreign character
        assert_eq!(
            kinds("${A "),
            vec![(Variable, "${A".into()), (Space, " ".into())]
        );
        assert_eq!(kinds("$x")[0], (Unknown, "$".into()));
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(
            kinds(r#""a \"b\" c""#),
            vec![(String, r#"a "b" c"#.into())]
        );
        let tokens = tokenize("\"abc");
        assert_eq!(tokens[0].value, "abc");
        assert_eq!(tokens[0].len, 4);
    }

    #[test]
    fn test_bracket_argument_and_comment() {
        assert_eq!(
            kinds("[=[a ]] b]=]"),
            vec![(String, "a ]] b".into())]
        );
        let tokens = tokenize("#[[ multi\nline ]]x");
        assert_eq!(tokens[0].kind, Comment);
        assert_eq!(tokens[0].value, " multi\nline ");
        assert_eq!(tokens[1].value, "x");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("ab (c)");
        assert_eq!((tokens[0].start, tokens[0].len), (0, 2));
        assert_eq!((tokens[2].start, tokens[2].len), (3, 1));
    }

    #[test]
    fn test_escape_is_one_token() {
        assert_eq!(kinds(r"\;"), vec![(Unknown, r"\;".into())]);
    }

    #[test]
    fn test_underscore_starts_identifier() {
        assert_eq!(
            kinds("_helper(_x)"),
            vec![
                (Identifier, "_helper".into()),
                (LeftParen, "(".into()),
                (Identifier, "_x".into()),
                (RightParen, ")".into()),
            ]
        );
    }

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(kinds(r#""C:\\dir""#), vec![(String, r"C:\dir".into())]);
        // anything else after a backslash stays as written
        assert_eq!(kinds(r#""a\nb\;c""#), vec![(String, r"a\nb\;c".into())]);
    }
}
