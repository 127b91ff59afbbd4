//! `CMakeLists.txt` parser.
//!
//! Splits a CMake language file into command invocations and records which
//! variables it defines through `set()` and `option()`. Only the syntax is
//! understood; nothing is evaluated.

pub mod token;

pub use token::{Lexer, Token, TokenKind, tokenize};

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::iter::Peekable;
use std::path::{Path, PathBuf};

pub const CMAKELISTS_FILE: &str = "CMakeLists.txt";

/// One `name(arg arg ...)` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub arguments: Vec<String>,
    /// 1-based line of the command name
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A command name not followed by `(`
    ExpectedParen { name: String, line: usize },
    /// Input ended inside an argument list
    Unterminated { name: String, line: usize },
    /// Something other than a command at the top level
    UnexpectedToken { value: String, line: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::ExpectedParen { name, line } => {
                write!(f, "line {}: expected '(' after '{}'", line, name)
            }
            ParseError::Unterminated { name, line } => {
                write!(f, "line {}: missing ')' for '{}'", line, name)
            }
            ParseError::UnexpectedToken { value, line } => {
                write!(f, "line {}: unexpected '{}'", line, value)
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Default)]
pub struct CMakeParser {
    filename: Option<PathBuf>,
    commands: Vec<Command>,
    variables: BTreeSet<String>,
}

impl CMakeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last file given to [`parse_file`](Self::parse_file).
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Names defined by `set()` or `option()`, sorted.
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    pub fn clear(&mut self) {
        self.filename = None;
        self.commands.clear();
        self.variables.clear();
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<()> {
        self.clear();
        self.filename = Some(path.to_path_buf());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Unable to open {}", path.display()))?;

        self.parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse `content`, replacing previously parsed commands and variables.
    ///
    /// Commands before the error location are kept when parsing fails.
    pub fn parse(&mut self, content: &str) -> Result<(), ParseError> {
        self.commands.clear();
        self.variables.clear();

        let mut tokens = Lexer::new(content).peekable();

        while let Some(token) = tokens.next() {
            match token.kind {
                TokenKind::Space | TokenKind::Comment => continue,
                TokenKind::Identifier => {
                    let command = parse_command(token, &mut tokens)?;
                    self.record(command);
                }
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        value: token.value,
                        line: token.line,
                    });
                }
            }
        }

        Ok(())
    }

    fn record(&mut self, command: Command) {
        let defines = command.name.eq_ignore_ascii_case("set")
            || command.name.eq_ignore_ascii_case("option");
        if defines && let Some(name) = command.arguments.first() {
            self.variables.insert(name.clone());
        }
        self.commands.push(command);
    }
}

fn parse_command<I>(name: Token, tokens: &mut Peekable<I>) -> Result<Command, ParseError>
where
    I: Iterator<Item = Token>,
{
    let line = name.line;
    let name = name.value;

    // Whitespace between the name and '(' is allowed
    while tokens.next_if(|t| t.kind == TokenKind::Space).is_some() {}

    match tokens.next() {
        Some(t) if t.kind == TokenKind::LeftParen => {}
        _ => return Err(ParseError::ExpectedParen { name, line }),
    }

    let mut arguments = Vec::new();
    let mut current: Option<String> = None;
    let mut depth = 1usize;

    loop {
        let Some(token) = tokens.next() else {
            return Err(ParseError::Unterminated { name, line });
        };

        match token.kind {
            TokenKind::Space | TokenKind::Comment => arguments.extend(current.take()),
            TokenKind::LeftParen => {
                arguments.extend(current.take());
                depth += 1;
                arguments.push(token.value);
            }
            TokenKind::RightParen => {
                arguments.extend(current.take());
                depth -= 1;
                if depth == 0 {
                    break;
                }
                arguments.push(token.value);
            }
            _ => current.get_or_insert_with(String::new).push_str(&token.value),
        }
    }

    Ok(Command {
        name,
        arguments,
        line,
    })
}
