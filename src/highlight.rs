// ABOUTME: Syntax highlighting for code items in the stepdeck application
// ABOUTME: Splits C source lines into keyword, string, comment, number and directive tokens

const KEYWORDS: [&str; 38] = [
    "int", "char", "float", "double", "void", "return", "if", "else", "for", "while", "do",
    "switch", "case", "break", "continue", "default", "struct", "static", "const", "sizeof",
    "typedef", "enum", "long", "short", "unsigned", "signed", "auto", "register", "extern",
    "include", "define", "ifdef", "ifndef", "endif", "undef", "NULL", "union", "goto",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Plain,
    Keyword,
    Str,
    Comment,
    Number,
    Directive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// Line-by-line C highlighter. Keeps `/* ... */` state between lines.
#[derive(Debug, Default)]
pub struct Highlighter {
    plain: bool,
    in_block_comment: bool,
}

impl Highlighter {
    /// A highlighter for `language`; `text` and `plain` disable highlighting
    pub fn for_language(language: Option<&str>) -> Self {
        let plain = matches!(
            language.map(str::to_ascii_lowercase).as_deref(),
            Some("text") | Some("plain") | Some("txt")
        );
        Self {
            plain,
            in_block_comment: false,
        }
    }

    pub fn line(&mut self, line: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        if self.plain {
            push(&mut tokens, TokenKind::Plain, line);
            return tokens;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            if self.in_block_comment {
                let end = find_pair(&chars, i, '*', '/');
                let stop = end.map(|e| e + 2).unwrap_or(chars.len());
                self.in_block_comment = end.is_none();
                push(&mut tokens, TokenKind::Comment, &collect(&chars[i..stop]));
                i = stop;
                continue;
            }

            let c = chars[i];
            let next = chars.get(i + 1).copied();

            if c == '/' && next == Some('/') {
                push(&mut tokens, TokenKind::Comment, &collect(&chars[i..]));
                break;
            }
            if c == '/' && next == Some('*') {
                self.in_block_comment = true;
                push(&mut tokens, TokenKind::Comment, "/*");
                i += 2;
                continue;
            }
            if c == '"' || c == '\'' {
                let stop = string_end(&chars, i);
                push(&mut tokens, TokenKind::Str, &collect(&chars[i..stop]));
                i = stop;
                continue;
            }
            if c == '#' && chars[..i].iter().all(|ch| ch.is_whitespace()) {
                let stop = word_end(&chars, i + 1);
                push(&mut tokens, TokenKind::Directive, &collect(&chars[i..stop]));
                i = stop;
                continue;
            }
            if c.is_ascii_digit() {
                let stop = number_end(&chars, i);
                push(&mut tokens, TokenKind::Number, &collect(&chars[i..stop]));
                i = stop;
                continue;
            }
            if c.is_alphabetic() || c == '_' {
                let stop = word_end(&chars, i);
                let word = collect(&chars[i..stop]);
                let kind = if KEYWORDS.contains(&word.as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Plain
                };
                push(&mut tokens, kind, &word);
                i = stop;
                continue;
            }

            push(&mut tokens, TokenKind::Plain, &c.to_string());
            i += 1;
        }

        tokens
    }
}

/// Append text, merging it into the previous token when the kind matches
fn push(tokens: &mut Vec<Token>, kind: TokenKind, text: &str) {
    if text.is_empty() {
        return;
    }
    match tokens.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(text),
        _ => tokens.push(Token {
            kind,
            text: text.to_string(),
        }),
    }
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

fn find_pair(chars: &[char], from: usize, a: char, b: char) -> Option<usize> {
    (from..chars.len().saturating_sub(1)).find(|&i| chars[i] == a && chars[i + 1] == b)
}

fn word_end(chars: &[char], from: usize) -> usize {
    let mut i = from;
    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    i
}

fn number_end(chars: &[char], from: usize) -> usize {
    let mut i = from;
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.') {
        i += 1;
    }
    i
}

/// End of a quoted literal; an unterminated one runs to the end of the line
fn string_end(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<(TokenKind, String)> {
        Highlighter::for_language(Some("c"))
            .line(line)
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_keywords_numbers_and_strings() {
        assert_eq!(
            kinds("int a = 7; printf(\"%d\\n\", a);"),
            vec![
                (TokenKind::Keyword, "int".into()),
                (TokenKind::Plain, " a = ".into()),
                (TokenKind::Number, "7".into()),
                (TokenKind::Plain, "; printf(".into()),
                (TokenKind::Str, "\"%d\\n\"".into()),
                (TokenKind::Plain, ", a);".into()),
            ]
        );
    }

    #[test]
    fn test_directive_and_line_comment() {
        assert_eq!(
            kinds("#include <stdio.h> // io"),
            vec![
                (TokenKind::Directive, "#include".into()),
                (TokenKind::Plain, " <stdio.h> ".into()),
                (TokenKind::Comment, "// io".into()),
            ]
        );
    }

    #[test]
    fn test_keyword_inside_identifier_is_plain() {
        assert_eq!(kinds("integer"), vec![(TokenKind::Plain, "integer".into())]);
        assert_eq!(kinds("0x1F"), vec![(TokenKind::Number, "0x1F".into())]);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let mut h = Highlighter::for_language(None);
        let first = h.line("x = 1; /* start");
        assert_eq!(first.last().map(|t| t.kind), Some(TokenKind::Comment));
        let second = h.line("still */ return 0;");
        assert_eq!(second[0].kind, TokenKind::Comment);
        assert_eq!(second[0].text, "still */");
        assert!(second
            .iter()
            .any(|t| t.kind == TokenKind::Keyword && t.text == "return"));
    }

    #[test]
    fn test_text_language_is_plain() {
        let tokens = Highlighter::for_language(Some("text")).line("int x = 1;");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Plain);
    }
}
