//! Mailbox parsing and domain extraction.
//!
//! The grammar is the single-mailbox subset of RFC 5322:
//!
//! ```text
//! mailbox       = name-addr / addr-spec
//! name-addr     = [display-name] angle-addr
//! angle-addr    = "<" addr-spec ">"
//! display-name  = phrase
//! addr-spec     = local-part "@" domain
//! local-part    = dot-atom / quoted-string
//! domain        = dot-atom
//! ```
//!
//! A bare `addr-spec` may carry a trailing parenthetical comment, which is
//! kept as the display name. Quoted local parts are stored unquoted, so the
//! resolved address can contain more than one `@`; the domain always starts
//! after the last one.

use crate::error::{AddressError, SyntaxError};

/// A parsed mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub display_name: Option<String>,
    /// `local@domain`, with any quoted local part unquoted.
    pub address: String,
}

/// The resolved address split at its last `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParts {
    pub local_part: String,
    pub domain: String,
}

/// Returns the domain of a single mailbox, as written (no case folding).
pub fn extract_domain(raw: &str) -> Result<String, AddressError> {
    extract_parts(raw).map(|parts| parts.domain)
}

/// Parses `raw` as a mailbox and splits its address into local part and
/// domain.
pub fn extract_parts(raw: &str) -> Result<AddressParts, AddressError> {
    let mailbox = parse_mailbox(raw)?;
    let at = mailbox.address.rfind('@').ok_or(AddressError::MissingAtSign)?;
    Ok(AddressParts {
        local_part: mailbox.address[..at].to_string(),
        domain: mailbox.address[at + 1..].to_string(),
    })
}

/// Parses exactly one mailbox from `raw`.
pub fn parse_mailbox(raw: &str) -> Result<Mailbox, SyntaxError> {
    let mut parser = MailboxParser { rest: raw };
    let mailbox = parser.mailbox()?;
    if !parser.skip_cfws() {
        return Err(SyntaxError::MisformattedComment);
    }
    if !parser.is_empty() {
        return Err(SyntaxError::TrailingInput(parser.rest.to_string()));
    }
    Ok(mailbox)
}

struct MailboxParser<'a> {
    rest: &'a str,
}

impl<'a> MailboxParser<'a> {
    fn mailbox(&mut self) -> Result<Mailbox, SyntaxError> {
        self.skip_space();
        if self.is_empty() {
            return Err(SyntaxError::NoAddress);
        }

        // addr-spec is the narrower form, so try it before name-addr.
        if let Ok(address) = self.addr_spec() {
            self.skip_space();
            let display_name = if self.peek() == Some('(') {
                Some(self.comment_display_name()?)
            } else {
                None
            };
            return Ok(Mailbox {
                display_name,
                address,
            });
        }

        let display_name = if self.peek() != Some('<') {
            Some(self.phrase()?)
        } else {
            None
        };

        self.skip_space();
        if !self.consume('<') {
            return Err(SyntaxError::NoAngleAddr);
        }
        let address = self.addr_spec()?;
        if !self.consume('>') {
            return Err(SyntaxError::UnclosedAngleAddr);
        }
        Ok(Mailbox {
            display_name,
            address,
        })
    }

    /// Consumes an addr-spec, leaving the input untouched on failure.
    fn addr_spec(&mut self) -> Result<String, SyntaxError> {
        let checkpoint = self.rest;
        let result = self.addr_spec_inner();
        if result.is_err() {
            self.rest = checkpoint;
        }
        result
    }

    fn addr_spec_inner(&mut self) -> Result<String, SyntaxError> {
        self.skip_space();
        let local_part = match self.peek() {
            None => return Err(SyntaxError::NoAddrSpec),
            Some('"') => self.quoted_string()?,
            Some(_) => self.atom(true, false)?,
        };

        if !self.consume('@') {
            return Err(SyntaxError::MissingAtInAddrSpec);
        }

        self.skip_space();
        if self.is_empty() {
            return Err(SyntaxError::NoDomainInAddrSpec);
        }
        let domain = self.atom(true, false)?;

        Ok(format!("{local_part}@{domain}"))
    }

    /// phrase = 1*word, where word = atom / quoted-string.
    ///
    /// Running out of input while looking for the next word is an error even
    /// when earlier words were read, because a phrase must be followed by an
    /// angle-addr.
    fn phrase(&mut self) -> Result<String, SyntaxError> {
        let mut words: Vec<String> = Vec::new();
        loop {
            self.skip_space();
            let word = match self.peek() {
                None => return Err(SyntaxError::MissingPhrase),
                Some('"') => self.quoted_string(),
                // dot-atom is more permissive than the RFC's atom here.
                Some(_) => self.atom(true, true),
            };
            match word {
                Ok(word) => words.push(word),
                Err(err) if words.is_empty() => {
                    return Err(SyntaxError::MissingWordInPhrase(Box::new(err)));
                }
                Err(_) => break,
            }
        }
        Ok(words.join(" "))
    }

    fn atom(&mut self, dot: bool, permissive: bool) -> Result<String, SyntaxError> {
        let input = self.rest;
        let mut chars = input.char_indices();
        match chars.next() {
            Some((_, c)) if is_atext(c, false) => {}
            _ => return Err(SyntaxError::InvalidString),
        }
        let end = chars
            .find(|&(_, c)| !is_atext(c, dot))
            .map(|(idx, _)| idx)
            .unwrap_or(input.len());
        let (atom, rest) = input.split_at(end);
        self.rest = rest;

        if !permissive {
            if atom.starts_with('.') {
                return Err(SyntaxError::LeadingDot);
            }
            if atom.contains("..") {
                return Err(SyntaxError::DoubleDot);
            }
            if atom.ends_with('.') {
                return Err(SyntaxError::TrailingDot);
            }
        }
        Ok(atom.to_string())
    }

    /// Consumes a quoted-string starting at `"` and returns its unescaped
    /// contents. Any character after a backslash is taken literally, control
    /// characters included, as older `net/mail` parsers did.
    fn quoted_string(&mut self) -> Result<String, SyntaxError> {
        let input = self.rest;
        let mut chars = input.char_indices().skip(1);
        let mut contents = String::new();
        let end = loop {
            let Some((idx, c)) = chars.next() else {
                return Err(SyntaxError::UnclosedQuotedString);
            };
            match c {
                '"' => break idx + c.len_utf8(),
                '\\' => match chars.next() {
                    Some((_, escaped)) => contents.push(escaped),
                    None => return Err(SyntaxError::UnclosedQuotedString),
                },
                c if is_qtext(c) || c == ' ' => contents.push(c),
                other => return Err(SyntaxError::BadQuotedChar(other)),
            }
        };
        self.rest = &input[end..];
        if contents.is_empty() {
            return Err(SyntaxError::EmptyQuotedString);
        }
        Ok(contents)
    }

    /// Parses `(comment)` following an addr-spec into a display name with
    /// runs of whitespace collapsed.
    fn comment_display_name(&mut self) -> Result<String, SyntaxError> {
        if !self.consume('(') {
            return Err(SyntaxError::MisformattedComment);
        }
        let comment = self.comment().ok_or(SyntaxError::MisformattedComment)?;
        Ok(comment.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// Consumes a comment body after its opening `(`, honouring nesting and
    /// backslash escapes. Returns `None` when the parentheses never balance.
    fn comment(&mut self) -> Option<String> {
        let mut depth = 1usize;
        let mut text = String::new();
        let input = self.rest;
        let mut chars = input.char_indices();
        while let Some((idx, c)) = chars.next() {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        text.push(escaped);
                    }
                }
                '(' => {
                    depth += 1;
                    text.push(c);
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.rest = &input[idx + 1..];
                        return Some(text);
                    }
                    text.push(c);
                }
                other => text.push(other),
            }
        }
        self.rest = "";
        None
    }

    /// Skips folding whitespace and comments. Returns false on an unbalanced
    /// comment.
    fn skip_cfws(&mut self) -> bool {
        self.skip_space();
        while self.consume('(') {
            if self.comment().is_none() {
                return false;
            }
            self.skip_space();
        }
        true
    }

    fn skip_space(&mut self) {
        self.rest = self.rest.trim_start_matches([' ', '\t']);
    }

    fn consume(&mut self, expected: char) -> bool {
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}

/// atext from RFC 5322 3.2.3, extended with non-ASCII characters (RFC 6532).
fn is_atext(c: char, dot: bool) -> bool {
    match c {
        '.' => dot,
        'a'..='z' | 'A'..='Z' | '0'..='9' => true,
        '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '/' | '=' | '?' | '^' | '_'
        | '`' | '{' | '|' | '}' | '~' => true,
        c => !c.is_ascii() && !c.is_control() && !c.is_whitespace(),
    }
}

/// qtext: printable US-ASCII except `"` and `\`, plus non-ASCII.
fn is_qtext(c: char) -> bool {
    match c {
        '"' | '\\' => false,
        '!'..='~' => true,
        c => !c.is_ascii() && !c.is_control(),
    }
}
