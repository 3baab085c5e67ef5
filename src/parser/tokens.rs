use std::{
    collections::VecDeque,
    io::{ErrorKind, Read},
};

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use crate::errors::ImportError;

const CHUNK_SIZE: usize = 8 * 1024;

/// A raw html5ever token reduced to what bookmark files care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlToken {
    Doctype(String),
    /// `<H3>`: the next text token names a folder.
    FolderOpen,
    /// `<DL>`: a nesting level starts.
    ListOpen,
    /// `</DL>`: the current nesting level ends.
    FolderClose,
    Anchor { href: String },
    /// Coalesced, entity-decoded and trimmed character data. Never empty.
    Text(String),
    Other,
}

fn classify_tag(tag: &Tag) -> HtmlToken {
    match (tag.kind, &*tag.name) {
        (TagKind::StartTag, "h3") => HtmlToken::FolderOpen,
        (TagKind::StartTag, "dl") => HtmlToken::ListOpen,
        (TagKind::EndTag, "dl") => HtmlToken::FolderClose,
        (TagKind::StartTag, "a") => HtmlToken::Anchor {
            href: attribute(tag, "href").unwrap_or_default(),
        },
        _ => HtmlToken::Other,
    }
}

fn attribute(tag: &Tag, name: &str) -> Option<String> {
    tag.attrs
        .iter()
        .find(|attr| &*attr.name.local == name)
        .map(|attr| attr.value.trim().to_string())
}

/// Sink collecting classified tokens until the parser drains them.
#[derive(Default)]
struct Classifier {
    ready: VecDeque<HtmlToken>,
    text: String,
}

impl Classifier {
    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.ready.push_back(HtmlToken::Text(trimmed.to_string()));
        }
    }

    fn push(&mut self, token: HtmlToken) {
        self.flush_text();
        self.ready.push_back(token);
    }
}

impl TokenSink for Classifier {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => self.text.push_str(&text),
            Token::NullCharacterToken | Token::ParseError(_) => {}
            Token::EOFToken => self.flush_text(),
            Token::DoctypeToken(doctype) => {
                let name = doctype.name.map(|name| String::from(&*name));
                self.push(HtmlToken::Doctype(name.unwrap_or_default()))
            }
            Token::CommentToken(_) => self.push(HtmlToken::Other),
            Token::TagToken(tag) => self.push(classify_tag(&tag)),
        }
        TokenSinkResult::Continue
    }
}

/// Pulls classified tokens out of a byte source, reading it chunk by chunk.
pub struct TokenStream<R> {
    reader: R,
    tokenizer: Tokenizer<Classifier>,
    queue: BufferQueue,
    undecoded: Vec<u8>,
    bytes_read: u64,
    limit: Option<u64>,
    finished: bool,
}

impl<R: Read> TokenStream<R> {
    pub fn new(reader: R, limit: Option<u64>) -> Self {
        TokenStream {
            reader,
            tokenizer: Tokenizer::new(Classifier::default(), TokenizerOpts::default()),
            queue: BufferQueue::new(),
            undecoded: vec![],
            bytes_read: 0,
            limit,
            finished: false,
        }
    }

    /// Next token, or `None` once the stream is exhausted.
    pub fn next_token(&mut self) -> Result<Option<HtmlToken>, ImportError> {
        loop {
            if let Some(token) = self.tokenizer.sink.ready.pop_front() {
                return Ok(Some(token));
            }
            if self.finished {
                return Ok(None);
            }
            self.fill()?;
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn fill(&mut self) -> Result<(), ImportError> {
        let mut chunk = [0u8; CHUNK_SIZE];
        let n = loop {
            match self.reader.read(&mut chunk) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };

        if n == 0 {
            if !self.undecoded.is_empty() {
                let tail = String::from_utf8_lossy(&self.undecoded).into_owned();
                self.undecoded.clear();
                self.feed(&tail);
            }
            self.tokenizer.end();
            self.finished = true;
            return Ok(());
        }

        self.bytes_read += n as u64;
        if let Some(limit) = self.limit {
            if self.bytes_read > limit {
                return Err(ImportError::TooLarge { limit });
            }
        }

        self.undecoded.extend_from_slice(&chunk[..n]);
        let text = take_utf8(&mut self.undecoded);
        if !text.is_empty() {
            self.feed(&text);
        }
        Ok(())
    }

    fn feed(&mut self, text: &str) {
        self.queue.push_back(StrTendril::from_slice(text));
        let _ = self.tokenizer.feed(&mut self.queue);
    }
}

/// Decodes the longest valid prefix of `bytes`, leaving an incomplete
/// trailing sequence in place. Invalid sequences become U+FFFD.
fn take_utf8(bytes: &mut Vec<u8>) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut consumed = 0;

    while consumed < bytes.len() {
        let rest = &bytes[consumed..];
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                consumed = bytes.len();
            }
            Err(err) => {
                let valid_len = err.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&rest[..valid_len]));
                match err.error_len() {
                    Some(bad_len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        consumed += valid_len + bad_len;
                    }
                    None => {
                        consumed += valid_len;
                        break;
                    }
                }
            }
        }
    }

    bytes.drain(..consumed);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(html: &str) -> Vec<HtmlToken> {
        let mut stream = TokenStream::new(html.as_bytes(), None);
        let mut tokens = vec![];
        while let Some(token) = stream.next_token().unwrap() {
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn classifies_bookmark_markup() {
        let tokens = collect(
            r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<DL><p>
    <DT><H3 ADD_DATE="1">Dev</H3>
    <DL><p>
        <DT><A HREF="https://example.com/" ADD_DATE="2">Example &amp; Co</A>
    </DL><p>
</DL>"#,
        );

        assert_eq!(
            tokens,
            vec![
                HtmlToken::Doctype("netscape-bookmark-file-1".to_string()),
                HtmlToken::ListOpen,
                HtmlToken::Other,
                HtmlToken::Other,
                HtmlToken::FolderOpen,
                HtmlToken::Text("Dev".to_string()),
                HtmlToken::Other,
                HtmlToken::ListOpen,
                HtmlToken::Other,
                HtmlToken::Other,
                HtmlToken::Anchor {
                    href: "https://example.com/".to_string()
                },
                HtmlToken::Text("Example & Co".to_string()),
                HtmlToken::Other,
                HtmlToken::FolderClose,
                HtmlToken::Other,
                HtmlToken::FolderClose,
            ]
        );
    }

    #[test]
    fn anchor_without_href_has_empty_href() {
        let tokens = collect("<a name=x>t</a>");
        assert_eq!(tokens[0], HtmlToken::Anchor { href: String::new() });
    }

    #[test]
    fn utf8_split_across_chunks_is_reassembled() {
        let mut bytes = "caf\u{e9}".as_bytes().to_vec();
        let last = bytes.pop().unwrap();
        let mut pending = bytes;
        assert_eq!(take_utf8(&mut pending), "caf");
        assert_eq!(pending.len(), 1);
        pending.push(last);
        assert_eq!(take_utf8(&mut pending), "\u{e9}");
        assert!(pending.is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut bytes = vec![b'a', 0xff, b'b'];
        assert_eq!(take_utf8(&mut bytes), "a\u{fffd}b");
        assert!(bytes.is_empty());
    }
}
