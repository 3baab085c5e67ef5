//! Legacy "Netscape Bookmark File" import.
//!
//! The file is read once, token by token. Headings (`<H3>`) name folders,
//! the `<DL>` lists that follow them open a nesting level, and every anchor
//! becomes one flat [`Bookmark`] tagged with the path of the folders it sits
//! in. Output is in document order.

mod href;
mod tokens;

use std::io::Read;

use serde::Serialize;

use crate::{bookmarks::Bookmark, errors::ImportError, path};

pub use href::{check_href, HrefRejection};
pub use tokens::{HtmlToken, TokenStream};

pub const DOCTYPE: &str = "NETSCAPE-Bookmark-file-1";

pub const DEFAULT_MAX_SKIPPED_SAMPLES: usize = 10;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub allowed_schemes: Vec<String>,
    pub max_skipped_samples: usize,
    pub max_upload_bytes: Option<u64>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
            max_skipped_samples: DEFAULT_MAX_SKIPPED_SAMPLES,
            max_upload_bytes: Some(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}

/// Everything an import produced: the accepted records plus the hrefs that
/// were dropped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub bookmarks: Vec<Bookmark>,
    pub skipped: usize,
    pub skipped_samples: Vec<String>,
}

#[derive(Debug)]
enum State {
    Searching,
    AwaitingFolderText,
    AwaitingBookmarkText { href: String },
    InFolder(usize),
    Done,
    Failed(ImportError),
}

struct Segment {
    path: String,
    list_depth: usize,
}

/// Per-upload state. Each parse owns exactly one.
struct ParseContext<'a> {
    owner_key: &'a str,
    stack: Vec<Segment>,
    list_depth: usize,
    pending_folder: Option<String>,
}

impl<'a> ParseContext<'a> {
    fn new(owner_key: &'a str) -> Self {
        ParseContext {
            owner_key,
            stack: vec![],
            list_depth: 0,
            pending_folder: None,
        }
    }

    fn current_path(&self) -> &str {
        self.stack
            .last()
            .map(|segment| segment.path.as_str())
            .unwrap_or(path::ROOT)
    }

    fn idle(&self) -> State {
        match self.stack.len() {
            0 => State::Searching,
            depth => State::InFolder(depth),
        }
    }

    fn open_list(&mut self) -> Result<(), ImportError> {
        self.list_depth += 1;
        if let Some(name) = self.pending_folder.take() {
            let path = path::append_segment(self.current_path(), &path::encode_segment(&name))
                .map_err(|err| ImportError::format(format!("folder {name:?}: {err}")))?;
            self.stack.push(Segment {
                path,
                list_depth: self.list_depth,
            });
        }
        Ok(())
    }

    fn close_list(&mut self) {
        self.pending_folder = None;
        if self
            .stack
            .last()
            .is_some_and(|segment| segment.list_depth == self.list_depth)
        {
            self.stack.pop();
        }
        self.list_depth = self.list_depth.saturating_sub(1);
    }
}

pub struct BookmarkFileParser {
    opts: ParseOptions,
}

impl Default for BookmarkFileParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl BookmarkFileParser {
    pub fn new(opts: ParseOptions) -> Self {
        BookmarkFileParser { opts }
    }

    /// Parses a whole bookmark file. Fails without returning any records if
    /// the file is not a bookmark export or is structurally broken.
    pub fn parse<R: Read>(&self, reader: R, owner_key: &str) -> Result<ParseReport, ImportError> {
        let mut tokens = TokenStream::new(reader, self.opts.max_upload_bytes);

        expect_doctype(&mut tokens)?;

        let mut ctx = ParseContext::new(owner_key);
        let mut report = ParseReport::default();
        let mut state = State::Searching;

        loop {
            let token = tokens.next_token()?;
            state = self.step(&mut ctx, &mut report, state, token);
            match state {
                State::Done => break,
                State::Failed(err) => {
                    log::warn!("bookmark import failed: {err}");
                    return Err(err);
                }
                _ => {}
            }
        }

        log::info!(
            "parsed {} bookmarks from {} bytes ({} skipped)",
            report.bookmarks.len(),
            tokens.bytes_read(),
            report.skipped
        );

        Ok(report)
    }

    fn step(
        &self,
        ctx: &mut ParseContext,
        report: &mut ParseReport,
        state: State,
        token: Option<HtmlToken>,
    ) -> State {
        match (state, token) {
            (State::AwaitingFolderText, Some(HtmlToken::Text(name))) => {
                ctx.pending_folder = Some(name);
                ctx.idle()
            }
            (State::AwaitingFolderText, _) => {
                State::Failed(ImportError::format("folder heading without a name"))
            }

            (State::AwaitingBookmarkText { href }, Some(HtmlToken::Text(name))) => {
                self.accept(ctx, report, href, name);
                ctx.idle()
            }
            (State::AwaitingBookmarkText { href }, _) => State::Failed(ImportError::format(
                format!("bookmark {href:?} has no description"),
            )),

            (State::Failed(err), _) => State::Failed(err),
            (State::Done, _) | (_, None) => State::Done,

            (State::Searching | State::InFolder(_), Some(token)) => match token {
                HtmlToken::FolderOpen => {
                    ctx.pending_folder = None;
                    State::AwaitingFolderText
                }
                HtmlToken::ListOpen => match ctx.open_list() {
                    Ok(()) => ctx.idle(),
                    Err(err) => State::Failed(err),
                },
                HtmlToken::FolderClose => {
                    ctx.close_list();
                    ctx.idle()
                }
                HtmlToken::Anchor { href } => {
                    ctx.pending_folder = None;
                    State::AwaitingBookmarkText { href }
                }
                HtmlToken::Doctype(_) | HtmlToken::Text(_) | HtmlToken::Other => ctx.idle(),
            },
        }
    }

    fn accept(&self, ctx: &ParseContext, report: &mut ParseReport, href: String, name: String) {
        match check_href(&href, &self.opts.allowed_schemes) {
            Ok(_) => {
                report
                    .bookmarks
                    .push(Bookmark::new(ctx.owner_key, &name, ctx.current_path(), &href));
            }
            Err(reason) => {
                log::debug!("skipping {name:?} ({href:?}): {reason}");
                report.skipped += 1;
                if report.skipped_samples.len() < self.opts.max_skipped_samples {
                    report.skipped_samples.push(href);
                }
            }
        }
    }
}

fn expect_doctype<R: Read>(tokens: &mut TokenStream<R>) -> Result<(), ImportError> {
    match tokens.next_token()? {
        Some(HtmlToken::Doctype(name)) if name.eq_ignore_ascii_case(DOCTYPE) => Ok(()),
        Some(HtmlToken::Doctype(name)) => Err(ImportError::format(format!(
            "unexpected doctype {name:?}"
        ))),
        Some(_) | None => Err(ImportError::format("missing bookmark file doctype")),
    }
}

/// Parses with default options.
pub fn parse<R: Read>(reader: R, owner_key: &str) -> Result<ParseReport, ImportError> {
    BookmarkFileParser::default().parse(reader, owner_key)
}

/// Parses with default options and keeps only the accepted records.
pub fn parse_bookmarks<R: Read>(reader: R, owner_key: &str) -> Result<Vec<Bookmark>, ImportError> {
    parse(reader, owner_key).map(|report| report.bookmarks)
}
