use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use std::cell::RefCell;

/// An href containing any of these is never followed:
/// namespaced/external links, in-page fragments and media repository links
const FORBIDDEN_HREF_PARTS: [&str; 3] = [":", "#", "wikimedia"];

/// One markup token of a page, in source order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    Start { tag: &'a str, href: Option<&'a str> },
    End { tag: &'a str },
    Text(&'a str),
}

/// Hands every tag and text token straight to a callback, no tree building
struct EventSink<F> {
    on_event: RefCell<F>,
}

impl<F> TokenSink for EventSink<F>
where
    F: FnMut(MarkupEvent<'_>),
{
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut on_event = self.on_event.borrow_mut();
        match token {
            Token::TagToken(tag) => {
                let name: &str = &tag.name;
                match tag.kind {
                    TagKind::StartTag => {
                        let href = tag
                            .attrs
                            .iter()
                            .find(|attr| &*attr.name.local == "href")
                            .map(|attr| &*attr.value);
                        (*on_event)(MarkupEvent::Start { tag: name, href });
                        if tag.self_closing {
                            (*on_event)(MarkupEvent::End { tag: name });
                        }
                    }
                    TagKind::EndTag => (*on_event)(MarkupEvent::End { tag: name }),
                }
            }
            Token::CharacterTokens(text) => (*on_event)(MarkupEvent::Text(&text)),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Tokenizes `html` and calls `on_event` for each tag and text run, in source order.
/// Only tags present in the markup are reported; nothing is implied or moved.
pub fn markup_events<F>(html: &str, on_event: F)
where
    F: FnMut(MarkupEvent<'_>),
{
    let sink = EventSink {
        on_event: RefCell::new(on_event),
    };
    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&input);
    tokenizer.end();
}

/// Folds the markup events of one page into the first followable link.
///
/// A link is taken when its `<a>` opens inside a paragraph, outside italics,
/// outside parentheses, and no link has been taken yet on this page.
/// Paragraphs and italics are plain toggles, nesting is not modeled.
#[derive(Debug, Default, Clone)]
pub struct LinkExtractor {
    in_paragraph: bool,
    in_italic: bool,
    in_parens: bool,
    in_anchor: bool,
    next_link: Option<String>,
}

impl LinkExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, event: MarkupEvent<'_>) {
        match event {
            MarkupEvent::Start { tag, href } => match tag {
                "p" => self.in_paragraph = true,
                "i" => self.in_italic = true,
                "a" => {
                    self.in_anchor = true;
                    self.follow_link(href);
                }
                _ => {}
            },
            MarkupEvent::End { tag } => match tag {
                "p" => self.in_paragraph = false,
                "i" => self.in_italic = false,
                "a" => self.in_anchor = false,
                _ => {}
            },
            MarkupEvent::Text(data) => {
                // does not handle nested parens like ((...)<a></a>)
                if data.contains('(') {
                    self.in_parens = true;
                }
                if data.contains(')') {
                    self.in_parens = false;
                }
            }
        }
    }

    fn follow_link(&mut self, href: Option<&str>) {
        let eligible = self.in_anchor
            && self.in_paragraph
            && !self.in_italic
            && !self.in_parens
            && self.next_link.is_none();
        if !eligible {
            return;
        }
        // a rejected href does not lock the page, later anchors are still considered
        if let Some(href) = href.filter(|href| is_followable(href)) {
            self.next_link = Some(href.to_string());
        }
    }

    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    pub fn finish(self) -> Option<String> {
        self.next_link
    }
}

/// True for a non-empty href free of every forbidden part
pub fn is_followable(href: &str) -> bool {
    !href.is_empty() && !FORBIDDEN_HREF_PARTS.iter().any(|part| href.contains(part))
}

/// Parses a page body and returns its first followable link, if any.
pub fn first_link(html: &str) -> Option<String> {
    let mut extractor = LinkExtractor::new();
    markup_events(html, |event| extractor.feed(event));
    extractor.finish()
}
