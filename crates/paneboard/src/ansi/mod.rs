//! ANSI escape segmentation for captured pane text.
//!
//! Splits a single line of captured output into styled text runs.
//! Only the basic eight foreground colors are tracked; every other
//! graphics attribute (bold, background, 256-color, truecolor) is
//! consumed without changing the tracked color.
//!
//! Style never carries across lines: each call to `segment_line`
//! starts from `ColorTag::Default`. The style register is threaded
//! through `next_style` as a plain value, so there is no hidden state.


const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Foreground colors the dashboard distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorTag {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl ColorTag {
    /// Map an SGR foreground code (30-37) to a tag.
    pub fn from_sgr(code: u16) -> Option<Self> {
        let tag = match code {
            30 => Self::Black,
            31 => Self::Red,
            32 => Self::Green,
            33 => Self::Yellow,
            34 => Self::Blue,
            35 => Self::Magenta,
            36 => Self::Cyan,
            37 => Self::White,
            _ => return None,
        };
        Some(tag)
    }
}

/// A run of visible text drawn with one foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSegment<'a> {
    pub text: &'a str,
    pub style: ColorTag,
}

impl<'a> StyledSegment<'a> {
    pub fn new(text: &'a str, style: ColorTag) -> Self {
        Self { text, style }
    }
}

/// Segment one line of captured text.
///
/// The returned iterator is lazy and cheap to clone; cloning it (or
/// calling this again) restarts the scan from the beginning of the line.
pub fn segment_line(line: &str) -> Segments<'_> {
    Segments {
        rest: line,
        style: ColorTag::Default,
    }
}

/// Segment a whole capture, one independent iterator per line.
pub fn segment_capture(capture: &str) -> impl Iterator<Item = Segments<'_>> {
    capture.lines().map(segment_line)
}

/// Lazy iterator over the styled runs of a single line.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
    style: ColorTag,
}

impl<'a> Iterator for Segments<'a> {
    type Item = StyledSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.rest.is_empty() {
                return None;
            }
            if self.rest.starts_with(ESC) {
                let (consumed, sgr) = scan_escape(self.rest);
                if let Some(params) = sgr {
                    self.style = next_style(self.style, params);
                }
                self.rest = &self.rest[consumed..];
                continue;
            }
            let end = self.rest.find(ESC).unwrap_or(self.rest.len());
            let (text, rest) = self.rest.split_at(end);
            self.rest = rest;
            return Some(StyledSegment::new(text, self.style));
        }
    }
}

/// Compute the style after applying one SGR parameter list.
///
/// An empty list or a reset (0, or 39 for "default foreground") yields
/// `Default`; 30-37 select a basic color. Extended color selectors
/// (38/48 with `5;n` or `2;r;g;b`) are skipped as a unit so their
/// arguments are never misread as colors. A list that does not parse
/// leaves the style untouched.
pub fn next_style(current: ColorTag, params: &str) -> ColorTag {
    if params.is_empty() {
        return ColorTag::Default;
    }
    let mut codes = Vec::new();
    for part in params.split(';') {
        if part.is_empty() {
            codes.push(0);
            continue;
        }
        match part.parse::<u16>() {
            Ok(code) => codes.push(code),
            Err(_) => return current,
        }
    }

    let mut style = current;
    let mut idx = 0;
    while idx < codes.len() {
        match codes[idx] {
            0 | 39 => style = ColorTag::Default,
            38 | 48 => {
                idx += match codes.get(idx + 1) {
                    Some(5) => 2,
                    Some(2) => 4,
                    _ => 0,
                };
            }
            code => {
                if let Some(tag) = ColorTag::from_sgr(code) {
                    style = tag;
                }
            }
        }
        idx += 1;
    }
    style
}

/// Measure the escape sequence at the start of `input`.
///
/// Returns the number of bytes consumed and, for SGR sequences
/// (`ESC [ ... m`), the parameter body.
fn scan_escape(input: &str) -> (usize, Option<&str>) {
    let mut chars = input.char_indices();
    chars.next();
    let Some((idx, kind)) = chars.next() else {
        return (input.len(), None);
    };
    match kind {
        '[' => {
            let body_start = idx + 1;
            for (pos, ch) in input[body_start..].char_indices() {
                if ('\x40'..='\x7e').contains(&ch) {
                    let end = body_start + pos + 1;
                    let sgr = (ch == 'm').then(|| &input[body_start..body_start + pos]);
                    return (end, sgr);
                }
            }
            (input.len(), None)
        }
        ']' => {
            // Operating system command: runs until BEL or ST.
            let body_start = idx + 1;
            let body = &input[body_start..];
            let bel = body.find(BEL).map(|pos| pos + 1);
            let st = body.find("\x1b\\").map(|pos| pos + 2);
            let end = match (bel, st) {
                (Some(a), Some(b)) => a.min(b),
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (None, None) => body.len(),
            };
            (body_start + end, None)
        }
        // Character set designation carries one more byte.
        '(' | ')' | '*' | '+' => {
            let end = chars
                .next()
                .map(|(pos, ch)| pos + ch.len_utf8())
                .unwrap_or(input.len());
            (end, None)
        }
        other => (idx + other.len_utf8(), None),
    }
}
