//! Terminal output rendering.
//!
//! Program output captured with ANSI escape sequences keeps its colors: SGR
//! sequences (`ESC [ ... m`) become styled spans, every other escape sequence
//! is dropped. The 16 standard colors and text attributes become classes named
//! after their SGR code (`ansi1` for bold, `ansi31` for a red foreground);
//! palette and 24-bit colors are emitted as inline styles.

use std::fmt::Write;

use crate::escape::escape_html_into;

/// Language tag of captured terminal output.
pub(crate) const ANSI: &str = "ansi";

const ESC: char = '\x1b';
const BEL: char = '\x07';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    /// One of the 16 standard colors, stored as its SGR code.
    Standard(u16),
    Rgb(u8, u8, u8),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Style {
    bold: bool,
    dim: bool,
    italic: bool,
    underline: bool,
    fg: Option<Color>,
    bg: Option<Color>,
}

impl Style {
    /// Apply the parameter list of one SGR sequence.
    fn apply(&mut self, params: &str) {
        // An empty parameter means 0; a malformed one is ignored.
        let mut codes = params
            .split([';', ':'])
            .map(|p| if p.is_empty() { Some(0) } else { p.parse::<u16>().ok() });

        while let Some(code) = codes.next() {
            let Some(code) = code else {
                continue;
            };
            match code {
                0 => *self = Self::default(),
                1 => self.bold = true,
                2 => self.dim = true,
                3 => self.italic = true,
                4 => self.underline = true,
                22 => {
                    self.bold = false;
                    self.dim = false;
                }
                23 => self.italic = false,
                24 => self.underline = false,
                30..=37 | 90..=97 => self.fg = Some(Color::Standard(code)),
                39 => self.fg = None,
                40..=47 | 100..=107 => self.bg = Some(Color::Standard(code)),
                49 => self.bg = None,
                38 => self.fg = extended_color(&mut codes, 30).or(self.fg),
                48 => self.bg = extended_color(&mut codes, 40).or(self.bg),
                _ => {}
            }
        }
    }

    /// Opening `<span>` for this style, or `None` for default text.
    fn open_tag(&self) -> Option<String> {
        if *self == Self::default() {
            return None;
        }

        let mut classes = Vec::new();
        let mut styles = Vec::new();
        for (on, class) in [
            (self.bold, "ansi1"),
            (self.dim, "ansi2"),
            (self.italic, "ansi3"),
            (self.underline, "ansi4"),
        ] {
            if on {
                classes.push(class.to_owned());
            }
        }
        for (color, property) in [(self.fg, "color"), (self.bg, "background-color")] {
            match color {
                Some(Color::Standard(code)) => classes.push(format!("ansi{code}")),
                Some(Color::Rgb(r, g, b)) => {
                    styles.push(format!("{property}: #{r:02x}{g:02x}{b:02x}"));
                }
                None => {}
            }
        }

        let mut tag = String::from("<span");
        if !classes.is_empty() {
            let _ = write!(tag, " class=\"{}\"", classes.join(" "));
        }
        if !styles.is_empty() {
            let _ = write!(tag, " style=\"{}\"", styles.join("; "));
        }
        tag.push('>');
        Some(tag)
    }
}

/// Color cube channel levels of the 256-color palette.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// `5;n` (palette) or `2;r;g;b` (24-bit) after a 38/48 code. `base` is the
/// SGR code of standard color 0 for this layer (30 or 40).
fn extended_color(codes: &mut impl Iterator<Item = Option<u16>>, base: u16) -> Option<Color> {
    match codes.next()?? {
        5 => {
            let index = u8::try_from(codes.next()??).ok()?;
            Some(match index {
                0..=7 => Color::Standard(base + u16::from(index)),
                8..=15 => Color::Standard(base + 60 + u16::from(index - 8)),
                16..=231 => {
                    let cube = usize::from(index - 16);
                    Color::Rgb(
                        CUBE_LEVELS[cube / 36],
                        CUBE_LEVELS[cube / 6 % 6],
                        CUBE_LEVELS[cube % 6],
                    )
                }
                232..=255 => {
                    let gray = 8 + 10 * (index - 232);
                    Color::Rgb(gray, gray, gray)
                }
            })
        }
        2 => {
            let mut channel = || codes.next().flatten().and_then(|v| u8::try_from(v).ok());
            Some(Color::Rgb(channel()?, channel()?, channel()?))
        }
        _ => None,
    }
}

/// Render ANSI-escaped `text` as HTML without the surrounding
/// `<pre>`/`<code>` elements.
pub(crate) fn render_ansi(text: &str) -> String {
    let mut html = String::with_capacity(text.len() + text.len() / 2);
    let mut style = Style::default();
    let mut rest = text;

    while !rest.is_empty() {
        let end = rest.find(ESC).unwrap_or(rest.len());
        push_styled(&mut html, &rest[..end], &style);
        rest = &rest[end..];
        if let Some(after) = rest.strip_prefix(ESC) {
            rest = skip_escape(after, &mut style);
        }
    }
    html
}

fn push_styled(html: &mut String, text: &str, style: &Style) {
    if text.is_empty() {
        return;
    }
    match style.open_tag() {
        Some(tag) => {
            html.push_str(&tag);
            escape_html_into(text, html);
            html.push_str("</span>");
        }
        None => escape_html_into(text, html),
    }
}

/// Consume one escape sequence (`after` starts right after `ESC`), applying
/// it to `style` if it is SGR. Returns the remaining text.
fn skip_escape<'a>(after: &'a str, style: &mut Style) -> &'a str {
    if let Some(body) = after.strip_prefix('[') {
        // CSI: parameter and intermediate bytes, then one final byte.
        let params_end = body
            .find(|c: char| !(' '..='?').contains(&c))
            .unwrap_or(body.len());
        return match body[params_end..].chars().next() {
            Some(last @ '@'..='~') => {
                if last == 'm' {
                    style.apply(&body[..params_end]);
                }
                &body[params_end + 1..]
            }
            _ => &body[params_end..],
        };
    }

    if let Some(body) = after.strip_prefix(']') {
        // OSC: terminated by BEL or by ST (`ESC \`).
        let bel = body.find(BEL).map(|i| (i, 1));
        let st = body.find("\x1b\\").map(|i| (i, 2));
        return match [bel, st].into_iter().flatten().min() {
            Some((i, len)) => &body[i + len..],
            None => "",
        };
    }

    // Other escapes: intermediate bytes, then one final character.
    let intermediates = after
        .find(|c: char| !(' '..='/').contains(&c))
        .unwrap_or(after.len());
    let mut tail = after[intermediates..].chars();
    tail.next();
    tail.as_str()
}
