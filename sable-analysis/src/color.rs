//! Color support: pure hex/rgb/hsl conversions plus the document scan that
//! locates color literals in style-property values.
//!
//! The scan runs over the engine's sanitized text, so color-like sequences
//! inside comments are never reported, and a literal only qualifies when the
//! text before it on the same line assigns a color-accepting style property.

use once_cell::sync::Lazy;
use regex::Regex;

use sable::context::DocumentStateContext;
use sable::document::Range;

use crate::vocabulary::style_property;

static COLOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)#[0-9a-f]{6}\b|#[0-9a-f]{3}\b|rgba?\([^)]*\)|hsla?\([^)]*\)").unwrap()
});

/// Matches a line prefix that assigns a style property: the property name
/// followed by `:` or `=` and anything that is not a new assignment.
static PROPERTY_PREFIX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([a-z][a-z-]*)\s*[:=]\s*[^:;{}]*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees (0..360), saturation and lightness in 0..1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

pub fn rgb_to_hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

pub fn rgb_to_hsl(color: Rgb) -> Hsl {
    let r = color.r as f64 / 255.0;
    let g = color.g as f64 / 255.0;
    let b = color.b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }
    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let h = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    Hsl { h: h * 60.0, s, l }
}

pub fn hsl_to_rgb(color: Hsl) -> Rgb {
    let h = color.h.rem_euclid(360.0) / 360.0;
    let s = color.s.clamp(0.0, 1.0);
    let l = color.l.clamp(0.0, 1.0);
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb { r: v, g: v, b: v };
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f64| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round() as u8
    };
    Rgb {
        r: channel(h + 1.0 / 3.0),
        g: channel(h),
        b: channel(h - 1.0 / 3.0),
    }
}

/// Parse any textual color form this crate understands: `#rgb`, `#rrggbb`,
/// `rgb()/rgba()`, `hsl()/hsla()`.
pub fn parse_color(text: &str) -> Option<Rgb> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = text.to_lowercase();
    if let Some(args) = call_args(&lower, &["rgb", "rgba"]) {
        let mut parts = args.split(',').map(str::trim);
        let r = parts.next()?.parse().ok()?;
        let g = parts.next()?.parse().ok()?;
        let b = parts.next()?.parse().ok()?;
        return Some(Rgb { r, g, b });
    }
    if let Some(args) = call_args(&lower, &["hsl", "hsla"]) {
        let mut parts = args.split(',').map(str::trim);
        let h: f64 = parts.next()?.parse().ok()?;
        let s: f64 = parts.next()?.strip_suffix('%')?.parse().ok()?;
        let l: f64 = parts.next()?.strip_suffix('%')?.parse().ok()?;
        return Some(hsl_to_rgb(Hsl {
            h,
            s: s / 100.0,
            l: l / 100.0,
        }));
    }
    None
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16));
            let r = digits.next()??;
            let g = digits.next()??;
            let b = digits.next()??;
            Some(Rgb {
                r: (r * 17) as u8,
                g: (g * 17) as u8,
                b: (b * 17) as u8,
            })
        }
        6 => Some(Rgb {
            r: u8::from_str_radix(&hex[0..2], 16).ok()?,
            g: u8::from_str_radix(&hex[2..4], 16).ok()?,
            b: u8::from_str_radix(&hex[4..6], 16).ok()?,
        }),
        _ => None,
    }
}

fn call_args<'a>(text: &'a str, names: &[&str]) -> Option<&'a str> {
    for name in names {
        if let Some(rest) = text.strip_prefix(name) {
            return rest.trim().strip_prefix('(')?.strip_suffix(')');
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorMatch {
    pub range: Range,
    pub color: Rgb,
}

/// Find color literals in style-property values, outside comments.
pub fn find_colors(ctx: &DocumentStateContext<'_>) -> Vec<ColorMatch> {
    let text = &ctx.sanitized_document_text;
    let mut matches = Vec::new();
    for m in COLOR_PATTERN.find_iter(text) {
        let Some(color) = parse_color(m.as_str()) else { continue };
        let line_start = text[..m.start()].rfind('\n').map_or(0, |i| i + 1);
        let prefix = &text[line_start..m.start()];
        let qualifies = PROPERTY_PREFIX_PATTERN
            .captures(prefix)
            .and_then(|caps| style_property(&caps[1]))
            .is_some_and(|prop| prop.accepts_color);
        if !qualifies {
            continue;
        }
        matches.push(ColorMatch {
            range: ctx.document.range_at(m.start()..m.end()),
            color,
        });
    }
    matches
}

/// The textual presentations offered for a picked color.
pub fn presentations(color: Rgb) -> Vec<String> {
    let hsl = rgb_to_hsl(color);
    vec![
        rgb_to_hex(color),
        format!("rgb({}, {}, {})", color.r, color.g, color.b),
        format!(
            "hsl({:.0}, {:.0}%, {:.0}%)",
            hsl.h,
            hsl.s * 100.0,
            hsl.l * 100.0
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sable::context::document_state_context;
    use sable::document::TextDocument;

    #[rstest]
    #[case("#ff8000", Rgb { r: 255, g: 128, b: 0 })]
    #[case("#f80", Rgb { r: 255, g: 136, b: 0 })]
    #[case("rgb(12, 34, 56)", Rgb { r: 12, g: 34, b: 56 })]
    #[case("rgba(12, 34, 56, 0.5)", Rgb { r: 12, g: 34, b: 56 })]
    #[case("hsl(0, 100%, 50%)", Rgb { r: 255, g: 0, b: 0 })]
    #[case("hsl(120, 100%, 25%)", Rgb { r: 0, g: 128, b: 0 })]
    fn parses_color_forms(#[case] text: &str, #[case] expected: Rgb) {
        assert_eq!(parse_color(text), Some(expected));
    }

    #[rstest]
    #[case("#ggg")]
    #[case("#12345")]
    #[case("rgb(1,2)")]
    #[case("hsl(1,2,3)")]
    fn rejects_malformed_colors(#[case] text: &str) {
        assert_eq!(parse_color(text), None);
    }

    #[test]
    fn hsl_round_trip() {
        for color in [
            Rgb { r: 255, g: 0, b: 0 },
            Rgb { r: 0, g: 128, b: 0 },
            Rgb { r: 12, g: 34, b: 56 },
            Rgb { r: 200, g: 200, b: 200 },
        ] {
            assert_eq!(hsl_to_rgb(rgb_to_hsl(color)), color);
        }
    }

    #[test]
    fn finds_colors_only_in_color_property_values() {
        let text = "\
<style>
body { color: #ff8000; }
p { font-family: #Arial#; margin: rgb(1,2,3); }
div { background-color: rgb(0, 0, 255); }
</style>";
        let doc = TextDocument::from_text(text);
        let ctx = document_state_context(&doc, false);
        let found = find_colors(&ctx);
        let raws: Vec<&str> = found.iter().map(|m| &text[m.range.span.clone()]).collect();
        assert_eq!(raws, vec!["#ff8000", "rgb(0, 0, 255)"]);
        assert_eq!(found[0].color, Rgb { r: 255, g: 128, b: 0 });
    }

    #[test]
    fn commented_colors_are_not_reported() {
        let text = "<!-- color: #ff0000 -->\n<style>a { color: #00ff00; }</style>";
        let doc = TextDocument::from_text(text);
        let ctx = document_state_context(&doc, false);
        let found = find_colors(&ctx);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].range.span.clone()], "#00ff00");
    }

    #[test]
    fn presentation_forms() {
        let forms = presentations(Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(forms[0], "#ff0000");
        assert_eq!(forms[1], "rgb(255, 0, 0)");
        assert_eq!(forms[2], "hsl(0, 100%, 50%)");
    }
}
