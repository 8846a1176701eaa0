use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// A run of digits; `hex` runs mix digits with one case of `a-f`.
    Number { hex: bool, digits: &'a str },
    Char(char),
}

/// Orders identifiers the way a person would: `Name_2` before `Name_10`.
///
/// Decimal digit runs compare by value. Runs of hex digits standing alone between separators
/// (such as an `AARRGGBB` color suffix) compare by value when they are consistently cased.
/// Non-alphanumerics sort before alphanumerics, letters compare case-insensitively with
/// lowercase first on ties, and identical tokenizations fall back to ordinal order. This is a
/// total order.
pub fn alphanumeric_cmp(a: &str, b: &str) -> Ordering {
    let ta = tokenize(a);
    let tb = tokenize(b);
    for (x, y) in ta.iter().zip(tb.iter()) {
        let o = cmp_token(x, y);
        if o != Ordering::Equal {
            return o;
        }
    }
    ta.len().cmp(&tb.len()).then_with(|| a.cmp(b))
}

fn tokenize(s: &str) -> Vec<Token<'_>> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let end_of = |j: usize| chars.get(j).map_or(s.len(), |(p, _)| *p);
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        let at_boundary = i == 0 || !chars[i - 1].1.is_alphanumeric();

        if at_boundary && c.is_ascii_hexdigit() {
            let mut j = i;
            let mut upper: Option<bool> = None;
            let mut has_digit = false;
            let mut has_letter = false;
            while j < chars.len() {
                match chars[j].1 {
                    '0'..='9' => has_digit = true,
                    'A'..='F' if upper != Some(false) => {
                        upper = Some(true);
                        has_letter = true;
                    }
                    'a'..='f' if upper != Some(true) => {
                        upper = Some(false);
                        has_letter = true;
                    }
                    _ => break,
                }
                j += 1;
            }
            let closes = j == chars.len() || !chars[j].1.is_alphanumeric();
            if has_digit && has_letter && closes {
                out.push(Token::Number {
                    hex: true,
                    digits: &s[start..end_of(j)],
                });
                i = j;
                continue;
            }
        }

        if c.is_ascii_digit() {
            let mut j = i;
            while j < chars.len() && chars[j].1.is_ascii_digit() {
                j += 1;
            }
            out.push(Token::Number {
                hex: false,
                digits: &s[start..end_of(j)],
            });
            i = j;
            continue;
        }

        out.push(Token::Char(c));
        i += 1;
    }
    out
}

fn rank(t: &Token<'_>) -> u8 {
    match t {
        Token::Char(c) if !c.is_alphanumeric() => 0,
        Token::Number { .. } => 1,
        Token::Char(_) => 2,
    }
}

fn cmp_token(x: &Token<'_>, y: &Token<'_>) -> Ordering {
    let by_rank = rank(x).cmp(&rank(y));
    if by_rank != Ordering::Equal {
        return by_rank;
    }
    match (x, y) {
        (
            Token::Number {
                hex: hx,
                digits: dx,
            },
            Token::Number {
                hex: hy,
                digits: dy,
            },
        ) => hx.cmp(hy).then_with(|| cmp_digits(dx, dy)),
        (Token::Char(cx), Token::Char(cy)) => cmp_char(*cx, *cy),
        _ => Ordering::Equal,
    }
}

/// Numeric comparison of arbitrarily long digit strings, then fewer leading zeros first.
fn cmp_digits(x: &str, y: &str) -> Ordering {
    let sx = x.trim_start_matches('0');
    let sy = y.trim_start_matches('0');
    sx.len()
        .cmp(&sy.len())
        .then_with(|| {
            sx.bytes()
                .map(|b| b.to_ascii_uppercase())
                .cmp(sy.bytes().map(|b| b.to_ascii_uppercase()))
        })
        .then_with(|| x.len().cmp(&y.len()))
}

fn cmp_char(x: char, y: char) -> Ordering {
    if x == y {
        return Ordering::Equal;
    }
    if x.is_alphabetic() && y.is_alphabetic() {
        let ux = x.to_uppercase().next().unwrap_or(x);
        let uy = y.to_uppercase().next().unwrap_or(y);
        if ux != uy {
            return ux.cmp(&uy);
        }
        return x.is_uppercase().cmp(&y.is_uppercase()).then(x.cmp(&y));
    }
    x.cmp(&y)
}

#[cfg(test)]
#[path = "../../tests/unit/naming/alphanumeric.rs"]
mod tests;
