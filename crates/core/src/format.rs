//! Runtime positional `%` formatting for failure messages.
//!
//! Templates use printf-style directives and are checked against their
//! arguments when the message is built. Any mismatch is an [`Error`], never a
//! silently mangled message.
//!
//! A directive is `%[index:][flags][width][.precision]verb`:
//!
//! - `index:` picks an argument by position (`%1:s`); later directives
//!   without an index continue from the one after it.
//! - flags are `-` (left-align) and `0` (zero-pad numbers).
//! - `width` is the minimum rendered width in characters.
//! - `.precision` is the number of decimals for `f`/`e`, significant digits
//!   for `g`, and the maximum characters for `s`.
//!
//! | verb       | accepts                                            |
//! |------------|----------------------------------------------------|
//! | `%s`       | strings                                            |
//! | `%d`, `%i` | signed or unsigned integers                        |
//! | `%u`       | non-negative integers                              |
//! | `%f`       | floats, fixed notation                             |
//! | `%e`, `%E` | floats, scientific notation                        |
//! | `%g`, `%G` | floats, the shorter of fixed and scientific        |
//! | `%x`, `%X` | integers, lower/upper hex (two's complement, i64)  |
//! | `%t`       | booleans                                           |
//! | `%v`       | anything                                           |
//! | `%%`       | a literal `%`                                      |

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::Error;
use crate::result::Result;

const DEFAULT_FLOAT_PRECISION: usize = 6;
const MAX_PRECISION: usize = 32;
const MAX_WIDTH: usize = 1024;

/// A single positional formatting argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Arg {
    /// Human-readable name of the argument kind, used in mismatch errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "signed integer",
            Self::Uint(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

macro_rules! arg_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

arg_from!(Int: i8, i16, i32, i64);
arg_from!(Uint: u8, u16, u32, u64);
arg_from!(Float: f32, f64);
arg_from!(Bool: bool);
arg_from!(Str: &str, String, char);

impl From<isize> for Arg {
    fn from(value: isize) -> Self {
        i64::try_from(value).map_or(Self::Int(i64::MAX), Self::Int)
    }
}

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or(Self::Uint(u64::MAX), Self::Uint)
    }
}

/// A parsed `%` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder {
    index: Option<usize>,
    left: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
    verb: char,
}

impl Placeholder {
    /// Parse the directive following a `%`.
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Result<Self> {
        let zero_lead = chars.peek() == Some(&'0');
        let leading = parse_number(chars);
        let (index, leading) = if leading.is_some() && chars.next_if_eq(&':').is_some() {
            (leading, None)
        } else {
            (None, leading)
        };

        // `%05d`: the leading digits were flags and width all along.
        let mut left = false;
        let mut zero = zero_lead && leading.is_some();
        let width = match leading {
            Some(width) => Some(width),
            None => {
                loop {
                    if chars.next_if_eq(&'-').is_some() {
                        left = true;
                    } else if chars.next_if_eq(&'0').is_some() {
                        zero = true;
                    } else {
                        break;
                    }
                }
                parse_number(chars)
            }
        };

        let precision = if chars.next_if_eq(&'.').is_some() {
            Some(parse_number(chars).unwrap_or(0).min(MAX_PRECISION))
        } else {
            None
        };

        let verb = chars.next().ok_or(Error::DanglingPercent)?;
        let bare = index.is_none() && !left && !zero && width.is_none() && precision.is_none();
        let valid = match verb {
            '%' => bare,
            's' | 'f' | 'e' | 'E' | 'g' | 'G' => true,
            'd' | 'i' | 'u' | 'x' | 'X' | 't' | 'v' => precision.is_none(),
            _ => false,
        };
        if !valid {
            return Err(Error::UnknownPlaceholder { verb });
        }

        Ok(Self {
            index,
            left,
            zero,
            width: width.map(|w| w.min(MAX_WIDTH)),
            precision,
            verb,
        })
    }

    const fn is_numeric(self) -> bool {
        matches!(
            self.verb,
            'd' | 'i' | 'u' | 'f' | 'e' | 'E' | 'g' | 'G' | 'x' | 'X'
        )
    }

    fn render(self, index: usize, arg: &Arg) -> Result<String> {
        let mismatch = || Error::argument_mismatch(self.verb, index, arg.kind());
        let precision = self.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
        let body = match (self.verb, arg) {
            ('s', Arg::Str(s)) => self
                .precision
                .map_or_else(|| s.clone(), |max| s.chars().take(max).collect()),
            ('d' | 'i', Arg::Int(v)) => v.to_string(),
            ('d' | 'i' | 'u', Arg::Uint(v)) => v.to_string(),
            ('u', Arg::Int(v)) => u64::try_from(*v).map_err(|_| mismatch())?.to_string(),
            ('f', Arg::Float(v)) => format!("{v:.precision$}"),
            ('e' | 'E', Arg::Float(v)) => scientific(*v, precision),
            ('g' | 'G', Arg::Float(v)) => general(*v, precision),
            ('x', Arg::Int(v)) => format!("{v:x}"),
            ('x', Arg::Uint(v)) => format!("{v:x}"),
            ('X', Arg::Int(v)) => format!("{v:X}"),
            ('X', Arg::Uint(v)) => format!("{v:X}"),
            ('t', Arg::Bool(v)) => v.to_string(),
            ('v', any) => any.to_string(),
            _ => return Err(mismatch()),
        };
        let body = if matches!(self.verb, 'E' | 'G') {
            body.to_uppercase()
        } else {
            body
        };
        Ok(self.pad(body))
    }

    fn pad(self, body: String) -> String {
        let fill = self
            .width
            .map_or(0, |width| width.saturating_sub(body.chars().count()));
        if fill == 0 {
            return body;
        }

        if self.left {
            return body + &" ".repeat(fill);
        }

        let (sign, digits) = body
            .strip_prefix('-')
            .map_or(("", body.as_str()), |rest| ("-", rest));
        if self.zero && self.is_numeric() && digits.starts_with(|c: char| c.is_ascii_digit()) {
            format!("{sign}{}{digits}", "0".repeat(fill))
        } else {
            format!("{}{body}", " ".repeat(fill))
        }
    }
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value = None;
    while let Some(digit) = chars.next_if(char::is_ascii_digit).and_then(|c| c.to_digit(10)) {
        let digit = usize::try_from(digit).unwrap_or_default();
        value = Some(value.unwrap_or(0usize).saturating_mul(10).saturating_add(digit));
    }
    value
}

/// `1.500000e+00` style: at least two exponent digits, always signed.
fn scientific(v: f64, precision: usize) -> String {
    let rendered = format!("{v:.precision$e}");
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = exponent
                .strip_prefix('-')
                .map_or(("+", exponent), |rest| ("-", rest));
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => rendered,
    }
}

/// `%g`: fixed notation unless the exponent is below -4 or reaches the
/// precision, with trailing zeros removed either way.
fn general(v: f64, precision: usize) -> String {
    if !v.is_finite() {
        return v.to_string();
    }

    let significant = precision.max(1);
    let decimals = significant.saturating_sub(1);
    let exponent = format!("{v:.decimals$e}")
        .split_once('e')
        .and_then(|(_, exponent)| exponent.parse::<i64>().ok())
        .unwrap_or(0);
    let limit = i64::try_from(significant).unwrap_or(i64::MAX);

    if exponent < -4 || exponent >= limit {
        let rendered = scientific(v, decimals);
        match rendered.split_once('e') {
            Some((mantissa, rest)) => format!("{}e{rest}", trim_fraction(mantissa)),
            None => rendered,
        }
    } else {
        let fixed = usize::try_from(limit.saturating_sub(1).saturating_sub(exponent)).unwrap_or(0);
        trim_fraction(&format!("{v:.fixed$}")).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Interpolate `args` into `template`.
///
/// Directives without an index take arguments in order. Every argument must
/// be used by at least one directive.
///
/// # Errors
///
/// Returns an error when a placeholder has no argument, when arguments are
/// left unused, when an argument's kind does not fit its verb, or when the
/// template itself is malformed.
pub fn interpolate(template: &str, args: &[Arg]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut used = vec![false; args.len()];
    let mut cursor = 0usize;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let placeholder = Placeholder::parse(&mut chars)?;
        if placeholder.verb == '%' {
            out.push('%');
            continue;
        }

        let index = placeholder.index.unwrap_or(cursor);
        let arg = args.get(index).ok_or(Error::MissingArgument { index })?;
        out.push_str(&placeholder.render(index, arg)?);
        if let Some(slot) = used.get_mut(index) {
            *slot = true;
        }
        cursor = index.saturating_add(1);
    }

    let consumed = used.iter().filter(|u| **u).count();
    if consumed < args.len() {
        return Err(Error::ExtraArguments {
            expected: consumed,
            supplied: args.len(),
        });
    }

    Ok(out)
}
