//! Values flowing in and out of a [`Problem`](crate::testing::Problem):
//! tolerant comparison against the expected answer, and rendering for reports.

/// Absolute/relative error accepted between two floating point answers.
pub const FLOAT_EPS: f64 = 1e-9;

/// Equality under judging rules.
///
/// Floating point values are equal when `|a - b| <= 1e-9 * max(1, |a|)`
/// and neither is NaN. Everything else compares exactly, sequences
/// element-wise.
pub trait TolerantEq {
    fn tolerant_eq(&self, other: &Self) -> bool;
}

pub fn equals<T: TolerantEq + ?Sized>(a: &T, b: &T) -> bool {
    a.tolerant_eq(b)
}

pub fn float_eq(a: f64, b: f64) -> bool {
    !a.is_nan() && !b.is_nan() && (a - b).abs() <= FLOAT_EPS * f64::max(1.0, a.abs())
}

impl TolerantEq for f64 {
    fn tolerant_eq(&self, other: &Self) -> bool {
        float_eq(*self, *other)
    }
}

impl TolerantEq for f32 {
    fn tolerant_eq(&self, other: &Self) -> bool {
        float_eq(*self as f64, *other as f64)
    }
}

macro_rules! impl_exact_eq {
    ($($t:ty),* $(,)?) => {
        $(
            impl TolerantEq for $t {
                fn tolerant_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_exact_eq!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char, String, str);

impl<T: TolerantEq> TolerantEq for [T] {
    fn tolerant_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.tolerant_eq(b))
    }
}

impl<T: TolerantEq> TolerantEq for Vec<T> {
    fn tolerant_eq(&self, other: &Self) -> bool {
        self.as_slice().tolerant_eq(other.as_slice())
    }
}

impl<T: TolerantEq, const N: usize> TolerantEq for [T; N] {
    fn tolerant_eq(&self, other: &Self) -> bool {
        self.as_slice().tolerant_eq(other.as_slice())
    }
}

impl<T: TolerantEq + ?Sized> TolerantEq for &T {
    fn tolerant_eq(&self, other: &Self) -> bool {
        (**self).tolerant_eq(*other)
    }
}

/// Human readable rendering used in narration and report lines.
pub trait Describe {
    fn describe(&self) -> String;
}

impl Describe for String {
    fn describe(&self) -> String {
        format!("\"{}\"", self)
    }
}

impl Describe for str {
    fn describe(&self) -> String {
        format!("\"{}\"", self)
    }
}

impl Describe for char {
    fn describe(&self) -> String {
        format!("'{}'", self)
    }
}

impl Describe for f64 {
    fn describe(&self) -> String {
        format_significant(*self, 10)
    }
}

impl Describe for f32 {
    fn describe(&self) -> String {
        format_significant(*self as f64, 10)
    }
}

macro_rules! impl_display_describe {
    ($($t:ty),* $(,)?) => {
        $(
            impl Describe for $t {
                fn describe(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_display_describe!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool);

impl<T: Describe> Describe for [T] {
    fn describe(&self) -> String {
        let items: Vec<_> = self.iter().map(Describe::describe).collect();
        format!("{{{}}}", items.join(","))
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe(&self) -> String {
        self.as_slice().describe()
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe(&self) -> String {
        self.as_slice().describe()
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe(&self) -> String {
        (**self).describe()
    }
}

// Tuples are argument lists: `solve(a, b, c)` narrates as `[a,b,c]`.
macro_rules! impl_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: TolerantEq),+> TolerantEq for ($($name,)+) {
            fn tolerant_eq(&self, other: &Self) -> bool {
                true $(&& self.$idx.tolerant_eq(&other.$idx))+
            }
        }

        impl<$($name: Describe),+> Describe for ($($name,)+) {
            fn describe(&self) -> String {
                let items = [$(self.$idx.describe()),+];
                format!("[{}]", items.join(","))
            }
        }
    };
}

impl_tuple!(A: 0);
impl_tuple!(A: 0, B: 1);
impl_tuple!(A: 0, B: 1, C: 2);
impl_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

/// `printf("%.*g")`: shortest of fixed or scientific notation with `precision`
/// significant digits and trailing zeros removed.
pub fn format_significant(x: f64, precision: usize) -> String {
    if x.is_nan() {
        return "nan".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if x == 0.0 {
        return "0".to_owned();
    }

    let precision = precision.max(1);
    // Round first: 9.9999999999 may become 10 and move to the next exponent.
    let sci = format!("{:.*e}", precision - 1, x);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction_zeros(mantissa),
            sign,
            exp.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_fraction_zeros(&format!("{:.*}", decimals, x)).to_owned()
    }
}

fn trim_fraction_zeros(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}
