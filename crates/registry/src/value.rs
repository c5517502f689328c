//! Dynamic field values carried by candidates.

use serde_json::Value;

/// The value of one candidate field, as seen by the validation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The field is absent from the candidate.
    Undefined,
    /// The field is present but explicitly null.
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A numeric value (integers are widened to `f64`).
    Number(f64),
    /// A string value.
    Text(String),
    /// A sequence; only the element count is kept.
    List(usize),
    /// A nested record; only the entry count is kept.
    Object(usize),
}

impl FieldValue {
    /// Returns true when the value counts as "present and non-empty/non-zero".
    ///
    /// Whitespace-only text is content, not emptiness. Empty lists and
    /// objects are present values and therefore truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(flag) => *flag,
            Self::Number(number) => *number != 0.0 && !number.is_nan(),
            Self::Text(text) => !text.is_empty(),
            Self::List(_) | Self::Object(_) => true,
        }
    }

    /// Returns true for numbers strictly greater than zero.
    ///
    /// Numeric-looking text is not coerced; callers that start from raw
    /// form input should go through [`FieldValue::coerce_number`].
    #[must_use]
    pub fn is_positive_number(&self) -> bool {
        matches!(self, Self::Number(number) if *number > 0.0)
    }

    /// Coerce raw form input into a number, the way a form handler's
    /// unary `+input` does.
    ///
    /// - empty or whitespace-only input is `0`
    /// - `Infinity`, `+Infinity` and `-Infinity` are infinite
    /// - `0x`, `0o` and `0b` prefixes read unsigned integers
    /// - anything else that is not a plain decimal literal is `NaN`
    ///
    /// The result is always [`FieldValue::Number`]; `NaN` fails both
    /// `required` and `positive`.
    #[must_use]
    pub fn coerce_number(input: &str) -> Self {
        Self::Number(numeric_literal(input.trim()))
    }

    /// Short type label used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }
}

fn numeric_literal(text: &str) -> f64 {
    match text {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {},
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return text
            .get(2..)
            .filter(|digits| !digits.starts_with('+'))
            .and_then(|digits| u64::from_str_radix(digits, radix).ok())
            .map_or(f64::NAN, widen_integer);
    }

    // `f64::from_str` also takes `inf`, `infinity` and `nan`; form input does not.
    let is_decimal = text
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '+' | '-'));
    if !is_decimal {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

#[allow(
    clippy::cast_precision_loss,
    reason = "form numbers are doubles; large literals round the same way"
)]
const fn widen_integer(value: u64) -> f64 {
    value as f64
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => number.as_f64().map_or(Self::Null, Self::Number),
            Value::String(text) => Self::Text(text.clone()),
            Value::Array(items) => Self::List(items.len()),
            Value::Object(entries) => Self::Object(entries.len()),
        }
    }
}

/// Conversion from a Rust field into a [`FieldValue`].
///
/// Implemented for the primitive types a derived `Validatable` struct is
/// expected to carry. `Option::None` maps to [`FieldValue::Null`].
pub trait IntoFieldValue {
    /// Snapshot the field as a dynamic value.
    fn to_field_value(&self) -> FieldValue;
}

impl IntoFieldValue for FieldValue {
    fn to_field_value(&self) -> FieldValue {
        self.clone()
    }
}

impl IntoFieldValue for str {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.to_string())
    }
}

impl IntoFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl IntoFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

macro_rules! lossless_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoFieldValue for $ty {
                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Number(f64::from(*self))
                }
            }
        )*
    };
}

lossless_number!(i8, i16, i32, u8, u16, u32, f32, f64);

macro_rules! widening_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoFieldValue for $ty {
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "validation only compares against zero"
                )]
                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Number(*self as f64)
                }
            }
        )*
    };
}

widening_number!(i64, u64, i128, u128, isize, usize);

impl<T: IntoFieldValue + ?Sized> IntoFieldValue for &T {
    fn to_field_value(&self) -> FieldValue {
        (**self).to_field_value()
    }
}

impl<T: IntoFieldValue + ?Sized> IntoFieldValue for Box<T> {
    fn to_field_value(&self) -> FieldValue {
        (**self).to_field_value()
    }
}

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        self.as_ref()
            .map_or(FieldValue::Null, IntoFieldValue::to_field_value)
    }
}

impl<T> IntoFieldValue for Vec<T> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::List(self.len())
    }
}

impl<T> IntoFieldValue for [T] {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::List(self.len())
    }
}
