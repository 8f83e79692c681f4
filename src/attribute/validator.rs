//! Value constraints attached to builtin attributes.

use std::fmt;

use crate::array::{GMutSpan, GSpan};

/// Normalize and check functions for an attribute's values.
///
/// Generic write access runs `normalize` when the writer finishes, then checks
/// the result with `is_valid`.
#[derive(Clone, Copy)]
pub struct AttributeValidator {
    pub normalize: for<'s> fn(GMutSpan<'s>),
    pub is_valid: for<'s> fn(GSpan<'s>) -> bool,
}

impl AttributeValidator {
    /// Normalize `span` in place and report whether it is valid afterwards.
    pub fn validate(&self, mut span: GMutSpan<'_>) -> bool {
        (self.normalize)(span.reborrow());
        (self.is_valid)(span.as_span())
    }

    /// Clamp 32-bit integers to at least `MIN`.
    pub const fn int32_min<const MIN: i32>() -> Self {
        Self {
            normalize: clamp_i32::<MIN>,
            is_valid: all_i32_at_least::<MIN>,
        }
    }

    /// Clamp 8-bit integers to `MIN..=MAX`.
    pub const fn int8_range<const MIN: i8, const MAX: i8>() -> Self {
        Self {
            normalize: clamp_i8::<MIN, MAX>,
            is_valid: all_i8_in_range::<MIN, MAX>,
        }
    }
}

impl fmt::Debug for AttributeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeValidator").finish_non_exhaustive()
    }
}

fn clamp_i32<const MIN: i32>(mut span: GMutSpan<'_>) {
    if let Some(values) = span.typed_mut::<i32>() {
        for v in values {
            *v = (*v).max(MIN);
        }
    }
}

fn all_i32_at_least<const MIN: i32>(span: GSpan<'_>) -> bool {
    span.typed::<i32>()
        .is_some_and(|values| values.iter().all(|&v| v >= MIN))
}

fn clamp_i8<const MIN: i8, const MAX: i8>(mut span: GMutSpan<'_>) {
    if let Some(values) = span.typed_mut::<i8>() {
        for v in values {
            *v = (*v).clamp(MIN, MAX);
        }
    }
}

fn all_i8_in_range<const MIN: i8, const MAX: i8>(span: GSpan<'_>) -> bool {
    span.typed::<i8>()
        .is_some_and(|values| values.iter().all(|v| (MIN..=MAX).contains(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int32_min() {
        let validator = AttributeValidator::int32_min::<0>();
        let mut values = [-3i32, 0, 5];
        assert!(!(validator.is_valid)(GSpan::new(&values)));
        assert!(validator.validate(GMutSpan::new(&mut values)));
        assert_eq!(values, [0, 0, 5]);
    }

    #[test]
    fn test_int8_range() {
        let validator = AttributeValidator::int8_range::<0, 3>();
        let mut values = [-1i8, 2, 9];
        assert!(validator.validate(GMutSpan::new(&mut values)));
        assert_eq!(values, [0, 2, 3]);
    }

    #[test]
    fn test_wrong_type_is_invalid() {
        let validator = AttributeValidator::int32_min::<1>();
        let mut values = [0.5f32];
        assert!(!validator.validate(GMutSpan::new(&mut values)));
        assert_eq!(values, [0.5]);
    }
}
