//! Fill policies for newly created attributes.

use std::sync::Arc;

use crate::array::{GArray, GSpan, GValue};
use crate::util::AttrType;

/// How the values of a new attribute are initialized.
#[derive(Clone, Debug)]
pub enum AttributeInit<'a> {
    /// Builtin default value if there is one, otherwise the type's default
    DefaultValue,
    /// Every element set to one value
    Value(GValue),
    /// All bytes zero
    Zeroed,
    /// Copy of existing values
    Copy(GSpan<'a>),
    /// Take ownership of an array
    Move(GArray),
    /// Share an existing array without copying it
    Shared(Arc<GArray>),
}

impl<'a> AttributeInit<'a> {
    /// Whether this initializer can produce `len` values of `data_type`.
    pub fn fits(&self, data_type: AttrType, len: usize) -> bool {
        match self {
            Self::DefaultValue | Self::Zeroed => true,
            Self::Value(value) => value.data_type() == data_type,
            Self::Copy(span) => span.data_type() == data_type && span.len() == len,
            Self::Move(array) => array.data_type() == data_type && array.len() == len,
            Self::Shared(array) => array.data_type() == data_type && array.len() == len,
        }
    }

    /// Produce the array for a new attribute.
    ///
    /// Returns the initializer unchanged when it does not fit, so another
    /// provider can try it.
    pub fn build(
        self,
        data_type: AttrType,
        len: usize,
        default_value: Option<&GValue>,
    ) -> Result<Arc<GArray>, Self> {
        if !self.fits(data_type, len) {
            return Err(self);
        }
        let array = match self {
            Self::DefaultValue => match default_value.filter(|v| v.data_type() == data_type) {
                Some(value) => GArray::filled(value, len),
                None => GArray::default_filled(data_type, len),
            },
            Self::Value(value) => GArray::filled(&value, len),
            Self::Zeroed => GArray::zeroed(data_type, len),
            Self::Copy(span) => GArray::from_span(span),
            Self::Move(array) => array,
            Self::Shared(array) => return Ok(array),
        };
        Ok(Arc::new(array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_default_value_prefers_builtin_default() {
        let radius = GValue::new(0.01f32);
        let array = AttributeInit::DefaultValue
            .build(AttrType::Float, 3, Some(&radius))
            .unwrap();
        assert_eq!(array.typed::<f32>(), Some(&[0.01f32; 3][..]));

        let rotations = AttributeInit::DefaultValue
            .build(AttrType::Quaternion, 2, Some(&radius))
            .unwrap();
        assert_eq!(rotations.typed::<Quat>(), Some(&[Quat::IDENTITY; 2][..]));
    }

    #[test]
    fn test_zeroed_and_value() {
        let zeros = AttributeInit::Zeroed.build(AttrType::Int32, 2, None).unwrap();
        assert_eq!(zeros.typed::<i32>(), Some(&[0, 0][..]));

        let sevens = AttributeInit::Value(GValue::new(7i32))
            .build(AttrType::Int32, 2, None)
            .unwrap();
        assert_eq!(sevens.typed::<i32>(), Some(&[7, 7][..]));
    }

    #[test]
    fn test_copy_checks_length() {
        let values = [1.0f32, 2.0];
        assert!(AttributeInit::Copy(GSpan::new(&values))
            .build(AttrType::Float, 3, None)
            .is_err());
        let array = AttributeInit::Copy(GSpan::new(&values))
            .build(AttrType::Float, 2, None)
            .unwrap();
        assert_eq!(array.typed::<f32>(), Some(&values[..]));
    }

    #[test]
    fn test_rejected_move_is_handed_back() {
        let init = AttributeInit::Move(GArray::from_vec(vec![1i32, 2]));
        let Err(returned) = init.build(AttrType::Float, 2, None) else {
            panic!("type mismatch must be rejected");
        };
        let array = returned.build(AttrType::Int32, 2, None).unwrap();
        assert_eq!(array.typed::<i32>(), Some(&[1, 2][..]));
    }

    #[test]
    fn test_shared_keeps_array() {
        let shared = Arc::new(GArray::from_vec(vec![1.0f32]));
        let array = AttributeInit::Shared(shared.clone())
            .build(AttrType::Float, 1, None)
            .unwrap();
        assert!(Arc::ptr_eq(&shared, &array));
    }
}
