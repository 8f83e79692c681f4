//! Provider traits.
//!
//! A geometry type describes its attributes with two kinds of providers:
//! builtin providers for fixed, well-known attributes and dynamic providers for
//! collections of attributes discovered at runtime. Providers reach into the
//! owning geometry only through [`CustomDataAccess`].

use crate::array::GValue;
use crate::attribute::{AttributeInit, AttributeIter, AttributeReader, AttributeValidator, AttributeWriter, TagModifiedFn};
use crate::custom_data::CustomData;
use crate::util::{AttrDomain, AttrType};

// ============================================================================
// Owner Access
// ============================================================================

/// Access to one domain's layer storage of an owner.
pub trait CustomDataAccess<O>: Send + Sync {
    /// Mutable layer storage, `None` if the owner has none for this domain.
    fn custom_data<'a>(&self, owner: &'a mut O) -> Option<&'a mut CustomData>;

    /// Layer storage for reading.
    fn const_custom_data<'a>(&self, owner: &'a O) -> Option<&'a CustomData>;

    /// Number of elements in the domain.
    fn element_num(&self, owner: &O) -> usize;

    /// Notifier to run after the attribute `name` was modified.
    fn tag_modified_function(&self, _owner: &O, _name: &str) -> Option<TagModifiedFn> {
        None
    }
}

// ============================================================================
// Builtin Providers
// ============================================================================

/// Whether a builtin attribute may be removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deletability {
    Deletable,
    NonDeletable,
}

/// Fixed identity of a builtin attribute.
#[derive(Clone, Debug)]
pub struct BuiltinAttributeInfo {
    pub name: &'static str,
    pub domain: AttrDomain,
    pub data_type: AttrType,
    pub deletable: Deletability,
    pub validator: Option<AttributeValidator>,
    pub default_value: Option<GValue>,
}

impl BuiltinAttributeInfo {
    pub fn new(
        name: &'static str,
        domain: AttrDomain,
        data_type: AttrType,
        deletable: Deletability,
    ) -> Self {
        Self {
            name,
            domain,
            data_type,
            deletable,
            validator: None,
            default_value: None,
        }
    }

    pub fn with_validator(mut self, validator: AttributeValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Set the value used by [`AttributeInit::DefaultValue`]. Ignored if its type differs.
    pub fn with_default_value(mut self, value: impl Into<GValue>) -> Self {
        let value = value.into();
        if value.data_type() == self.data_type {
            self.default_value = Some(value);
        }
        self
    }
}

/// Provider of exactly one named attribute with a fixed domain and type.
pub trait BuiltinAttributeProvider<O: 'static>: Send + Sync {
    /// Identity of the attribute.
    fn info(&self) -> &BuiltinAttributeInfo;

    /// Read view, `None` if the attribute does not currently exist.
    fn try_get_for_read<'a>(&self, owner: &'a O) -> Option<AttributeReader<'a>>;

    /// Write view, `None` if the attribute does not currently exist.
    fn try_get_for_write<'a>(&self, owner: &'a mut O) -> Option<AttributeWriter<'a>>;

    /// Remove the attribute. Fails for non-deletable or missing attributes.
    fn try_delete(&self, owner: &mut O) -> bool;

    /// Create the attribute. Fails if it already exists or the initializer does not fit.
    fn try_create(&self, owner: &mut O, initializer: AttributeInit<'_>) -> bool;

    /// Whether the attribute currently exists.
    fn exists(&self, owner: &O) -> bool;

    #[inline]
    fn name(&self) -> &'static str {
        self.info().name
    }

    #[inline]
    fn domain(&self) -> AttrDomain {
        self.info().domain
    }

    #[inline]
    fn data_type(&self) -> AttrType {
        self.info().data_type
    }

    #[inline]
    fn deletable(&self) -> Deletability {
        self.info().deletable
    }

    #[inline]
    fn validator(&self) -> Option<AttributeValidator> {
        self.info().validator
    }

    #[inline]
    fn default_value(&self) -> Option<&GValue> {
        self.info().default_value.as_ref()
    }
}

// ============================================================================
// Dynamic Providers
// ============================================================================

/// Provider of a runtime collection of named attributes.
pub trait DynamicAttributesProvider<O: 'static>: Send + Sync {
    /// Read view of `name`, `None` if this provider does not own it.
    fn try_get_for_read<'a>(&self, owner: &'a O, name: &str) -> Option<AttributeReader<'a>>;

    /// Write view of `name`, `None` if this provider does not own it.
    fn try_get_for_write<'a>(&self, owner: &'a mut O, name: &str) -> Option<AttributeWriter<'a>>;

    /// Remove `name`. Fails if this provider does not own it.
    fn try_delete(&self, owner: &mut O, name: &str) -> bool;

    /// Create an attribute.
    ///
    /// A refused initializer is handed back so the next provider can use it.
    fn try_create<'i>(
        &self,
        _owner: &mut O,
        _name: &str,
        _domain: AttrDomain,
        _data_type: AttrType,
        initializer: AttributeInit<'i>,
    ) -> Result<(), AttributeInit<'i>> {
        Err(initializer)
    }

    /// Whether this provider owns `name`.
    fn contains(&self, owner: &O, name: &str) -> bool {
        self.try_get_for_read(owner, name).is_some()
    }

    /// Visit every attribute in storage order.
    ///
    /// Returns `false` if the callback requested a stop.
    fn foreach_attribute(&self, owner: &O, f: &mut dyn FnMut(&AttributeIter<'_, O>)) -> bool;

    /// Emit every domain this provider can serve.
    fn foreach_domain(&self, f: &mut dyn FnMut(AttrDomain));
}
