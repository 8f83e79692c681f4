//! Public attribute API of a geometry.
//!
//! [`AttributeAccessor`] and [`MutableAttributeAccessor`] pair a geometry with the
//! static dispatch table of its type. All geometry types expose the same API
//! through them.

use std::borrow::Cow;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use super::{AttributeInit, AttributeIter, AttributeReader, AttributeValidator, AttributeWriter};
use crate::array::GValue;
use crate::provider::AttributeAccessorFunctions;
use crate::util::{AttrDomain, AttrPod, AttrType};

/// Domain and type of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct AttributeDomainAndType {
    pub domain: AttrDomain,
    pub data_type: AttrType,
}

/// Read access to the attributes of a geometry.
pub struct AttributeAccessor<'a, O: 'static> {
    owner: &'a O,
    functions: &'static AttributeAccessorFunctions<O>,
}

impl<O: 'static> Clone for AttributeAccessor<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: 'static> Copy for AttributeAccessor<'_, O> {}

impl<'a, O: 'static> AttributeAccessor<'a, O> {
    pub fn new(owner: &'a O, functions: &'static AttributeAccessorFunctions<O>) -> Self {
        Self { owner, functions }
    }

    #[inline]
    pub fn owner(&self) -> &'a O {
        self.owner
    }

    /// Whether an attribute with this name exists on any domain.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup_meta_data(name).is_some()
    }

    pub fn lookup(&self, name: &str) -> Option<AttributeReader<'a>> {
        (self.functions.lookup)(self.owner, name)
    }

    /// Typed values of an attribute, `None` if it is missing or has another type.
    pub fn lookup_typed<T: AttrPod>(&self, name: &str) -> Option<Cow<'a, [T]>> {
        self.lookup(name)?.into_typed()
    }

    /// Domain and type of an existing attribute.
    pub fn lookup_meta_data(&self, name: &str) -> Option<AttributeDomainAndType> {
        let mut result = None;
        self.foreach_attribute(|iter| {
            if iter.name == name {
                result = Some(AttributeDomainAndType {
                    domain: iter.domain,
                    data_type: iter.data_type,
                });
                iter.stop();
            }
        });
        result
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        (self.functions.builtin_domain_and_type)(self.owner, name).is_some()
    }

    /// Domain and type a builtin attribute has whenever it exists.
    pub fn builtin_domain_and_type(&self, name: &str) -> Option<AttributeDomainAndType> {
        (self.functions.builtin_domain_and_type)(self.owner, name)
    }

    pub fn builtin_default_value(&self, name: &str) -> Option<&'static GValue> {
        (self.functions.builtin_default_value)(self.owner, name)
    }

    pub fn lookup_validator(&self, name: &str) -> Option<AttributeValidator> {
        (self.functions.lookup_validator)(self.owner, name)
    }

    pub fn domain_supported(&self, domain: AttrDomain) -> bool {
        (self.functions.domain_supported)(self.owner, domain)
    }

    /// Number of elements in a domain, 0 for unsupported domains.
    pub fn domain_size(&self, domain: AttrDomain) -> usize {
        (self.functions.domain_size)(self.owner, domain)
    }

    /// Visit every attribute once. Returns `false` if the callback stopped early.
    pub fn foreach_attribute<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&AttributeIter<'_, O>),
    {
        (self.functions.foreach_attribute)(self.owner, &mut f, self.functions)
    }

    /// Names of all attributes in enumeration order.
    pub fn all_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.foreach_attribute(|iter| names.push(iter.name.to_string()));
        names
    }
}

/// Read and write access to the attributes of a geometry.
pub struct MutableAttributeAccessor<'a, O: 'static> {
    owner: &'a mut O,
    functions: &'static AttributeAccessorFunctions<O>,
}

impl<'a, O: 'static> MutableAttributeAccessor<'a, O> {
    pub fn new(owner: &'a mut O, functions: &'static AttributeAccessorFunctions<O>) -> Self {
        Self { owner, functions }
    }

    /// Read-only view of the same geometry.
    #[inline]
    pub fn as_const(&self) -> AttributeAccessor<'_, O> {
        AttributeAccessor::new(&*self.owner, self.functions)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.as_const().contains(name)
    }

    pub fn lookup(&self, name: &str) -> Option<AttributeReader<'_>> {
        self.as_const().lookup(name)
    }

    pub fn lookup_meta_data(&self, name: &str) -> Option<AttributeDomainAndType> {
        self.as_const().lookup_meta_data(name)
    }

    pub fn all_names(&self) -> Vec<String> {
        self.as_const().all_names()
    }

    /// Write access to an attribute.
    ///
    /// Builtin validators are attached to the writer, so values are normalized
    /// before the change notifier runs.
    pub fn lookup_for_write(&mut self, name: &str) -> Option<AttributeWriter<'_>> {
        let validator = (self.functions.lookup_validator)(&*self.owner, name);
        let writer = (self.functions.lookup_for_write)(&mut *self.owner, name)?;
        Some(writer.with_validator(validator))
    }

    /// Create an attribute. Fails if the name is empty or already used.
    pub fn add(
        &mut self,
        name: &str,
        domain: AttrDomain,
        data_type: AttrType,
        initializer: AttributeInit<'_>,
    ) -> bool {
        if name.is_empty() {
            trace!("add: empty attribute name");
            return false;
        }
        if self.contains(name) {
            trace!("add '{}': name already in use", name);
            return false;
        }
        (self.functions.add)(&mut *self.owner, name, domain, data_type, initializer)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        (self.functions.remove)(&mut *self.owner, name)
    }

    /// Write access to an attribute, creating it first if it does not exist.
    ///
    /// An existing attribute with another domain or type is left untouched and
    /// `None` is returned.
    pub fn lookup_or_add_for_write(
        &mut self,
        name: &str,
        domain: AttrDomain,
        data_type: AttrType,
        initializer: AttributeInit<'_>,
    ) -> Option<AttributeWriter<'_>> {
        if let Some(meta_data) = self.lookup_meta_data(name) {
            if meta_data.domain != domain || meta_data.data_type != data_type {
                return None;
            }
            return self.lookup_for_write(name);
        }
        if !self.add(name, domain, data_type, initializer) {
            return None;
        }
        self.lookup_for_write(name)
    }

    /// Give a non-builtin attribute a new name. Stored values are shared with the
    /// new attribute, not copied.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> bool {
        let accessor = self.as_const();
        if old_name == new_name {
            return accessor.contains(old_name);
        }
        if accessor.is_builtin(old_name) || accessor.is_builtin(new_name) {
            return false;
        }
        if new_name.is_empty() || accessor.contains(new_name) {
            return false;
        }
        let Some(meta_data) = accessor.lookup_meta_data(old_name) else {
            return false;
        };
        let Some(reader) = accessor.lookup(old_name) else {
            return false;
        };
        let initializer = match reader.sharing_info {
            Some(shared) => AttributeInit::Shared(Arc::clone(shared)),
            None => AttributeInit::Move(reader.varray.materialize()),
        };
        if !self.add(new_name, meta_data.domain, meta_data.data_type, initializer) {
            return false;
        }
        self.remove(old_name)
    }
}
