//! Static dispatch tables built from provider registries.

use super::GeometryAttributeProviders;
use crate::array::GValue;
use crate::attribute::{
    AttributeDomainAndType, AttributeInit, AttributeIter, AttributeReader, AttributeValidator, AttributeWriter,
};
use crate::util::{AttrDomain, AttrType};

/// Geometry type whose attributes are described by a provider registry.
pub trait GeometryAttributeOwner: Sized + 'static {
    /// Registry shared by every instance of the type.
    fn attribute_providers() -> &'static GeometryAttributeProviders<Self>;

    /// Number of elements in `domain`, 0 for unsupported domains.
    fn domain_size(&self, domain: AttrDomain) -> usize;
}

/// Attribute operations of one geometry type.
///
/// Accessors hold a `&'static` reference to the table of their geometry type.
pub struct AttributeAccessorFunctions<O: 'static> {
    pub domain_supported: fn(&O, AttrDomain) -> bool,
    pub domain_size: fn(&O, AttrDomain) -> usize,
    pub builtin_domain_and_type: fn(&O, &str) -> Option<AttributeDomainAndType>,
    pub builtin_default_value: fn(&O, &str) -> Option<&'static GValue>,
    pub lookup: for<'a> fn(&'a O, &str) -> Option<AttributeReader<'a>>,
    pub foreach_attribute: for<'a, 'f> fn(
        &'a O,
        &'f mut dyn for<'i, 'j> FnMut(&'i AttributeIter<'j, O>),
        &'static AttributeAccessorFunctions<O>,
    ) -> bool,
    pub lookup_validator: fn(&O, &str) -> Option<AttributeValidator>,
    pub lookup_for_write: for<'a> fn(&'a mut O, &str) -> Option<AttributeWriter<'a>>,
    pub remove: fn(&mut O, &str) -> bool,
    pub add: for<'i> fn(&mut O, &str, AttrDomain, AttrType, AttributeInit<'i>) -> bool,
}

/// Dispatch table for a geometry type, built from its provider registry.
pub const fn accessor_functions_for_providers<O: GeometryAttributeOwner>() -> AttributeAccessorFunctions<O> {
    AttributeAccessorFunctions {
        domain_supported: domain_supported::<O>,
        domain_size: domain_size::<O>,
        builtin_domain_and_type: builtin_domain_and_type::<O>,
        builtin_default_value: builtin_default_value::<O>,
        lookup: lookup::<O>,
        foreach_attribute: foreach_attribute::<O>,
        lookup_validator: lookup_validator::<O>,
        lookup_for_write: lookup_for_write::<O>,
        remove: remove::<O>,
        add: add::<O>,
    }
}

fn domain_supported<O: GeometryAttributeOwner>(_owner: &O, domain: AttrDomain) -> bool {
    O::attribute_providers().domain_supported(domain)
}

fn domain_size<O: GeometryAttributeOwner>(owner: &O, domain: AttrDomain) -> usize {
    owner.domain_size(domain)
}

fn builtin_domain_and_type<O: GeometryAttributeOwner>(_owner: &O, name: &str) -> Option<AttributeDomainAndType> {
    O::attribute_providers().builtin_domain_and_type(name)
}

fn builtin_default_value<O: GeometryAttributeOwner>(_owner: &O, name: &str) -> Option<&'static GValue> {
    O::attribute_providers().builtin_default_value(name)
}

fn lookup<'a, O: GeometryAttributeOwner>(owner: &'a O, name: &str) -> Option<AttributeReader<'a>> {
    O::attribute_providers().lookup(owner, name)
}

fn foreach_attribute<O: GeometryAttributeOwner>(
    owner: &O,
    f: &mut dyn FnMut(&AttributeIter<'_, O>),
    functions: &'static AttributeAccessorFunctions<O>,
) -> bool {
    O::attribute_providers().foreach_attribute(owner, f, Some(functions))
}

fn lookup_validator<O: GeometryAttributeOwner>(_owner: &O, name: &str) -> Option<AttributeValidator> {
    O::attribute_providers().lookup_validator(name)
}

fn lookup_for_write<'a, O: GeometryAttributeOwner>(owner: &'a mut O, name: &str) -> Option<AttributeWriter<'a>> {
    O::attribute_providers().lookup_for_write(owner, name)
}

fn remove<O: GeometryAttributeOwner>(owner: &mut O, name: &str) -> bool {
    O::attribute_providers().remove(owner, name)
}

fn add<O: GeometryAttributeOwner>(
    owner: &mut O,
    name: &str,
    domain: AttrDomain,
    data_type: AttrType,
    initializer: AttributeInit<'_>,
) -> bool {
    O::attribute_providers().add(owner, name, domain, data_type, initializer)
}
