//! Providers backed by [`CustomData`](crate::custom_data::CustomData) layers.

use std::fmt;

use tracing::{debug, trace};

use super::{BuiltinAttributeInfo, BuiltinAttributeProvider, CustomDataAccess, Deletability, DynamicAttributesProvider};
use crate::array::GVArray;
use crate::attribute::{AttributeInit, AttributeIter, AttributeReader, AttributeWriter, TagModifiedFn};
use crate::custom_data::{
    attr_type_to_custom_data_type, custom_data_type_to_attr_type, CustomDataLayer, CustomDataMask,
    CustomDataType,
};
use crate::util::{AttrDomain, AttrType};

// ============================================================================
// Dynamic layers
// ============================================================================

/// All generic property layers of one domain.
///
/// Structural layers are invisible through this provider.
pub struct CustomDataAttributeProvider<O: 'static> {
    domain: AttrDomain,
    access: &'static dyn CustomDataAccess<O>,
}

impl<O: 'static> CustomDataAttributeProvider<O> {
    const SUPPORTED_TYPES: CustomDataMask = CustomDataMask::PROP_ALL;

    pub fn new(domain: AttrDomain, access: &'static dyn CustomDataAccess<O>) -> Self {
        Self { domain, access }
    }

    #[inline]
    pub fn domain(&self) -> AttrDomain {
        self.domain
    }

    fn is_supported(layer: &CustomDataLayer, name: &str) -> bool {
        layer.name == name && Self::SUPPORTED_TYPES.contains(layer.data_type)
    }

    fn reader<'a>(&self, layer: &'a CustomDataLayer) -> AttributeReader<'a> {
        AttributeReader {
            varray: GVArray::Span(layer.data.as_span()),
            domain: self.domain,
            sharing_info: Some(&layer.data),
        }
    }
}

impl<O: 'static> DynamicAttributesProvider<O> for CustomDataAttributeProvider<O> {
    fn try_get_for_read<'a>(&self, owner: &'a O, name: &str) -> Option<AttributeReader<'a>> {
        let custom_data = self.access.const_custom_data(owner)?;
        let layer = custom_data
            .layers()
            .iter()
            .find(|layer| Self::is_supported(layer, name))?;
        Some(self.reader(layer))
    }

    fn try_get_for_write<'a>(&self, owner: &'a mut O, name: &str) -> Option<AttributeWriter<'a>> {
        let tag_modified = self.access.tag_modified_function(owner, name);
        let custom_data = self.access.custom_data(owner)?;
        let index = custom_data
            .layers()
            .iter()
            .position(|layer| Self::is_supported(layer, name))?;
        let span = custom_data.layer_data_for_write(index).as_mut_span();
        Some(AttributeWriter::new(span, self.domain, tag_modified))
    }

    fn try_delete(&self, owner: &mut O, name: &str) -> bool {
        let tag_modified = self.access.tag_modified_function(owner, name);
        let Some(custom_data) = self.access.custom_data(owner) else {
            return false;
        };
        let Some(index) = custom_data
            .layers()
            .iter()
            .position(|layer| Self::is_supported(layer, name))
        else {
            return false;
        };
        custom_data.free_layer(index);
        if let Some(tag_modified) = tag_modified {
            tag_modified();
        }
        true
    }

    fn try_create<'i>(
        &self,
        owner: &mut O,
        name: &str,
        domain: AttrDomain,
        data_type: AttrType,
        initializer: AttributeInit<'i>,
    ) -> Result<(), AttributeInit<'i>> {
        if domain != self.domain || name.is_empty() {
            return Err(initializer);
        }
        let layer_type = attr_type_to_custom_data_type(data_type);
        if !Self::SUPPORTED_TYPES.contains(layer_type) {
            return Err(initializer);
        }
        let element_num = self.access.element_num(owner);
        let Some(custom_data) = self.access.custom_data(owner) else {
            return Err(initializer);
        };
        if custom_data.has_layer_named(name) {
            trace!("create '{}': layer name taken on {}", name, domain);
            return Err(initializer);
        }
        let data = initializer.build(data_type, element_num, None)?;
        custom_data.push_layer(layer_type, name, data);
        debug!("created attribute '{}' ({}, {})", name, domain, data_type);
        Ok(())
    }

    fn foreach_attribute(&self, owner: &O, f: &mut dyn FnMut(&AttributeIter<'_, O>)) -> bool {
        let Some(custom_data) = self.access.const_custom_data(owner) else {
            return true;
        };
        for layer in custom_data.layers() {
            if !Self::SUPPORTED_TYPES.contains(layer.data_type) {
                continue;
            }
            let Some(data_type) = custom_data_type_to_attr_type(layer.data_type) else {
                continue;
            };
            if layer.name.is_empty() || layer.is_anonymous() {
                continue;
            }
            let get = || Some(self.reader(layer));
            let iter = AttributeIter::new(&layer.name, self.domain, data_type, false, owner, &get);
            f(&iter);
            if iter.is_stopped() {
                return false;
            }
        }
        true
    }

    fn foreach_domain(&self, f: &mut dyn FnMut(AttrDomain)) {
        f(self.domain);
    }
}

impl<O: 'static> fmt::Debug for CustomDataAttributeProvider<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomDataAttributeProvider")
            .field("domain", &self.domain)
            .finish()
    }
}

// ============================================================================
// Builtin layers
// ============================================================================

/// Builds the notifier run after a builtin layer changed.
pub type UpdateOnChange<O> = fn(&O) -> TagModifiedFn;

/// Builtin attribute stored as a named layer in [`CustomData`](crate::custom_data::CustomData).
pub struct BuiltinCustomDataLayerProvider<O: 'static> {
    info: BuiltinAttributeInfo,
    layer_type: CustomDataType,
    access: &'static dyn CustomDataAccess<O>,
    update_on_change: Option<UpdateOnChange<O>>,
}

impl<O: 'static> BuiltinCustomDataLayerProvider<O> {
    pub fn new(
        info: BuiltinAttributeInfo,
        access: &'static dyn CustomDataAccess<O>,
        update_on_change: Option<UpdateOnChange<O>>,
    ) -> Self {
        Self {
            layer_type: attr_type_to_custom_data_type(info.data_type),
            info,
            access,
            update_on_change,
        }
    }

    fn layer_exists(&self, owner: &O) -> bool {
        self.access
            .const_custom_data(owner)
            .and_then(|data| data.named_layer_index_of_type(self.layer_type, self.info.name))
            .is_some()
    }

    /// Notifier for a change of this layer. Without a dedicated hook the
    /// owner's generic notifier is used.
    fn tag_modified_function(&self, owner: &O) -> Option<TagModifiedFn> {
        match self.update_on_change {
            Some(update) => Some(update(owner)),
            None => self.access.tag_modified_function(owner, self.info.name),
        }
    }

    fn notify(&self, owner: &O) {
        if let Some(tag_modified) = self.tag_modified_function(owner) {
            tag_modified();
        }
    }
}

impl<O: 'static> BuiltinAttributeProvider<O> for BuiltinCustomDataLayerProvider<O> {
    fn info(&self) -> &BuiltinAttributeInfo {
        &self.info
    }

    fn try_get_for_read<'a>(&self, owner: &'a O) -> Option<AttributeReader<'a>> {
        let custom_data = self.access.const_custom_data(owner)?;
        let index = custom_data.named_layer_index_of_type(self.layer_type, self.info.name)?;
        let layer = &custom_data.layers()[index];
        Some(AttributeReader {
            varray: GVArray::Span(layer.data.as_span()),
            domain: self.info.domain,
            sharing_info: Some(&layer.data),
        })
    }

    fn try_get_for_write<'a>(&self, owner: &'a mut O) -> Option<AttributeWriter<'a>> {
        let tag_modified = self.tag_modified_function(&*owner);
        let custom_data = self.access.custom_data(owner)?;
        let span = custom_data.named_layer_span_mut(self.layer_type, self.info.name)?;
        Some(AttributeWriter::new(span, self.info.domain, tag_modified))
    }

    fn try_delete(&self, owner: &mut O) -> bool {
        if self.info.deletable != Deletability::Deletable {
            return false;
        }
        let Some(custom_data) = self.access.custom_data(owner) else {
            return false;
        };
        if !custom_data.free_layer_named(self.layer_type, self.info.name) {
            return false;
        }
        self.notify(owner);
        true
    }

    fn try_create(&self, owner: &mut O, initializer: AttributeInit<'_>) -> bool {
        let element_num = self.access.element_num(owner);
        let Some(custom_data) = self.access.custom_data(owner) else {
            return false;
        };
        if custom_data.has_layer_named(self.info.name) {
            return false;
        }
        let data = match initializer.build(self.info.data_type, element_num, self.info.default_value.as_ref()) {
            Ok(data) => data,
            Err(_) => return false,
        };
        custom_data.push_layer(self.layer_type, self.info.name, data);
        debug!("created builtin '{}'", self.info.name);
        self.notify(owner);
        true
    }

    fn exists(&self, owner: &O) -> bool {
        self.layer_exists(owner)
    }
}

impl<O: 'static> fmt::Debug for BuiltinCustomDataLayerProvider<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinCustomDataLayerProvider")
            .field("info", &self.info)
            .field("layer_type", &self.layer_type)
            .finish()
    }
}
