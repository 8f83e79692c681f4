//! Generic per-domain layer storage.
//!
//! A [`CustomData`] holds an ordered list of named, typed layers for one domain of
//! a geometry. Layer arrays are reference counted, so cloning a collection is
//! cheap and arrays are only copied when one side writes to them.

mod types;

pub use types::*;

use std::sync::Arc;

use tracing::debug;

use crate::array::{GArray, GMutSpan};
use crate::util::{Error, Result};

/// One named array in a [`CustomData`] collection.
#[derive(Clone, Debug)]
pub struct CustomDataLayer {
    /// Layer name; empty for unnamed layers
    pub name: String,
    pub data_type: CustomDataType,
    /// Values, shared between copies of the owning geometry
    pub data: Arc<GArray>,
}

impl CustomDataLayer {
    /// Anonymous layers hold intermediate data and are never listed as attributes.
    pub fn is_anonymous(&self) -> bool {
        self.name.starts_with(".a_")
    }
}

/// Ordered layer collection for one domain.
#[derive(Clone, Debug, Default)]
pub struct CustomData {
    layers: Vec<CustomDataLayer>,
}

impl CustomData {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn layers(&self) -> &[CustomDataLayer] {
        &self.layers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    // === Lookup ===

    /// Index of the first layer called `name`, whatever its type.
    pub fn named_layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    /// Index of the layer called `name` with type `data_type`.
    pub fn named_layer_index_of_type(&self, data_type: CustomDataType, name: &str) -> Option<usize> {
        self.layers
            .iter()
            .position(|l| l.data_type == data_type && l.name == name)
    }

    /// Index of the first layer of `data_type`.
    pub fn layer_index_of_type(&self, data_type: CustomDataType) -> Option<usize> {
        self.layers.iter().position(|l| l.data_type == data_type)
    }

    pub fn has_layer_named(&self, name: &str) -> bool {
        self.named_layer_index(name).is_some()
    }

    pub fn named_layer(&self, data_type: CustomDataType, name: &str) -> Option<&GArray> {
        self.named_layer_index_of_type(data_type, name)
            .map(|i| self.layers[i].data.as_ref())
    }

    /// Mutable access to a layer, unsharing its array first.
    pub fn named_layer_mut(&mut self, data_type: CustomDataType, name: &str) -> Option<&mut GArray> {
        let index = self.named_layer_index_of_type(data_type, name)?;
        Some(self.layer_data_for_write(index))
    }

    /// Mutable view of a layer's values, unsharing its array first.
    pub fn named_layer_span_mut(
        &mut self,
        data_type: CustomDataType,
        name: &str,
    ) -> Option<GMutSpan<'_>> {
        self.named_layer_mut(data_type, name).map(GArray::as_mut_span)
    }

    /// Array of layer `index`, copied first if another collection shares it.
    pub fn layer_data_for_write(&mut self, index: usize) -> &mut GArray {
        Arc::make_mut(&mut self.layers[index].data)
    }

    /// Whether layer `index` shares its array with another collection.
    pub fn is_layer_shared(&self, index: usize) -> bool {
        self.layers
            .get(index)
            .is_some_and(|l| Arc::strong_count(&l.data) > 1)
    }

    // === Mutation ===

    /// Add a named layer.
    ///
    /// Fails if any layer already uses the name or the array does not store the
    /// layer type's element type.
    pub fn add_layer_named(
        &mut self,
        data_type: CustomDataType,
        name: &str,
        data: Arc<GArray>,
    ) -> Result<usize> {
        if self.has_layer_named(name) {
            return Err(Error::LayerExists(name.to_string()));
        }
        if data.data_type() != data_type.storage_type() {
            return Err(Error::TypeMismatch {
                expected: data_type.storage_type(),
                actual: data.data_type(),
            });
        }
        debug!("add layer '{}' ({}, {} elements)", name, data_type, data.len());
        Ok(self.push_layer(data_type, name, data))
    }

    /// Add an unnamed layer of default-constructed values.
    pub fn add_layer(&mut self, data_type: CustomDataType, len: usize) -> usize {
        let data = Arc::new(GArray::default_filled(data_type.storage_type(), len));
        self.push_layer(data_type, "", data)
    }

    /// Append a layer without checks.
    pub(crate) fn push_layer(
        &mut self,
        data_type: CustomDataType,
        name: &str,
        data: Arc<GArray>,
    ) -> usize {
        self.layers.push(CustomDataLayer {
            name: name.to_string(),
            data_type,
            data,
        });
        self.layers.len() - 1
    }

    /// Remove the layer called `name` with type `data_type`.
    pub fn free_layer_named(&mut self, data_type: CustomDataType, name: &str) -> bool {
        match self.named_layer_index_of_type(data_type, name) {
            Some(index) => {
                self.free_layer(index);
                true
            }
            None => false,
        }
    }

    /// Remove layer `index`, returning it.
    pub fn free_layer(&mut self, index: usize) -> CustomDataLayer {
        let layer = self.layers.remove(index);
        debug!("free layer '{}' ({})", layer.name, layer.data_type);
        layer
    }

    /// Rename layer `index`. Fails if another layer already uses the name.
    pub fn rename_layer(&mut self, index: usize, name: &str) -> Result<()> {
        if self.layers[index].name == name {
            return Ok(());
        }
        if self.has_layer_named(name) {
            return Err(Error::LayerExists(name.to_string()));
        }
        self.layers[index].name = name.to_string();
        Ok(())
    }

    /// Resize every layer to `len` elements. New elements are default-constructed.
    pub fn realloc(&mut self, len: usize) {
        for layer in &mut self.layers {
            if layer.data.len() != len {
                Arc::make_mut(&mut layer.data).resize(len);
            }
        }
    }
}
