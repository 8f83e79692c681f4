//! Per-attribute record passed to enumeration callbacks.

use std::cell::Cell;
use std::fmt;

use super::{AttributeAccessor, AttributeReader};
use crate::provider::AttributeAccessorFunctions;
use crate::util::{AttrDomain, AttrType};

/// One attribute visited by `foreach_attribute`.
///
/// Values are only read when [`get`](Self::get) is called. Calling
/// [`stop`](Self::stop) ends the enumeration after the current callback returns.
pub struct AttributeIter<'a, O: 'static> {
    pub name: &'a str,
    pub domain: AttrDomain,
    pub data_type: AttrType,
    pub is_builtin: bool,
    owner: &'a O,
    get_fn: &'a dyn Fn() -> Option<AttributeReader<'a>>,
    stop_requested: Cell<bool>,
    functions: Cell<Option<&'static AttributeAccessorFunctions<O>>>,
}

impl<'a, O: 'static> AttributeIter<'a, O> {
    pub fn new(
        name: &'a str,
        domain: AttrDomain,
        data_type: AttrType,
        is_builtin: bool,
        owner: &'a O,
        get_fn: &'a dyn Fn() -> Option<AttributeReader<'a>>,
    ) -> Self {
        Self {
            name,
            domain,
            data_type,
            is_builtin,
            owner,
            get_fn,
            stop_requested: Cell::new(false),
            functions: Cell::new(None),
        }
    }

    /// Read the attribute's values.
    pub fn get(&self) -> Option<AttributeReader<'a>> {
        (self.get_fn)()
    }

    /// Request that no further attributes are visited.
    pub fn stop(&self) {
        self.stop_requested.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_requested.get()
    }

    /// Accessor of the geometry being enumerated, when the enumeration went
    /// through an accessor.
    pub fn accessor(&self) -> Option<AttributeAccessor<'a, O>> {
        self.functions
            .get()
            .map(|functions| AttributeAccessor::new(self.owner, functions))
    }

    pub(crate) fn set_functions(&self, functions: Option<&'static AttributeAccessorFunctions<O>>) {
        self.functions.set(functions);
    }
}

impl<O: 'static> fmt::Debug for AttributeIter<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeIter")
            .field("name", &self.name)
            .field("domain", &self.domain)
            .field("data_type", &self.data_type)
            .field("is_builtin", &self.is_builtin)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{GSpan, GVArray};

    #[test]
    fn test_lazy_get_and_stop() {
        let owner = ();
        let values = [1.0f32, 2.0];
        let calls = Cell::new(0);
        let get = || {
            calls.set(calls.get() + 1);
            Some(AttributeReader {
                varray: GVArray::from(GSpan::new(&values)),
                domain: AttrDomain::Point,
                sharing_info: None,
            })
        };
        let iter = AttributeIter::new("w", AttrDomain::Point, AttrType::Float, false, &owner, &get);
        assert_eq!(calls.get(), 0);
        assert!(!iter.is_stopped());
        assert!(iter.accessor().is_none());

        let reader = iter.get().unwrap();
        assert_eq!(reader.len(), 2);
        assert_eq!(calls.get(), 1);

        iter.stop();
        assert!(iter.is_stopped());
    }
}
