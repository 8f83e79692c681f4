//! Per-geometry-type provider registry and attribute dispatch.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace};

use super::{AttributeAccessorFunctions, BuiltinAttributeProvider, DynamicAttributesProvider};
use crate::array::GValue;
use crate::attribute::{
    AttributeDomainAndType, AttributeInit, AttributeIter, AttributeReader, AttributeValidator, AttributeWriter,
};
use crate::util::{AttrDomain, AttrType, Error, Result};

/// All attribute providers of one geometry type.
///
/// Built once, then read-only. Builtin names resolve to their builtin provider
/// and never fall through to the dynamic providers, which are tried in order.
pub struct GeometryAttributeProviders<O: 'static> {
    builtin_providers: Vec<Box<dyn BuiltinAttributeProvider<O>>>,
    builtin_by_name: HashMap<&'static str, usize>,
    dynamic_providers: Vec<Box<dyn DynamicAttributesProvider<O>>>,
    supported_domains: Vec<AttrDomain>,
}

impl<O: 'static> GeometryAttributeProviders<O> {
    /// Build a registry.
    ///
    /// # Panics
    ///
    /// Panics if two builtin providers share a name.
    pub fn new(
        builtin_providers: Vec<Box<dyn BuiltinAttributeProvider<O>>>,
        dynamic_providers: Vec<Box<dyn DynamicAttributesProvider<O>>>,
    ) -> Self {
        match Self::try_new(builtin_providers, dynamic_providers) {
            Ok(providers) => providers,
            Err(e) => panic!("invalid attribute provider table: {}", e),
        }
    }

    /// Build a registry, failing on duplicate builtin names.
    pub fn try_new(
        builtin_providers: Vec<Box<dyn BuiltinAttributeProvider<O>>>,
        dynamic_providers: Vec<Box<dyn DynamicAttributesProvider<O>>>,
    ) -> Result<Self> {
        let mut builtin_by_name = HashMap::with_capacity(builtin_providers.len());
        let mut supported_domains = Vec::new();
        let mut add_domain = |domain: AttrDomain| {
            if !supported_domains.contains(&domain) {
                supported_domains.push(domain);
            }
        };

        for (index, provider) in builtin_providers.iter().enumerate() {
            if builtin_by_name.insert(provider.name(), index).is_some() {
                return Err(Error::DuplicateBuiltin(provider.name().to_string()));
            }
            add_domain(provider.domain());
        }
        for provider in &dynamic_providers {
            provider.foreach_domain(&mut add_domain);
        }

        debug!(
            "attribute providers: {} builtin, {} dynamic, domains {:?}",
            builtin_providers.len(),
            dynamic_providers.len(),
            supported_domains
        );
        Ok(Self {
            builtin_providers,
            builtin_by_name,
            dynamic_providers,
            supported_domains,
        })
    }

    /// Builtin providers in registration order.
    pub fn builtin_providers(&self) -> &[Box<dyn BuiltinAttributeProvider<O>>] {
        &self.builtin_providers
    }

    /// Dynamic providers in priority order.
    pub fn dynamic_providers(&self) -> &[Box<dyn DynamicAttributesProvider<O>>] {
        &self.dynamic_providers
    }

    pub fn supported_domains(&self) -> &[AttrDomain] {
        &self.supported_domains
    }

    pub fn builtin(&self, name: &str) -> Option<&dyn BuiltinAttributeProvider<O>> {
        self.builtin_by_name
            .get(name)
            .map(|&index| self.builtin_providers[index].as_ref())
    }

    #[inline]
    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtin_by_name.contains_key(name)
    }

    #[inline]
    pub fn domain_supported(&self, domain: AttrDomain) -> bool {
        self.supported_domains.contains(&domain)
    }

    // === Dispatch ===

    pub fn builtin_domain_and_type(&self, name: &str) -> Option<AttributeDomainAndType> {
        self.builtin(name).map(|provider| AttributeDomainAndType {
            domain: provider.domain(),
            data_type: provider.data_type(),
        })
    }

    pub fn builtin_default_value(&self, name: &str) -> Option<&GValue> {
        self.builtin(name)?.default_value()
    }

    pub fn lookup_validator(&self, name: &str) -> Option<AttributeValidator> {
        self.builtin(name)?.validator()
    }

    pub fn lookup<'a>(&self, owner: &'a O, name: &str) -> Option<AttributeReader<'a>> {
        if let Some(provider) = self.builtin(name) {
            return provider.try_get_for_read(owner);
        }
        let reader = self
            .dynamic_providers
            .iter()
            .find_map(|provider| provider.try_get_for_read(owner, name));
        if reader.is_none() {
            trace!("lookup '{}': not found", name);
        }
        reader
    }

    pub fn lookup_for_write<'a>(&self, owner: &'a mut O, name: &str) -> Option<AttributeWriter<'a>> {
        if let Some(provider) = self.builtin(name) {
            return provider.try_get_for_write(owner);
        }
        let Some(provider) = self
            .dynamic_providers
            .iter()
            .find(|provider| provider.contains(&*owner, name))
        else {
            trace!("lookup_for_write '{}': not found", name);
            return None;
        };
        provider.try_get_for_write(owner, name)
    }

    /// Visit every existing attribute once: builtins first, then each dynamic
    /// provider's attributes whose names were not visited yet.
    ///
    /// `functions` is attached to every visited [`AttributeIter`] so callbacks can
    /// reach the accessor. Returns `false` if the callback stopped early.
    pub fn foreach_attribute(
        &self,
        owner: &O,
        f: &mut dyn FnMut(&AttributeIter<'_, O>),
        functions: Option<&'static AttributeAccessorFunctions<O>>,
    ) -> bool {
        let mut handled: HashSet<String> = HashSet::new();
        for provider in &self.builtin_providers {
            if !provider.exists(owner) {
                continue;
            }
            let get = || provider.try_get_for_read(owner);
            let iter = AttributeIter::new(
                provider.name(),
                provider.domain(),
                provider.data_type(),
                true,
                owner,
                &get,
            );
            iter.set_functions(functions);
            f(&iter);
            if iter.is_stopped() {
                return false;
            }
            handled.insert(provider.name().to_string());
        }
        for provider in &self.dynamic_providers {
            let finished = provider.foreach_attribute(owner, &mut |iter: &AttributeIter<'_, O>| {
                if !handled.insert(iter.name.to_string()) {
                    return;
                }
                iter.set_functions(functions);
                f(iter);
            });
            if !finished {
                return false;
            }
        }
        true
    }

    pub fn remove(&self, owner: &mut O, name: &str) -> bool {
        if let Some(provider) = self.builtin(name) {
            return provider.try_delete(owner);
        }
        let removed = self
            .dynamic_providers
            .iter()
            .any(|provider| provider.try_delete(owner, name));
        if !removed {
            trace!("remove '{}': not found", name);
        }
        removed
    }

    pub fn add(
        &self,
        owner: &mut O,
        name: &str,
        domain: AttrDomain,
        data_type: AttrType,
        initializer: AttributeInit<'_>,
    ) -> bool {
        if let Some(provider) = self.builtin(name) {
            if provider.domain() != domain || provider.data_type() != data_type {
                trace!(
                    "add '{}': builtin is {} {}, requested {} {}",
                    name,
                    provider.domain(),
                    provider.data_type(),
                    domain,
                    data_type
                );
                return false;
            }
            return provider.try_create(owner, initializer);
        }
        let mut initializer = initializer;
        for provider in &self.dynamic_providers {
            match provider.try_create(owner, name, domain, data_type, initializer) {
                Ok(()) => return true,
                Err(returned) => initializer = returned,
            }
        }
        trace!("add '{}': no provider accepted {} {}", name, domain, data_type);
        false
    }
}

impl<O: 'static> fmt::Debug for GeometryAttributeProviders<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.builtin_providers.iter().map(|p| p.name()).collect();
        f.debug_struct("GeometryAttributeProviders")
            .field("builtins", &names)
            .field("dynamic_providers", &self.dynamic_providers.len())
            .field("supported_domains", &self.supported_domains)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_data::CustomData;
    use crate::provider::{
        BuiltinAttributeInfo, BuiltinCustomDataLayerProvider, CustomDataAccess, CustomDataAttributeProvider,
        Deletability,
    };

    #[derive(Default)]
    struct Cloud {
        len: usize,
        points: CustomData,
        /// Second point storage, served by its own dynamic provider
        extra: CustomData,
    }

    struct PointAccess;

    impl CustomDataAccess<Cloud> for PointAccess {
        fn custom_data<'a>(&self, owner: &'a mut Cloud) -> Option<&'a mut CustomData> {
            Some(&mut owner.points)
        }

        fn const_custom_data<'a>(&self, owner: &'a Cloud) -> Option<&'a CustomData> {
            Some(&owner.points)
        }

        fn element_num(&self, owner: &Cloud) -> usize {
            owner.len
        }
    }

    static POINT_ACCESS: PointAccess = PointAccess;

    struct ExtraAccess;

    impl CustomDataAccess<Cloud> for ExtraAccess {
        fn custom_data<'a>(&self, owner: &'a mut Cloud) -> Option<&'a mut CustomData> {
            Some(&mut owner.extra)
        }

        fn const_custom_data<'a>(&self, owner: &'a Cloud) -> Option<&'a CustomData> {
            Some(&owner.extra)
        }

        fn element_num(&self, owner: &Cloud) -> usize {
            owner.len
        }
    }

    static EXTRA_ACCESS: ExtraAccess = ExtraAccess;

    fn builtin(name: &'static str, deletable: Deletability) -> Box<dyn BuiltinAttributeProvider<Cloud>> {
        Box::new(BuiltinCustomDataLayerProvider::new(
            BuiltinAttributeInfo::new(name, AttrDomain::Point, AttrType::Float3, deletable),
            &POINT_ACCESS,
            None,
        ))
    }

    fn registry() -> GeometryAttributeProviders<Cloud> {
        GeometryAttributeProviders::new(
            vec![builtin("position", Deletability::NonDeletable)],
            vec![Box::new(CustomDataAttributeProvider::new(AttrDomain::Point, &POINT_ACCESS))],
        )
    }

    #[test]
    fn test_duplicate_builtin_rejected() {
        let result = GeometryAttributeProviders::try_new(
            vec![
                builtin("position", Deletability::NonDeletable),
                builtin("position", Deletability::Deletable),
            ],
            Vec::new(),
        );
        assert!(matches!(result, Err(Error::DuplicateBuiltin(ref n)) if n == "position"));
    }

    #[test]
    #[should_panic(expected = "Duplicate builtin")]
    fn test_duplicate_builtin_panics() {
        let _ = GeometryAttributeProviders::new(
            vec![
                builtin("position", Deletability::NonDeletable),
                builtin("position", Deletability::NonDeletable),
            ],
            Vec::new(),
        );
    }

    #[test]
    fn test_supported_domains_deduplicated() {
        let providers = registry();
        assert_eq!(providers.supported_domains(), &[AttrDomain::Point]);
        assert!(providers.domain_supported(AttrDomain::Point));
        assert!(!providers.domain_supported(AttrDomain::Face));
    }

    #[test]
    fn test_builtin_add_requires_exact_domain_and_type() {
        let providers = registry();
        let mut cloud = Cloud {
            len: 2,
            ..Default::default()
        };
        assert!(!providers.add(&mut cloud, "position", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed));
        assert!(!providers.add(&mut cloud, "position", AttrDomain::Face, AttrType::Float3, AttributeInit::Zeroed));
        assert!(providers.add(&mut cloud, "position", AttrDomain::Point, AttrType::Float3, AttributeInit::Zeroed));
        assert!(!providers.add(&mut cloud, "position", AttrDomain::Point, AttrType::Float3, AttributeInit::Zeroed));
        assert_eq!(cloud.points.len(), 1);
    }

    #[test]
    fn test_builtin_name_never_falls_through() {
        let providers = registry();
        let mut cloud = Cloud {
            len: 2,
            ..Default::default()
        };
        // Wrong type for the builtin, so only a dynamic layer could satisfy the lookup.
        cloud
            .points
            .add_layer_named(
                crate::custom_data::CustomDataType::PropFloat,
                "position",
                std::sync::Arc::new(crate::array::GArray::zeroed(AttrType::Float, 2)),
            )
            .unwrap();
        assert!(providers.lookup(&cloud, "position").is_none());
        assert!(providers.lookup_for_write(&mut cloud, "position").is_none());
        assert!(!providers.remove(&mut cloud, "position"));
    }

    #[test]
    fn test_existing_builtin_shadows_dynamic_layer() {
        let providers = GeometryAttributeProviders::new(
            vec![builtin("position", Deletability::NonDeletable)],
            vec![
                Box::new(CustomDataAttributeProvider::new(AttrDomain::Point, &POINT_ACCESS)),
                Box::new(CustomDataAttributeProvider::new(AttrDomain::Point, &EXTRA_ACCESS)),
            ],
        );
        let mut cloud = Cloud {
            len: 2,
            ..Default::default()
        };
        assert!(providers.add(&mut cloud, "position", AttrDomain::Point, AttrType::Float3, AttributeInit::Zeroed));
        cloud
            .extra
            .add_layer_named(
                crate::custom_data::CustomDataType::PropFloat,
                "position",
                std::sync::Arc::new(crate::array::GArray::zeroed(AttrType::Float, 2)),
            )
            .unwrap();

        let reader = providers.lookup(&cloud, "position").unwrap();
        assert_eq!(reader.data_type(), AttrType::Float3);
        let writer = providers.lookup_for_write(&mut cloud, "position").unwrap();
        assert_eq!(writer.data_type(), AttrType::Float3);
        drop(writer);

        let mut visited = Vec::new();
        let finished = providers.foreach_attribute(
            &cloud,
            &mut |iter| visited.push((iter.name.to_string(), iter.data_type, iter.is_builtin)),
            None,
        );
        assert!(finished);
        assert_eq!(visited, [("position".to_string(), AttrType::Float3, true)]);
    }

    #[test]
    fn test_foreach_stop_reports_early_exit() {
        let providers = registry();
        let mut cloud = Cloud {
            len: 1,
            ..Default::default()
        };
        for name in ["a", "b", "c"] {
            assert!(providers.add(&mut cloud, name, AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed));
        }
        let mut visited = Vec::new();
        let finished = providers.foreach_attribute(
            &cloud,
            &mut |iter| {
                visited.push(iter.name.to_string());
                if visited.len() == 2 {
                    iter.stop();
                }
            },
            None,
        );
        assert!(!finished);
        assert_eq!(visited, ["a", "b"]);
    }
}
