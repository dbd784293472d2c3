//! Consistency checks run when sealing a registry.

use std::collections::HashMap;

use log::debug;

use crate::builder::RegistryBuilder;
use crate::descriptor::{ClassDescriptor, DescriptorId, Kind, Shape};
use crate::error::Error;
use crate::registry::Registry;

impl RegistryBuilder {
    /// Marks colliding parameters explicit and checks that every class tag
    /// is unique.
    pub fn check(&mut self) -> Result<(), Error> {
        self.check_tags().map(|_| ())
    }

    /// Checks the descriptors and freezes them into a [`Registry`].
    pub fn seal(mut self) -> Result<Registry, Error> {
        let by_tag = self.check_tags()?;
        debug!(
            "sealed registry with {} descriptors, {} tags",
            self.descriptors.len(),
            by_tag.len()
        );
        Ok(Registry::new(self, by_tag))
    }

    fn check_tags(&mut self) -> Result<HashMap<String, DescriptorId>, Error> {
        let enums: Vec<bool> = self.descriptors.iter().map(|d| d.is_enum()).collect();
        for descriptor in &mut self.descriptors {
            if descriptor.converter.is_some() {
                continue;
            }
            let name = descriptor.name;
            if let Shape::Class(class) = &mut descriptor.shape {
                disambiguate(name, class, &enums);
            }
        }

        let mut by_tag: HashMap<String, DescriptorId> = HashMap::new();
        for descriptor in &self.descriptors {
            if !descriptor.is_class() {
                continue;
            }
            if let Some(previous) = by_tag.insert(descriptor.tag().to_string(), descriptor.id) {
                return Err(Error::DuplicateTag {
                    tag: descriptor.tag().to_string(),
                    first: self.descriptors[previous.0].path().to_string(),
                    second: descriptor.path().to_string(),
                });
            }
        }
        Ok(by_tag)
    }
}

/// Positional matching cannot tell apart two parameters of the same nested
/// type, so each of them gets a wrapper element.
fn disambiguate(owner: &str, class: &mut ClassDescriptor, enums: &[bool]) {
    let mut groups: HashMap<DescriptorId, Vec<usize>> = HashMap::new();
    for (index, param) in class.params.iter().enumerate() {
        if param.explicit || !matches!(param.kind, Kind::Class | Kind::List) {
            continue;
        }
        let Some(nested) = param.nested else {
            continue;
        };
        if enums[nested.0] {
            continue;
        }
        groups.entry(nested).or_default().push(index);
    }

    for indices in groups.values().filter(|indices| indices.len() > 1) {
        for &index in indices {
            let param = &mut class.params[index];
            param.explicit = true;
            debug!("{owner}.{} shares its type, made explicit", param.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::builder::RegistryBuilder;
    use crate::discovery::TypeCatalog;
    use crate::error::Error;
    use crate::info::{ClassInfo, Signature, TypeInfo};
    use crate::reflect::Reflect;

    #[derive(Debug, Clone, PartialEq)]
    struct Gem;

    impl Reflect for Gem {
        fn type_info() -> TypeInfo {
            TypeInfo::Class(
                ClassInfo::builder::<Self>("Gem")
                    .constructor(Signature::new("new"), |_| Ok(Gem))
                    .build(),
            )
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Coin;

    impl Reflect for Coin {
        fn type_info() -> TypeInfo {
            TypeInfo::Class(
                ClassInfo::builder::<Self>("Coin")
                    .constructor(Signature::new("new"), |_| Ok(Coin))
                    .build(),
            )
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Rarity {
        Common,
        Rare,
    }

    crate::reflect_enum!(Rarity { Common, Rare });

    #[derive(Debug)]
    struct Chest {
        first: Gem,
        second: Gem,
        coin: Coin,
        extra: Vec<Gem>,
        rarity: Rarity,
        trim: Rarity,
    }

    impl Reflect for Chest {
        fn type_info() -> TypeInfo {
            TypeInfo::Class(
                ClassInfo::builder::<Self>("Chest")
                    .field("first", |c| &c.first)
                    .field("second", |c| &c.second)
                    .field("coin", |c| &c.coin)
                    .field("extra", |c| &c.extra)
                    .field("rarity", |c| &c.rarity)
                    .field("trim", |c| &c.trim)
                    .constructor(
                        Signature::new("new")
                            .param::<Gem>("first")
                            .param::<Gem>("second")
                            .param::<Coin>("coin")
                            .param::<Vec<Gem>>("extra")
                            .param::<Rarity>("rarity")
                            .param::<Rarity>("trim"),
                        |args| {
                            Ok(Chest {
                                first: args.take()?,
                                second: args.take()?,
                                coin: args.take()?,
                                extra: args.take()?,
                                rarity: args.take()?,
                                trim: args.take()?,
                            })
                        },
                    )
                    .build(),
            )
        }
    }

    #[rstest(param, expected,
        case("first", true),
        case("second", true),
        case("extra", true),
        case("coin", false),
        case("rarity", false),
        case("trim", false),
    )]
    fn test_seal_disambiguates_shared_types(param: &str, expected: bool) {
        let mut builder = RegistryBuilder::new(TypeCatalog::new());
        builder.register::<Chest>().unwrap();
        let registry = builder.seal().unwrap();

        let chest = registry.descriptor::<Chest>().unwrap().as_class().unwrap();
        assert_eq!(expected, chest.param(param).unwrap().is_explicit());
    }

    #[test]
    fn test_seal_duplicate_tag() {
        let mut builder = RegistryBuilder::default();
        builder.register::<Gem>().unwrap();
        builder.register::<Coin>().unwrap();
        builder.alias::<Coin>("Gem").unwrap();

        let err = builder.check().unwrap_err();
        assert!(matches!(err, Error::DuplicateTag { ref tag, .. } if tag == "Gem"), "{err:?}");

        builder.alias::<Coin>("Token").unwrap();
        let registry = builder.seal().unwrap();
        assert_eq!(
            Some("Token"),
            registry.descriptor_by_tag("Token").map(|d| d.tag())
        );
    }

    #[test]
    fn test_seal_skips_types_with_converter() {
        struct Opaque;
        impl crate::convert::Converter for Opaque {}

        let mut builder = RegistryBuilder::default();
        builder.register::<Chest>().unwrap();
        builder.converter::<Chest>(Opaque).unwrap();
        let registry = builder.seal().unwrap();

        let chest = registry.descriptor::<Chest>().unwrap().as_class().unwrap();
        assert!(!chest.param("first").unwrap().is_explicit());
    }
}
