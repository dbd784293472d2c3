#![allow(dead_code)]

use schema::{
    ClassInfo, Converter, Element, ElementView, Error, FieldRef, InterfaceInfo, Reflect,
    RegistryBuilder, Signature, TypeCatalog, TypeInfo, Value, reflect_enum, reflect_interface,
};

#[derive(Debug, Clone, PartialEq)]
pub struct IsAlive;

impl Reflect for IsAlive {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("IsAlive")
                .constructor(Signature::new("new"), |_| Ok(IsAlive))
                .implements::<TargetRule>()
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IsInRange {
    pub min: f32,
    pub max: f32,
}

impl Reflect for IsInRange {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("IsInRange")
                .field("min", |r| &r.min)
                .field("max", |r| &r.max)
                .constructor(
                    Signature::new("new").param::<f32>("min").param::<f32>("max"),
                    |args| {
                        Ok(IsInRange {
                            min: args.take()?,
                            max: args.take()?,
                        })
                    },
                )
                .implements::<TargetRule>()
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetRule {
    IsAlive(IsAlive),
    IsInRange(IsInRange),
}

reflect_interface!(TargetRule {
    IsAlive(IsAlive),
    IsInRange(IsInRange),
});

#[derive(Debug, Clone, PartialEq)]
pub struct TargetSelector {
    pub name: String,
    pub ally: bool,
    pub rules: Vec<TargetRule>,
}

impl Reflect for TargetSelector {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("TargetSelector")
                .field("name", |s| &s.name)
                .field("ally", |s| &s.ally)
                .field("rules", |s| &s.rules)
                .constructor(
                    Signature::new("new")
                        .param::<String>("name")
                        .param::<bool>("ally")
                        .param::<Vec<TargetRule>>("rules"),
                    |args| {
                        Ok(TargetSelector {
                            name: args.take()?,
                            ally: args.take()?,
                            rules: args.take()?,
                        })
                    },
                )
                .build(),
        )
    }
}

pub fn target_registry() -> RegistryBuilder {
    let mut builder =
        RegistryBuilder::new(TypeCatalog::new().with::<IsAlive>().with::<IsInRange>());
    builder.register::<TargetSelector>().unwrap();
    builder
}

pub fn enemy_selector() -> TargetSelector {
    TargetSelector {
        name: "enemy".to_string(),
        ally: false,
        rules: vec![
            TargetRule::IsAlive(IsAlive),
            TargetRule::IsInRange(IsInRange { min: 0.0, max: 10.0 }),
        ],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sword {
    pub damage: i32,
}

impl Reflect for Sword {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Sword")
                .field("damage", |s| &s.damage)
                .constructor(Signature::new("new").param::<i32>("damage"), |args| {
                    Ok(Sword {
                        damage: args.take()?,
                    })
                })
                .implements::<Weapon>()
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bow {
    pub range: f32,
}

impl Reflect for Bow {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Bow")
                .field("range", |b| &b.range)
                .constructor(Signature::new("new").param::<f32>("range"), |args| {
                    Ok(Bow {
                        range: args.take()?,
                    })
                })
                .implements::<Weapon>()
                .build(),
        )
    }
}

/// Implements both `Weapon` and `Tool`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hammer {
    pub weight: i32,
}

impl Reflect for Hammer {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Hammer")
                .field("weight", |h| &h.weight)
                .constructor(Signature::new("new").param::<i32>("weight"), |args| {
                    Ok(Hammer {
                        weight: args.take()?,
                    })
                })
                .implements::<Weapon>()
                .implements::<Tool>()
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Weapon {
    Sword(Sword),
    Bow(Bow),
    Hammer(Hammer),
}

reflect_interface!(Weapon {
    Sword(Sword),
    Bow(Bow),
    Hammer(Hammer),
});

#[derive(Debug, Clone, PartialEq)]
pub struct Rope {
    pub length: i32,
}

impl Reflect for Rope {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Rope")
                .field("length", |r| &r.length)
                .constructor(Signature::new("new").param::<i32>("length"), |args| {
                    Ok(Rope {
                        length: args.take()?,
                    })
                })
                .implements::<Tool>()
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tool {
    Hammer(Hammer),
    Rope(Rope),
}

reflect_interface!(Tool {
    Hammer(Hammer),
    Rope(Rope),
});

/// Two parameters of the same interface type.
#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    pub name: String,
    pub weapon: Weapon,
    pub backup_weapon: Weapon,
}

impl Reflect for Hero {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Hero")
                .field("name", |h| &h.name)
                .field("weapon", |h| &h.weapon)
                .field("backup_weapon", |h| &h.backup_weapon)
                .constructor(
                    Signature::new("new")
                        .param::<String>("name")
                        .param::<Weapon>("weapon")
                        .param_for::<Weapon>("backupWeapon", "backup_weapon"),
                    |args| {
                        Ok(Hero {
                            name: args.take()?,
                            weapon: args.take()?,
                            backup_weapon: args.take()?,
                        })
                    },
                )
                .build(),
        )
    }
}

/// Parameters of two different interfaces that share an implementor.
#[derive(Debug, Clone, PartialEq)]
pub struct Loadout {
    pub primary: Weapon,
    pub utility: Tool,
}

impl Reflect for Loadout {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Loadout")
                .field("primary", |l| &l.primary)
                .field("utility", |l| &l.utility)
                .constructor(
                    Signature::new("new")
                        .param::<Weapon>("primary")
                        .param::<Tool>("utility"),
                    |args| {
                        Ok(Loadout {
                            primary: args.take()?,
                            utility: args.take()?,
                        })
                    },
                )
                .build(),
        )
    }
}

pub fn armory_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with::<Sword>()
        .with::<Bow>()
        .with::<Hammer>()
        .with::<Rope>()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

reflect_enum!(Difficulty { Easy, Normal, Hard });

#[derive(Debug, Clone, PartialEq)]
pub struct Quest {
    pub title: String,
    pub difficulty: Difficulty,
    pub note: Option<String>,
    pub reward: i32,
}

impl Reflect for Quest {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Quest")
                .field("title", |q| &q.title)
                .field("difficulty", |q| &q.difficulty)
                .field("note", |q| &q.note)
                .field("reward", |q| &q.reward)
                .constructor(
                    Signature::new("new")
                        .param::<String>("title")
                        .param::<Difficulty>("difficulty")
                        .param::<Option<String>>("note")
                        .param::<i32>("reward"),
                    |args| {
                        Ok(Quest {
                            title: args.take()?,
                            difficulty: args.take()?,
                            note: args.take()?,
                            reward: args.take()?,
                        })
                    },
                )
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Soldier {
    pub rank: i32,
}

impl Reflect for Soldier {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Soldier")
                .field("rank", |s| &s.rank)
                .constructor(Signature::new("new").param::<i32>("rank"), |args| {
                    Ok(Soldier { rank: args.take()? })
                })
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Captain;

impl Reflect for Captain {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Captain")
                .constructor(Signature::new("new"), |_| Ok(Captain))
                .build(),
        )
    }
}

/// An ordered list followed by a nested class.
#[derive(Debug, Clone, PartialEq)]
pub struct Squad {
    pub members: Vec<Soldier>,
    pub leader: Captain,
}

impl Reflect for Squad {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Squad")
                .field("members", |s| &s.members)
                .field("leader", |s| &s.leader)
                .constructor(
                    Signature::new("new")
                        .param::<Vec<Soldier>>("members")
                        .param::<Captain>("leader"),
                    |args| {
                        Ok(Squad {
                            members: args.take()?,
                            leader: args.take()?,
                        })
                    },
                )
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tent;

impl Reflect for Tent {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Tent")
                .constructor(Signature::new("new"), |_| Ok(Tent))
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fire {
    pub heat: i32,
}

impl Reflect for Fire {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Fire")
                .field("heat", |f| &f.heat)
                .constructor(Signature::new("new").param::<i32>("heat"), |args| {
                    Ok(Fire { heat: args.take()? })
                })
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camp {
    pub tent: Tent,
    pub fires: Vec<Fire>,
}

impl Reflect for Camp {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Camp")
                .field("tent", |c| &c.tent)
                .field("fires", |c| &c.fires)
                .constructor(
                    Signature::new("new")
                        .param::<Tent>("tent")
                        .param::<Vec<Fire>>("fires"),
                    |args| {
                        Ok(Camp {
                            tent: args.take()?,
                            fires: args.take()?,
                        })
                    },
                )
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Reflect for Color {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Color")
                .field("r", |c| &c.r)
                .field("g", |c| &c.g)
                .field("b", |c| &c.b)
                .constructor(
                    Signature::new("new")
                        .param::<i32>("r")
                        .param::<i32>("g")
                        .param::<i32>("b"),
                    |args| {
                        Ok(Color {
                            r: args.take()?,
                            g: args.take()?,
                            b: args.take()?,
                        })
                    },
                )
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: String,
    pub primary: Color,
}

impl Reflect for Palette {
    fn type_info() -> TypeInfo {
        TypeInfo::Class(
            ClassInfo::builder::<Self>("Palette")
                .field("name", |p| &p.name)
                .field("primary", |p| &p.primary)
                .constructor(
                    Signature::new("new")
                        .param::<String>("name")
                        .param::<Color>("primary"),
                    |args| {
                        Ok(Palette {
                            name: args.take()?,
                            primary: args.take()?,
                        })
                    },
                )
                .build(),
        )
    }
}

/// Maps `Color` to `<Color hex="#rrggbb"/>`.
pub struct HexColor;

impl Converter for HexColor {
    fn from_element(&self, view: &mut ElementView<'_>) -> Result<Option<Value>, Error> {
        let Some(hex) = view.use_attr("hex") else {
            return Ok(None);
        };
        let digits = hex.trim_start_matches('#');
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|s| i32::from_str_radix(s, 16).ok())
                .ok_or_else(|| Error::InvalidConfiguration {
                    type_name: "Color".to_string(),
                    reason: format!("bad hex color `{hex}`"),
                })
        };
        let color = Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        };
        Ok(Some(color.into_value()))
    }

    fn to_element(&self, value: &FieldRef<'_>, parent: &mut Element) -> Result<bool, Error> {
        let FieldRef::Object(object) = value else {
            return Ok(false);
        };
        let Some(color) = object.downcast_ref::<Color>() else {
            return Ok(false);
        };
        parent.push_child(Element::new("Color").with_attribute(
            "hex",
            format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b),
        ));
        Ok(true)
    }
}

/// Stores a string parameter in a `<Name value=".."/>` child.
pub struct NameChild;

impl Converter for NameChild {
    fn from_element(&self, view: &mut ElementView<'_>) -> Result<Option<Value>, Error> {
        let name = view
            .use_child_by_tag("Name")?
            .and_then(|child| child.attribute("value"))
            .map(|value| Value::Str(value.to_string()));
        Ok(name)
    }

    fn to_element(&self, value: &FieldRef<'_>, parent: &mut Element) -> Result<bool, Error> {
        let FieldRef::Str(name) = value else {
            return Ok(false);
        };
        parent.push_child(Element::new("Name").with_attribute("value", *name));
        Ok(true)
    }
}

#[derive(Debug)]
pub struct Marker;

impl Reflect for Marker {
    fn type_info() -> TypeInfo {
        TypeInfo::Interface(InterfaceInfo::new("Marker"))
    }
}
