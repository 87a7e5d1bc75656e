//! # Components Module
//!
//! Plain data records attached to entities.
//!
//! Every component type is one variant of [`Component`] and is identified by a
//! [`ComponentTag`]. Typed access goes through [`ComponentKind`], so callers ask
//! for `entity.get::<Health>()` and get `None` when the capability is absent
//! instead of performing an unchecked cast.

pub mod behavior;
pub mod casting;
pub mod offense;
pub mod presentation;
pub mod spatial;
pub mod affliction;
pub mod vitals;

pub use affliction::*;
pub use behavior::*;
pub use casting::*;
pub use offense::*;
pub use presentation::*;
pub use spatial::*;
pub use vitals::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag identifying a component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentTag {
    Position,
    Velocity,
    Layer,
    Health,
    Mana,
    Team,
    Dead,
    Attack,
    Stats,
    Shield,
    Equipment,
    Projectile,
    StatusEffect,
    SpellSlots,
    Hotbar,
    Ai,
    Animation,
}

impl ComponentTag {
    /// Stable string name of the tag.
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentTag::Position => "position",
            ComponentTag::Velocity => "velocity",
            ComponentTag::Layer => "layer",
            ComponentTag::Health => "health",
            ComponentTag::Mana => "mana",
            ComponentTag::Team => "team",
            ComponentTag::Dead => "dead",
            ComponentTag::Attack => "attack",
            ComponentTag::Stats => "stats",
            ComponentTag::Shield => "shield",
            ComponentTag::Equipment => "equipment",
            ComponentTag::Projectile => "projectile",
            ComponentTag::StatusEffect => "status_effect",
            ComponentTag::SpellSlots => "spell_slots",
            ComponentTag::Hotbar => "hotbar",
            ComponentTag::Ai => "ai",
            ComponentTag::Animation => "animation",
        }
    }
}

impl fmt::Display for ComponentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged union over every component the simulation knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Position(Position),
    Velocity(Velocity),
    Layer(Layer),
    Health(Health),
    Mana(Mana),
    Team(Team),
    Dead(Dead),
    Attack(Attack),
    Stats(Stats),
    Shield(Shield),
    Equipment(Equipment),
    Projectile(Projectile),
    StatusEffect(StatusEffect),
    SpellSlots(SpellSlots),
    Hotbar(Hotbar),
    Ai(AiComponent),
    Animation(Animation),
}

/// Typed view over one [`Component`] variant.
pub trait ComponentKind: Sized {
    /// Tag this type is stored under.
    const TAG: ComponentTag;

    /// Wraps the value into the tagged union.
    fn into_component(self) -> Component;

    /// Unwraps an owned component if it is of this type.
    fn from_component(component: Component) -> Option<Self>;

    /// Borrows a component if it is of this type.
    fn from_ref(component: &Component) -> Option<&Self>;

    /// Mutably borrows a component if it is of this type.
    fn from_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! impl_component_kind {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        impl Component {
            /// Tag of the stored variant.
            pub fn tag(&self) -> ComponentTag {
                match self {
                    $(Component::$variant(_) => ComponentTag::$variant,)*
                }
            }
        }

        $(
            impl ComponentKind for $ty {
                const TAG: ComponentTag = ComponentTag::$variant;

                fn into_component(self) -> Component {
                    Component::$variant(self)
                }

                fn from_component(component: Component) -> Option<Self> {
                    match component {
                        Component::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_ref(component: &Component) -> Option<&Self> {
                    match component {
                        Component::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_mut(component: &mut Component) -> Option<&mut Self> {
                    match component {
                        Component::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Component {
                fn from(value: $ty) -> Self {
                    Component::$variant(value)
                }
            }
        )*
    };
}

impl_component_kind! {
    Position => Position,
    Velocity => Velocity,
    Layer => Layer,
    Health => Health,
    Mana => Mana,
    Team => Team,
    Dead => Dead,
    Attack => Attack,
    Stats => Stats,
    Shield => Shield,
    Equipment => Equipment,
    Projectile => Projectile,
    StatusEffect => StatusEffect,
    SpellSlots => SpellSlots,
    Hotbar => Hotbar,
    AiComponent => Ai,
    Animation => Animation,
}
