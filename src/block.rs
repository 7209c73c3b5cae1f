//! block catalog: flat kind tags, capability lookup & host‑variant table

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{invalid, Result};

/* ===========================================================
   kinds
   =========================================================== */
/// Every block that can occupy a foreground or background cell.
///
/// The declaration order is the persistence order: `id = ordinal + 1`,
/// with `0` reserved for an empty cell. Append new kinds at the end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum BlockKind {
    /* snow layer */
    Snow,
    IceWood,
    IcePlank,
    IceLeaves,
    Ice,
    IceCrystal,
    Permafrost,
    IceStone,
    FrostironOre,
    CryoriteOre,
    Quartz,
    QuartzPermafrost,
    QuartzIceStone,
    /* stone layer */
    Stone,
    StoneVine,
    YellowMushroom,
    GreenMushroom,
    Stalactite,
    Root,
    Resin,
    RootPlank,
    CoalOre,
    BronzeOre,
    SteelOre,
    FossilGlass,
    /* lava layer */
    Basalt,
    GlowstoneVein,
    Glowstone,
    BrimshardOre,
    EmbersteelOre,
    Gemstone,
    Bedrock,
    /* placeables */
    Workbench,
    Torch,
    Chest,
}

/// Static capabilities of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockProps {
    pub name: &'static str,
    /// 0..=10
    pub light: u8,
    /// false for walk‑through kinds (light fixtures, flora, benches)
    pub solid: bool,
}

const fn props(name: &'static str, light: u8, solid: bool) -> BlockProps {
    BlockProps { name, light, solid }
}

impl BlockKind {
    pub const ALL: [BlockKind; 35] = [
        BlockKind::Snow,
        BlockKind::IceWood,
        BlockKind::IcePlank,
        BlockKind::IceLeaves,
        BlockKind::Ice,
        BlockKind::IceCrystal,
        BlockKind::Permafrost,
        BlockKind::IceStone,
        BlockKind::FrostironOre,
        BlockKind::CryoriteOre,
        BlockKind::Quartz,
        BlockKind::QuartzPermafrost,
        BlockKind::QuartzIceStone,
        BlockKind::Stone,
        BlockKind::StoneVine,
        BlockKind::YellowMushroom,
        BlockKind::GreenMushroom,
        BlockKind::Stalactite,
        BlockKind::Root,
        BlockKind::Resin,
        BlockKind::RootPlank,
        BlockKind::CoalOre,
        BlockKind::BronzeOre,
        BlockKind::SteelOre,
        BlockKind::FossilGlass,
        BlockKind::Basalt,
        BlockKind::GlowstoneVein,
        BlockKind::Glowstone,
        BlockKind::BrimshardOre,
        BlockKind::EmbersteelOre,
        BlockKind::Gemstone,
        BlockKind::Bedrock,
        BlockKind::Workbench,
        BlockKind::Torch,
        BlockKind::Chest,
    ];

    /// capability lookup
    pub const fn props(self) -> BlockProps {
        use BlockKind::*;
        match self {
            Snow             => props("Snow", 0, true),
            IceWood          => props("Frostpine Wood", 0, true),
            IcePlank         => props("Frostpine Wooden Plank", 0, true),
            IceLeaves        => props("Frostpine Leaves", 0, true),
            Ice              => props("Ice", 0, true),
            IceCrystal       => props("Ice Crystal", 10, true),
            Permafrost       => props("Permafrost", 0, true),
            IceStone         => props("Frost-hardened Stone", 0, true),
            FrostironOre     => props("Frostiron Ore", 0, true),
            CryoriteOre      => props("Cryorite Ore", 2, true),
            Quartz           => props("Quartz", 0, true),
            QuartzPermafrost => props("Permafrost Quartz", 5, true),
            QuartzIceStone   => props("Frost-hardened Stone Quartz", 5, true),
            Stone            => props("Stone", 0, true),
            StoneVine        => props("Stone Vine", 8, true),
            YellowMushroom   => props("Yellow Glowcap Fungi", 8, false),
            GreenMushroom    => props("Green Glowcap Fungi", 8, false),
            Stalactite       => props("Stalactite", 0, true),
            Root             => props("Ironroot", 0, true),
            Resin            => props("Duskglow Resin", 10, true),
            RootPlank        => props("Ironroot Plank", 0, true),
            CoalOre          => props("Coal Ore", 0, true),
            BronzeOre        => props("Bronzeclast Ore", 0, true),
            SteelOre         => props("Ruinsteel Ore", 0, true),
            FossilGlass      => props("Fossilglass", 6, true),
            Basalt           => props("Basalt", 0, true),
            GlowstoneVein    => props("Glowstone Ore", 7, true),
            Glowstone        => props("Glowstone", 10, true),
            BrimshardOre     => props("Brimshard Ore", 10, true),
            EmbersteelOre    => props("Embersteel Ore", 5, true),
            Gemstone         => props("Cindersoul Gem Cluster", 5, true),
            Bedrock          => props("Bedrock", 0, true),
            Workbench        => props("Workbench", 0, false),
            Torch            => props("Torch", 10, false),
            Chest            => props("Ironroot Chest", 0, true),
        }
    }

    #[inline]
    pub const fn light_emission(self) -> u8 {
        self.props().light
    }

    #[inline]
    pub const fn is_solid(self) -> bool {
        self.props().solid
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.props().name
    }

    /// persistent id, never 0
    #[inline]
    pub const fn id(self) -> u16 {
        self as u16 + 1
    }

    /// inverse of [`BlockKind::id`]; `None` for 0 and unknown ids
    pub fn from_id(id: u16) -> Option<Self> {
        if id == 0 {
            return None;
        }
        Self::ALL.get(id as usize - 1).copied()
    }
}

/* ===========================================================
   host variants
   =========================================================== */
/// Explicit `(vein, host) → embedded kind` lookup.
#[derive(Clone, Debug, Default)]
pub struct VariantTable {
    map: HashMap<(BlockKind, BlockKind), BlockKind>,
}

impl VariantTable {
    /// all embedded variants shipped with the catalog
    pub fn standard() -> Self {
        let mut table = Self::default();
        table.insert(BlockKind::Quartz, BlockKind::Permafrost, BlockKind::QuartzPermafrost);
        table.insert(BlockKind::Quartz, BlockKind::IceStone, BlockKind::QuartzIceStone);
        table
    }

    pub fn insert(&mut self, vein: BlockKind, host: BlockKind, embedded: BlockKind) {
        self.map.insert((vein, host), embedded);
    }

    pub fn resolve(&self, vein: BlockKind, host: BlockKind) -> Option<BlockKind> {
        self.map.get(&(vein, host)).copied()
    }

    /// like `resolve`, but a missing pair is a configuration error
    pub fn require(&self, vein: BlockKind, host: BlockKind) -> Result<BlockKind> {
        self.resolve(vein, host).ok_or_else(|| {
            invalid(format!(
                "no embedded variant for {} in {}",
                vein.name(),
                host.name()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_and_reserve_zero() {
        assert_eq!(BlockKind::from_id(0), None);
        for kind in BlockKind::ALL {
            assert_ne!(kind.id(), 0);
            assert_eq!(BlockKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(BlockKind::from_id(BlockKind::ALL.len() as u16 + 1), None);
    }

    #[test]
    fn all_is_in_declaration_order() {
        for (i, kind) in BlockKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, i);
        }
    }

    #[test]
    fn emission_is_bounded() {
        assert!(BlockKind::ALL.iter().all(|k| k.light_emission() <= 10));
        assert_eq!(BlockKind::Torch.light_emission(), 10);
        assert_eq!(BlockKind::Stone.light_emission(), 0);
    }

    #[test]
    fn walk_through_kinds() {
        for kind in [
            BlockKind::Torch,
            BlockKind::Workbench,
            BlockKind::GreenMushroom,
            BlockKind::YellowMushroom,
        ] {
            assert!(!kind.is_solid(), "{kind:?} should be walk‑through");
        }
        assert!(BlockKind::Stone.is_solid());
        assert!(BlockKind::Chest.is_solid());
    }

    #[test]
    fn standard_variants_resolve() {
        let table = VariantTable::standard();
        assert_eq!(
            table.resolve(BlockKind::Quartz, BlockKind::Permafrost),
            Some(BlockKind::QuartzPermafrost)
        );
        assert_eq!(
            table.resolve(BlockKind::Quartz, BlockKind::IceStone),
            Some(BlockKind::QuartzIceStone)
        );
        assert!(table.require(BlockKind::Quartz, BlockKind::Stone).is_err());
    }
}
