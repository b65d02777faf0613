use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Flag groups
// ---------------------------------------------------------------------------

macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* const $flag:ident = $bits:expr; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            $( $(#[$fmeta])* pub const $flag: Self = Self($bits); )*

            /// Union of every bit this group recognizes.
            pub const ALL: Self = Self(0 $( | $bits )*);

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Keeps only recognized bits.
            pub const fn from_bits_truncate(bits: u32) -> Self {
                Self(bits & Self::ALL.0)
            }

            /// Keeps every bit, recognized or not.
            pub const fn from_bits_retain(bits: u32) -> Self {
                Self(bits)
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

flag_set! {
    /// Vertical positioning flags.
    pub struct HoverFlags {
        const WATER_ONLY = 4;
        const TERRAIN_ONLY = 8;
        const GLOBAL_HEIGHT = 16;
        const UP_ONLY = 32;
        const LOCK_HEIGHT = 8192;
    }
}

flag_set! {
    /// Motion and steering behavior flags.
    pub struct BehaviorFlags {
        const NO_DEFLECTION_UP = 1;
        const LIMIT_ROLL_ONLY = 2;
        const LIMIT_MOTOR_UP = 64;
        const MOUSELOOK_STEER = 128;
        const MOUSELOOK_BANK = 256;
        const CAMERA_DECOUPLED = 512;
        const NO_X = 1024;
        const NO_Y = 2048;
        const NO_Z = 4096;
        const NO_DEFLECTION = 16384;
        const LOCK_ROTATION = 32768;
    }
}

impl HoverFlags {
    /// Flags that produce a target height. Hover only engages when one is set.
    pub const RESOLVING: Self =
        Self(Self::WATER_ONLY.0 | Self::TERRAIN_ONLY.0 | Self::GLOBAL_HEIGHT.0);
}

/// Sentinel accepted by [`VehicleFlags::apply`] to wipe both groups.
pub const CLEAR_ALL: i32 = -1;

// ---------------------------------------------------------------------------
// Flag processor
// ---------------------------------------------------------------------------

/// Both flag groups of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VehicleFlags {
    pub hover: HoverFlags,
    pub behavior: BehaviorFlags,
}

impl VehicleFlags {
    pub const fn new(hover: HoverFlags, behavior: BehaviorFlags) -> Self {
        Self { hover, behavior }
    }

    /// Set or clear the bits in `bits`, routing each to its own group.
    ///
    /// `remove` with [`CLEAR_ALL`] empties both groups. Unrecognized bits are
    /// ignored. With `legacy_merge` the set path reproduces the historical
    /// behavior: raising a hover bit also copies the whole behavior group into
    /// the hover group, and LIMIT_ROLL_ONLY cannot be raised.
    pub fn apply(&mut self, bits: i32, remove: bool, legacy_merge: bool) {
        if remove && bits == CLEAR_ALL {
            *self = Self::default();
            return;
        }

        let raw = bits as u32;
        let hover = HoverFlags::from_bits_truncate(raw);
        let behavior = BehaviorFlags::from_bits_truncate(raw);

        if remove {
            self.hover.remove(hover);
            self.behavior.remove(behavior);
        } else if legacy_merge {
            self.merge_legacy(hover, behavior);
        } else {
            self.hover.insert(hover);
            self.behavior.insert(behavior);
        }
    }

    fn merge_legacy(&mut self, hover: HoverFlags, behavior: BehaviorFlags) {
        let leaked = HoverFlags::from_bits_retain(self.behavior.bits());
        for flag in [
            HoverFlags::GLOBAL_HEIGHT,
            HoverFlags::TERRAIN_ONLY,
            HoverFlags::UP_ONLY,
            HoverFlags::WATER_ONLY,
        ] {
            if hover.contains(flag) {
                self.hover |= flag | leaked;
            }
        }
        if hover.contains(HoverFlags::LOCK_HEIGHT) {
            self.hover |= HoverFlags::LOCK_HEIGHT;
        }

        let mut settable = BehaviorFlags::ALL;
        settable.remove(BehaviorFlags::LIMIT_ROLL_ONLY);
        self.behavior |= BehaviorFlags::from_bits_truncate(behavior.bits() & settable.bits());
    }
}
