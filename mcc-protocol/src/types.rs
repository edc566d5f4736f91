// ABOUTME: Value types shared by commands and events (locations, hands, directions, flags).
// ABOUTME: Enumerations travel as their numeric discriminants, the way the remote side decodes them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::BitOr;

/// Convert a coordinate or other float into a JSON number.
///
/// Integral values become JSON integers (`1` rather than `1.0`) so the frames
/// match what the remote side receives from other clients.
pub fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// A position in the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Read a location out of an untyped record; missing axes read as zero.
    pub fn from_value(value: &Value) -> Self {
        let axis = |name: &str| value.get(name).and_then(Value::as_f64).unwrap_or_default();
        Self {
            x: axis("x"),
            y: axis("y"),
            z: axis("z"),
        }
    }
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $name {
            /// Numeric discriminant sent on the wire
            pub fn code(self) -> i64 {
                self as i64
            }
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                Value::from(value.code())
            }
        }
    };
}

wire_enum! {
    /// Which hand performs an action
    pub enum Hand {
        MainHand = 0,
        OffHand = 1,
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::MainHand
    }
}

wire_enum! {
    /// Kind of interaction with an entity
    pub enum InteractType {
        Interact = 0,
        Attack = 1,
        InteractAt = 2,
    }
}

wire_enum! {
    /// Block face
    pub enum Direction {
        Down = 0,
        Up = 1,
        North = 2,
        South = 3,
        West = 4,
        East = 5,
    }
}

wire_enum! {
    /// Player actions sent through `SendEntityAction`
    pub enum EntityActionType {
        StartSneaking = 0,
        StopSneaking = 1,
        LeaveBed = 2,
        StartSprinting = 3,
        StopSprinting = 4,
        StartHorseJump = 5,
        StopHorseJump = 6,
        OpenVehicleInventory = 7,
        StartElytraFlying = 8,
    }
}

wire_enum! {
    /// Click kinds accepted by `WindowAction`
    pub enum WindowActionType {
        LeftClick = 0,
        RightClick = 1,
        MiddleClick = 2,
        ShiftClick = 3,
        ShiftRightClick = 4,
        DropItem = 5,
        DropItemStack = 6,
        StartDragLeft = 7,
        StartDragRight = 8,
        StartDragMiddle = 9,
        EndDragLeft = 10,
        EndDragRight = 11,
        EndDragMiddle = 12,
        AddDragLeft = 13,
        AddDragRight = 14,
        AddDragMiddle = 15,
    }
}

wire_enum! {
    /// Command block execution mode
    pub enum CommandBlockMode {
        Sequence = 0,
        Auto = 1,
        Redstone = 2,
    }
}

/// Command block flag set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CommandBlockFlags(u8);

impl CommandBlockFlags {
    pub const NONE: Self = Self(0);
    pub const TRACK_OUTPUT: Self = Self(1);
    pub const CONDITIONAL: Self = Self(2);
    pub const AUTOMATIC: Self = Self(4);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CommandBlockFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<CommandBlockFlags> for Value {
    fn from(flags: CommandBlockFlags) -> Self {
        Value::from(flags.0)
    }
}

/// Numeric item id as known to the connected server version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemType(pub u32);

impl From<ItemType> for Value {
    fn from(item: ItemType) -> Self {
        Value::from(item.0)
    }
}
