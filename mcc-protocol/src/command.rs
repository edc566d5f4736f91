// ABOUTME: Closed catalog of remote operations the console client accepts.
// ABOUTME: Each variant declares its parameters in wire order; fields() flattens them positionally.

use crate::types::{
    number, CommandBlockFlags, CommandBlockMode, Direction, EntityActionType, Hand, InteractType,
    ItemType, WindowActionType,
};
use serde_json::Value;

/// Wire name of the authentication handshake command.
///
/// Replies carrying this name belong to the connection handshake and never
/// settle a pending call.
pub const AUTHENTICATE_COMMAND: &str = "Authenticate";

/// A remote operation with its arguments.
///
/// The remote side decodes parameters by position, so the field order of each
/// variant is part of the protocol. `fields()` returns them in that order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Authenticate {
        password: String,
    },
    ChangeSessionId {
        session_id: String,
    },
    ChangeSlot {
        slot_id: i32,
    },
    ClearInventories,
    ClientIsMoving,
    CloseInventory {
        window_id: i32,
    },
    CreativeDelete {
        slot: i32,
    },
    CreativeGive {
        slot: i32,
        item_type: ItemType,
        count: i32,
    },
    DigBlock {
        x: f64,
        y: f64,
        z: f64,
        swing_arms: bool,
        look_at_block: bool,
    },
    DisconnectAndExit,
    GetCurrentLocation,
    GetCurrentSlot,
    GetEntities,
    GetEntityHandlingEnabled,
    GetGamemode,
    GetInventories,
    GetInventoryEnabled,
    GetMaxChatMessageLength,
    GetOnlinePlayers,
    GetOnlinePlayersWithUuid,
    GetPitch,
    GetPlayerInventory,
    GetPlayersLatency,
    GetProtocolVersion,
    GetServerHost,
    GetServerPort,
    GetServerTps,
    GetTerrainEnabled,
    GetTimestamp,
    GetUsername,
    GetUserUuid,
    GetWorld,
    GetYaw,
    InteractEntity {
        entity_id: i32,
        interaction_type: InteractType,
        hand: Hand,
    },
    LogDebugToConsole {
        message: String,
    },
    LogDebugToConsoleTranslated {
        message: String,
    },
    LogToConsole {
        message: String,
    },
    LogToConsoleTranslated {
        message: String,
    },
    LookAtLocation {
        x: f64,
        y: f64,
        z: f64,
    },
    MoveToLocation {
        x: f64,
        y: f64,
        z: f64,
        allow_unsafe: bool,
        allow_direct_teleport: bool,
        max_offset: i32,
        min_offset: i32,
    },
    ReconnectToTheServer {
        extra_attempts: i32,
        delay_seconds: f64,
    },
    Respawn,
    RunScript {
        script_name: String,
    },
    SelectTrade {
        selected_slot: i32,
    },
    SendAnimation {
        hand: Hand,
    },
    SendEntityAction {
        action_type: EntityActionType,
    },
    SendPlaceBlock {
        x: f64,
        y: f64,
        z: f64,
        direction: Direction,
        hand: Hand,
    },
    SetSlot {
        slot_id: i32,
    },
    SetTerrainEnabled {
        enabled: bool,
    },
    Sneak {
        toggle: bool,
    },
    UpdateCommandBlock {
        x: f64,
        y: f64,
        z: f64,
        command: String,
        mode: CommandBlockMode,
        flags: CommandBlockFlags,
    },
    UpdateSign {
        x: f64,
        y: f64,
        z: f64,
        line1: String,
        line2: String,
        line3: String,
        line4: String,
    },
    UseItemInHand,
    WindowAction {
        window_id: i32,
        slot_id: i32,
        window_action_type: WindowActionType,
    },
}

impl Command {
    /// Wire discriminator for this operation
    pub fn name(&self) -> &'static str {
        match self {
            Self::Authenticate { .. } => AUTHENTICATE_COMMAND,
            Self::ChangeSessionId { .. } => "ChangeSessionId",
            Self::ChangeSlot { .. } => "ChangeSlot",
            Self::ClearInventories => "ClearInventories",
            Self::ClientIsMoving => "ClientIsMoving",
            Self::CloseInventory { .. } => "CloseInventory",
            Self::CreativeDelete { .. } => "CreativeDelete",
            Self::CreativeGive { .. } => "CreativeGive",
            Self::DigBlock { .. } => "DigBlock",
            Self::DisconnectAndExit => "DisconnectAndExit",
            Self::GetCurrentLocation => "GetCurrentLocation",
            Self::GetCurrentSlot => "GetCurrentSlot",
            Self::GetEntities => "GetEntities",
            Self::GetEntityHandlingEnabled => "GetEntityHandlingEnabled",
            Self::GetGamemode => "GetGamemode",
            Self::GetInventories => "GetInventories",
            Self::GetInventoryEnabled => "GetInventoryEnabled",
            Self::GetMaxChatMessageLength => "GetMaxChatMessageLength",
            Self::GetOnlinePlayers => "GetOnlinePlayers",
            Self::GetOnlinePlayersWithUuid => "GetOnlinePlayersWithUUID",
            Self::GetPitch => "GetPitch",
            Self::GetPlayerInventory => "GetPlayerInventory",
            Self::GetPlayersLatency => "GetPlayersLatency",
            Self::GetProtocolVersion => "GetProtocolVersion",
            Self::GetServerHost => "GetServerHost",
            Self::GetServerPort => "GetServerPort",
            Self::GetServerTps => "GetServerTPS",
            Self::GetTerrainEnabled => "GetTerrainEnabled",
            Self::GetTimestamp => "GetTimestamp",
            Self::GetUsername => "GetUsername",
            Self::GetUserUuid => "GetUserUUID",
            Self::GetWorld => "GetWorld",
            Self::GetYaw => "GetYaw",
            Self::InteractEntity { .. } => "InteractEntity",
            Self::LogDebugToConsole { .. } => "LogDebugToConsole",
            Self::LogDebugToConsoleTranslated { .. } => "LogDebugToConsoleTranslated",
            Self::LogToConsole { .. } => "LogToConsole",
            Self::LogToConsoleTranslated { .. } => "LogToConsoleTranslated",
            Self::LookAtLocation { .. } => "LookAtLocation",
            Self::MoveToLocation { .. } => "MoveToLocation",
            Self::ReconnectToTheServer { .. } => "ReconnectToTheServer",
            Self::Respawn => "Respawn",
            Self::RunScript { .. } => "RunScript",
            Self::SelectTrade { .. } => "SelectTrade",
            Self::SendAnimation { .. } => "SendAnimation",
            Self::SendEntityAction { .. } => "SendEntityAction",
            Self::SendPlaceBlock { .. } => "SendPlaceBlock",
            Self::SetSlot { .. } => "SetSlot",
            Self::SetTerrainEnabled { .. } => "SetTerrainEnabled",
            Self::Sneak { .. } => "Sneak",
            Self::UpdateCommandBlock { .. } => "UpdateCommandBlock",
            Self::UpdateSign { .. } => "UpdateSign",
            Self::UseItemInHand => "UseItemInHand",
            Self::WindowAction { .. } => "WindowAction",
        }
    }

    /// Positional parameters in declared order
    pub fn fields(&self) -> Vec<Value> {
        match self {
            Self::Authenticate { password } => vec![password.as_str().into()],
            Self::ChangeSessionId { session_id } => vec![session_id.as_str().into()],
            Self::ChangeSlot { slot_id } | Self::SetSlot { slot_id } => vec![(*slot_id).into()],
            Self::CloseInventory { window_id } => vec![(*window_id).into()],
            Self::CreativeDelete { slot } => vec![(*slot).into()],
            Self::CreativeGive {
                slot,
                item_type,
                count,
            } => vec![(*slot).into(), (*item_type).into(), (*count).into()],
            Self::DigBlock {
                x,
                y,
                z,
                swing_arms,
                look_at_block,
            } => vec![
                number(*x),
                number(*y),
                number(*z),
                (*swing_arms).into(),
                (*look_at_block).into(),
            ],
            Self::InteractEntity {
                entity_id,
                interaction_type,
                hand,
            } => vec![
                (*entity_id).into(),
                (*interaction_type).into(),
                (*hand).into(),
            ],
            Self::LogDebugToConsole { message }
            | Self::LogDebugToConsoleTranslated { message }
            | Self::LogToConsole { message }
            | Self::LogToConsoleTranslated { message } => vec![message.as_str().into()],
            Self::LookAtLocation { x, y, z } => vec![number(*x), number(*y), number(*z)],
            Self::MoveToLocation {
                x,
                y,
                z,
                allow_unsafe,
                allow_direct_teleport,
                max_offset,
                min_offset,
            } => vec![
                number(*x),
                number(*y),
                number(*z),
                (*allow_unsafe).into(),
                (*allow_direct_teleport).into(),
                (*max_offset).into(),
                (*min_offset).into(),
            ],
            Self::ReconnectToTheServer {
                extra_attempts,
                delay_seconds,
            } => vec![(*extra_attempts).into(), number(*delay_seconds)],
            Self::RunScript { script_name } => vec![script_name.as_str().into()],
            Self::SelectTrade { selected_slot } => vec![(*selected_slot).into()],
            Self::SendAnimation { hand } => vec![(*hand).into()],
            Self::SendEntityAction { action_type } => vec![(*action_type).into()],
            Self::SendPlaceBlock {
                x,
                y,
                z,
                direction,
                hand,
            } => vec![
                number(*x),
                number(*y),
                number(*z),
                (*direction).into(),
                (*hand).into(),
            ],
            Self::SetTerrainEnabled { enabled } => vec![(*enabled).into()],
            Self::Sneak { toggle } => vec![(*toggle).into()],
            Self::UpdateCommandBlock {
                x,
                y,
                z,
                command,
                mode,
                flags,
            } => vec![
                number(*x),
                number(*y),
                number(*z),
                command.as_str().into(),
                (*mode).into(),
                (*flags).into(),
            ],
            Self::UpdateSign {
                x,
                y,
                z,
                line1,
                line2,
                line3,
                line4,
            } => vec![
                number(*x),
                number(*y),
                number(*z),
                line1.as_str().into(),
                line2.as_str().into(),
                line3.as_str().into(),
                line4.as_str().into(),
            ],
            Self::WindowAction {
                window_id,
                slot_id,
                window_action_type,
            } => vec![
                (*window_id).into(),
                (*slot_id).into(),
                (*window_action_type).into(),
            ],
            Self::ClearInventories
            | Self::ClientIsMoving
            | Self::DisconnectAndExit
            | Self::GetCurrentLocation
            | Self::GetCurrentSlot
            | Self::GetEntities
            | Self::GetEntityHandlingEnabled
            | Self::GetGamemode
            | Self::GetInventories
            | Self::GetInventoryEnabled
            | Self::GetMaxChatMessageLength
            | Self::GetOnlinePlayers
            | Self::GetOnlinePlayersWithUuid
            | Self::GetPitch
            | Self::GetPlayerInventory
            | Self::GetPlayersLatency
            | Self::GetProtocolVersion
            | Self::GetServerHost
            | Self::GetServerPort
            | Self::GetServerTps
            | Self::GetTerrainEnabled
            | Self::GetTimestamp
            | Self::GetUsername
            | Self::GetUserUuid
            | Self::GetWorld
            | Self::GetYaw
            | Self::Respawn
            | Self::UseItemInHand => Vec::new(),
        }
    }

    /// Whether this is the connection handshake rather than a regular call
    pub fn is_handshake(&self) -> bool {
        matches!(self, Self::Authenticate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_argument_command_has_empty_fields() {
        assert_eq!(Command::GetYaw.name(), "GetYaw");
        assert!(Command::GetYaw.fields().is_empty());
    }

    #[test]
    fn test_move_to_location_keeps_declared_order() {
        let command = Command::MoveToLocation {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            allow_unsafe: false,
            allow_direct_teleport: false,
            max_offset: 0,
            min_offset: 0,
        };
        assert_eq!(
            Value::Array(command.fields()),
            json!([1, 2, 3, false, false, 0, 0])
        );
    }

    #[test]
    fn test_update_command_block_fields() {
        let command = Command::UpdateCommandBlock {
            x: 10.0,
            y: 64.0,
            z: -5.5,
            command: "say hi".to_string(),
            mode: CommandBlockMode::Redstone,
            flags: CommandBlockFlags::TRACK_OUTPUT | CommandBlockFlags::CONDITIONAL,
        };
        assert_eq!(
            Value::Array(command.fields()),
            json!([10, 64, -5.5, "say hi", 2, 3])
        );
    }

    #[test]
    fn test_uppercase_acronyms_in_wire_names() {
        assert_eq!(Command::GetServerTps.name(), "GetServerTPS");
        assert_eq!(Command::GetUserUuid.name(), "GetUserUUID");
        assert_eq!(
            Command::GetOnlinePlayersWithUuid.name(),
            "GetOnlinePlayersWithUUID"
        );
    }

    #[test]
    fn test_authenticate_is_handshake() {
        let command = Command::Authenticate {
            password: "hunter2".to_string(),
        };
        assert!(command.is_handshake());
        assert!(!Command::Respawn.is_handshake());
    }
}
