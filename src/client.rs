// ABOUTME: Handle bots use to invoke remote commands and write log messages.
// ABOUTME: Each call registers before it is sent and is rolled back if the send fails.

use crate::error::BridgeError;
use crate::logging::{LogLevel, LogLevels, LogSink};
use crate::pending::{PendingCalls, PendingReply};
use mcc_protocol::{
    Command, CommandBlockFlags, CommandBlockMode, CommandEnvelope, Direction, EntityActionType,
    Hand, InteractType, ItemType, Location, Transport, WindowActionType,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Optional trailing arguments of `DigBlock`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigOptions {
    pub swing_arms: bool,
    pub look_at_block: bool,
}

impl Default for DigOptions {
    fn default() -> Self {
        Self {
            swing_arms: true,
            look_at_block: true,
        }
    }
}

/// Optional trailing arguments of `MoveToLocation`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOptions {
    pub allow_unsafe: bool,
    pub allow_direct_teleport: bool,
    pub max_offset: i32,
    pub min_offset: i32,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    pending: PendingCalls,
    sink: Arc<dyn LogSink>,
    levels: LogLevels,
}

/// Cheap-to-clone handle onto one bridge's outbound side
#[derive(Clone)]
pub struct BotClient {
    inner: Arc<ClientInner>,
}

impl BotClient {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        pending: PendingCalls,
        sink: Arc<dyn LogSink>,
        levels: LogLevels,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                pending,
                sink,
                levels,
            }),
        }
    }

    /// Send `command` and return the awaitable for its reply.
    ///
    /// Fails immediately, leaving nothing pending, when the frame could not be
    /// sent (`TransportUnavailable`), when called outside a tokio runtime
    /// (`NoRuntime`), or for the handshake command (`Reserved`).
    pub fn invoke(&self, command: Command) -> Result<PendingReply, BridgeError> {
        if command.is_handshake() {
            return Err(BridgeError::Reserved {
                command: command.name(),
            });
        }
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(BridgeError::NoRuntime {
                command: command.name(),
            });
        }

        let envelope = CommandEnvelope::new(&command);
        let frame = envelope.to_json()?;
        let request_id = envelope.request_id().clone();
        let name = envelope.command();

        let reply = self.inner.pending.register(request_id.clone(), name);

        if let Err(e) = self.inner.transport.send(frame) {
            self.inner.pending.cancel(&request_id);
            tracing::warn!(request_id = %request_id, command = name, error = %e, "Failed to send command");
            return Err(e.into());
        }

        tracing::debug!(request_id = %request_id, command = name, "Sent command");
        Ok(reply)
    }

    /// Invoke `command`, wait for the reply and decode it as `T`
    pub async fn call<T: DeserializeOwned>(&self, command: Command) -> Result<T, BridgeError> {
        let name = command.name();
        let result = self.invoke(command)?.await?;
        serde_json::from_value(result)
            .map_err(|source| BridgeError::UnexpectedResult { command: name, source })
    }

    /// Send an arbitrary frame without registering anything
    pub fn send_raw(&self, frame: impl Into<String>) -> Result<(), BridgeError> {
        self.inner.transport.send(frame.into())?;
        Ok(())
    }

    pub fn execution_timeout(&self) -> Duration {
        self.inner.pending.timeout()
    }

    pub fn pending_calls(&self) -> &PendingCalls {
        &self.inner.pending
    }

    fn log(&self, level: LogLevel, message: &str) {
        if self.inner.levels.enabled(level) {
            self.inner.sink.log(level, message);
        }
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    // Console

    pub async fn log_to_console(&self, message: impl Into<String>) -> Result<bool, BridgeError> {
        self.call(Command::LogToConsole {
            message: message.into(),
        })
        .await
    }

    pub async fn log_debug_to_console(
        &self,
        message: impl Into<String>,
    ) -> Result<bool, BridgeError> {
        self.call(Command::LogDebugToConsole {
            message: message.into(),
        })
        .await
    }

    pub async fn log_to_console_translated(
        &self,
        message: impl Into<String>,
    ) -> Result<bool, BridgeError> {
        self.call(Command::LogToConsoleTranslated {
            message: message.into(),
        })
        .await
    }

    pub async fn log_debug_to_console_translated(
        &self,
        message: impl Into<String>,
    ) -> Result<bool, BridgeError> {
        self.call(Command::LogDebugToConsoleTranslated {
            message: message.into(),
        })
        .await
    }

    // Session

    pub async fn reconnect_to_the_server(
        &self,
        extra_attempts: i32,
        delay_seconds: f64,
    ) -> Result<bool, BridgeError> {
        self.call(Command::ReconnectToTheServer {
            extra_attempts,
            delay_seconds,
        })
        .await
    }

    pub async fn disconnect_and_exit(&self) -> Result<bool, BridgeError> {
        self.call(Command::DisconnectAndExit).await
    }

    pub async fn run_script(&self, script_name: impl Into<String>) -> Result<bool, BridgeError> {
        self.call(Command::RunScript {
            script_name: script_name.into(),
        })
        .await
    }

    pub async fn change_session_id(
        &self,
        session_id: impl Into<String>,
    ) -> Result<bool, BridgeError> {
        self.call(Command::ChangeSessionId {
            session_id: session_id.into(),
        })
        .await
    }

    pub async fn get_terrain_enabled(&self) -> Result<bool, BridgeError> {
        self.call(Command::GetTerrainEnabled).await
    }

    pub async fn set_terrain_enabled(&self, enabled: bool) -> Result<bool, BridgeError> {
        self.call(Command::SetTerrainEnabled { enabled }).await
    }

    pub async fn get_entity_handling_enabled(&self) -> Result<bool, BridgeError> {
        self.call(Command::GetEntityHandlingEnabled).await
    }

    // Player actions

    pub async fn sneak(&self, toggle: bool) -> Result<bool, BridgeError> {
        self.call(Command::Sneak { toggle }).await
    }

    pub async fn send_entity_action(
        &self,
        action_type: EntityActionType,
    ) -> Result<bool, BridgeError> {
        self.call(Command::SendEntityAction { action_type }).await
    }

    pub async fn dig_block(
        &self,
        location: Location,
        options: DigOptions,
    ) -> Result<bool, BridgeError> {
        self.call(Command::DigBlock {
            x: location.x,
            y: location.y,
            z: location.z,
            swing_arms: options.swing_arms,
            look_at_block: options.look_at_block,
        })
        .await
    }

    pub async fn set_slot(&self, slot_id: i32) -> Result<bool, BridgeError> {
        self.call(Command::SetSlot { slot_id }).await
    }

    pub async fn move_to_location(
        &self,
        location: Location,
        options: MoveOptions,
    ) -> Result<bool, BridgeError> {
        self.call(Command::MoveToLocation {
            x: location.x,
            y: location.y,
            z: location.z,
            allow_unsafe: options.allow_unsafe,
            allow_direct_teleport: options.allow_direct_teleport,
            max_offset: options.max_offset,
            min_offset: options.min_offset,
        })
        .await
    }

    pub async fn client_is_moving(&self) -> Result<bool, BridgeError> {
        self.call(Command::ClientIsMoving).await
    }

    pub async fn look_at_location(&self, location: Location) -> Result<bool, BridgeError> {
        self.call(Command::LookAtLocation {
            x: location.x,
            y: location.y,
            z: location.z,
        })
        .await
    }

    pub async fn interact_entity(
        &self,
        entity_id: i32,
        interaction_type: InteractType,
        hand: Hand,
    ) -> Result<bool, BridgeError> {
        self.call(Command::InteractEntity {
            entity_id,
            interaction_type,
            hand,
        })
        .await
    }

    pub async fn send_animation(&self, hand: Hand) -> Result<bool, BridgeError> {
        self.call(Command::SendAnimation { hand }).await
    }

    pub async fn send_place_block(
        &self,
        location: Location,
        direction: Direction,
        hand: Hand,
    ) -> Result<bool, BridgeError> {
        self.call(Command::SendPlaceBlock {
            x: location.x,
            y: location.y,
            z: location.z,
            direction,
            hand,
        })
        .await
    }

    pub async fn use_item_in_hand(&self) -> Result<bool, BridgeError> {
        self.call(Command::UseItemInHand).await
    }

    pub async fn respawn(&self) -> Result<bool, BridgeError> {
        self.call(Command::Respawn).await
    }

    // World and server queries

    pub async fn get_world(&self) -> Result<Value, BridgeError> {
        self.call(Command::GetWorld).await
    }

    pub async fn get_entities(&self) -> Result<Vec<Value>, BridgeError> {
        self.call(Command::GetEntities).await
    }

    pub async fn get_players_latency(&self) -> Result<Vec<Value>, BridgeError> {
        self.call(Command::GetPlayersLatency).await
    }

    pub async fn get_current_location(&self) -> Result<Location, BridgeError> {
        self.call(Command::GetCurrentLocation).await
    }

    pub async fn get_timestamp(&self) -> Result<String, BridgeError> {
        self.call(Command::GetTimestamp).await
    }

    pub async fn get_server_port(&self) -> Result<i64, BridgeError> {
        self.call(Command::GetServerPort).await
    }

    pub async fn get_server_host(&self) -> Result<String, BridgeError> {
        self.call(Command::GetServerHost).await
    }

    pub async fn get_username(&self) -> Result<String, BridgeError> {
        self.call(Command::GetUsername).await
    }

    pub async fn get_gamemode(&self) -> Result<String, BridgeError> {
        self.call(Command::GetGamemode).await
    }

    pub async fn get_yaw(&self) -> Result<f64, BridgeError> {
        self.call(Command::GetYaw).await
    }

    pub async fn get_pitch(&self) -> Result<f64, BridgeError> {
        self.call(Command::GetPitch).await
    }

    pub async fn get_user_uuid(&self) -> Result<String, BridgeError> {
        self.call(Command::GetUserUuid).await
    }

    pub async fn get_online_players(&self) -> Result<Value, BridgeError> {
        self.call(Command::GetOnlinePlayers).await
    }

    pub async fn get_online_players_with_uuid(&self) -> Result<Value, BridgeError> {
        self.call(Command::GetOnlinePlayersWithUuid).await
    }

    pub async fn get_server_tps(&self) -> Result<f64, BridgeError> {
        self.call(Command::GetServerTps).await
    }

    pub async fn get_max_chat_message_length(&self) -> Result<i64, BridgeError> {
        self.call(Command::GetMaxChatMessageLength).await
    }

    pub async fn get_protocol_version(&self) -> Result<i64, BridgeError> {
        self.call(Command::GetProtocolVersion).await
    }

    // Inventory

    pub async fn creative_give(
        &self,
        slot: i32,
        item_type: ItemType,
        count: i32,
    ) -> Result<bool, BridgeError> {
        self.call(Command::CreativeGive {
            slot,
            item_type,
            count,
        })
        .await
    }

    pub async fn creative_delete(&self, slot: i32) -> Result<bool, BridgeError> {
        self.call(Command::CreativeDelete { slot }).await
    }

    pub async fn get_inventory_enabled(&self) -> Result<bool, BridgeError> {
        self.call(Command::GetInventoryEnabled).await
    }

    pub async fn get_player_inventory(&self) -> Result<Value, BridgeError> {
        self.call(Command::GetPlayerInventory).await
    }

    pub async fn get_inventories(&self) -> Result<Vec<Value>, BridgeError> {
        self.call(Command::GetInventories).await
    }

    pub async fn window_action(
        &self,
        window_id: i32,
        slot_id: i32,
        window_action_type: WindowActionType,
    ) -> Result<bool, BridgeError> {
        self.call(Command::WindowAction {
            window_id,
            slot_id,
            window_action_type,
        })
        .await
    }

    pub async fn change_slot(&self, slot_id: i32) -> Result<bool, BridgeError> {
        self.call(Command::ChangeSlot { slot_id }).await
    }

    pub async fn get_current_slot(&self) -> Result<i64, BridgeError> {
        self.call(Command::GetCurrentSlot).await
    }

    pub async fn clear_inventories(&self) -> Result<bool, BridgeError> {
        self.call(Command::ClearInventories).await
    }

    pub async fn close_inventory(&self, window_id: i32) -> Result<bool, BridgeError> {
        self.call(Command::CloseInventory { window_id }).await
    }

    pub async fn select_trade(&self, selected_slot: i32) -> Result<bool, BridgeError> {
        self.call(Command::SelectTrade { selected_slot }).await
    }

    // Blocks

    pub async fn update_sign(
        &self,
        location: Location,
        lines: [&str; 4],
    ) -> Result<bool, BridgeError> {
        let [line1, line2, line3, line4] = lines.map(str::to_string);
        self.call(Command::UpdateSign {
            x: location.x,
            y: location.y,
            z: location.z,
            line1,
            line2,
            line3,
            line4,
        })
        .await
    }

    pub async fn update_command_block(
        &self,
        location: Location,
        command: impl Into<String>,
        mode: CommandBlockMode,
        flags: CommandBlockFlags,
    ) -> Result<bool, BridgeError> {
        self.call(Command::UpdateCommandBlock {
            x: location.x,
            y: location.y,
            z: location.z,
            command: command.into(),
            mode,
            flags,
        })
        .await
    }
}
