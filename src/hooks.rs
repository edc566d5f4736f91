// ABOUTME: Overridable bot hooks, one per event kind plus lifecycle and error hooks.
// ABOUTME: Every hook defaults to a no-op; implementors override only what they need.

use crate::client::BotClient;
use async_trait::async_trait;
use mcc_protocol::{BotEvent, Location, MapData, Title};
use serde_json::Value;

/// Bot behaviour attached to a bridge.
///
/// Hooks receive the bot's [`BotClient`] so they can issue commands and log.
/// Returning an error (or panicking) reports the failure through
/// [`ChatBot::on_event_error`]; later events are still delivered.
#[async_trait]
#[allow(unused_variables)]
pub trait ChatBot: Send + Sync + 'static {
    /// Called once when the bridge is attached
    async fn on_initialize(&self, client: &BotClient) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once when the bridge is detached
    async fn on_destroy(&self, client: &BotClient) -> anyhow::Result<()> {
        Ok(())
    }

    /// A hook for `event` failed
    async fn on_event_error(
        &self,
        client: &BotClient,
        event: &str,
        error: anyhow::Error,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// An event arrived whose name is not in the known set
    async fn on_unhandled_event(
        &self,
        client: &BotClient,
        event: &str,
        payload: Value,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_game_joined(&self, client: &BotClient) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_block_break_animation(
        &self,
        client: &BotClient,
        entity: &Value,
        location: Location,
        stage: i64,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_entity_animation(
        &self,
        client: &BotClient,
        entity: &Value,
        animation: i64,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_chat_private(
        &self,
        client: &BotClient,
        sender: &str,
        message: &str,
        raw_text: &str,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_chat_public(
        &self,
        client: &BotClient,
        username: &str,
        message: &str,
        raw_text: &str,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_teleport_request(
        &self,
        client: &BotClient,
        sender: &str,
        raw_text: &str,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_chat_raw(&self, client: &BotClient, text: &str, json: &Value) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_disconnect(
        &self,
        client: &BotClient,
        reason: &str,
        message: &str,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_player_property(&self, client: &BotClient, properties: &Value) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_server_tps_update(&self, client: &BotClient, tps: f64) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_time_update(
        &self,
        client: &BotClient,
        world_age: i64,
        time_of_day: i64,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_entity_move(&self, client: &BotClient, entity: &Value) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_internal_command(
        &self,
        client: &BotClient,
        command: &str,
        parameters: &str,
        result: &str,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_entity_spawn(&self, client: &BotClient, entity: &Value) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_entity_despawn(&self, client: &BotClient, entity: &Value) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_held_item_change(&self, client: &BotClient, item_slot: i64) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_health_update(&self, client: &BotClient, health: f64, food: i64) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_explosion(
        &self,
        client: &BotClient,
        location: Location,
        strength: f64,
        record_count: i64,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_set_experience(
        &self,
        client: &BotClient,
        experience_bar: f64,
        level: i64,
        total_experience: i64,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_gamemode_update(
        &self,
        client: &BotClient,
        player_name: &str,
        uuid: &str,
        game_mode: &str,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_latency_update(
        &self,
        client: &BotClient,
        player_name: &str,
        uuid: &str,
        latency: i64,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Map update; fields arrive in wire order on `map`
    async fn on_map_data(&self, client: &BotClient, map: &MapData) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_trade_list(
        &self,
        client: &BotClient,
        window_id: i64,
        trades: &Value,
        villager_info: &Value,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_title(&self, client: &BotClient, title: &Title) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_entity_equipment(
        &self,
        client: &BotClient,
        entity: &Value,
        slot: i64,
        item: &Value,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_entity_effect(
        &self,
        client: &BotClient,
        entity: &Value,
        effect: &str,
        amplifier: i64,
        duration: i64,
        flags: i64,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_scoreboard_objective(
        &self,
        client: &BotClient,
        objective_name: &str,
        mode: i64,
        objective_value: &str,
        objective_type: i64,
        raw_json: &Value,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_update_score(
        &self,
        client: &BotClient,
        entity_name: &str,
        action: i64,
        objective_name: &str,
        objective_type: i64,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_inventory_update(&self, client: &BotClient, inventory_id: i64) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_inventory_open(&self, client: &BotClient, inventory_id: i64) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_inventory_close(&self, client: &BotClient, inventory_id: i64) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_player_join(&self, client: &BotClient, uuid: &str, name: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_player_leave(&self, client: &BotClient, uuid: &str, name: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_death(&self, client: &BotClient) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_respawn(&self, client: &BotClient) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_entity_health(&self, client: &BotClient, entity: &Value, health: f64) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_entity_metadata(
        &self,
        client: &BotClient,
        entity: &Value,
        metadata: &Value,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_player_status(&self, client: &BotClient, status_id: i64) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_network_packet(
        &self,
        client: &BotClient,
        packet_id: i64,
        is_login: bool,
        is_inbound: bool,
        packet_data: &Value,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Call the hook mapped to `event` with its extracted arguments
pub(crate) async fn deliver<B: ChatBot + ?Sized>(
    bot: &B,
    client: &BotClient,
    event: BotEvent,
) -> anyhow::Result<()> {
    match event {
        BotEvent::GameJoined => bot.on_game_joined(client).await,
        BotEvent::BlockBreakAnimation {
            entity,
            location,
            stage,
        } => {
            bot.on_block_break_animation(client, &entity, location, stage)
                .await
        }
        BotEvent::EntityAnimation { entity, animation } => {
            bot.on_entity_animation(client, &entity, animation).await
        }
        BotEvent::ChatPrivate {
            sender,
            message,
            raw_text,
        } => bot.on_chat_private(client, &sender, &message, &raw_text).await,
        BotEvent::ChatPublic {
            username,
            message,
            raw_text,
        } => bot.on_chat_public(client, &username, &message, &raw_text).await,
        BotEvent::TeleportRequest { sender, raw_text } => {
            bot.on_teleport_request(client, &sender, &raw_text).await
        }
        BotEvent::ChatRaw { text, json } => bot.on_chat_raw(client, &text, &json).await,
        BotEvent::Disconnect { reason, message } => {
            bot.on_disconnect(client, &reason, &message).await
        }
        BotEvent::PlayerProperty { properties } => {
            bot.on_player_property(client, &properties).await
        }
        BotEvent::ServerTpsUpdate { tps } => bot.on_server_tps_update(client, tps).await,
        BotEvent::TimeUpdate {
            world_age,
            time_of_day,
        } => bot.on_time_update(client, world_age, time_of_day).await,
        BotEvent::EntityMove { entity } => bot.on_entity_move(client, &entity).await,
        BotEvent::InternalCommand {
            command,
            parameters,
            result,
        } => {
            bot.on_internal_command(client, &command, &parameters, &result)
                .await
        }
        BotEvent::EntitySpawn { entity } => bot.on_entity_spawn(client, &entity).await,
        BotEvent::EntityDespawn { entity } => bot.on_entity_despawn(client, &entity).await,
        BotEvent::HeldItemChange { item_slot } => bot.on_held_item_change(client, item_slot).await,
        BotEvent::HealthUpdate { health, food } => bot.on_health_update(client, health, food).await,
        BotEvent::Explosion {
            location,
            strength,
            record_count,
        } => bot.on_explosion(client, location, strength, record_count).await,
        BotEvent::SetExperience {
            experience_bar,
            level,
            total_experience,
        } => {
            bot.on_set_experience(client, experience_bar, level, total_experience)
                .await
        }
        BotEvent::GamemodeUpdate {
            player_name,
            uuid,
            game_mode,
        } => {
            bot.on_gamemode_update(client, &player_name, &uuid, &game_mode)
                .await
        }
        BotEvent::LatencyUpdate {
            player_name,
            uuid,
            latency,
        } => {
            bot.on_latency_update(client, &player_name, &uuid, latency)
                .await
        }
        BotEvent::MapData(map) => bot.on_map_data(client, &map).await,
        BotEvent::TradeList {
            window_id,
            trades,
            villager_info,
        } => {
            bot.on_trade_list(client, window_id, &trades, &villager_info)
                .await
        }
        BotEvent::Title(title) => bot.on_title(client, &title).await,
        BotEvent::EntityEquipment { entity, slot, item } => {
            bot.on_entity_equipment(client, &entity, slot, &item).await
        }
        BotEvent::EntityEffect {
            entity,
            effect,
            amplifier,
            duration,
            flags,
        } => {
            bot.on_entity_effect(client, &entity, &effect, amplifier, duration, flags)
                .await
        }
        BotEvent::ScoreboardObjective {
            objective_name,
            mode,
            objective_value,
            objective_type,
            raw_json,
        } => {
            bot.on_scoreboard_objective(
                client,
                &objective_name,
                mode,
                &objective_value,
                objective_type,
                &raw_json,
            )
            .await
        }
        BotEvent::UpdateScore {
            entity_name,
            action,
            objective_name,
            objective_type,
        } => {
            bot.on_update_score(client, &entity_name, action, &objective_name, objective_type)
                .await
        }
        BotEvent::InventoryUpdate { inventory_id } => {
            bot.on_inventory_update(client, inventory_id).await
        }
        BotEvent::InventoryOpen { inventory_id } => bot.on_inventory_open(client, inventory_id).await,
        BotEvent::InventoryClose { inventory_id } => {
            bot.on_inventory_close(client, inventory_id).await
        }
        BotEvent::PlayerJoin { uuid, name } => bot.on_player_join(client, &uuid, &name).await,
        BotEvent::PlayerLeave { uuid, name } => bot.on_player_leave(client, &uuid, &name).await,
        BotEvent::Death => bot.on_death(client).await,
        BotEvent::Respawn => bot.on_respawn(client).await,
        BotEvent::EntityHealth { entity, health } => {
            bot.on_entity_health(client, &entity, health).await
        }
        BotEvent::EntityMetadata { entity, metadata } => {
            bot.on_entity_metadata(client, &entity, &metadata).await
        }
        BotEvent::PlayerStatus { status_id } => bot.on_player_status(client, status_id).await,
        BotEvent::NetworkPacket {
            packet_id,
            is_login,
            is_inbound,
            packet_data,
        } => {
            bot.on_network_packet(client, packet_id, is_login, is_inbound, &packet_data)
                .await
        }
    }
}
