// ABOUTME: Closed set of event kinds the console client emits, and their typed argument records.
// ABOUTME: Decoding reads payload fields leniently; absent or mistyped fields take neutral values.

use crate::types::Location;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

macro_rules! event_kinds {
    ($( $variant:ident ),+ $(,)?) => {
        /// Event discriminator as sent in the `event` field
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EventKind {
            $( $variant ),+
        }

        impl EventKind {
            /// Every known kind, in catalog order
            pub const ALL: &'static [EventKind] = &[ $( EventKind::$variant ),+ ];

            pub fn name(self) -> &'static str {
                match self {
                    $( EventKind::$variant => stringify!($variant) ),+
                }
            }
        }

        impl FromStr for EventKind {
            type Err = UnknownEvent;

            fn from_str(name: &str) -> Result<Self, Self::Err> {
                match name {
                    $( stringify!($variant) => Ok(EventKind::$variant), )+
                    other => Err(UnknownEvent(other.to_string())),
                }
            }
        }
    };
}

event_kinds! {
    OnGameJoined,
    OnBlockBreakAnimation,
    OnEntityAnimation,
    OnChatPrivate,
    OnChatPublic,
    OnTeleportRequest,
    OnChatRaw,
    OnDisconnect,
    OnPlayerProperty,
    OnServerTpsUpdate,
    OnTimeUpdate,
    OnEntityMove,
    OnInternalCommand,
    OnEntitySpawn,
    OnEntityDespawn,
    OnHeldItemChange,
    OnHealthUpdate,
    OnExplosion,
    OnSetExperience,
    OnGamemodeUpdate,
    OnLatencyUpdate,
    OnMapData,
    OnTradeList,
    OnTitle,
    OnEntityEquipment,
    OnEntityEffect,
    OnScoreboardObjective,
    OnUpdateScore,
    OnInventoryUpdate,
    OnInventoryOpen,
    OnInventoryClose,
    OnPlayerJoin,
    OnPlayerLeave,
    OnDeath,
    OnRespawn,
    OnEntityHealth,
    OnEntityMetadata,
    OnPlayerStatus,
    OnNetworkPacket,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name that matched no known event kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event: {0}")]
pub struct UnknownEvent(pub String);

/// An event with its arguments extracted from the payload.
///
/// Entity, item and other open-schema records are kept as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    GameJoined,
    BlockBreakAnimation {
        entity: Value,
        location: Location,
        stage: i64,
    },
    EntityAnimation {
        entity: Value,
        animation: i64,
    },
    ChatPrivate {
        sender: String,
        message: String,
        raw_text: String,
    },
    ChatPublic {
        username: String,
        message: String,
        raw_text: String,
    },
    TeleportRequest {
        sender: String,
        raw_text: String,
    },
    ChatRaw {
        text: String,
        json: Value,
    },
    Disconnect {
        reason: String,
        message: String,
    },
    PlayerProperty {
        properties: Value,
    },
    ServerTpsUpdate {
        tps: f64,
    },
    TimeUpdate {
        world_age: i64,
        time_of_day: i64,
    },
    EntityMove {
        entity: Value,
    },
    InternalCommand {
        command: String,
        parameters: String,
        result: String,
    },
    EntitySpawn {
        entity: Value,
    },
    EntityDespawn {
        entity: Value,
    },
    HeldItemChange {
        item_slot: i64,
    },
    HealthUpdate {
        health: f64,
        food: i64,
    },
    Explosion {
        location: Location,
        strength: f64,
        record_count: i64,
    },
    SetExperience {
        experience_bar: f64,
        level: i64,
        total_experience: i64,
    },
    GamemodeUpdate {
        player_name: String,
        uuid: String,
        game_mode: String,
    },
    LatencyUpdate {
        player_name: String,
        uuid: String,
        latency: i64,
    },
    MapData(MapData),
    TradeList {
        window_id: i64,
        trades: Value,
        villager_info: Value,
    },
    Title(Title),
    EntityEquipment {
        entity: Value,
        slot: i64,
        item: Value,
    },
    EntityEffect {
        entity: Value,
        effect: String,
        amplifier: i64,
        duration: i64,
        flags: i64,
    },
    ScoreboardObjective {
        objective_name: String,
        mode: i64,
        objective_value: String,
        objective_type: i64,
        raw_json: Value,
    },
    UpdateScore {
        entity_name: String,
        action: i64,
        objective_name: String,
        objective_type: i64,
    },
    InventoryUpdate {
        inventory_id: i64,
    },
    InventoryOpen {
        inventory_id: i64,
    },
    InventoryClose {
        inventory_id: i64,
    },
    PlayerJoin {
        uuid: String,
        name: String,
    },
    PlayerLeave {
        uuid: String,
        name: String,
    },
    Death,
    Respawn,
    EntityHealth {
        entity: Value,
        health: f64,
    },
    EntityMetadata {
        entity: Value,
        metadata: Value,
    },
    PlayerStatus {
        status_id: i64,
    },
    NetworkPacket {
        packet_id: i64,
        is_login: bool,
        is_inbound: bool,
        packet_data: Value,
    },
}

/// Map update record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapData {
    pub map_id: i64,
    pub scale: i64,
    pub tracking_position: bool,
    pub locked: bool,
    pub icons: Vec<Value>,
    pub columns_updated: i64,
    pub rows_updated: i64,
    pub map_column_x: i64,
    pub map_row_z: i64,
    pub colors: Vec<i64>,
}

/// Title / subtitle / action bar update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Title {
    pub action: String,
    pub title_text: String,
    pub subtitle_text: String,
    pub action_bar_text: String,
    pub fade_in: i64,
    pub stay: i64,
    pub raw_json: Value,
}

/// Lenient field reader over an event payload
struct Fields<'a>(&'a Value);

impl<'a> Fields<'a> {
    fn raw(&self, name: &str) -> Value {
        self.0.get(name).cloned().unwrap_or(Value::Null)
    }

    fn text(&self, name: &str) -> String {
        match self.0.get(name) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    fn int(&self, name: &str) -> i64 {
        match self.0.get(name) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or_default(),
            _ => 0,
        }
    }

    fn float(&self, name: &str) -> f64 {
        self.0.get(name).and_then(Value::as_f64).unwrap_or_default()
    }

    fn flag(&self, name: &str) -> bool {
        self.0.get(name).and_then(Value::as_bool).unwrap_or_default()
    }

    fn list(&self, name: &str) -> Vec<Value> {
        match self.0.get(name) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    fn location(&self, name: &str) -> Location {
        self.0
            .get(name)
            .map(Location::from_value)
            .unwrap_or_default()
    }
}

impl BotEvent {
    /// Extract the arguments for `kind` from `payload`
    pub fn decode(kind: EventKind, payload: &Value) -> Self {
        let f = Fields(payload);
        match kind {
            EventKind::OnGameJoined => Self::GameJoined,
            EventKind::OnBlockBreakAnimation => Self::BlockBreakAnimation {
                entity: f.raw("entity"),
                location: f.location("location"),
                stage: f.int("stage"),
            },
            EventKind::OnEntityAnimation => Self::EntityAnimation {
                entity: f.raw("entity"),
                animation: f.int("animation"),
            },
            EventKind::OnChatPrivate => Self::ChatPrivate {
                sender: f.text("sender"),
                message: f.text("message"),
                raw_text: f.text("rawText"),
            },
            EventKind::OnChatPublic => Self::ChatPublic {
                username: f.text("username"),
                message: f.text("message"),
                raw_text: f.text("rawText"),
            },
            EventKind::OnTeleportRequest => Self::TeleportRequest {
                sender: f.text("sender"),
                raw_text: f.text("rawText"),
            },
            EventKind::OnChatRaw => Self::ChatRaw {
                text: f.text("text"),
                json: f.raw("json"),
            },
            EventKind::OnDisconnect => Self::Disconnect {
                reason: f.text("reason"),
                message: f.text("message"),
            },
            EventKind::OnPlayerProperty => Self::PlayerProperty {
                properties: payload.clone(),
            },
            EventKind::OnServerTpsUpdate => Self::ServerTpsUpdate {
                tps: f.float("tps"),
            },
            EventKind::OnTimeUpdate => Self::TimeUpdate {
                world_age: f.int("worldAge"),
                time_of_day: f.int("timeOfDay"),
            },
            EventKind::OnEntityMove => Self::EntityMove {
                entity: payload.clone(),
            },
            EventKind::OnInternalCommand => Self::InternalCommand {
                command: f.text("command"),
                parameters: f.text("parameters"),
                result: f.text("result"),
            },
            EventKind::OnEntitySpawn => Self::EntitySpawn {
                entity: payload.clone(),
            },
            EventKind::OnEntityDespawn => Self::EntityDespawn {
                entity: payload.clone(),
            },
            EventKind::OnHeldItemChange => Self::HeldItemChange {
                item_slot: f.int("itemSlot"),
            },
            EventKind::OnHealthUpdate => Self::HealthUpdate {
                health: f.float("health"),
                food: f.int("food"),
            },
            EventKind::OnExplosion => Self::Explosion {
                location: f.location("location"),
                strength: f.float("strength"),
                record_count: f.int("recordCount"),
            },
            EventKind::OnSetExperience => Self::SetExperience {
                experience_bar: f.float("experienceBar"),
                level: f.int("level"),
                total_experience: f.int("totalExperience"),
            },
            EventKind::OnGamemodeUpdate => Self::GamemodeUpdate {
                player_name: f.text("playerName"),
                uuid: f.text("uuid"),
                game_mode: f.text("gameMode"),
            },
            EventKind::OnLatencyUpdate => Self::LatencyUpdate {
                player_name: f.text("playerName"),
                uuid: f.text("uuid"),
                latency: f.int("latency"),
            },
            EventKind::OnMapData => Self::MapData(MapData {
                map_id: f.int("mapId"),
                scale: f.int("scale"),
                tracking_position: f.flag("trackingPosition"),
                locked: f.flag("locked"),
                icons: f.list("icons"),
                columns_updated: f.int("columnsUpdated"),
                rows_updated: f.int("rowsUpdated"),
                // remote side spells it this way
                map_column_x: f.int("mapCoulmnX"),
                map_row_z: f.int("mapRowZ"),
                colors: f
                    .list("colors")
                    .iter()
                    .map(|c| c.as_i64().unwrap_or_default())
                    .collect(),
            }),
            EventKind::OnTradeList => Self::TradeList {
                window_id: f.int("windowId"),
                trades: f.raw("trades"),
                villager_info: f.raw("villagerInfo"),
            },
            EventKind::OnTitle => Self::Title(Title {
                action: f.text("action"),
                title_text: f.text("titleText"),
                subtitle_text: f.text("subtitleText"),
                action_bar_text: f.text("actionBarText"),
                fade_in: f.int("fadeIn"),
                stay: f.int("stay"),
                raw_json: f.raw("rawJson"),
            }),
            EventKind::OnEntityEquipment => Self::EntityEquipment {
                entity: f.raw("entity"),
                slot: f.int("slot"),
                item: f.raw("item"),
            },
            EventKind::OnEntityEffect => Self::EntityEffect {
                entity: f.raw("entity"),
                effect: f.text("effect"),
                amplifier: f.int("amplifier"),
                duration: f.int("duration"),
                flags: f.int("flags"),
            },
            EventKind::OnScoreboardObjective => Self::ScoreboardObjective {
                objective_name: f.text("objectiveName"),
                mode: f.int("mode"),
                objective_value: f.text("objectiveValue"),
                objective_type: f.int("type"),
                raw_json: f.raw("rawJson"),
            },
            EventKind::OnUpdateScore => Self::UpdateScore {
                entity_name: f.text("entityName"),
                action: f.int("action"),
                objective_name: f.text("objectiveName"),
                objective_type: f.int("type"),
            },
            EventKind::OnInventoryUpdate => Self::InventoryUpdate {
                inventory_id: f.int("inventoryId"),
            },
            EventKind::OnInventoryOpen => Self::InventoryOpen {
                inventory_id: f.int("inventoryId"),
            },
            EventKind::OnInventoryClose => Self::InventoryClose {
                inventory_id: f.int("inventoryId"),
            },
            EventKind::OnPlayerJoin => Self::PlayerJoin {
                uuid: f.text("uuid"),
                name: f.text("name"),
            },
            EventKind::OnPlayerLeave => Self::PlayerLeave {
                uuid: f.text("uuid"),
                name: f.text("name"),
            },
            EventKind::OnDeath => Self::Death,
            EventKind::OnRespawn => Self::Respawn,
            EventKind::OnEntityHealth => Self::EntityHealth {
                entity: f.raw("entity"),
                health: f.float("health"),
            },
            EventKind::OnEntityMetadata => Self::EntityMetadata {
                entity: f.raw("entity"),
                metadata: f.raw("metadata"),
            },
            EventKind::OnPlayerStatus => Self::PlayerStatus {
                status_id: f.int("statusId"),
            },
            EventKind::OnNetworkPacket => Self::NetworkPacket {
                packet_id: f.int("packetId"),
                is_login: f.flag("isLogin"),
                is_inbound: f.flag("isInbound"),
                packet_data: f.raw("packetData"),
            },
        }
    }

    /// Kind this event was decoded from
    pub fn kind(&self) -> EventKind {
        match self {
            Self::GameJoined => EventKind::OnGameJoined,
            Self::BlockBreakAnimation { .. } => EventKind::OnBlockBreakAnimation,
            Self::EntityAnimation { .. } => EventKind::OnEntityAnimation,
            Self::ChatPrivate { .. } => EventKind::OnChatPrivate,
            Self::ChatPublic { .. } => EventKind::OnChatPublic,
            Self::TeleportRequest { .. } => EventKind::OnTeleportRequest,
            Self::ChatRaw { .. } => EventKind::OnChatRaw,
            Self::Disconnect { .. } => EventKind::OnDisconnect,
            Self::PlayerProperty { .. } => EventKind::OnPlayerProperty,
            Self::ServerTpsUpdate { .. } => EventKind::OnServerTpsUpdate,
            Self::TimeUpdate { .. } => EventKind::OnTimeUpdate,
            Self::EntityMove { .. } => EventKind::OnEntityMove,
            Self::InternalCommand { .. } => EventKind::OnInternalCommand,
            Self::EntitySpawn { .. } => EventKind::OnEntitySpawn,
            Self::EntityDespawn { .. } => EventKind::OnEntityDespawn,
            Self::HeldItemChange { .. } => EventKind::OnHeldItemChange,
            Self::HealthUpdate { .. } => EventKind::OnHealthUpdate,
            Self::Explosion { .. } => EventKind::OnExplosion,
            Self::SetExperience { .. } => EventKind::OnSetExperience,
            Self::GamemodeUpdate { .. } => EventKind::OnGamemodeUpdate,
            Self::LatencyUpdate { .. } => EventKind::OnLatencyUpdate,
            Self::MapData(_) => EventKind::OnMapData,
            Self::TradeList { .. } => EventKind::OnTradeList,
            Self::Title(_) => EventKind::OnTitle,
            Self::EntityEquipment { .. } => EventKind::OnEntityEquipment,
            Self::EntityEffect { .. } => EventKind::OnEntityEffect,
            Self::ScoreboardObjective { .. } => EventKind::OnScoreboardObjective,
            Self::UpdateScore { .. } => EventKind::OnUpdateScore,
            Self::InventoryUpdate { .. } => EventKind::OnInventoryUpdate,
            Self::InventoryOpen { .. } => EventKind::OnInventoryOpen,
            Self::InventoryClose { .. } => EventKind::OnInventoryClose,
            Self::PlayerJoin { .. } => EventKind::OnPlayerJoin,
            Self::PlayerLeave { .. } => EventKind::OnPlayerLeave,
            Self::Death => EventKind::OnDeath,
            Self::Respawn => EventKind::OnRespawn,
            Self::EntityHealth { .. } => EventKind::OnEntityHealth,
            Self::EntityMetadata { .. } => EventKind::OnEntityMetadata,
            Self::PlayerStatus { .. } => EventKind::OnPlayerStatus,
            Self::NetworkPacket { .. } => EventKind::OnNetworkPacket,
        }
    }
}
