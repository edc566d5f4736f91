// ABOUTME: Wire-level vocabulary for talking to a Minecraft Console Client over its control channel.
// ABOUTME: Commands, request envelopes, inbound classification, event kinds and the transport seam.

pub mod command;
pub mod envelope;
pub mod event;
pub mod message;
pub mod testing;
pub mod transport;
pub mod types;

pub use command::{Command, AUTHENTICATE_COMMAND};
pub use envelope::{CommandEnvelope, RequestId, REQUEST_ID_LEN};
pub use event::{BotEvent, EventKind, MapData, Title, UnknownEvent};
pub use message::{InboundEvent, InboundMessage, InboundReply, MessageError};
pub use transport::{ChannelTransport, Transport, TransportError};
pub use types::{
    CommandBlockFlags, CommandBlockMode, Direction, EntityActionType, Hand, InteractType,
    ItemType, Location, WindowActionType,
};
