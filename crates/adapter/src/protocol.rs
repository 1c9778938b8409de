//! Protocol module - JSON message types for the stdio bridge
//!
//! Every line on stdin is one inbound message; every line written to stdout
//! is one outbound message. All messages carry `type` and `seq`.

use serde::{Deserialize, Serialize};

use arrayvec::ArrayVec;

use crate::core::{ColorGrid, GameSnapshot, LockEvent, Phase, ShapeMatrix};
use crate::types::{Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Most commands accepted in a single `command` message.
pub const MAX_COMMANDS_PER_MESSAGE: usize = 32;

// ============== Client -> Bridge Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StartMessage {
    #[serde(default)]
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SnapshotRequest {
    #[serde(default)]
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandMessage {
    #[serde(default)]
    pub seq: u64,
    pub commands: CommandList,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandList(pub ArrayVec<Command, MAX_COMMANDS_PER_MESSAGE>);

impl CommandList {
    pub fn iter(&self) -> impl Iterator<Item = Command> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for CommandList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = CommandList;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an array of command names")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = ArrayVec::<Command, MAX_COMMANDS_PER_MESSAGE>::new();
                while let Some(name) = seq.next_element::<std::borrow::Cow<'de, str>>()? {
                    let cmd = Command::from_str(&name).ok_or_else(|| {
                        serde::de::Error::custom(format!("unknown command: {}", name))
                    })?;
                    out.try_push(cmd)
                        .map_err(|_| serde::de::Error::custom("too many commands"))?;
                }
                Ok(CommandList(out))
            }
        }

        deserializer.deserialize_seq(V)
    }
}

/// Parsed incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    Start(StartMessage),
    Command(CommandMessage),
    Snapshot(SnapshotRequest),
}

/// A line that could not be turned into a [`ParsedMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    pub seq: u64,
    pub code: ErrorCode,
    pub message: String,
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ProtocolError {}

// ============== Message Parsing ==============

/// Parse one inbound line.
pub fn parse_message(json: &str) -> Result<ParsedMessage, ProtocolError> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "start")]
        Start(StartMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "snapshot")]
        Snapshot(SnapshotRequest),
    }

    let err = match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Start(m)) => return Ok(ParsedMessage::Start(m)),
        Ok(InboundMessage::Command(m)) => return Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Snapshot(m)) => return Ok(ParsedMessage::Snapshot(m)),
        Err(e) => e,
    };

    // Classify the failure from the envelope alone.
    #[derive(Debug, Deserialize)]
    struct Envelope {
        #[serde(rename = "type")]
        msg_type: Option<String>,
        seq: Option<u64>,
    }

    let envelope = match serde_json::from_str::<Envelope>(json) {
        Ok(envelope) => envelope,
        Err(e) => {
            return Err(ProtocolError {
                seq: 0,
                code: ErrorCode::InvalidJson,
                message: e.to_string(),
            })
        }
    };

    let seq = envelope.seq.unwrap_or(0);
    let (code, message) = match envelope.msg_type.as_deref() {
        Some("command") => (ErrorCode::InvalidCommand, err.to_string()),
        Some("start") | Some("snapshot") => (ErrorCode::InvalidJson, err.to_string()),
        Some(other) => (
            ErrorCode::UnknownType,
            format!("unknown message type: {}", other),
        ),
        None => (ErrorCode::UnknownType, "missing message type".to_string()),
    };
    Err(ProtocolError { seq, code, message })
}

// ============== Bridge -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_json")]
    InvalidJson,
    #[serde(rename = "unknown_type")]
    UnknownType,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "not_started")]
    NotStarted,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidJson => "invalid_json",
            ErrorCode::UnknownType => "unknown_type",
            ErrorCode::InvalidCommand => "invalid_command",
            ErrorCode::NotStarted => "not_started",
        }
    }
}

/// Per-command acceptance for one `command` message, in order.
#[derive(Debug, Clone, Serialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub accepted: ArrayVec<bool, MAX_COMMANDS_PER_MESSAGE>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Full game state, sent once per message or timer wake that changed the
/// state, and on request.
#[derive(Debug, Clone, Serialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    /// Seq of the request that caused this observation; 0 for timer ticks.
    pub seq: u64,
    pub ts: u64,
    pub phase: PhaseName,
    pub playable: bool,
    pub paused: bool,
    pub game_over: bool,
    pub board: BoardSnapshot,
    /// Board with the active piece composited in.
    pub display: ColorGrid,
    pub active: Option<ActivePieceSnapshot>,
    pub next: KindName,
    pub next_preview: MatrixRows,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub fall_interval_ms: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_lock: Option<LockSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: ColorGrid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivePieceSnapshot {
    pub kind: KindName,
    pub x: i8,
    pub y: i8,
    pub shape: MatrixRows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockSnapshot {
    pub kind: KindName,
    pub lines_cleared: u32,
    pub drop_distance: u32,
    pub points: u32,
}

impl From<LockEvent> for LockSnapshot {
    fn from(value: LockEvent) -> Self {
        Self {
            kind: KindName(value.kind),
            lines_cleared: value.lines_cleared,
            drop_distance: value.drop_distance,
            points: value.points,
        }
    }
}

/// Piece kind serialized as its upper-case letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindName(pub PieceKind);

impl Serialize for KindName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self.0 {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        };
        serializer.serialize_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseName(pub Phase);

impl Serialize for PhaseName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

/// Shape matrix serialized as rows of 0/1 (without heap allocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixRows(pub ShapeMatrix);

impl Serialize for MatrixRows {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        struct Row<'a>(&'a [bool]);
        impl Serialize for Row<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
                for &filled in self.0 {
                    seq.serialize_element(&u8::from(filled))?;
                }
                seq.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.0.size() as usize))?;
        for row in self.0.rows() {
            seq.serialize_element(&Row(row))?;
        }
        seq.end()
    }
}

// ============== Utility Functions ==============

pub fn create_ack(seq: u64, accepted: &[bool]) -> AckMessage {
    let mut out = ArrayVec::new();
    for &a in accepted.iter().take(MAX_COMMANDS_PER_MESSAGE) {
        out.push(a);
    }
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        accepted: out,
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        code,
        message: message.to_string(),
    }
}

pub fn create_observation(seq: u64, snap: &GameSnapshot, fall_interval_ms: u32) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        phase: PhaseName(snap.phase),
        playable: snap.playable(),
        paused: snap.paused,
        game_over: snap.game_over,
        board: BoardSnapshot {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            cells: snap.board,
        },
        display: snap.display_grid(),
        active: snap.active.map(|a| ActivePieceSnapshot {
            kind: KindName(a.kind),
            x: a.x,
            y: a.y,
            shape: MatrixRows(a.shape),
        }),
        next: KindName(snap.next),
        next_preview: MatrixRows(snap.next_preview()),
        score: snap.score,
        level: snap.level,
        lines: snap.lines,
        fall_interval_ms,
        last_lock: snap.last_lock.map(LockSnapshot::from),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
