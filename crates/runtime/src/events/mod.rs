//! Live battle rendering.
//!
//! The engine turns every [`BattleStep`](gacha_core::BattleStep) into a
//! [`BattleFrame`] and hands it to a [`RenderSink`]. Sinks are best-effort:
//! a failed send is logged and the battle carries on.

mod frame;
mod sink;

pub use frame::{BattleFrame, FrameKind};
pub use sink::{BroadcastSink, RenderSink, SinkError};
