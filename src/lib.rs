//! agentwire - streaming agent-response wire protocol
//!
//! A producer streams newline-delimited `data: {json}` frames carrying
//! reasoning steps and a character-by-character answer. The client side
//! reassembles frames from arbitrary byte chunks, parses them into events,
//! drops redelivered duplicates and folds what is left into a per-turn state
//! machine whose snapshots drive the display.

pub mod config;
pub mod conversation;
pub mod producer;
pub mod protocol;
pub mod render;
pub mod transport;
pub mod turn;
