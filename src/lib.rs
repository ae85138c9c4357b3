pub mod activity;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod interactions;
pub mod roster;
pub mod sweep;
pub mod tracker;
pub mod utils;
pub mod web;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::activity::ActivityRegistry;
use crate::config::{Config, GuildRefs};
use crate::roster::EventBoard;
use crate::tracker::SessionTracker;

/// Shared data accessible across all Poise commands and event handlers.
///
/// The stores are explicit objects owned by the process lifecycle and
/// injected into handlers, never module-level globals.
pub struct Data {
    pub config: Config,
    /// Channel/role handles resolved by name once the guild is available.
    pub refs: Arc<RwLock<Option<GuildRefs>>>,
    pub tracker: Arc<RwLock<SessionTracker>>,
    pub activity: Arc<RwLock<ActivityRegistry>>,
    pub board: Arc<RwLock<EventBoard>>,
    /// Guards the one-time guild bootstrap (panels + sweep) across reconnects.
    pub bootstrapped: Arc<AtomicBool>,
    pub start_time: std::time::Instant,
}

/// Poise context alias used throughout the bot.
pub type Context<'a> = poise::Context<'a, Data, error::Error>;
