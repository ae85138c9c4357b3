use std::path::PathBuf;

use serenity::all::{ChannelId, Guild, GuildId, RoleId};
use tracing::warn;

use crate::error::Error;

/// Display names of the channels the bot posts into. Resolved against the
/// guild's channel list by exact name match at startup.
#[derive(Debug, Clone)]
pub struct ChannelNames {
    pub recruitment: String,
    pub review: String,
    pub reports: String,
    pub attendance: String,
    pub event_create: String,
    pub events: String,
    pub join_log: String,
    pub leave_log: String,
}

/// Display names of the roles the bot checks and grants.
#[derive(Debug, Clone)]
pub struct RoleNames {
    pub member: String,
    pub reviewer: String,
    pub officer: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub guild_id: Option<GuildId>,
    pub http_port: u16,
    pub data_file: PathBuf,
    pub inactivity_days: u32,
    pub sweep_interval_hours: u32,
    pub channels: ChannelNames,
    pub roles: RoleNames,
    pub bot_version: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DISCORD_TOKEN` — Bot token from Discord Developer Portal
    ///
    /// Optional:
    /// - `GUILD_ID` — Guild to register slash commands in (global otherwise)
    /// - `HTTP_PORT` — Liveness endpoint port (default 8080)
    /// - `DATA_FILE` — Activity snapshot path (default data/activity.json)
    /// - `INACTIVITY_DAYS` — Kick threshold in days (default 14)
    /// - `SWEEP_INTERVAL_HOURS` — Sweep period in hours (default 24)
    /// - `*_CHANNEL` / `*_ROLE` — Display-name overrides for the guild layout
    pub fn from_env() -> Result<Self, Error> {
        let discord_token = std::env::var("DISCORD_TOKEN")
            .map_err(|_| Error::Config("DISCORD_TOKEN environment variable is required".into()))?;

        let guild_id = parse_optional_id::<GuildId>("GUILD_ID")?;
        let http_port = parse_number("HTTP_PORT", 8080)?;
        let inactivity_days = parse_number("INACTIVITY_DAYS", 14)?;
        let sweep_interval_hours = parse_number("SWEEP_INTERVAL_HOURS", 24)?;

        let data_file = std::env::var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/activity.json"));

        let channels = ChannelNames {
            recruitment: name_or("RECRUITMENT_CHANNEL", "📋・recrutamento"),
            review: name_or("REVIEW_CHANNEL", "📋・solicitações-mlc"),
            reports: name_or("REPORTS_CHANNEL", "📋・relatórios-de-rec"),
            attendance: name_or("ATTENDANCE_CHANNEL", "🔥・bate-ponto"),
            event_create: name_or("EVENT_CREATE_CHANNEL", "📖・criar-evento"),
            events: name_or("EVENTS_CHANNEL", "📖・eventos-mlc"),
            join_log: name_or("JOIN_LOG_CHANNEL", "logs-entrada"),
            leave_log: name_or("LEAVE_LOG_CHANNEL", "logs-saida"),
        };

        let roles = RoleNames {
            member: name_or("MEMBER_ROLE", "MLC"),
            reviewer: name_or("REVIEWER_ROLE", "Recrutador"),
            officer: name_or("OFFICER_ROLE", "Superior"),
        };

        Ok(Self {
            discord_token,
            guild_id,
            http_port,
            data_file,
            inactivity_days,
            sweep_interval_hours,
            channels,
            roles,
            bot_version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    pub fn inactivity_threshold_ms(&self) -> i64 {
        i64::from(self.inactivity_days) * 24 * 60 * 60 * 1000
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.sweep_interval_hours) * 3600)
    }
}

fn name_or(var: &str, default: &str) -> String {
    match std::env::var(var) {
        Ok(val) if !val.is_empty() => val,
        _ => default.to_string(),
    }
}

fn parse_number<T>(var: &str, default: T) -> Result<T, Error>
where
    T: std::str::FromStr,
{
    match std::env::var(var) {
        Ok(val) if !val.is_empty() => val
            .trim()
            .parse::<T>()
            .map_err(|_| Error::Config(format!("Invalid value for {var}: '{val}'"))),
        _ => Ok(default),
    }
}

fn parse_optional_id<T>(var: &str) -> Result<Option<T>, Error>
where
    T: From<u64>,
{
    match std::env::var(var) {
        Ok(val) if !val.is_empty() => {
            let id = val
                .trim()
                .parse::<u64>()
                .map_err(|_| Error::Config(format!("Invalid ID for {var}: '{val}'")))?;
            Ok(Some(T::from(id)))
        }
        _ => Ok(None),
    }
}

/// Channel and role handles resolved from display names once, when the guild
/// becomes available. Every unresolved name is reported at boot; the dependent
/// feature then no-ops per call without further noise.
#[derive(Debug, Clone)]
pub struct GuildRefs {
    pub guild_id: GuildId,
    pub recruitment_channel: Option<ChannelId>,
    pub review_channel: Option<ChannelId>,
    pub reports_channel: Option<ChannelId>,
    pub attendance_channel: Option<ChannelId>,
    pub event_create_channel: Option<ChannelId>,
    pub events_channel: Option<ChannelId>,
    pub join_log_channel: Option<ChannelId>,
    pub leave_log_channel: Option<ChannelId>,
    pub member_role: Option<RoleId>,
    pub reviewer_role: Option<RoleId>,
    pub officer_role: Option<RoleId>,
}

impl GuildRefs {
    /// Resolve the configured display names against the guild's current
    /// channel and role lists.
    pub fn resolve(guild: &Guild, config: &Config) -> Self {
        let channel = |name: &str| -> Option<ChannelId> {
            let found = guild
                .channels
                .values()
                .find(|c| c.name == name)
                .map(|c| c.id);
            if found.is_none() {
                warn!(channel = %name, "Configured channel not found in guild");
            }
            found
        };

        let role = |name: &str| -> Option<RoleId> {
            let found = guild.roles.values().find(|r| r.name == name).map(|r| r.id);
            if found.is_none() {
                warn!(role = %name, "Configured role not found in guild");
            }
            found
        };

        Self {
            guild_id: guild.id,
            recruitment_channel: channel(&config.channels.recruitment),
            review_channel: channel(&config.channels.review),
            reports_channel: channel(&config.channels.reports),
            attendance_channel: channel(&config.channels.attendance),
            event_create_channel: channel(&config.channels.event_create),
            events_channel: channel(&config.channels.events),
            join_log_channel: channel(&config.channels.join_log),
            leave_log_channel: channel(&config.channels.leave_log),
            member_role: role(&config.roles.member),
            reviewer_role: role(&config.roles.reviewer),
            officer_role: role(&config.roles.officer),
        }
    }
}
