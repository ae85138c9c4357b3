//! Bate-ponto button handlers.
//!
//! The start button replies with a per-session message whose pause/stop
//! buttons encode the owner; the static panel buttons act on the clicker's
//! own session. The pause button toggles: clicking it while paused resumes.

use chrono::Utc;
use serenity::all::{
    ButtonStyle, ComponentInteraction, Context as SerenityContext, CreateActionRow, CreateButton,
    CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage, Mentionable, UserId,
};
use tracing::{error, info};

use crate::interactions::{notify_component, ComponentAction};
use crate::tracker::{format_duration, Session, SessionState, SessionSummary};
use crate::utils::{embeds, permissions};
use crate::Data;

pub async fn start(ctx: &SerenityContext, data: &Data, component: &ComponentInteraction) {
    let Some(member) = component.member.as_ref() else {
        return;
    };
    let member_role = data.refs.read().await.as_ref().and_then(|r| r.member_role);
    if !permissions::has_role(member, member_role) {
        notify_component(ctx, component, "🚫 Você não tem permissão para usar o sistema de ponto.")
            .await;
        return;
    }

    let user = component.user.id;
    let now = Utc::now();
    let embed = {
        let mut tracker = data.tracker.write().await;
        match tracker.start(user.get(), now) {
            Ok(session) => running_embed("📍 Ponto em andamento", user, session),
            Err(e) => {
                notify_component(ctx, component, e.user_message()).await;
                return;
            }
        }
    };

    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(ComponentAction::ShiftPause(Some(user)).custom_id())
            .label("⏸️ Pausar")
            .style(ButtonStyle::Secondary),
        CreateButton::new(ComponentAction::ShiftStop(Some(user)).custom_id())
            .label("🔴 Encerrar")
            .style(ButtonStyle::Danger),
    ]);
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(embed)
            .components(vec![buttons]),
    );
    if let Err(e) = component.create_response(&ctx.http, response).await {
        error!(error = %e, "Failed to post session message");
        return;
    }

    info!(user = %component.user.name, "Session started");
    record_activity(data, user).await;
}

pub async fn toggle_pause(
    ctx: &SerenityContext,
    data: &Data,
    component: &ComponentInteraction,
    target: Option<UserId>,
) {
    let clicker = component.user.id;
    let owner = target.unwrap_or(clicker);
    if owner != clicker {
        notify_component(ctx, component, "🚫 Esse ponto não é seu!").await;
        return;
    }

    let now = Utc::now();
    let embed = {
        let mut tracker = data.tracker.write().await;
        let result = match tracker.get(owner.get()).map(Session::state) {
            None => Err(crate::error::Error::NoActiveSession),
            Some(SessionState::Running) => tracker
                .pause(owner.get(), now)
                .map(|s| paused_embed(owner, s)),
            Some(SessionState::Paused) => tracker
                .resume(owner.get(), now)
                .map(|s| running_embed("📍 Ponto retomado", owner, s)),
        };
        match result {
            Ok(embed) => embed,
            Err(e) => {
                notify_component(ctx, component, e.user_message()).await;
                return;
            }
        }
    };

    respond_on_session(ctx, component, target, embed, None).await;
    record_activity(data, owner).await;
}

pub async fn stop(
    ctx: &SerenityContext,
    data: &Data,
    component: &ComponentInteraction,
    target: Option<UserId>,
) {
    let clicker = component.user.id;
    let owner = target.unwrap_or(clicker);
    if owner != clicker {
        notify_component(ctx, component, "🚫 Esse ponto não é seu!").await;
        return;
    }

    let now = Utc::now();
    let summary = match data.tracker.write().await.stop(owner.get(), now) {
        Ok(summary) => summary,
        Err(e) => {
            notify_component(ctx, component, e.user_message()).await;
            return;
        }
    };

    info!(
        user = %component.user.name,
        elapsed_ms = summary.elapsed_ms,
        pauses = summary.pause_count,
        "Session closed"
    );
    let embed = closed_embed(owner, &summary);
    // Closing a session retires its buttons.
    respond_on_session(ctx, component, target, embed, Some(Vec::new())).await;
    record_activity(data, owner).await;
}

/// Edit the session message in place when the click came from it, otherwise
/// answer the panel click ephemerally.
async fn respond_on_session(
    ctx: &SerenityContext,
    component: &ComponentInteraction,
    target: Option<UserId>,
    embed: CreateEmbed,
    components: Option<Vec<CreateActionRow>>,
) {
    let mut message = CreateInteractionResponseMessage::new().embed(embed);
    if let Some(components) = components {
        message = message.components(components);
    }
    let response = if target.is_some() {
        CreateInteractionResponse::UpdateMessage(message)
    } else {
        CreateInteractionResponse::Message(message.ephemeral(true))
    };
    if let Err(e) = component.create_response(&ctx.http, response).await {
        error!(error = %e, "Failed to update session message");
    }
}

async fn record_activity(data: &Data, user: UserId) {
    let mut activity = data.activity.write().await;
    activity.touch(user.get(), Utc::now());
    activity.save_or_log(&data.config.data_file).await;
}

fn running_embed(title: &str, owner: UserId, session: &Session) -> CreateEmbed {
    embeds::mlc_embed().title(title.to_string()).description(format!(
        "👤 Membro: {}\n🕐 Início: <t:{}:t>\n⏸️ Pausas: {}\n🕓 Tempo pausado: {}",
        owner.mention(),
        session.started_at.timestamp(),
        session.pause_count,
        format_duration(session.paused_accumulated_ms),
    ))
}

fn paused_embed(owner: UserId, session: &Session) -> CreateEmbed {
    embeds::warning_embed().title("⏸️ Ponto pausado").description(format!(
        "👤 Membro: {}\n🕐 Início: <t:{}:t>\n⏸️ Pausas: {}\n🕓 Tempo pausado: {}",
        owner.mention(),
        session.started_at.timestamp(),
        session.pause_count,
        format_duration(session.paused_accumulated_ms),
    ))
}

fn closed_embed(owner: UserId, summary: &SessionSummary) -> CreateEmbed {
    embeds::success_embed().title("✅ Ponto encerrado").description(format!(
        "👤 Membro: {}\n🕐 Início: <t:{}:t>\n⏸️ Pausas: {} vezes ({} total)\n⏰ Tempo total de serviço: {}\n📅 Data: <t:{}:d>",
        owner.mention(),
        summary.started_at.timestamp(),
        summary.pause_count,
        format_duration(summary.paused_ms),
        format_duration(summary.elapsed_ms),
        summary.stopped_at.timestamp(),
    ))
}
