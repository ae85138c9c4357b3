//! Guild bootstrap: name resolution, feature panels and the sweep.

use std::sync::atomic::Ordering;

use serenity::all::{
    ButtonStyle, ChannelId, Context as SerenityContext, CreateActionRow, CreateButton,
    CreateMessage, GetMessages, Guild,
};
use tracing::{debug, error, info};

use crate::config::GuildRefs;
use crate::interactions::ComponentAction;
use crate::utils::embeds;
use crate::Data;

/// Resolve channel/role names and, on the first pass only, post the feature
/// panels and start the inactivity sweep. Re-runs on every reconnect so
/// renamed channels are picked up.
pub async fn setup_guild(ctx: &SerenityContext, data: &Data, guild: &Guild) {
    if data.config.guild_id.is_some_and(|configured| configured != guild.id) {
        debug!(guild = %guild.name, "Ignoring unconfigured guild");
        return;
    }

    let refs = GuildRefs::resolve(guild, &data.config);
    *data.refs.write().await = Some(refs.clone());
    info!(guild = %guild.name, "Guild references resolved");

    // Posting panels and spawning the sweep happen once per process, not on
    // every reconnect.
    if data.bootstrapped.swap(true, Ordering::SeqCst) {
        return;
    }

    post_panels(ctx, &refs).await;

    crate::sweep::spawn(
        ctx.http.clone(),
        data.config.clone(),
        data.refs.clone(),
        data.activity.clone(),
    );
}

async fn post_panels(ctx: &SerenityContext, refs: &GuildRefs) {
    if let Some(channel) = refs.recruitment_channel {
        let embed = embeds::mlc_embed()
            .title("📋 Sistema de Recrutamento MLC")
            .description(
                "Clique no botão abaixo para preencher seu formulário e entrar para a **MLC**!",
            );
        let button = CreateButton::new(ComponentAction::RecruitOpen.custom_id())
            .label("📄 Abrir Formulário")
            .style(ButtonStyle::Primary);
        post_panel(ctx, channel, embed, vec![button]).await;
    }

    if let Some(channel) = refs.attendance_channel {
        let embed = embeds::mlc_embed()
            .title("🔥 Sistema de Bate-Ponto MLC")
            .description(
                "Clique nos botões abaixo para **iniciar, pausar ou encerrar** seu ponto.\n\nSomente membros com cargo `MLC` podem usar.",
            );
        let buttons = vec![
            CreateButton::new(ComponentAction::ShiftStart.custom_id())
                .label("🟢 Iniciar Ponto")
                .style(ButtonStyle::Success),
            CreateButton::new(ComponentAction::ShiftPause(None).custom_id())
                .label("⏸️ Pausar")
                .style(ButtonStyle::Secondary),
            CreateButton::new(ComponentAction::ShiftStop(None).custom_id())
                .label("🔴 Encerrar")
                .style(ButtonStyle::Danger),
        ];
        post_panel(ctx, channel, embed, buttons).await;
    }

    if let Some(channel) = refs.event_create_channel {
        let embed = embeds::mlc_embed()
            .title("🎯 Sistema de Eventos MLC")
            .description(
                "Apenas **Superiores** podem criar eventos. Clique abaixo para abrir o formulário de criação.",
            );
        let button = CreateButton::new(ComponentAction::EventCreate.custom_id())
            .label("📝 Criar Evento")
            .style(ButtonStyle::Success);
        post_panel(ctx, channel, embed, vec![button]).await;
    }
}

/// Clear the last few messages (stale panels from previous runs) and post a
/// fresh one. Both steps are best-effort.
async fn post_panel(
    ctx: &SerenityContext,
    channel: ChannelId,
    embed: serenity::all::CreateEmbed,
    buttons: Vec<CreateButton>,
) {
    match channel.messages(&ctx.http, GetMessages::new().limit(10)).await {
        Ok(stale) if !stale.is_empty() => {
            let ids: Vec<_> = stale.iter().map(|m| m.id).collect();
            if let Err(e) = channel.delete_messages(&ctx.http, ids).await {
                debug!(channel = %channel, error = %e, "Could not clear stale panel messages");
            }
        }
        Ok(_) => {}
        Err(e) => debug!(channel = %channel, error = %e, "Could not list panel channel"),
    }

    let message = CreateMessage::new()
        .embed(embed)
        .components(vec![CreateActionRow::Buttons(buttons)]);
    if let Err(e) = channel.send_message(&ctx.http, message).await {
        error!(channel = %channel, error = %e, "Failed to post feature panel");
    } else {
        info!(channel = %channel, "Feature panel posted");
    }
}
