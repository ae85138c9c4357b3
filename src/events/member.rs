use rand::seq::SliceRandom;
use serenity::all::{Context, CreateMessage, GuildId, Member, Mentionable, User};
use tracing::{error, info};

use crate::utils::embeds;
use crate::Data;

const WELCOME_MESSAGES: &[&str] = &[
    "👤 {user} entrou no servidor!",
    "🎉 {user} chegou na MLC!",
    "👋 Bem-vindo(a), {user}!",
    "🚪 {user} acabou de entrar!",
];

pub async fn handle_member_join(ctx: &Context, member: &Member, data: &Data) {
    let user_name = &member.user.name;

    let Some(channel) = data.refs.read().await.as_ref().and_then(|r| r.join_log_channel) else {
        info!(user = %user_name, "Member joined (join log channel unresolved)");
        return;
    };

    let welcome = WELCOME_MESSAGES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&WELCOME_MESSAGES[0])
        .replace("{user}", &member.mention().to_string());

    let embed = embeds::mlc_embed()
        .title("🚪 Novo membro entrou!")
        .description(welcome)
        .field(
            "Conta criada",
            format!("<t:{}:R>", member.user.created_at().unix_timestamp()),
            true,
        )
        .thumbnail(
            member
                .user
                .avatar_url()
                .unwrap_or_else(|| member.user.default_avatar_url()),
        );

    if let Err(why) = channel
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await
    {
        error!(error = %why, "Failed to send join log");
    }

    info!(user = %user_name, "Member joined");
}

pub async fn handle_member_leave(
    ctx: &Context,
    guild_id: GuildId,
    user: &User,
    member: Option<&Member>,
    data: &Data,
) {
    let user_name = &user.name;

    // A voluntary leave retires the activity record; the sweep must not keep
    // judging ghosts.
    {
        let mut activity = data.activity.write().await;
        activity.forget(user.id.get());
        activity.save_or_log(&data.config.data_file).await;
    }

    let Some(channel) = data.refs.read().await.as_ref().and_then(|r| r.leave_log_channel) else {
        info!(user = %user_name, guild_id = %guild_id, "Member left (leave log channel unresolved)");
        return;
    };

    let mut embed = embeds::warning_embed().title("🚪 Membro saiu!").description(format!(
        "👋 {} ({user_name}) saiu do servidor.",
        user.mention()
    ));

    if let Some(member) = member {
        let roles: Vec<String> = member.roles.iter().map(|r| r.mention().to_string()).collect();
        if !roles.is_empty() {
            embed = embed.field("Cargos", roles.join(", "), false);
        }
        if let Some(joined_at) = member.joined_at {
            embed = embed.field("Entrou", format!("<t:{}:R>", joined_at.unix_timestamp()), true);
        }
    }

    embed = embed.thumbnail(user.avatar_url().unwrap_or_else(|| user.default_avatar_url()));

    if let Err(why) = channel
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await
    {
        error!(error = %why, "Failed to send leave log");
    }

    info!(user = %user_name, guild_id = %guild_id, "Member left");
}
