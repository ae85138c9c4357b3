use chrono::Utc;

use crate::tracker::{format_duration, SessionState};
use crate::utils::embeds;
use crate::Context;

type Error = crate::error::Error;

/// Check bot latency.
#[poise::command(slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let start = std::time::Instant::now();
    let msg = ctx.say("Pong!").await?;
    let api_latency = start.elapsed().as_millis();

    let uptime = ctx.data().start_time.elapsed();
    let embed = embeds::mlc_embed()
        .title("Pong!")
        .field("API Latency", format!("{}ms", api_latency), true)
        .field(
            "Uptime",
            format_duration(i64::try_from(uptime.as_millis()).unwrap_or(i64::MAX)),
            true,
        )
        .field("Version", format!("v{}", ctx.data().config.bot_version), true);

    msg.edit(ctx, poise::CreateReply::default().content("").embed(embed))
        .await?;

    Ok(())
}

/// Consulte o status do seu ponto atual.
#[poise::command(slash_command)]
pub async fn ponto(ctx: Context<'_>) -> Result<(), Error> {
    let now = Utc::now();
    let reply = {
        let tracker = ctx.data().tracker.read().await;
        match tracker.get(ctx.author().id.get()) {
            Some(session) => {
                let state = match session.state() {
                    SessionState::Running => "Em andamento",
                    SessionState::Paused => "Pausado",
                };
                let embed = embeds::mlc_embed()
                    .title("📍 Seu ponto")
                    .field("Status", state, true)
                    .field("Início", format!("<t:{}:t>", session.started_at.timestamp()), true)
                    .field("Pausas", session.pause_count.to_string(), true)
                    .field(
                        "Tempo de serviço até agora",
                        format_duration(session.elapsed_ms(now)),
                        false,
                    );
                poise::CreateReply::default().embed(embed).ephemeral(true)
            }
            None => poise::CreateReply::default()
                .content(Error::NoActiveSession.user_message())
                .ephemeral(true),
        }
    };

    ctx.send(reply).await?;
    Ok(())
}
