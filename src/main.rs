use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use mlc_bot::activity::ActivityRegistry;
use mlc_bot::config::Config;
use mlc_bot::roster::EventBoard;
use mlc_bot::tracker::SessionTracker;
use mlc_bot::{commands, events, web, Data};
use poise::serenity_prelude as serenity;
use tokio::sync::RwLock;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mlc_bot=info".parse().unwrap()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    // Keep external uptime pingers happy regardless of gateway health.
    tokio::spawn(web::serve(config.http_port));

    let token = config.discord_token.clone();
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::general::ping(), commands::general::ponto()],
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    events::handle_event(ctx, event, data).await;
                    Ok(())
                })
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            let embed = mlc_bot::utils::embeds::error_embed()
                                .title("Erro")
                                .description(error.user_message());
                            let _ = ctx
                                .send(poise::CreateReply::default().embed(embed).ephemeral(true))
                                .await;
                            tracing::error!(
                                command = ctx.command().name,
                                error = %error,
                                "Command error"
                            );
                        }
                        other => {
                            if let Err(e) = poise::builtins::on_error(other).await {
                                tracing::error!(error = %e, "Error handling error");
                            }
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(bot = %ready.user.name, guilds = ready.guilds.len(), "Bot is ready!");

                // Register slash commands (guild-specific if GUILD_ID set, otherwise global)
                if let Some(guild_id) = config.guild_id {
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id).await?;
                    info!(guild_id = %guild_id, "Slash commands registered to guild");
                } else {
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!("Slash commands registered globally");
                }

                let activity = ActivityRegistry::load(&config.data_file).await;

                Ok(Data {
                    config,
                    refs: Arc::new(RwLock::new(None)),
                    tracker: Arc::new(RwLock::new(SessionTracker::new())),
                    activity: Arc::new(RwLock::new(activity)),
                    board: Arc::new(RwLock::new(EventBoard::new())),
                    bootstrapped: Arc::new(AtomicBool::new(false)),
                    start_time: std::time::Instant::now(),
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .expect("Failed to create Discord client");

    // Graceful shutdown on SIGINT/SIGTERM
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, stopping bot...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting bot...");
    if let Err(why) = client.start().await {
        error!(error = %why, "Client error");
    }
    info!("Bot has shut down cleanly");
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
