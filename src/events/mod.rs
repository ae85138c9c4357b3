pub mod member;
pub mod ready;

use serenity::all::{Context as SerenityContext, FullEvent, Interaction};
use tracing::info;

use crate::{interactions, Data};

/// Route gateway events to their handlers. Handlers degrade gracefully on
/// platform failures, so nothing here bubbles an error back into the
/// framework.
pub async fn handle_event(ctx: &SerenityContext, event: &FullEvent, data: &Data) {
    match event {
        FullEvent::Ready { data_about_bot, .. } => {
            info!(bot = %data_about_bot.user.name, guilds = data_about_bot.guilds.len(), "Connected to Discord");
            ctx.set_activity(Some(serenity::all::ActivityData::watching("a MLC")));
        }
        FullEvent::GuildCreate { guild, .. } => {
            ready::setup_guild(ctx, data, guild).await;
        }
        FullEvent::GuildMemberAddition { new_member } => {
            member::handle_member_join(ctx, new_member, data).await;
        }
        FullEvent::GuildMemberRemoval {
            guild_id,
            user,
            member_data_if_available,
        } => {
            member::handle_member_leave(
                ctx,
                *guild_id,
                user,
                member_data_if_available.as_ref(),
                data,
            )
            .await;
        }
        FullEvent::InteractionCreate { interaction } => match interaction {
            Interaction::Component(component) => {
                interactions::handle_component(ctx, data, component).await;
            }
            Interaction::Modal(modal) => {
                interactions::handle_modal(ctx, data, modal).await;
            }
            _ => {}
        },
        _ => {}
    }
}
