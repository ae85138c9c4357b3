//! Event creation and sign-up handlers.

use chrono::Utc;
use serenity::all::{
    ButtonStyle, ComponentInteraction, Context as SerenityContext, CreateActionRow, CreateButton,
    CreateEmbed, CreateInputText, CreateInteractionResponse, CreateInteractionResponseMessage,
    CreateMessage, CreateModal, InputTextStyle, ModalInteraction,
};
use tracing::{error, info};

use crate::interactions::{field_value, notify_component, notify_modal, ComponentAction, ModalAction};
use crate::roster::CommunityEvent;
use crate::utils::{embeds, permissions};
use crate::Data;

/// Show the event creation form. Officers only.
pub async fn open_form(ctx: &SerenityContext, data: &Data, component: &ComponentInteraction) {
    let Some(member) = component.member.as_ref() else {
        return;
    };
    let officer_role = data.refs.read().await.as_ref().and_then(|r| r.officer_role);
    if !permissions::has_role(member, officer_role) {
        notify_component(ctx, component, "🚫 Apenas Superiores podem criar eventos.").await;
        return;
    }

    let modal = CreateModal::new(ModalAction::EventForm.custom_id(), "📝 Criar Novo Evento")
        .components(vec![
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Tipo de Ação", "kind").required(true),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Horário de Início", "start_time")
                    .required(true),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Quantidade de vagas", "capacity")
                    .required(true),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Paragraph, "Descrição do Evento", "description")
                    .required(true),
            ),
        ]);
    if let Err(e) = component
        .create_response(&ctx.http, CreateInteractionResponse::Modal(modal))
        .await
    {
        error!(error = %e, "Failed to open event form");
    }
}

/// Render the new event into the events channel and record it on the board.
pub async fn submit(ctx: &SerenityContext, data: &Data, modal: &ModalInteraction) {
    let kind = field_value(modal, "kind").unwrap_or_default();
    let start_time = field_value(modal, "start_time").unwrap_or_default();
    let description = field_value(modal, "description").unwrap_or_default();
    let capacity = match field_value(modal, "capacity").and_then(|v| v.trim().parse::<usize>().ok())
    {
        Some(capacity) if capacity > 0 => capacity,
        _ => {
            notify_modal(ctx, modal, "❌ Quantidade de vagas inválida.").await;
            return;
        }
    };

    let Some(events_channel) = data.refs.read().await.as_ref().and_then(|r| r.events_channel)
    else {
        notify_modal(ctx, modal, "❌ Canal de eventos não encontrado.").await;
        return;
    };

    let event = CommunityEvent::new(
        modal.user.id.get(),
        kind,
        start_time,
        capacity,
        description,
    );
    let join_button = CreateActionRow::Buttons(vec![CreateButton::new(
        ComponentAction::EventJoin.custom_id(),
    )
    .label("✅ Participar")
    .style(ButtonStyle::Primary)]);
    let message = CreateMessage::new()
        .embed(event_embed(&event, &modal.user.name))
        .components(vec![join_button]);

    let posted = match events_channel.send_message(&ctx.http, message).await {
        Ok(posted) => posted,
        Err(e) => {
            error!(error = %e, "Failed to post event");
            notify_modal(ctx, modal, "❌ Não foi possível criar o evento.").await;
            return;
        }
    };

    data.board.write().await.insert(posted.id.get(), event);
    info!(creator = %modal.user.name, "Event created");
    notify_modal(ctx, modal, "✅ Evento criado com sucesso!").await;
}

/// Sign the clicker up and re-render the event message in place.
pub async fn join(ctx: &SerenityContext, data: &Data, component: &ComponentInteraction) {
    let Some(member) = component.member.as_ref() else {
        return;
    };
    let member_role = data.refs.read().await.as_ref().and_then(|r| r.member_role);
    if !permissions::has_role(member, member_role) {
        notify_component(ctx, component, "🚫 Apenas membros MLC podem participar.").await;
        return;
    }

    let user = component.user.id;
    let display_name = member.display_name().to_string();
    let creator_tag = component
        .message
        .embeds
        .first()
        .and_then(|e| e.footer.as_ref().map(|f| f.text.clone()))
        .unwrap_or_default();

    let embed = {
        let mut board = data.board.write().await;
        match board.join(component.message.id.get(), user.get(), display_name) {
            Ok(event) => event_embed_with_footer(event, creator_tag),
            Err(crate::error::Error::NotFound(_)) => {
                notify_component(ctx, component, "❌ Evento não encontrado.").await;
                return;
            }
            Err(e) => {
                notify_component(ctx, component, e.user_message()).await;
                return;
            }
        }
    };

    let response = CreateInteractionResponse::UpdateMessage(
        CreateInteractionResponseMessage::new().embed(embed),
    );
    if let Err(e) = component.create_response(&ctx.http, response).await {
        error!(error = %e, "Failed to update event message");
        return;
    }

    let mut activity = data.activity.write().await;
    activity.touch(user.get(), Utc::now());
    activity.save_or_log(&data.config.data_file).await;
}

fn event_embed(event: &CommunityEvent, creator_name: &str) -> CreateEmbed {
    event_embed_with_footer(event, format!("Criado por {creator_name}"))
}

fn event_embed_with_footer(event: &CommunityEvent, footer: String) -> CreateEmbed {
    let participants = if event.participants.is_empty() {
        "Nenhum ainda.".to_string()
    } else {
        event
            .participants
            .iter()
            .map(|p| p.display_name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };
    embeds::mlc_embed()
        .title("📖 Novo Evento MLC")
        .description(format!(
            "**Tipo:** {}\n**Horário:** {}\n**Descrição:** {}\n**Vagas restantes:** {}",
            event.kind,
            event.start_time,
            event.description,
            event.remaining(),
        ))
        .field("👥 Participantes:", participants, false)
        .footer(serenity::all::CreateEmbedFooter::new(footer))
}
