//! Recruitment intake: form, review embed, approve/deny.
//!
//! A request has no durable record; it lives entirely in the rendered review
//! message, with the applicant's id encoded on the reviewer buttons and the
//! nickname material carried in the embed fields.

use chrono::Utc;
use serenity::all::{
    ButtonStyle, ComponentInteraction, Context as SerenityContext, CreateActionRow, CreateButton,
    CreateInputText, CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage,
    CreateModal, EditMember, InputTextStyle, Mentionable, ModalInteraction, UserId,
};
use tracing::{error, info, warn};

use crate::interactions::{field_value, notify_component, notify_modal, ComponentAction, ModalAction};
use crate::utils::{embeds, permissions};
use crate::Data;

const NICK_FIELD: &str = "👤 Nick:";
const GAME_ID_FIELD: &str = "🆔 ID:";
const REFERRER_FIELD: &str = "🧭 Recrutador:";
const CONTACT_FIELD: &str = "📞 WhatsApp:";
const DISCORD_FIELD: &str = "💬 Discord:";

/// Show the recruitment form. Open to anyone.
pub async fn open_form(ctx: &SerenityContext, component: &ComponentInteraction) {
    let modal = CreateModal::new(ModalAction::RecruitForm.custom_id(), "📋 Formulário de Recrutamento")
        .components(vec![
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Seu nick no jogo", "nick").required(true),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "Seu ID no jogo", "game_id").required(true),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "ID do Recrutador", "referrer").required(true),
            ),
            CreateActionRow::InputText(
                CreateInputText::new(InputTextStyle::Short, "WhatsApp (opcional)", "contact")
                    .required(false),
            ),
        ]);
    if let Err(e) = component
        .create_response(&ctx.http, CreateInteractionResponse::Modal(modal))
        .await
    {
        error!(error = %e, "Failed to open recruitment form");
    }
}

/// Render the submitted form into the review channel.
pub async fn submit(ctx: &SerenityContext, data: &Data, modal: &ModalInteraction) {
    let nick = field_value(modal, "nick").unwrap_or_default();
    let game_id = field_value(modal, "game_id").unwrap_or_default();
    let referrer = field_value(modal, "referrer").unwrap_or_default();
    let contact = field_value(modal, "contact").unwrap_or_else(|| "Não informado".into());

    let refs = data.refs.read().await.clone();
    let Some(review_channel) = refs.as_ref().and_then(|r| r.review_channel) else {
        notify_modal(ctx, modal, "❌ Canal de solicitações não encontrado.").await;
        return;
    };

    let applicant = modal.user.id;
    let embed = embeds::mlc_embed()
        .title("📋 Nova Solicitação de Recrutamento")
        .field(NICK_FIELD, &nick, true)
        .field(GAME_ID_FIELD, &game_id, true)
        .field(REFERRER_FIELD, &referrer, true)
        .field(CONTACT_FIELD, &contact, true)
        .field(DISCORD_FIELD, applicant.mention().to_string(), false)
        .footer(serenity::all::CreateEmbedFooter::new("Aguardando aprovação"));

    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(ComponentAction::RecruitApprove(applicant).custom_id())
            .label("✅ Aprovar")
            .style(ButtonStyle::Success),
        CreateButton::new(ComponentAction::RecruitDeny(applicant).custom_id())
            .label("❌ Negar")
            .style(ButtonStyle::Danger),
    ]);

    let mut ping = String::new();
    if let Some(refs) = refs.as_ref() {
        for role in [refs.reviewer_role, refs.officer_role].into_iter().flatten() {
            ping.push_str(&format!("{} ", role.mention()));
        }
    }
    let message = CreateMessage::new()
        .content(format!("{ping}nova solicitação enviada por {}", applicant.mention()))
        .embed(embed)
        .components(vec![buttons]);

    if let Err(e) = review_channel.send_message(&ctx.http, message).await {
        error!(error = %e, "Failed to post recruitment request");
        notify_modal(ctx, modal, "❌ Não foi possível enviar sua solicitação.").await;
        return;
    }

    info!(applicant = %modal.user.name, "Recruitment request submitted");
    notify_modal(ctx, modal, "✅ Solicitação enviada com sucesso! Aguarde aprovação.").await;
}

/// Approve or deny a pending request. Requires the reviewer or officer role.
pub async fn decide(
    ctx: &SerenityContext,
    data: &Data,
    component: &ComponentInteraction,
    applicant: UserId,
    approved: bool,
) {
    let Some(member) = component.member.as_ref() else {
        return;
    };
    let refs = data.refs.read().await.clone();
    let gate = refs
        .as_ref()
        .map(|r| [r.reviewer_role, r.officer_role])
        .unwrap_or_default();
    if !permissions::has_any_role(member, &gate) {
        notify_component(ctx, component, "🚫 Você não tem permissão para usar isso.").await;
        return;
    }

    if approved {
        apply_approval(ctx, data, component, applicant).await;
    }

    let verdict = if approved {
        format!("✅ Solicitação aprovada por {}", component.user.mention())
    } else {
        format!("❌ Solicitação negada por {}", component.user.mention())
    };
    let response = CreateInteractionResponse::UpdateMessage(
        CreateInteractionResponseMessage::new()
            .content(verdict)
            .embeds(Vec::new())
            .components(Vec::new()),
    );
    if let Err(e) = component.create_response(&ctx.http, response).await {
        error!(error = %e, "Failed to close recruitment request");
    }
}

/// Grant the member role, set the in-game nickname and file the report.
/// Every platform call here is best-effort.
async fn apply_approval(
    ctx: &SerenityContext,
    data: &Data,
    component: &ComponentInteraction,
    applicant: UserId,
) {
    let Some(guild_id) = component.guild_id else {
        return;
    };
    let refs = data.refs.read().await.clone();

    if let Some(role) = refs.as_ref().and_then(|r| r.member_role) {
        // Role grant is set membership on the platform side, so re-approval
        // is harmless.
        match guild_id.member(&ctx.http, applicant).await {
            Ok(new_member) => {
                if let Err(e) = new_member.add_role(&ctx.http, role).await {
                    error!(applicant = %applicant, error = %e, "Failed to grant member role");
                }
            }
            Err(e) => {
                warn!(applicant = %applicant, error = %e, "Applicant no longer in guild");
            }
        }
    }

    // Nickname "{nick} / {game id}" comes from the rendered embed fields.
    let embed_fields = component.message.embeds.first().map(|e| &e.fields);
    let lookup = |name: &str| {
        embed_fields
            .and_then(|fields| fields.iter().find(|f| f.name == name))
            .map(|f| f.value.clone())
    };
    if let (Some(nick), Some(game_id)) = (lookup(NICK_FIELD), lookup(GAME_ID_FIELD)) {
        let edit = EditMember::new().nickname(format!("{nick} / {game_id}"));
        if let Err(e) = guild_id.edit_member(&ctx.http, applicant, edit).await {
            warn!(applicant = %applicant, error = %e, "Failed to set nickname");
        }
    }

    {
        let mut activity = data.activity.write().await;
        activity.touch(applicant.get(), Utc::now());
        activity.save_or_log(&data.config.data_file).await;
    }

    if let Some(reports) = refs.as_ref().and_then(|r| r.reports_channel) {
        let report = embeds::success_embed()
            .title("✅ Recrutamento Aprovado")
            .description(format!(
                "Recrutado: {}\nAprovado por: {}",
                applicant.mention(),
                component.user.mention(),
            ));
        if let Err(e) = reports
            .send_message(&ctx.http, CreateMessage::new().embed(report))
            .await
        {
            error!(error = %e, "Failed to file recruitment report");
        }
    }

    info!(applicant = %applicant, approver = %component.user.name, "Recruitment approved");
}
