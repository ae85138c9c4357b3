//! Component and modal boundary.
//!
//! Every button and modal carries an opaque custom id. It is decoded once,
//! here, into a tagged action and dispatched by pattern matching; handlers
//! never parse identifier strings themselves.

pub mod attendance;
pub mod recruitment;
pub mod roster;

use serenity::all::{
    ActionRowComponent, ComponentInteraction, Context as SerenityContext,
    CreateInteractionResponse, CreateInteractionResponseMessage, ModalInteraction, UserId,
};
use tracing::{debug, error};

use crate::Data;

/// Decoded button action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentAction {
    RecruitOpen,
    RecruitApprove(UserId),
    RecruitDeny(UserId),
    ShiftStart,
    /// `None` targets the clicker's own session (static panel button);
    /// `Some` carries the session owner encoded on the session message.
    ShiftPause(Option<UserId>),
    ShiftStop(Option<UserId>),
    EventCreate,
    EventJoin,
}

impl ComponentAction {
    pub fn parse(raw: &str) -> Option<Self> {
        let (name, arg) = match raw.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (raw, None),
        };
        let user = |arg: Option<&str>| arg.and_then(|a| a.parse::<u64>().ok()).map(UserId::new);
        match (name, arg) {
            ("recruit_open", None) => Some(Self::RecruitOpen),
            ("recruit_approve", Some(_)) => user(arg).map(Self::RecruitApprove),
            ("recruit_deny", Some(_)) => user(arg).map(Self::RecruitDeny),
            ("shift_start", None) => Some(Self::ShiftStart),
            ("shift_pause", None) => Some(Self::ShiftPause(None)),
            ("shift_pause", Some(_)) => user(arg).map(|u| Self::ShiftPause(Some(u))),
            ("shift_stop", None) => Some(Self::ShiftStop(None)),
            ("shift_stop", Some(_)) => user(arg).map(|u| Self::ShiftStop(Some(u))),
            ("event_create", None) => Some(Self::EventCreate),
            ("event_join", None) => Some(Self::EventJoin),
            _ => None,
        }
    }

    pub fn custom_id(&self) -> String {
        match self {
            Self::RecruitOpen => "recruit_open".into(),
            Self::RecruitApprove(user) => format!("recruit_approve:{user}"),
            Self::RecruitDeny(user) => format!("recruit_deny:{user}"),
            Self::ShiftStart => "shift_start".into(),
            Self::ShiftPause(None) => "shift_pause".into(),
            Self::ShiftPause(Some(user)) => format!("shift_pause:{user}"),
            Self::ShiftStop(None) => "shift_stop".into(),
            Self::ShiftStop(Some(user)) => format!("shift_stop:{user}"),
            Self::EventCreate => "event_create".into(),
            Self::EventJoin => "event_join".into(),
        }
    }
}

/// Decoded modal submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    RecruitForm,
    EventForm,
}

impl ModalAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "recruit_form" => Some(Self::RecruitForm),
            "event_form" => Some(Self::EventForm),
            _ => None,
        }
    }

    pub fn custom_id(&self) -> &'static str {
        match self {
            Self::RecruitForm => "recruit_form",
            Self::EventForm => "event_form",
        }
    }
}

pub async fn handle_component(ctx: &SerenityContext, data: &Data, component: &ComponentInteraction) {
    let Some(action) = ComponentAction::parse(&component.data.custom_id) else {
        debug!(custom_id = %component.data.custom_id, "Ignoring unknown component");
        return;
    };

    match action {
        ComponentAction::RecruitOpen => recruitment::open_form(ctx, component).await,
        ComponentAction::RecruitApprove(applicant) => {
            recruitment::decide(ctx, data, component, applicant, true).await;
        }
        ComponentAction::RecruitDeny(applicant) => {
            recruitment::decide(ctx, data, component, applicant, false).await;
        }
        ComponentAction::ShiftStart => attendance::start(ctx, data, component).await,
        ComponentAction::ShiftPause(target) => {
            attendance::toggle_pause(ctx, data, component, target).await;
        }
        ComponentAction::ShiftStop(target) => attendance::stop(ctx, data, component, target).await,
        ComponentAction::EventCreate => roster::open_form(ctx, data, component).await,
        ComponentAction::EventJoin => roster::join(ctx, data, component).await,
    }
}

pub async fn handle_modal(ctx: &SerenityContext, data: &Data, modal: &ModalInteraction) {
    let Some(action) = ModalAction::parse(&modal.data.custom_id) else {
        debug!(custom_id = %modal.data.custom_id, "Ignoring unknown modal");
        return;
    };

    match action {
        ModalAction::RecruitForm => recruitment::submit(ctx, data, modal).await,
        ModalAction::EventForm => roster::submit(ctx, data, modal).await,
    }
}

/// Value of a text input in a submitted modal, by input custom id.
pub fn field_value(modal: &ModalInteraction, id: &str) -> Option<String> {
    modal.data.components.iter().find_map(|row| {
        row.components.iter().find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == id => {
                input.value.clone().filter(|v| !v.trim().is_empty())
            }
            _ => None,
        })
    })
}

/// Ephemeral text notice in response to a button click.
pub async fn notify_component(ctx: &SerenityContext, component: &ComponentInteraction, text: &str) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(text)
            .ephemeral(true),
    );
    if let Err(e) = component.create_response(&ctx.http, response).await {
        error!(error = %e, "Failed to send component notice");
    }
}

/// Ephemeral text notice in response to a modal submission.
pub async fn notify_modal(ctx: &SerenityContext, modal: &ModalInteraction, text: &str) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(text)
            .ephemeral(true),
    );
    if let Err(e) = modal.create_response(&ctx.http, response).await {
        error!(error = %e, "Failed to send modal notice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_actions_round_trip() {
        let actions = [
            ComponentAction::RecruitOpen,
            ComponentAction::RecruitApprove(UserId::new(42)),
            ComponentAction::RecruitDeny(UserId::new(7)),
            ComponentAction::ShiftStart,
            ComponentAction::ShiftPause(None),
            ComponentAction::ShiftPause(Some(UserId::new(1))),
            ComponentAction::ShiftStop(None),
            ComponentAction::ShiftStop(Some(UserId::new(2))),
            ComponentAction::EventCreate,
            ComponentAction::EventJoin,
        ];
        for action in actions {
            assert_eq!(ComponentAction::parse(&action.custom_id()), Some(action));
        }
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert_eq!(ComponentAction::parse(""), None);
        assert_eq!(ComponentAction::parse("recruit_approve"), None);
        assert_eq!(ComponentAction::parse("recruit_approve:notanumber"), None);
        assert_eq!(ComponentAction::parse("shift_pause:notanumber"), None);
        assert_eq!(ComponentAction::parse("event_join:123"), None);
        assert_eq!(ComponentAction::parse("totally_unknown"), None);
    }

    #[test]
    fn modal_actions_round_trip() {
        for action in [ModalAction::RecruitForm, ModalAction::EventForm] {
            assert_eq!(ModalAction::parse(action.custom_id()), Some(action));
        }
        assert_eq!(ModalAction::parse("other_form"), None);
    }
}
