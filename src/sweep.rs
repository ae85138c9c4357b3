//! Recurring inactivity sweep.
//!
//! Once per configured interval the sweep snapshots the guild member list,
//! compares each tracked member's last recorded activity against the
//! threshold and kicks the overdue ones. Members with no activity record are
//! skipped rather than treated as infinitely inactive, so a fresh deploy
//! never mass-removes legacy members.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use serenity::all::{ChannelId, CreateMessage, Http, Member, UserId};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::activity::ActivityRegistry;
use crate::config::{Config, GuildRefs};
use crate::error::Error;
use crate::utils::embeds;

/// A member the current pass decided to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepCandidate {
    pub user_id: u64,
    pub last_ms: i64,
    pub tag: String,
}

/// Removal eligibility for a single member. `None` means "never recorded",
/// which is not yet eligible.
pub fn eligible_for_removal(last_ms: Option<i64>, now_ms: i64, threshold_ms: i64) -> bool {
    matches!(last_ms, Some(last) if now_ms - last >= threshold_ms)
}

/// Page size of a single member-list request. The API caps one request at
/// 1000 members, so larger guilds need the cursor walked page by page.
const MEMBER_PAGE_SIZE: usize = 1000;

/// Walk a cursor-paged listing until a page comes back short. `cursor` maps
/// an item to the id handed to `fetch` as the `after` marker for the next
/// call; pages must arrive in ascending id order.
pub async fn drain_pages<T, C, F, Fut>(
    page_size: usize,
    cursor: C,
    mut fetch: F,
) -> Result<Vec<T>, Error>
where
    C: Fn(&T) -> u64,
    F: FnMut(Option<u64>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, Error>>,
{
    let mut items = Vec::new();
    let mut after = None;
    loop {
        let page = fetch(after).await?;
        let short = page.len() < page_size;
        after = page.last().map(&cursor);
        items.extend(page);
        if short || after.is_none() {
            return Ok(items);
        }
    }
}

/// Drive the removal calls for one pass. A failure removing one member is
/// logged and does not stop the rest of the pass; the successfully removed
/// user ids are returned.
pub async fn remove_overdue<F, Fut>(candidates: Vec<SweepCandidate>, mut remove: F) -> Vec<u64>
where
    F: FnMut(SweepCandidate) -> Fut,
    Fut: Future<Output = Result<(), Error>>,
{
    let mut removed = Vec::new();
    for candidate in candidates {
        let user_id = candidate.user_id;
        let tag = candidate.tag.clone();
        match remove(candidate).await {
            Ok(()) => removed.push(user_id),
            Err(e) => {
                error!(user = %tag, error = %e, "Failed to remove inactive member");
            }
        }
    }
    removed
}

/// Spawn the detached sweep task. The first pass runs one full interval
/// after startup.
pub fn spawn(
    http: Arc<Http>,
    config: Config,
    refs: Arc<RwLock<Option<GuildRefs>>>,
    activity: Arc<RwLock<ActivityRegistry>>,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.sweep_interval());
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = run_sweep(&http, &config, &refs, &activity).await {
                error!(error = %e, "Inactivity sweep failed");
            }
        }
    });
    info!("Inactivity sweep scheduled");
}

async fn run_sweep(
    http: &Arc<Http>,
    config: &Config,
    refs: &Arc<RwLock<Option<GuildRefs>>>,
    activity: &Arc<RwLock<ActivityRegistry>>,
) -> Result<(), Error> {
    let refs = match refs.read().await.clone() {
        Some(refs) => refs,
        None => {
            warn!("Guild references not resolved yet, skipping sweep pass");
            return Ok(());
        }
    };
    let member_role = match refs.member_role {
        Some(role) => role,
        None => {
            warn!(role = %config.roles.member, "Tracked role unresolved, skipping sweep pass");
            return Ok(());
        }
    };

    let guild_id = refs.guild_id;
    let members = drain_pages(
        MEMBER_PAGE_SIZE,
        |m: &Member| m.user.id.get(),
        |after| async move {
            let page = guild_id
                .members(http, Some(MEMBER_PAGE_SIZE as u64), after.map(UserId::new))
                .await?;
            Ok(page)
        },
    )
    .await?;
    let now_ms = Utc::now().timestamp_millis();
    let threshold_ms = config.inactivity_threshold_ms();

    let candidates = {
        let registry = activity.read().await;
        members
            .iter()
            .filter(|m| !m.user.bot && m.roles.contains(&member_role))
            .filter_map(|m| {
                let last = registry.last_seen(m.user.id.get());
                eligible_for_removal(last, now_ms, threshold_ms).then(|| SweepCandidate {
                    user_id: m.user.id.get(),
                    last_ms: last.unwrap_or(0),
                    tag: m.user.tag(),
                })
            })
            .collect::<Vec<_>>()
    };

    if candidates.is_empty() {
        info!("Inactivity sweep pass: nothing to remove");
        return Ok(());
    }
    info!(count = candidates.len(), "Inactivity sweep pass: removing overdue members");

    let reason = format!("Inatividade de {} dias", config.inactivity_days);
    let removed = remove_overdue(candidates, |candidate| {
        let http = http.clone();
        let reason = reason.clone();
        let guild_id = refs.guild_id;
        let notify = refs.leave_log_channel;
        async move {
            guild_id
                .kick_with_reason(&http, UserId::new(candidate.user_id), &reason)
                .await?;
            notify_removal(&http, notify, &candidate).await;
            Ok(())
        }
    })
    .await;

    if !removed.is_empty() {
        let mut registry = activity.write().await;
        for user in &removed {
            registry.forget(*user);
        }
        registry.save_or_log(&config.data_file).await;
    }

    Ok(())
}

/// Best-effort notice in the leave-log channel.
async fn notify_removal(http: &Arc<Http>, channel: Option<ChannelId>, candidate: &SweepCandidate) {
    let Some(channel) = channel else { return };
    let embed = embeds::error_embed()
        .title("⚠️ Kick Automático por Inatividade")
        .description(format!(
            "**{}** foi removido por inatividade.\nÚltima atividade: <t:{}:D>",
            candidate.tag,
            candidate.last_ms / 1000,
        ));
    if let Err(e) = channel
        .send_message(http, CreateMessage::new().embed(embed))
        .await
    {
        error!(error = %e, "Failed to send inactivity kick notice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    const THRESHOLD: i64 = 14 * DAY_MS;

    #[test]
    fn member_past_threshold_is_removed() {
        let now = 100 * DAY_MS;
        assert!(eligible_for_removal(Some(now - THRESHOLD - 1), now, THRESHOLD));
    }

    #[test]
    fn member_within_threshold_is_retained() {
        let now = 100 * DAY_MS;
        assert!(!eligible_for_removal(Some(now - THRESHOLD + 1), now, THRESHOLD));
    }

    #[test]
    fn member_exactly_at_threshold_is_removed() {
        let now = 100 * DAY_MS;
        assert!(eligible_for_removal(Some(now - THRESHOLD), now, THRESHOLD));
    }

    #[test]
    fn never_recorded_member_is_skipped() {
        assert!(!eligible_for_removal(None, 100 * DAY_MS, THRESHOLD));
    }

    #[tokio::test]
    async fn member_listing_walks_past_the_first_page() {
        let pages = vec![vec![1u64, 2, 3], vec![4, 5]];
        let calls = std::sync::Mutex::new(Vec::new());
        let items = drain_pages(3, |id: &u64| *id, |after| {
            calls.lock().unwrap().push(after);
            let page = pages[usize::from(after.is_some())].clone();
            async move { Ok::<_, Error>(page) }
        })
        .await
        .unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(*calls.lock().unwrap(), vec![None, Some(3)]);
    }

    #[tokio::test]
    async fn full_final_page_ends_on_the_empty_follow_up() {
        let items = drain_pages(2, |id: &u64| *id, |after| {
            let page = if after.is_none() { vec![1u64, 2] } else { Vec::new() };
            async move { Ok::<_, Error>(page) }
        })
        .await
        .unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[tokio::test]
    async fn one_failed_removal_does_not_stop_the_pass() {
        let candidates = vec![
            SweepCandidate {
                user_id: 1,
                last_ms: 0,
                tag: "a".into(),
            },
            SweepCandidate {
                user_id: 2,
                last_ms: 0,
                tag: "b".into(),
            },
            SweepCandidate {
                user_id: 3,
                last_ms: 0,
                tag: "c".into(),
            },
        ];
        let removed = remove_overdue(candidates, |candidate| async move {
            if candidate.user_id == 2 {
                Err(Error::NotFound("member".into()))
            } else {
                Ok(())
            }
        })
        .await;
        assert_eq!(removed, vec![1, 3]);
    }
}
