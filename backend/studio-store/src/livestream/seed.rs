//! Mock dataset for the livestream moderation dashboard.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::models::*;
use crate::audit::{AuditAction, AuditEvent, AuditLog, AuditTarget};
use crate::models::{
    AuditEventId, MemberStatus, MessageId, ModNote, ReportId, ReportPriority, ReportStatus,
    StreamId, TeamMember, TeamMemberId, TeamRole, UserId,
};
use crate::store::SeedContext;

const SALT: u64 = 0x11FE_57AE;

const HANDLES: &[(&str, &str)] = &[
    ("pixelwitch", "Pixel Witch"),
    ("tacoguy", "Taco Guy"),
    ("nightowl_dj", "Night Owl DJ"),
    ("speedrunsam", "Speedrun Sam"),
    ("cozycrafts", "Cozy Crafts"),
    ("chefmarco", "Chef Marco"),
    ("lofi_lena", "Lofi Lena"),
    ("retrorick", "Retro Rick"),
    ("quietquill", "Quiet Quill"),
    ("spamking99", "SpamKing"),
    ("trollface_x", "xX Troll Xx"),
    ("newbie_nico", "Nico"),
];

const STREAMS: &[(&str, &str, &[&str])] = &[
    ("Late night synthwave set", "Music", &["music", "chill"]),
    ("Any% world record attempts", "Gaming", &["speedrun", "competitive"]),
    ("Building a cabin in survival", "Gaming", &["survival", "cozy"]),
    ("Knitting and podcasts", "Creative", &["crafts", "cozy"]),
    ("Fresh pasta from scratch", "Food", &["cooking"]),
    ("Beats to study to", "Music", &["lofi", "study"]),
    ("Arcade classics marathon", "Gaming", &["retro"]),
    ("Poetry open mic", "Creative", &["writing"]),
];

const CHAT_LINES: &[&str] = &[
    "this set is fire",
    "first time here, love the vibe",
    "what keyboard is that?",
    "FREE FOLLOWERS at follow-boost.biz",
    "you are so bad at this lol uninstall",
    "gg",
    "can you play the one from last week?",
    "click my link for free skins",
    "hello from Brazil!",
    "nobody wants you here",
    "the pasta looks amazing",
    "pog",
];

const TEAM: &[(&str, &str, TeamRole, MemberStatus)] = &[
    ("Jordan Park", "jordan@studio.dev", TeamRole::Owner, MemberStatus::Active),
    ("Riley Chen", "riley@studio.dev", TeamRole::Admin, MemberStatus::Active),
    ("Sam Okafor", "sam@studio.dev", TeamRole::Moderator, MemberStatus::Active),
    ("Alex Rivera", "alex@studio.dev", TeamRole::Moderator, MemberStatus::Active),
    ("Morgan Lee", "morgan@studio.dev", TeamRole::Support, MemberStatus::Invited),
];

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Build the livestream snapshot. Same context, same snapshot.
pub fn seed(ctx: &SeedContext) -> LivestreamSnapshot {
    let mut rng = StdRng::seed_from_u64(ctx.seed ^ SALT);
    let now = ctx.now;

    let team = seed_team(now);
    let users = seed_users(&mut rng, now);
    let streams = seed_streams(&mut rng, now, &team);
    let messages = seed_messages(&mut rng, now, &streams, &users);
    let reports = seed_reports(&mut rng, now, &streams, &users, &messages, &team);
    let audit = seed_audit(ctx, &users, &streams, &reports);

    LivestreamSnapshot {
        users,
        streams,
        reports,
        messages,
        team,
        audit,
        settings: ModerationSettings {
            auto_mod_enabled: true,
            toxicity_threshold: 0.7,
            spam_threshold: 0.6,
            hold_links_from_new_users: true,
            slow_mode_seconds: 0,
            blocked_keywords: vec!["follow-boost".to_string(), "free skins".to_string()],
            auto_escalate_critical: true,
        },
        selection: LivestreamSelection::default(),
    }
}

fn seed_team(now: DateTime<Utc>) -> Vec<TeamMember> {
    TEAM.iter()
        .enumerate()
        .map(|(i, (name, email, role, status))| TeamMember {
            id: TeamMemberId::seeded(i),
            name: name.to_string(),
            email: email.to_string(),
            role: *role,
            status: *status,
            permissions: role.default_permissions(),
            actions_taken: if *status == MemberStatus::Active { (40 - i as u32 * 7) * 3 } else { 0 },
            joined_at: now - Duration::days(400 - i as i64 * 60),
            last_active_at: (*status == MemberStatus::Active)
                .then(|| now - Duration::minutes(15 * (i as i64 + 1))),
        })
        .collect()
}

fn seed_users(rng: &mut StdRng, now: DateTime<Utc>) -> Vec<StreamUser> {
    HANDLES
        .iter()
        .enumerate()
        .map(|(i, (handle, display_name))| {
            let status = match i {
                9 => UserStatus::Suspended,
                10 => UserStatus::Banned,
                11 => UserStatus::Pending,
                _ => UserStatus::Active,
            };
            let tier = match i {
                0..=2 => UserTier::Partner,
                3..=7 => UserTier::Affiliate,
                _ => UserTier::Viewer,
            };
            let (warning_count, strike_count) = match status {
                UserStatus::Suspended => (2, 1),
                UserStatus::Banned => (3, 2),
                _ => (rng.gen_range(0..2), 0),
            };
            let mut notes = Vec::new();
            if status == UserStatus::Suspended {
                notes.push(ModNote::new(
                    now - Duration::hours(20),
                    "Sam Okafor",
                    "Suspended: repeated link spam in chat",
                ));
            }
            if status == UserStatus::Banned {
                notes.push(ModNote::new(
                    now - Duration::days(3),
                    "Riley Chen",
                    "Banned: targeted harassment across streams",
                ));
            }

            StreamUser {
                id: UserId::seeded(i),
                handle: handle.to_string(),
                display_name: display_name.to_string(),
                status,
                tier,
                followers: match tier {
                    UserTier::Partner => rng.gen_range(50_000..400_000),
                    UserTier::Affiliate => rng.gen_range(1_000..50_000),
                    UserTier::Viewer => rng.gen_range(0..500),
                },
                warning_count,
                strike_count,
                notes,
                created_at: now - Duration::days(rng.gen_range(30..900)),
                last_active_at: now - Duration::minutes(rng.gen_range(1..600)),
                suspended_until: (status == UserStatus::Suspended).then(|| now + Duration::hours(52)),
            }
        })
        .collect()
}

fn seed_streams(rng: &mut StdRng, now: DateTime<Utc>, team: &[TeamMember]) -> Vec<Stream> {
    STREAMS
        .iter()
        .enumerate()
        .map(|(i, (title, category, tags))| {
            let status = if i < 6 { StreamStatus::Live } else { StreamStatus::Ended };
            let started_at = now - Duration::minutes(rng.gen_range(10..300));
            let peak_viewers = rng.gen_range(50..20_000);
            let viewer_count = match status {
                StreamStatus::Live => rng.gen_range(10..=peak_viewers),
                _ => 0,
            };
            let is_flagged = i == 2;
            let moderation_notes = if is_flagged {
                let author = team.get(2).map(|m| m.name.as_str()).unwrap_or("moderator");
                vec![ModNote::new(now - Duration::minutes(8), author, "Flagged: possible copyrighted music")]
            } else {
                Vec::new()
            };

            Stream {
                id: StreamId::seeded(i),
                user_id: UserId::seeded(i),
                title: title.to_string(),
                category: category.to_string(),
                status,
                viewer_count,
                peak_viewers,
                health: StreamHealth {
                    bitrate_kbps: rng.gen_range(1_200..8_000),
                    dropped_frames_pct: round2(rng.gen_range(0.0..8.0)),
                    latency_ms: rng.gen_range(800..5_000),
                },
                is_muted: false,
                is_age_restricted: *category == "Food" && i % 2 == 0,
                is_flagged,
                tags: tags.iter().map(|t| t.to_string()).collect(),
                moderation_notes,
                started_at,
                ended_at: (status == StreamStatus::Ended)
                    .then(|| started_at + Duration::minutes(rng.gen_range(30..180))),
            }
        })
        .collect()
}

fn seed_messages(
    rng: &mut StdRng,
    now: DateTime<Utc>,
    streams: &[Stream],
    users: &[StreamUser],
) -> Vec<ChatMessage> {
    let live: Vec<&Stream> = streams.iter().filter(|s| s.status == StreamStatus::Live).collect();
    if live.is_empty() || users.is_empty() {
        return Vec::new();
    }

    (0..30)
        .map(|i| {
            let stream = live[rng.gen_range(0..live.len())];
            let line = CHAT_LINES[i % CHAT_LINES.len()];
            let author = &users[(i * 7 + 3) % users.len()];
            let (score, flags) = score_line(rng, line);
            let status = if score >= 0.9 {
                MessageStatus::AutoDeleted
            } else if score >= 0.7 {
                MessageStatus::Held
            } else {
                MessageStatus::Visible
            };

            ChatMessage {
                id: MessageId::seeded(i),
                stream_id: stream.id,
                user_id: author.id,
                content: line.to_string(),
                status,
                moderation_score: score,
                flags,
                sent_at: now - Duration::seconds(rng.gen_range(5..3_600)),
            }
        })
        .collect()
}

/// Scripted auto-mod: keyword rules plus a little noise.
fn score_line(rng: &mut StdRng, line: &str) -> (f32, Vec<String>) {
    let lower = line.to_lowercase();
    let mut flags = Vec::new();
    let mut score: f32 = rng.gen_range(0.0..0.2);

    if lower.contains(".biz") || lower.contains("link") {
        flags.push("link".to_string());
        score += 0.35;
    }
    if lower.contains("free") {
        flags.push("spam".to_string());
        score += 0.4;
    }
    if lower.contains("uninstall") || lower.contains("nobody wants you") {
        flags.push("toxicity".to_string());
        score += 0.75;
    }

    (round2(score.min(1.0)), flags)
}

fn seed_reports(
    rng: &mut StdRng,
    now: DateTime<Utc>,
    streams: &[Stream],
    users: &[StreamUser],
    messages: &[ChatMessage],
    team: &[TeamMember],
) -> Vec<Report> {
    const REASONS: &[&str] = &[
        "Harassment in chat",
        "Spam links",
        "Copyrighted audio",
        "Hate speech",
        "Impersonation",
        "Inappropriate stream title",
        "Self-harm content",
        "Underage user",
        "Scam giveaway",
        "Violent content",
    ];
    const STATUSES: &[ReportStatus] = &[
        ReportStatus::Pending,
        ReportStatus::Pending,
        ReportStatus::Reviewing,
        ReportStatus::Pending,
        ReportStatus::Escalated,
        ReportStatus::Resolved,
        ReportStatus::Pending,
        ReportStatus::Dismissed,
        ReportStatus::Pending,
        ReportStatus::Reviewing,
    ];
    const PRIORITIES: &[ReportPriority] = &[
        ReportPriority::Low,
        ReportPriority::Medium,
        ReportPriority::High,
        ReportPriority::Critical,
    ];

    REASONS
        .iter()
        .enumerate()
        .map(|(i, reason)| {
            let target = match i % 3 {
                0 if !streams.is_empty() => ReportTarget::Stream(streams[i % streams.len()].id),
                1 if !messages.is_empty() => ReportTarget::ChatMessage(messages[(i * 5) % messages.len()].id),
                _ => ReportTarget::User(UserId::seeded(9 + i % 3)),
            };
            let status = STATUSES[i % STATUSES.len()];
            let priority = if *reason == "Self-harm content" {
                ReportPriority::Critical
            } else {
                PRIORITIES[rng.gen_range(0..PRIORITIES.len() - 1)]
            };
            let created_at = now - Duration::minutes(rng.gen_range(5..2_000));
            let assignee = match status {
                ReportStatus::Pending => None,
                _ => team.get(2 + i % 2).map(|m| m.id),
            };
            let resolution_notes = match status {
                ReportStatus::Resolved => vec![ModNote::new(created_at, "Sam Okafor", "Resolved: content removed")],
                ReportStatus::Dismissed => vec![ModNote::new(created_at, "Alex Rivera", "Dismissed: no violation found")],
                _ => Vec::new(),
            };

            Report {
                id: ReportId::seeded(i),
                reporter_id: users[(i * 3 + 1) % users.len()].id,
                target,
                reason: reason.to_string(),
                status,
                priority,
                assignee,
                resolution_notes,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}

fn seed_audit(
    ctx: &SeedContext,
    users: &[StreamUser],
    streams: &[Stream],
    reports: &[Report],
) -> AuditLog {
    let mut log = AuditLog::with_capacity(ctx.audit_capacity);
    let mut entries: Vec<(i64, &str, AuditAction, String, Option<AuditTarget>)> = Vec::new();

    if let Some(user) = users.iter().find(|u| u.status == UserStatus::Banned) {
        entries.push((72, "Riley Chen", AuditAction::UserBanned, format!("Banned @{}", user.handle), Some(AuditTarget::User(user.id))));
    }
    if let Some(user) = users.iter().find(|u| u.status == UserStatus::Suspended) {
        entries.push((20, "Sam Okafor", AuditAction::UserSuspended, format!("Suspended @{} for 72h", user.handle), Some(AuditTarget::User(user.id))));
    }
    if let Some(report) = reports.iter().find(|r| r.status == ReportStatus::Resolved) {
        entries.push((4, "Sam Okafor", AuditAction::ReportResolved, format!("Resolved report \"{}\"", report.reason), Some(AuditTarget::Report(report.id))));
    }
    if let Some(stream) = streams.iter().find(|s| s.is_flagged) {
        entries.push((0, "Sam Okafor", AuditAction::StreamFlagged, format!("Flagged \"{}\"", stream.title), Some(AuditTarget::Stream(stream.id))));
    }

    for (i, (hours, actor, action, summary, target)) in entries.into_iter().enumerate() {
        log.push(AuditEvent {
            id: AuditEventId::seeded(i),
            at: ctx.now - Duration::hours(hours) - Duration::minutes(8),
            actor: actor.to_string(),
            action,
            summary,
            target,
        });
    }
    log
}
