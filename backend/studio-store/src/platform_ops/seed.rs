use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::models::*;
use crate::audit::{AuditAction, AuditEvent, AuditLog, AuditTarget};
use crate::models::{
    AccountId, AuditEventId, FlagId, MemberStatus, ModNote, ReportPriority, ReportStatus, SiteId,
    TeamMember, TeamMemberId, TeamRole, TicketId,
};
use crate::store::SeedContext;

const SALT: u64 = 0x0B5_0B5;

const ACCOUNTS: &[(&str, &str, PlanTier)] = &[
    ("bloomfloral", "Bloom Floral Studio", PlanTier::Pro),
    ("northpeak", "North Peak Outfitters", PlanTier::Enterprise),
    ("cafe-lumen", "Café Lumen", PlanTier::Starter),
    ("ironworks-gym", "Ironworks Gym", PlanTier::Starter),
    ("mapleandco", "Maple & Co. Bakery", PlanTier::Free),
    ("quantleaf", "Quantleaf Analytics", PlanTier::Pro),
    ("cryptomoonx", "CryptoMoonX", PlanTier::Free),
    ("harborlaw", "Harbor Law Partners", PlanTier::Enterprise),
    ("pixelpup", "Pixel Pup Grooming", PlanTier::Free),
];

const FLAGS: &[(&str, &str, bool, u8)] = &[
    ("ai-copywriter", "AI copy suggestions in the page editor", true, 100),
    ("new-checkout", "Redesigned checkout block", true, 25),
    ("custom-domains-v2", "Automatic TLS for custom domains", false, 0),
    ("brand-sync", "Sync brand kit into site themes", true, 50),
    ("livestream-embeds", "Embed live streams on landing pages", false, 0),
];

const TEAM: &[(&str, &str, TeamRole)] = &[
    ("Jordan Park", "jordan@studio.dev", TeamRole::Owner),
    ("Priya Natarajan", "priya@studio.dev", TeamRole::Admin),
    ("Dana Brooks", "dana@studio.dev", TeamRole::Support),
    ("Casey Morgan", "casey@studio.dev", TeamRole::Support),
];

pub fn seed(ctx: &SeedContext) -> PlatformSnapshot {
    let mut rng = StdRng::seed_from_u64(ctx.seed ^ SALT);
    let now = ctx.now;

    let team = seed_team(now);
    let accounts = seed_accounts(&mut rng, now);
    let sites = seed_sites(&mut rng, now, &accounts);
    let tickets = seed_tickets(&mut rng, now, &accounts, &sites, &team);
    let flags = FLAGS
        .iter()
        .enumerate()
        .map(|(i, (key, description, enabled, rollout_pct))| FeatureFlag {
            id: FlagId::seeded(i),
            key: key.to_string(),
            description: description.to_string(),
            enabled: *enabled,
            rollout_pct: *rollout_pct,
        })
        .collect();
    let audit = seed_audit(ctx, &accounts, &sites);

    PlatformSnapshot {
        accounts,
        sites,
        tickets,
        team,
        flags,
        audit,
        settings: PlatformSettings {
            maintenance_mode: false,
            signups_enabled: true,
            max_sites_per_account: 5,
            default_plan: PlanTier::Free,
            trial_days: 14,
        },
        selection: PlatformSelection::default(),
    }
}

fn seed_team(now: DateTime<Utc>) -> Vec<TeamMember> {
    TEAM.iter()
        .enumerate()
        .map(|(i, (name, email, role))| TeamMember {
            id: TeamMemberId::seeded(100 + i),
            name: name.to_string(),
            email: email.to_string(),
            role: *role,
            status: MemberStatus::Active,
            permissions: role.default_permissions(),
            actions_taken: 12 * (i as u32 + 1),
            joined_at: now - Duration::days(600 - 90 * i as i64),
            last_active_at: Some(now - Duration::hours(i as i64 + 1)),
        })
        .collect()
}

fn seed_accounts(rng: &mut StdRng, now: DateTime<Utc>) -> Vec<Account> {
    ACCOUNTS
        .iter()
        .enumerate()
        .map(|(i, (handle, display_name, plan))| {
            let status = match *handle {
                "cryptomoonx" => AccountStatus::Suspended,
                "pixelpup" => AccountStatus::Pending,
                _ => AccountStatus::Active,
            };
            let notes = if status == AccountStatus::Suspended {
                vec![ModNote::new(now - Duration::hours(30), "Priya Natarajan", "Suspended: phishing reports on landing page")]
            } else {
                Vec::new()
            };
            let seats = plan.included_seats() + rng.gen_range(0..3);

            Account {
                id: AccountId::seeded(i),
                handle: handle.to_string(),
                display_name: display_name.to_string(),
                owner_email: format!("owner@{}.example", handle),
                status,
                plan: *plan,
                seats,
                monthly_active_users: rng.gen_range(10..25_000),
                warning_count: u32::from(status == AccountStatus::Suspended) * 2,
                strike_count: u32::from(status == AccountStatus::Suspended),
                tags: match plan {
                    PlanTier::Enterprise => vec!["vip".to_string()],
                    _ => Vec::new(),
                },
                notes,
                created_at: now - Duration::days(rng.gen_range(20..1_000)),
                last_active_at: now - Duration::hours(rng.gen_range(1..200)),
            }
        })
        .collect()
}

fn seed_sites(rng: &mut StdRng, now: DateTime<Utc>, accounts: &[Account]) -> Vec<Site> {
    let mut sites = Vec::new();
    for account in accounts {
        let count = match account.plan {
            PlanTier::Free => 1,
            PlanTier::Starter => 1,
            PlanTier::Pro => 2,
            PlanTier::Enterprise => 3,
        };
        for n in 0..count {
            let index = sites.len();
            let status = match account.status {
                AccountStatus::Suspended => SiteStatus::TakenDown,
                AccountStatus::Pending => SiteStatus::Unpublished,
                _ => SiteStatus::Published,
            };
            let name = if n == 0 {
                account.display_name.clone()
            } else {
                format!("{} ({})", account.display_name, ["Shop", "Careers", "Blog"][n % 3])
            };
            sites.push(Site {
                id: SiteId::seeded(index),
                account_id: account.id,
                name,
                domain: if n == 0 {
                    format!("{}.studio.site", account.handle)
                } else {
                    format!("{}-{}.studio.site", account.handle, n)
                },
                status,
                uptime_pct: ((99.0 + rng.gen_range(0.0..1.0_f32)) * 100.0).round() / 100.0,
                error_rate_pct: (rng.gen_range(0.0..2.5_f32) * 100.0).round() / 100.0,
                monthly_visits: match status {
                    SiteStatus::Published => rng.gen_range(100..500_000),
                    _ => 0,
                },
                is_flagged: account.status == AccountStatus::Suspended,
                notes: Vec::new(),
                published_at: (status != SiteStatus::Unpublished)
                    .then(|| now - Duration::days(rng.gen_range(1..365))),
            });
        }
    }
    sites
}

fn seed_tickets(
    rng: &mut StdRng,
    now: DateTime<Utc>,
    accounts: &[Account],
    sites: &[Site],
    team: &[TeamMember],
) -> Vec<Ticket> {
    const SUBJECTS: &[(&str, ReportStatus, ReportPriority)] = &[
        ("Custom domain not resolving", ReportStatus::Pending, ReportPriority::High),
        ("Phishing page reported", ReportStatus::Escalated, ReportPriority::Critical),
        ("Billing seat count looks wrong", ReportStatus::Reviewing, ReportPriority::Medium),
        ("Contact form spam", ReportStatus::Pending, ReportPriority::Low),
        ("Request to transfer ownership", ReportStatus::Resolved, ReportPriority::Medium),
        ("Site loads slowly on mobile", ReportStatus::Pending, ReportPriority::Medium),
        ("Trademark complaint", ReportStatus::Dismissed, ReportPriority::High),
    ];

    SUBJECTS
        .iter()
        .enumerate()
        .map(|(i, (subject, status, priority))| {
            let site = &sites[(i * 2) % sites.len()];
            let target = if i % 2 == 0 {
                TicketTarget::Site(site.id)
            } else {
                TicketTarget::Account(site.account_id)
            };
            let account_id = accounts
                .iter()
                .find(|a| a.id == site.account_id)
                .map(|a| a.id)
                .unwrap_or(site.account_id);
            let created_at = now - Duration::hours(rng.gen_range(1..96));
            Ticket {
                id: TicketId::seeded(i),
                account_id,
                subject: subject.to_string(),
                target,
                status: *status,
                priority: *priority,
                assignee: (*status != ReportStatus::Pending).then(|| team[2 + i % 2].id),
                resolution_notes: if status.is_terminal() {
                    vec![ModNote::new(created_at, "Dana Brooks", format!("Closed as {}", status.as_str()))]
                } else {
                    Vec::new()
                },
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}

fn seed_audit(ctx: &SeedContext, accounts: &[Account], sites: &[Site]) -> AuditLog {
    let mut log = AuditLog::with_capacity(ctx.audit_capacity);
    if let Some(account) = accounts.iter().find(|a| a.status == AccountStatus::Suspended) {
        log.push(AuditEvent {
            id: AuditEventId::seeded(100),
            at: ctx.now - Duration::hours(30),
            actor: "Priya Natarajan".to_string(),
            action: AuditAction::AccountSuspended,
            summary: format!("Suspended {}", account.display_name),
            target: Some(AuditTarget::Account(account.id)),
        });
    }
    if let Some(site) = sites.iter().find(|s| s.status == SiteStatus::TakenDown) {
        log.push(AuditEvent {
            id: AuditEventId::seeded(101),
            at: ctx.now - Duration::hours(29),
            actor: "Priya Natarajan".to_string(),
            action: AuditAction::SiteTakenDown,
            summary: format!("Took down {}", site.domain),
            target: Some(AuditTarget::Site(site.id)),
        });
    }
    log
}
