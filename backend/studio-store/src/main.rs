//! Seeds a studio session, runs a short scripted moderation pass across the
//! three stores and prints the resulting dashboard stats as JSON.
//!
//! Run with: cargo run --bin studio-store

use studio_store::branding::AssetStatus;
use studio_store::livestream::{MessageStatus, StreamStatus};
use studio_store::logging::init_tracing;
use studio_store::models::ReportStatus;
use studio_store::platform_ops::SiteStatus;
use studio_store::{Session, Store, StudioConfig};

fn main() -> anyhow::Result<()> {
    let config = StudioConfig::load()?;
    init_tracing(config.log_json);
    tracing::info!("Configuration loaded successfully");

    let mut session = Session::from_config(config);

    moderate_livestream(&mut session)?;
    moderate_platform(&mut session)?;
    review_brand_kit(&mut session)?;

    let overview = session.overview();
    println!("{}", serde_json::to_string_pretty(&overview)?);

    for activity in session.recent_activity(5) {
        tracing::info!(
            store = activity.store.as_str(),
            action = activity.event.action.as_str(),
            "{}",
            activity.event.summary
        );
    }

    Ok(())
}

fn moderate_livestream(session: &mut Session) -> anyhow::Result<()> {
    let snapshot = session.livestream().snapshot();
    let store = session.livestream_mut();

    // Clear the held queue: drop anything the auto-mod scored as toxic.
    for message in snapshot.messages.iter().filter(|m| m.status == MessageStatus::Held) {
        store.delete_message(message.id)?;
    }

    if let Some(report) = snapshot.reports.iter().find(|r| r.status == ReportStatus::Pending) {
        store.start_review(report.id)?;
        store.resolve_report(report.id, "Reviewed clip, warning issued")?;
    }

    if let Some(stream) = snapshot
        .streams
        .iter()
        .find(|s| s.status == StreamStatus::Live && s.health.is_degraded())
    {
        store.add_stream_note(stream.id, "Degraded health, contacted creator")?;
    }

    Ok(())
}

fn moderate_platform(session: &mut Session) -> anyhow::Result<()> {
    let snapshot = session.platform_ops().snapshot();
    let store = session.platform_ops_mut();

    if let Some(ticket) = snapshot.tickets.iter().find(|t| t.status == ReportStatus::Pending) {
        store.start_ticket_review(ticket.id)?;
    }

    if let Some(site) = snapshot
        .sites
        .iter()
        .find(|s| s.status == SiteStatus::Published && s.error_rate_pct > 2.0)
    {
        store.flag_site(site.id, "Error rate above 2%")?;
    }

    Ok(())
}

fn review_brand_kit(session: &mut Session) -> anyhow::Result<()> {
    let snapshot = session.branding().snapshot();
    let store = session.branding_mut();

    for asset in snapshot.assets.iter().filter(|a| a.status == AssetStatus::InReview) {
        store.approve_asset(asset.id)?;
    }

    Ok(())
}
