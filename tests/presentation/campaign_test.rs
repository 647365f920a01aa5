//! Outreach links and campaign statistics.

use leadhunter::campaign::{mailto_link, whatsapp_link, CampaignStats};
use leadhunter::model::{ContactStatus, OutreachDraft, Prospect};

fn draft() -> OutreachDraft {
    OutreachDraft {
        subject: "Pérdida mensual".to_owned(),
        body: "Hola & bienvenida".to_owned(),
        whatsapp_message: "Hola Laura, ¿hablamos?".to_owned(),
        sms_message: "Responda SI".to_owned(),
    }
}

fn prospect(score: u8, loss: f64) -> Prospect {
    let mut p = Prospect::new("Spa Zen", "Spas", "Cali", "Av. 6N");
    p.sentiment_analysis.score = score;
    p.sentiment_analysis.estimated_monthly_loss = loss;
    p
}

#[test]
fn whatsapp_link_uses_digits_only_and_encodes_text() {
    let mut p = prospect(90, 0.0);
    p.phone = Some("+57 (300) 123-4567".to_owned());
    assert_eq!(whatsapp_link(&p), None);

    p.attach_draft(draft());
    assert_eq!(
        whatsapp_link(&p).as_deref(),
        Some("https://wa.me/573001234567?text=Hola%20Laura%2C%20%C2%BFhablamos%3F")
    );
    assert_eq!(p.contact_status(), ContactStatus::Drafted);
}

#[test]
fn whatsapp_link_needs_a_dialable_phone() {
    let mut p = prospect(90, 0.0);
    p.attach_draft(draft());
    assert_eq!(whatsapp_link(&p), None);
    p.phone = Some("n/a".to_owned());
    assert_eq!(whatsapp_link(&p), None);
}

#[test]
fn mailto_link_encodes_subject_and_body() {
    let mut p = prospect(90, 0.0);
    p.email = Some("laura@spazen.co".to_owned());
    assert_eq!(mailto_link(&p), None);

    p.attach_draft(draft());
    assert_eq!(
        mailto_link(&p).as_deref(),
        Some("mailto:laura@spazen.co?subject=P%C3%A9rdida%20mensual&body=Hola%20%26%20bienvenida")
    );
}

#[test]
fn stats_count_hot_drafted_and_loss() {
    let mut hot_drafted = prospect(81, 3500.0);
    hot_drafted.attach_draft(draft());
    let borderline = prospect(80, 1200.5);
    let mut contacted = prospect(95, 0.0);
    contacted.attach_draft(draft());
    contacted.mark_contacted().expect("drafted");

    let stats = CampaignStats::from_prospects(&[hot_drafted, borderline, contacted]);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.hot_leads, 2);
    assert_eq!(stats.drafted, 2);
    assert_eq!(stats.contacted, 1);
    assert!((stats.total_estimated_loss - 4700.5).abs() < 1e-9);
}
