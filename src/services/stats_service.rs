// ==================== DASHBOARDS & STATISTICS ====================
// Pure aggregation over already-loaded documents. The admin and influencer
// services load the collections and hand them over.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::models::{to_responses, Consultation, ConsultationMode, ConsultationResponse, Influencer};

/// How many bookings the dashboards show in "latest"
pub const LATEST_LIMIT: usize = 5;

/// Share of consultations per mode, in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ModeShare {
    pub chat: f64,
    pub call: f64,
    pub video: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerStats {
    pub influencer_id: String,
    pub name: String,
    pub image: String,
    pub category: String,
    pub total_consultations: usize,
    pub preferred_mode_percent: ModeShare,
    pub unique_users: usize,
    pub total_revenue: f64,
}

#[derive(Default)]
struct Tally<'a> {
    total: usize,
    chat: usize,
    call: usize,
    video: usize,
    users: HashSet<&'a str>,
    revenue: f64,
}

impl<'a> Tally<'a> {
    fn add(&mut self, c: &'a Consultation) {
        self.total += 1;
        match c.mode {
            ConsultationMode::Chat => self.chat += 1,
            ConsultationMode::Call => self.call += 1,
            ConsultationMode::Video => self.video += 1,
        }
        self.users.insert(c.user_id.as_str());
        self.revenue += c.amount;
    }

    fn share(&self) -> ModeShare {
        if self.total == 0 {
            return ModeShare::default();
        }
        let pct = |n: usize| n as f64 / self.total as f64 * 100.0;
        ModeShare {
            chat: pct(self.chat),
            call: pct(self.call),
            video: pct(self.video),
        }
    }
}

/// Per-influencer totals across every consultation that references it,
/// cancelled ones included. Output follows the order of `influencers`.
pub fn aggregate_influencer_stats(
    influencers: &[Influencer],
    consultations: &[Consultation],
) -> Vec<InfluencerStats> {
    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    for c in consultations {
        tallies.entry(c.inf_id.as_str()).or_default().add(c);
    }

    let empty = Tally::default();
    influencers
        .iter()
        .map(|inf| {
            let id = inf.id_hex();
            let tally = tallies.get(id.as_str()).unwrap_or(&empty);
            InfluencerStats {
                name: inf.name.clone(),
                image: inf.image.clone(),
                category: inf.category.clone(),
                total_consultations: tally.total,
                preferred_mode_percent: tally.share(),
                unique_users: tally.users.len(),
                total_revenue: tally.revenue,
                influencer_id: id,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerDashboard {
    pub earnings: f64,
    pub consultations: usize,
    pub users: usize,
    pub latest_consultations: Vec<ConsultationResponse>,
}

/// Dashboard of one influencer. Cancelled bookings are skipped; earnings
/// only count completed or paid ones. Latest means furthest `slotDate`.
pub fn influencer_dashboard(mut consultations: Vec<Consultation>) -> InfluencerDashboard {
    consultations.retain(|c| !c.cancelled);
    sort_by_slot_date_desc(&mut consultations);

    let earnings = consultations
        .iter()
        .filter(|c| c.is_settled())
        .map(|c| c.amount)
        .sum();
    let users = consultations
        .iter()
        .map(|c| c.user_data.id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let total = consultations.len();

    consultations.truncate(LATEST_LIMIT);

    InfluencerDashboard {
        earnings,
        consultations: total,
        users,
        latest_consultations: to_responses(consultations),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub influencers: u64,
    pub consultations: usize,
    pub users: u64,
    pub latest_consultations: Vec<ConsultationResponse>,
}

/// Platform totals plus the most recently booked consultations.
pub fn admin_dashboard(
    influencer_count: u64,
    user_count: u64,
    mut consultations: Vec<Consultation>,
) -> AdminDashboard {
    let total = consultations.len();
    consultations.sort_by(|a, b| b.date.cmp(&a.date));
    consultations.truncate(LATEST_LIMIT);

    AdminDashboard {
        influencers: influencer_count,
        consultations: total,
        users: user_count,
        latest_consultations: to_responses(consultations),
    }
}

/// Slot dates are `D_M_YYYY` without padding, so they sort as dates, not text.
/// Unparsable dates go last.
pub fn sort_by_slot_date_desc(consultations: &mut [Consultation]) {
    consultations.sort_by(|a, b| {
        slot_date_key(&b.slot_date)
            .cmp(&slot_date_key(&a.slot_date))
            .then_with(|| b.date.cmp(&a.date))
    });
}

fn slot_date_key(slot_date: &str) -> Option<(u32, u32, u32)> {
    let mut parts = slot_date.split('_').map(|p| p.trim().parse::<u32>().ok());
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Some(day)), Some(Some(month)), Some(Some(year)), None) => Some((year, month, day)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::consultation::fixtures::consultation;
    use crate::models::{Rates, SlotsBooked, SocialLinks};
    use mongodb::bson::oid::ObjectId;

    fn influencer(id: ObjectId, name: &str) -> Influencer {
        Influencer {
            id: Some(id),
            name: name.into(),
            email: format!("{}@example.com", name),
            password: "hash".into(),
            image: format!("https://img.example.com/{}.png", name),
            category: "Lifestyle".into(),
            followers: 10,
            social_links: SocialLinks::default(),
            about: String::new(),
            available: true,
            rates: Rates::default(),
            modes: vec![],
            slots_booked: SlotsBooked::new(),
            date: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn stats_tally_modes_users_and_revenue() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        let infs = vec![influencer(a, "a"), influencer(b, "b")];

        let a_hex = a.to_hex();
        let mut cancelled = consultation(&a_hex, "u2", ConsultationMode::Video, 30.0, "2_1_2026");
        cancelled.cancelled = true;
        let consultations = vec![
            consultation(&a_hex, "u1", ConsultationMode::Chat, 10.0, "1_1_2026"),
            consultation(&a_hex, "u1", ConsultationMode::Chat, 10.0, "1_1_2026"),
            consultation(&a_hex, "u2", ConsultationMode::Call, 20.0, "1_1_2026"),
            cancelled,
            consultation("someone-else", "u9", ConsultationMode::Chat, 99.0, "1_1_2026"),
        ];

        let stats = aggregate_influencer_stats(&infs, &consultations);
        assert_eq!(stats.len(), 2);

        let sa = &stats[0];
        assert_eq!(sa.influencer_id, a_hex);
        assert_eq!(sa.total_consultations, 4);
        assert_eq!(sa.unique_users, 2);
        assert_eq!(sa.total_revenue, 70.0);
        assert_eq!(
            sa.preferred_mode_percent,
            ModeShare { chat: 50.0, call: 25.0, video: 25.0 }
        );

        let sb = &stats[1];
        assert_eq!(sb.name, "b");
        assert_eq!(sb.total_consultations, 0);
        assert_eq!(sb.unique_users, 0);
        assert_eq!(sb.total_revenue, 0.0);
        assert_eq!(sb.preferred_mode_percent, ModeShare::default());
    }

    #[test]
    fn stats_serialize_with_camel_case_keys() {
        let id = ObjectId::new();
        let stats = aggregate_influencer_stats(&[influencer(id, "a")], &[]);
        let json = serde_json::to_value(&stats[0]).unwrap();
        assert_eq!(json["influencerId"], id.to_hex());
        assert_eq!(json["preferredModePercent"]["chat"], 0.0);
        assert!(json.get("uniqueUsers").is_some());
        assert!(json.get("totalRevenue").is_some());
    }

    #[test]
    fn influencer_dashboard_counts_settled_earnings() {
        let mut done = consultation("i", "u1", ConsultationMode::Chat, 10.0, "3_1_2026");
        done.is_completed = true;
        let mut paid = consultation("i", "u2", ConsultationMode::Call, 20.0, "4_1_2026");
        paid.payment = true;
        let pending = consultation("i", "u1", ConsultationMode::Video, 30.0, "5_1_2026");
        let mut cancelled = consultation("i", "u3", ConsultationMode::Video, 30.0, "6_1_2026");
        cancelled.cancelled = true;
        cancelled.payment = true;

        let dash = influencer_dashboard(vec![done, paid, pending, cancelled]);
        assert_eq!(dash.earnings, 30.0);
        assert_eq!(dash.consultations, 3);
        assert_eq!(dash.users, 2);
        assert_eq!(dash.latest_consultations.len(), 3);
        assert_eq!(dash.latest_consultations[0].slot_date, "5_1_2026");
    }

    #[test]
    fn influencer_dashboard_keeps_five_latest() {
        let consultations = (1..=8)
            .map(|day| consultation("i", "u", ConsultationMode::Chat, 1.0, &format!("{}_2_2026", day)))
            .collect();
        let dash = influencer_dashboard(consultations);
        assert_eq!(dash.consultations, 8);
        let dates: Vec<_> = dash
            .latest_consultations
            .iter()
            .map(|c| c.slot_date.as_str())
            .collect();
        assert_eq!(dates, ["8_2_2026", "7_2_2026", "6_2_2026", "5_2_2026", "4_2_2026"]);
    }

    #[test]
    fn admin_dashboard_uses_booking_time() {
        let consultations = (0..7)
            .map(|i| {
                let mut c = consultation("i", "u", ConsultationMode::Chat, 1.0, "1_1_2026");
                c.date = i;
                c
            })
            .collect();
        let dash = admin_dashboard(3, 12, consultations);
        assert_eq!(dash.influencers, 3);
        assert_eq!(dash.users, 12);
        assert_eq!(dash.consultations, 7);
        let order: Vec<i64> = dash.latest_consultations.iter().map(|c| c.date).collect();
        assert_eq!(order, vec![6, 5, 4, 3, 2]);
    }

    #[test]
    fn slot_dates_sort_chronologically() {
        let mut list = vec![
            consultation("i", "u", ConsultationMode::Chat, 1.0, "9_1_2026"),
            consultation("i", "u", ConsultationMode::Chat, 1.0, "garbage"),
            consultation("i", "u", ConsultationMode::Chat, 1.0, "10_1_2026"),
            consultation("i", "u", ConsultationMode::Chat, 1.0, "1_12_2025"),
        ];
        sort_by_slot_date_desc(&mut list);
        let dates: Vec<_> = list.iter().map(|c| c.slot_date.as_str()).collect();
        assert_eq!(dates, ["10_1_2026", "9_1_2026", "1_12_2025", "garbage"]);
    }
}
