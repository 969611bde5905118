//! Demo reward provider standing in for the payments backend. Resolves once
//! per mount after a short delay, the way the real endpoint would.

use anyhow::Result;
use chrono::prelude::*;
use gloo::timers::future::TimeoutFuture;
use rasca_core::{MilestoneProgress, Reward, RewardSet};

const FETCH_DELAY_MS: u32 = 500;

pub(crate) const DEMO_PAYMENT_ID: &str = "TXN1234567890";
pub(crate) const DEMO_AMOUNT_PAID: &str = "$59.99";

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RewardsResponse {
    pub payment_id: String,
    pub rewards: RewardSet,
    pub progress: MilestoneProgress,
    pub fetched_at: DateTime<Utc>,
}

pub(crate) async fn fetch_rewards(payment_id: &str) -> Result<RewardsResponse> {
    TimeoutFuture::new(FETCH_DELAY_MS).await;
    Ok(RewardsResponse {
        payment_id: payment_id.to_string(),
        rewards: demo_rewards(),
        progress: demo_progress(),
        fetched_at: crate::utils::utc_now(),
    })
}

fn demo_rewards() -> RewardSet {
    RewardSet::new(vec![
        Reward {
            id: "reward-001".to_string(),
            title: "Cashback Reward".to_string(),
            description: "You won ₹100 Cashback!".to_string(),
            reward_value: 100,
            scratched: false,
        },
        Reward {
            id: "reward-002".to_string(),
            title: "Discount Coupon".to_string(),
            description: "Get 15% off on your next purchase".to_string(),
            reward_value: 15,
            scratched: false,
        },
    ])
}

fn demo_progress() -> MilestoneProgress {
    MilestoneProgress::new(
        5,
        3,
        vec![
            "Payment Completed".to_string(),
            "Reward Unlocked".to_string(),
            "First Scratch Card Revealed".to_string(),
            "Second Reward Available".to_string(),
            "All Rewards Claimed".to_string(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_rewards_arrive_concealed_with_unique_ids() {
        let rewards = demo_rewards();

        assert_eq!(rewards.len(), 2);
        assert_eq!(rewards.revealed_count(), 0);
        assert_ne!(rewards.get(0).unwrap().id, rewards.get(1).unwrap().id);
    }

    #[test]
    fn demo_progress_has_a_label_per_milestone() {
        let progress = demo_progress();

        assert_eq!(progress.total, 5);
        assert_eq!(progress.completed, 3);
        assert_eq!(progress.labels.len(), usize::from(progress.total));
    }
}
