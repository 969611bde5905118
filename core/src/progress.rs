use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Milestone progress attached to a payment. Read-only to this crate;
/// produced by the reward provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MilestoneProgress {
    pub total: u8,
    pub completed: u8,
    pub labels: Vec<String>,
}

/// One rendered checkpoint on the progress bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Checkpoint {
    pub number: u8,
    pub completed: bool,
    pub next: bool,
    pub label: String,
}

impl MilestoneProgress {
    pub fn new(total: u8, completed: u8, labels: Vec<String>) -> Self {
        let completed = completed.min(total);
        Self {
            total,
            completed,
            labels,
        }
    }

    /// Integer completion percentage, rounded; 0 when there are no
    /// milestones. Records built without the clamp in `new` (pub fields,
    /// serde) cap at 100 instead of overflowing the cast.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let total = self.total as u32;
        ((self.completed as u32 * 100 + total / 2) / total).min(100) as u8
    }

    pub fn remaining(&self) -> u8 {
        self.total.saturating_sub(self.completed)
    }

    pub fn checkpoints(&self) -> impl Iterator<Item = Checkpoint> + '_ {
        (1..=self.total).map(|number| Checkpoint {
            number,
            completed: number <= self.completed,
            next: number == self.completed + 1,
            label: self
                .labels
                .get(usize::from(number) - 1)
                .cloned()
                .unwrap_or_else(|| format!("Milestone {}", number)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn percent_is_zero_without_milestones() {
        assert_eq!(MilestoneProgress::new(0, 0, vec![]).percent(), 0);
    }

    #[test]
    fn completed_is_clamped_to_total() {
        let progress = MilestoneProgress::new(3, 7, vec![]);
        assert_eq!(progress.completed, 3);
        assert_eq!(progress.percent(), 100);
        assert_eq!(progress.remaining(), 0);
    }

    #[test]
    fn unclamped_records_stay_panic_free() {
        // built via pub fields, bypassing the clamp in `new`
        let progress = MilestoneProgress {
            total: 3,
            completed: 7,
            labels: vec![],
        };

        assert_eq!(progress.remaining(), 0);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn checkpoints_flag_completed_and_next() {
        let progress = MilestoneProgress::new(3, 1, vec!["Payment Completed".to_string()]);
        let checkpoints: Vec<_> = progress.checkpoints().collect();

        assert_eq!(checkpoints.len(), 3);
        assert!(checkpoints[0].completed);
        assert!(!checkpoints[0].next);
        assert!(checkpoints[1].next);
        assert_eq!(checkpoints[0].label, "Payment Completed");
        // missing labels fall back to a numbered default
        assert_eq!(checkpoints[2].label, "Milestone 3");
    }
}
