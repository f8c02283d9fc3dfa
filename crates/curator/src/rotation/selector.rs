//! Rotation selector
//!
//! One algorithm, two operating modes: exclusion mode consults the ledger
//! for a lookback window and commits the pick; uniform mode (zero lookback)
//! is an ephemeral pick that leaves no trace and cannot influence future
//! exclusion decisions.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::persistence::entities::LedgerEntry;
use crate::persistence::repositories::{LedgerRepository, PeriodAppend};

use super::{Candidate, IndexSampler, RotationPeriod, Selection, SelectionError};

/// Picks candidates for a scope and records committed picks in the ledger
pub struct RotationSelector<S: IndexSampler> {
    ledger: LedgerRepository,
    sampler: S,
}

impl<S: IndexSampler> RotationSelector<S> {
    pub fn new(ledger: LedgerRepository, sampler: S) -> Self {
        Self { ledger, sampler }
    }

    /// Ephemeral uniform pick with no exclusion and no ledger write
    pub fn select_uniform(&mut self, pool: &[Candidate]) -> Result<Candidate, SelectionError> {
        if pool.is_empty() {
            return Err(SelectionError::EmptyPool);
        }
        Ok(pool[self.sampler.pick(pool.len())].clone())
    }

    /// Pick a candidate avoiding items selected within the lookback window
    ///
    /// The pick is recorded in the ledger so subsequent calls see it in
    /// their exclusion sets. A zero lookback degrades to an ephemeral
    /// uniform pick with no ledger write.
    pub async fn select_with_exclusion(
        &mut self,
        pool: &[Candidate],
        scope_key: &str,
        destination_ref: &str,
        lookback: Duration,
    ) -> Result<Selection, SelectionError> {
        if pool.is_empty() {
            return Err(SelectionError::EmptyPool);
        }

        if lookback.is_zero() {
            let candidate = self.select_uniform(pool)?;
            return Ok(Selection {
                item_ref: candidate.item_ref,
                entry: None,
                is_new: true,
            });
        }

        let chosen = self.pick_excluding(pool, scope_key, lookback).await?;
        let entry = LedgerEntry::windowed(scope_key, &chosen, destination_ref);
        self.ledger.append(&entry).await?;

        info!(
            scope_key = %scope_key,
            item_ref = %chosen,
            "Rotation pick committed"
        );
        Ok(Selection {
            item_ref: chosen,
            entry: Some(entry),
            is_new: true,
        })
    }

    /// Period-bound selection with the duplicate-period guard
    ///
    /// When an entry already exists for the current period the existing pick
    /// is returned with `is_new = false` and no new entry is created. The
    /// commit itself is a conditional insert on (scope, period), so two
    /// concurrent triggers cannot both win: the loser receives the winner's
    /// entry.
    pub async fn select_for_period(
        &mut self,
        pool: &[Candidate],
        scope_key: &str,
        destination_ref: &str,
        lookback: Duration,
        period: &RotationPeriod,
    ) -> Result<Selection, SelectionError> {
        if let Some(existing) = self.ledger.current_selection(scope_key, period.start).await? {
            debug!(
                scope_key = %scope_key,
                period_tag = %period.tag,
                item_ref = %existing.item_ref,
                "Period already has a selection"
            );
            return Ok(Selection {
                item_ref: existing.item_ref.clone(),
                entry: Some(existing),
                is_new: false,
            });
        }

        if pool.is_empty() {
            return Err(SelectionError::EmptyPool);
        }

        let chosen = self.pick_excluding(pool, scope_key, lookback).await?;
        let entry = LedgerEntry::for_period(scope_key, &chosen, destination_ref, &period.tag);

        match self.ledger.append_for_period(&entry).await? {
            PeriodAppend::Inserted => {
                info!(
                    scope_key = %scope_key,
                    period_tag = %period.tag,
                    item_ref = %chosen,
                    "Period selection committed"
                );
                Ok(Selection {
                    item_ref: chosen,
                    entry: Some(entry),
                    is_new: true,
                })
            }
            PeriodAppend::Existing(winner) => Ok(Selection {
                item_ref: winner.item_ref.clone(),
                entry: Some(winner),
                is_new: false,
            }),
        }
    }

    /// Stable "current selection" query for a scope and period start
    pub async fn current_period_selection(
        &self,
        scope_key: &str,
        period_start: chrono::DateTime<Utc>,
    ) -> Result<Option<LedgerEntry>, SelectionError> {
        Ok(self.ledger.current_selection(scope_key, period_start).await?)
    }

    /// Sample from the pool minus recently-selected items
    ///
    /// Falls back to the full pool when exclusion empties it, so a pick
    /// always exists for a non-empty pool.
    async fn pick_excluding(
        &mut self,
        pool: &[Candidate],
        scope_key: &str,
        lookback: Duration,
    ) -> Result<String, SelectionError> {
        let cutoff = Utc::now() - lookback;
        let excluded: HashSet<String> = self
            .ledger
            .recent_selections(scope_key, cutoff)
            .await?
            .into_iter()
            .collect();

        let eligible: Vec<&Candidate> = pool
            .iter()
            .filter(|c| !excluded.contains(&c.item_ref))
            .collect();

        let chosen = if eligible.is_empty() {
            debug!(
                scope_key = %scope_key,
                pool_size = pool.len(),
                "Exclusion exhausted the pool, falling back to full pool"
            );
            &pool[self.sampler.pick(pool.len())]
        } else {
            eligible[self.sampler.pick(eligible.len())]
        };

        Ok(chosen.item_ref.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::test_support::{concurrent_test_pool, test_pool};
    use crate::rotation::SeededSampler;
    use chrono::DateTime;
    use std::collections::HashMap;

    fn pool_of(refs: &[&str]) -> Vec<Candidate> {
        refs.iter()
            .map(|r| Candidate {
                item_ref: r.to_string(),
                owner_ref: "user-1".to_string(),
                created_at: Utc::now(),
            })
            .collect()
    }

    async fn seed_history(ledger: &LedgerRepository, scope: &str, items: &[&str]) {
        for item in items {
            ledger
                .append(&LedgerEntry::windowed(scope, *item, "channel-1"))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_uniform_empty_pool_is_an_error() {
        let pool = test_pool().await;
        let mut selector =
            RotationSelector::new(LedgerRepository::new(pool), SeededSampler::new(1));
        assert!(matches!(
            selector.select_uniform(&[]),
            Err(SelectionError::EmptyPool)
        ));
    }

    #[tokio::test]
    async fn test_uniform_single_item_pool_always_picks_it() {
        let pool = test_pool().await;
        let mut selector =
            RotationSelector::new(LedgerRepository::new(pool), SeededSampler::new(1));
        let candidates = pool_of(&["only"]);
        for _ in 0..20 {
            assert_eq!(selector.select_uniform(&candidates).unwrap().item_ref, "only");
        }
    }

    #[tokio::test]
    async fn test_exclusion_avoids_recent_selections() {
        let pool = test_pool().await;
        let ledger = LedgerRepository::new(pool);
        let candidates = pool_of(&["A", "B", "C", "D", "E"]);

        let mut counts: HashMap<String, u32> = HashMap::new();
        for trial in 0..300 {
            // Fresh scope per trial keeps the trial's own pick from
            // polluting the next trial's exclusion set.
            let scope = format!("guild-{trial}");
            seed_history(&ledger, &scope, &["B", "D"]).await;

            let mut selector =
                RotationSelector::new(ledger.clone(), SeededSampler::new(trial as u64));
            let selection = selector
                .select_with_exclusion(&candidates, &scope, "channel-1", Duration::days(7))
                .await
                .unwrap();

            assert!(
                ["A", "C", "E"].contains(&selection.item_ref.as_str()),
                "picked excluded item {}",
                selection.item_ref
            );
            *counts.entry(selection.item_ref).or_default() += 1;
        }

        // Roughly uniform across the three eligible items
        for item in ["A", "C", "E"] {
            let count = counts.get(item).copied().unwrap_or(0);
            assert!(count >= 60, "item {item} picked only {count}/300 times");
        }
    }

    #[tokio::test]
    async fn test_exhaustion_falls_back_to_full_pool() {
        let pool = test_pool().await;
        let ledger = LedgerRepository::new(pool);
        let candidates = pool_of(&["A", "B", "C", "D", "E"]);

        seed_history(&ledger, "guild-1", &["A", "B", "C", "D", "E"]).await;

        let mut selector = RotationSelector::new(ledger, SeededSampler::new(3));
        let selection = selector
            .select_with_exclusion(&candidates, "guild-1", "channel-1", Duration::days(7))
            .await
            .unwrap();

        assert!(["A", "B", "C", "D", "E"].contains(&selection.item_ref.as_str()));
        assert!(selection.is_new);
    }

    #[tokio::test]
    async fn test_second_call_excludes_first_pick() {
        let pool = test_pool().await;
        let ledger = LedgerRepository::new(pool);
        let candidates = pool_of(&["A", "B"]);

        let mut selector = RotationSelector::new(ledger, SeededSampler::new(5));
        let first = selector
            .select_with_exclusion(&candidates, "guild-1", "channel-1", Duration::days(7))
            .await
            .unwrap();
        let second = selector
            .select_with_exclusion(&candidates, "guild-1", "channel-1", Duration::days(7))
            .await
            .unwrap();

        assert_ne!(
            first.item_ref, second.item_ref,
            "first pick must be visible to the second call's exclusion set"
        );
    }

    #[tokio::test]
    async fn test_zero_lookback_writes_nothing() {
        let pool = test_pool().await;
        let ledger = LedgerRepository::new(pool);
        let candidates = pool_of(&["A", "B", "C"]);

        let mut selector = RotationSelector::new(ledger.clone(), SeededSampler::new(9));
        let selection = selector
            .select_with_exclusion(&candidates, "guild-1", "channel-1", Duration::zero())
            .await
            .unwrap();

        assert!(selection.entry.is_none());
        let recent = ledger
            .recent_selections("guild-1", Utc::now() - Duration::days(1))
            .await
            .unwrap();
        assert!(recent.is_empty(), "uniform mode must not touch the ledger");
    }

    #[tokio::test]
    async fn test_period_guard_returns_existing_pick() {
        let pool = test_pool().await;
        let ledger = LedgerRepository::new(pool);
        let candidates = pool_of(&["A", "B", "C"]);
        let period = RotationPeriod::new(Utc::now() - Duration::hours(1), "2026-W36");

        let mut selector = RotationSelector::new(ledger, SeededSampler::new(11));
        let first = selector
            .select_for_period(&candidates, "guild-1", "channel-1", Duration::days(30), &period)
            .await
            .unwrap();
        assert!(first.is_new);

        let second = selector
            .select_for_period(&candidates, "guild-1", "channel-1", Duration::days(30), &period)
            .await
            .unwrap();
        assert!(!second.is_new);
        assert_eq!(second.item_ref, first.item_ref);
        assert_eq!(
            second.entry.as_ref().map(|e| e.id),
            first.entry.as_ref().map(|e| e.id)
        );
    }

    #[tokio::test]
    async fn test_period_guard_checks_before_empty_pool() {
        let pool = test_pool().await;
        let ledger = LedgerRepository::new(pool);
        let candidates = pool_of(&["A"]);
        let period = RotationPeriod::new(Utc::now() - Duration::hours(1), "2026-W36");

        let mut selector = RotationSelector::new(ledger, SeededSampler::new(13));
        selector
            .select_for_period(&candidates, "guild-1", "channel-1", Duration::days(30), &period)
            .await
            .unwrap();

        // Existing pick is returned even when the supplied pool is empty
        let repeat = selector
            .select_for_period(&[], "guild-1", "channel-1", Duration::days(30), &period)
            .await
            .unwrap();
        assert!(!repeat.is_new);
        assert_eq!(repeat.item_ref, "A");

        // A genuinely fresh period with an empty pool still fails
        let next_period = RotationPeriod::new(Utc::now() + Duration::days(7), "2026-W37");
        let result = selector
            .select_for_period(&[], "guild-1", "channel-1", Duration::days(30), &next_period)
            .await;
        assert!(matches!(result, Err(SelectionError::EmptyPool)));
    }

    #[tokio::test]
    async fn test_new_period_allows_new_selection() {
        let pool = test_pool().await;
        let ledger = LedgerRepository::new(pool);
        let candidates = pool_of(&["A", "B"]);

        let week_start = DateTime::parse_from_rfc3339("2026-08-24T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let this_week = RotationPeriod::new(week_start, "2026-W35");

        let mut selector = RotationSelector::new(ledger, SeededSampler::new(17));
        let first = selector
            .select_for_period(&candidates, "guild-1", "channel-1", Duration::zero(), &this_week)
            .await
            .unwrap();
        assert!(first.is_new);

        // Period boundary advances past the first entry
        let next_start = Utc::now() + Duration::seconds(1);
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        let next_week = RotationPeriod::new(next_start, "2026-W36");
        let second = selector
            .select_for_period(&candidates, "guild-1", "channel-1", Duration::zero(), &next_week)
            .await
            .unwrap();
        assert!(second.is_new, "new period must allow a fresh selection");
    }

    #[tokio::test]
    async fn test_current_period_selection_is_stable() {
        let pool = test_pool().await;
        let ledger = LedgerRepository::new(pool);
        let candidates = pool_of(&["A", "B", "C"]);
        let period = RotationPeriod::new(Utc::now() - Duration::hours(1), "2026-W36");

        let mut selector = RotationSelector::new(ledger, SeededSampler::new(19));

        assert!(selector
            .current_period_selection("guild-1", period.start)
            .await
            .unwrap()
            .is_none());

        let selection = selector
            .select_for_period(&candidates, "guild-1", "channel-1", Duration::days(30), &period)
            .await
            .unwrap();

        let a = selector
            .current_period_selection("guild-1", period.start)
            .await
            .unwrap()
            .expect("Should have a current selection");
        let b = selector
            .current_period_selection("guild-1", period.start)
            .await
            .unwrap()
            .expect("Should have a current selection");
        assert_eq!(a.id, b.id);
        assert_eq!(a.item_ref, selection.item_ref);
    }

    #[tokio::test]
    async fn test_concurrent_period_selection_commits_once() {
        let (pool, _db) = concurrent_test_pool().await;
        let ledger = LedgerRepository::new(pool);
        let candidates = pool_of(&["A", "B", "C", "D", "E"]);
        let period = RotationPeriod::new(Utc::now() - Duration::hours(1), "2026-W36");

        let tasks: Vec<_> = (0..5)
            .map(|seed| {
                let ledger = ledger.clone();
                let candidates = candidates.clone();
                let period = period.clone();
                tokio::spawn(async move {
                    let mut selector =
                        RotationSelector::new(ledger, SeededSampler::new(seed as u64));
                    selector
                        .select_for_period(
                            &candidates,
                            "guild-1",
                            "channel-1",
                            Duration::days(30),
                            &period,
                        )
                        .await
                })
            })
            .collect();

        let mut selections = Vec::new();
        for task in tasks {
            selections.push(
                task.await
                    .expect("Task should complete")
                    .expect("Selection should succeed"),
            );
        }

        let new_count = selections.iter().filter(|s| s.is_new).count();
        assert_eq!(new_count, 1, "exactly one trigger may win the period slot");

        let winner = &selections.iter().find(|s| s.is_new).unwrap().item_ref;
        for selection in &selections {
            assert_eq!(&selection.item_ref, winner);
        }
    }
}
