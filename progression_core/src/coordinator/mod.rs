//! The progression coordinator - orchestrates the wallet, collection, and
//! quest map.
//!
//! The coordinator owns the three stateful components and holds no other
//! state of its own beyond the current quiz session. Every command either
//! completes fully or leaves all three components untouched.
//!
//! ## Quiz state machine
//!
//! One logical attempt per session: `InProgress -> Scored -> Applied`.
//! Submitting scores the attempt and, on a pass, applies rewards and quest
//! completion in the same call (`Applied`). A failed attempt stays `Scored`
//! with nothing applied; the retry path discards it and returns to a fresh
//! `InProgress` without touching the wallet or the map.

use tracing::{info, warn};

use quest_rules::{
    ContentPack, CompanionId, CreditReason, PassThreshold, Question, QuestionId, QuestId, Reward,
};

use crate::assessment::{QuizAttempt, ScoreReport};
use crate::collection::{Collection, EvolutionOutcome};
use crate::error::{ProgressionError, Result};
use crate::quest_map::{Quest, QuestMap};
use crate::snapshot::{ProgressionSnapshot, SnapshotSink};
use crate::wallet::{CurrencyKind, Wallet};

/// Where the current quiz attempt sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    /// Accepting answers.
    InProgress,
    /// Submitted and scored; nothing applied (the verdict was a fail).
    Scored,
    /// Scored and applied: rewards credited, quest completion recorded.
    Applied,
}

enum SessionState {
    InProgress(QuizAttempt),
    Scored(ScoreReport),
    Applied(ScoreReport),
}

struct QuizSession {
    quest_id: QuestId,
    /// Kept so a retry can rebuild a fresh attempt over the same questions.
    questions: Vec<Question>,
    state: SessionState,
}

/// Everything a submit changed, so the caller can render the result screen
/// without re-querying state.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutcome {
    pub report: ScoreReport,
    pub berries_awarded: u64,
    pub xp_awarded: u64,
    /// Opaque item grants from the quest's reward list.
    pub items_granted: Vec<String>,
    /// Quests newly opened by this completion.
    pub quests_unlocked: Vec<QuestId>,
}

/// The orchestration layer over [`Wallet`], [`Collection`], and [`QuestMap`].
pub struct ProgressionCoordinator {
    wallet: Wallet,
    collection: Collection,
    quest_map: QuestMap,
    session: Option<QuizSession>,
    threshold: PassThreshold,
    sink: Option<Box<dyn SnapshotSink>>,
}

impl ProgressionCoordinator {
    /// Create a coordinator over existing components.
    pub fn new(wallet: Wallet, collection: Collection, quest_map: QuestMap) -> Self {
        Self {
            wallet,
            collection,
            quest_map,
            session: None,
            threshold: PassThreshold::default(),
            sink: None,
        }
    }

    /// Seed a fresh session from a content pack: first companion unlocked,
    /// quest chain as authored, empty wallet.
    pub fn from_content(pack: &ContentPack) -> Result<Self> {
        let collection = Collection::seed(pack.companions.clone());
        let (quest_map, _) = QuestMap::from_content(&pack.quests)?;
        Ok(Self::new(Wallet::default(), collection, quest_map))
    }

    /// Rehydrate a session from a persisted snapshot.
    pub fn restore(snapshot: ProgressionSnapshot) -> Result<Self> {
        let collection = Collection::restore(snapshot.companions)?;
        let quest_map = QuestMap::restore(snapshot.quests)?;
        Ok(Self::new(snapshot.wallet, collection, quest_map))
    }

    /// Override the pass threshold.
    pub fn with_threshold(mut self, threshold: PassThreshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Attach a persistence collaborator. It receives a snapshot after every
    /// successful mutation, fire-and-forget.
    pub fn with_sink(mut self, sink: Box<dyn SnapshotSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Current wallet balances.
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// The companion roster.
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// The quest map.
    pub fn quest_map(&self) -> &QuestMap {
        &self.quest_map
    }

    /// Look up a quest by its content-pack slug.
    pub fn quest_by_slug(&self, slug: &str) -> Option<&Quest> {
        self.quest_map.iter().find(|q| q.slug == slug)
    }

    /// Where the current attempt sits, if one exists.
    pub fn attempt_phase(&self) -> Option<AttemptPhase> {
        self.session.as_ref().map(|s| match s.state {
            SessionState::InProgress(_) => AttemptPhase::InProgress,
            SessionState::Scored(_) => AttemptPhase::Scored,
            SessionState::Applied(_) => AttemptPhase::Applied,
        })
    }

    /// Answered/total counts for the current attempt.
    pub fn attempt_progress(&self) -> Option<(usize, usize)> {
        self.session.as_ref().map(|s| match &s.state {
            SessionState::InProgress(attempt) => attempt.progress(),
            SessionState::Scored(report) | SessionState::Applied(report) => {
                (report.total, report.total)
            }
        })
    }

    /// Begin a quiz attempt against an unlocked quest.
    ///
    /// Replaces any previous attempt; an abandoned attempt never touched the
    /// wallet or the map, so dropping it is safe.
    pub fn start_attempt(&mut self, quest_id: QuestId, questions: Vec<Question>) -> Result<()> {
        let quest = self
            .quest_map
            .get(quest_id)
            .ok_or_else(|| ProgressionError::NotFound(format!("quest {quest_id}")))?;
        if !quest.unlocked() {
            return Err(ProgressionError::Locked(format!("quest {quest_id}")));
        }

        self.session = Some(QuizSession {
            quest_id,
            questions: questions.clone(),
            state: SessionState::InProgress(QuizAttempt::new(questions)),
        });
        Ok(())
    }

    /// Drop the current attempt without scoring it. Never mutates the wallet
    /// or the map.
    pub fn abandon_attempt(&mut self) {
        self.session = None;
    }

    /// Record an answer on the in-progress attempt.
    pub fn record_answer(&mut self, question_id: QuestionId, selected: usize) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| ProgressionError::NotFound("no active assessment".to_string()))?;
        match &mut session.state {
            SessionState::InProgress(attempt) => attempt.record_answer(question_id, selected),
            _ => Err(ProgressionError::Locked(
                "assessment already submitted".to_string(),
            )),
        }
    }

    /// Score the attempt and, on a pass, apply rewards and quest completion.
    ///
    /// `Incomplete` leaves the attempt in progress. Submission is
    /// irreversible: once scored, the attempt accepts no further answers and
    /// can only be retried fresh. Rewards are credited once per quest: a
    /// repeat pass applies nothing.
    pub fn submit_assessment(&mut self) -> Result<AssessmentOutcome> {
        let threshold = self.threshold;
        let (report, quest_id) = {
            let session = self
                .session
                .as_mut()
                .ok_or_else(|| ProgressionError::NotFound("no active assessment".to_string()))?;
            let report = match &session.state {
                SessionState::InProgress(attempt) => attempt.score(threshold)?,
                _ => {
                    return Err(ProgressionError::Locked(
                        "assessment already submitted".to_string(),
                    ))
                }
            };
            session.state = SessionState::Scored(report.clone());
            (report, session.quest_id)
        };

        let mut outcome = AssessmentOutcome {
            report: report.clone(),
            berries_awarded: 0,
            xp_awarded: 0,
            items_granted: Vec::new(),
            quests_unlocked: Vec::new(),
        };

        if report.passed {
            let first_completion = !self.quest_map.is_completed(quest_id);
            // Record completion first: it is the only fallible step, and the
            // wallet must not be credited if it refuses.
            outcome.quests_unlocked = self.quest_map.complete(quest_id)?;
            if first_completion {
                let rewards = self
                    .quest_map
                    .get(quest_id)
                    .map(|q| q.rewards.clone())
                    .unwrap_or_default();
                for reward in rewards {
                    match reward {
                        Reward::Berries { amount } => {
                            self.wallet.credit(
                                CurrencyKind::Berries,
                                amount,
                                CreditReason::QuestReward,
                            );
                            outcome.berries_awarded += amount;
                        }
                        Reward::Xp { amount } => {
                            self.wallet
                                .credit(CurrencyKind::Xp, amount, CreditReason::QuestReward);
                            outcome.xp_awarded += amount;
                        }
                        Reward::Item { item_id } => outcome.items_granted.push(item_id),
                    }
                }
            }

            if let Some(session) = self.session.as_mut() {
                session.state = SessionState::Applied(report.clone());
            }

            info!(
                quest = %quest_id,
                correct = report.correct_count,
                total = report.total,
                unlocked = outcome.quests_unlocked.len(),
                "assessment passed and applied"
            );
            self.notify_sink();
        } else {
            info!(
                quest = %quest_id,
                correct = report.correct_count,
                total = report.total,
                "assessment failed; retry available"
            );
        }

        Ok(outcome)
    }

    /// Discard the scored attempt and start over on the same quest and
    /// questions. Touches neither the wallet nor the map.
    pub fn retry_assessment(&mut self) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| ProgressionError::NotFound("no active assessment".to_string()))?;
        session.state = SessionState::InProgress(QuizAttempt::new(session.questions.clone()));
        Ok(())
    }

    /// Evolve a companion, paying from the session wallet.
    ///
    /// Failures surface untouched from the collection; there is no partial
    /// application.
    pub fn evolve(&mut self, companion_id: CompanionId) -> Result<EvolutionOutcome> {
        let outcome = self.collection.evolve(companion_id, &mut self.wallet)?;
        self.notify_sink();
        Ok(outcome)
    }

    /// Rename a companion (or clear the override with a blank name).
    pub fn rename_companion(&mut self, companion_id: CompanionId, name: &str) -> Result<()> {
        self.collection.rename(companion_id, name)?;
        self.notify_sink();
        Ok(())
    }

    /// Append an externally-sourced quest to the map.
    pub fn add_quest(&mut self, quest: Quest, prerequisites: &[QuestId]) -> Result<QuestId> {
        let id = self.quest_map.add_quest(quest, prerequisites)?;
        self.notify_sink();
        Ok(id)
    }

    /// Unlock a quest directly (externally-granted unlock).
    pub fn unlock_quest(&mut self, quest_id: QuestId) -> Result<bool> {
        let changed = self.quest_map.unlock(quest_id)?;
        if changed {
            self.notify_sink();
        }
        Ok(changed)
    }

    /// Credit a balance from outside the quiz/evolution flows (seeding,
    /// admin grants).
    pub fn grant(&mut self, kind: CurrencyKind, amount: u64, reason: CreditReason) {
        self.wallet.credit(kind, amount, reason);
        self.notify_sink();
    }

    /// Serialize the session for the persistence collaborator.
    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            wallet: self.wallet.clone(),
            companions: self.collection.to_snapshots(),
            quests: self.quest_map.to_snapshots(),
        }
    }

    fn notify_sink(&mut self) {
        let snapshot = ProgressionSnapshot {
            wallet: self.wallet.clone(),
            companions: self.collection.to_snapshots(),
            quests: self.quest_map.to_snapshots(),
        };
        if let Some(sink) = self.sink.as_mut() {
            if let Err(err) = sink.persist(&snapshot) {
                warn!(%err, "snapshot sink failed; in-memory state unaffected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use quest_rules::{CompanionTemplate, DifficultyTier, QuestDef};

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn four_questions() -> Vec<Question> {
        vec![
            Question::new("1 + 1 = ?", options(&["1", "2"]), 1),
            Question::new("2 + 2 = ?", options(&["4", "5"]), 0),
            Question::new("3 + 3 = ?", options(&["5", "6"]), 1),
            Question::new("4 + 4 = ?", options(&["8", "9"]), 0),
        ]
    }

    fn pack() -> ContentPack {
        ContentPack {
            companions: vec![
                CompanionTemplate::new("Embercub", "Flareling", "Pyroclaw"),
                CompanionTemplate::new("Aquafin", "Tidecaller", "Maelstrom"),
            ],
            quests: vec![
                QuestDef::new("meadow-trail", "The Meadow Trail", DifficultyTier::Starter)
                    .with_reward(Reward::Berries { amount: 1_500 })
                    .with_reward(Reward::Xp { amount: 100 })
                    .unlocked_from_start(),
                QuestDef::new("fern-hollow", "Fern Hollow", DifficultyTier::Easy)
                    .with_prerequisite("meadow-trail"),
            ],
        }
    }

    fn coordinator() -> ProgressionCoordinator {
        ProgressionCoordinator::from_content(&pack()).unwrap()
    }

    fn answer_n_correct(coordinator: &mut ProgressionCoordinator, questions: &[Question], n: usize) {
        for (i, question) in questions.iter().enumerate() {
            let selected = if i < n {
                question.correct_option
            } else {
                (question.correct_option + 1) % question.option_count()
            };
            coordinator.record_answer(question.id, selected).unwrap();
        }
    }

    #[test]
    fn test_evolution_with_sufficient_funds() {
        let mut coordinator = coordinator();
        coordinator.grant(CurrencyKind::Berries, 30_000, CreditReason::ContentSeed);
        let first = coordinator.collection().iter().next().unwrap().id;

        let outcome = coordinator.evolve(first).unwrap();

        assert_eq!(outcome.berries_spent, 25_000);
        assert_eq!(coordinator.wallet().berries(), 5_000);
        assert_eq!(coordinator.wallet().xp(), 500);
        // Successor unlocks only at the final stage.
        assert!(!coordinator.collection().iter().nth(1).unwrap().unlocked());
    }

    #[test]
    fn test_evolution_shortfall_is_a_no_op() {
        let mut coordinator = coordinator();
        coordinator.grant(CurrencyKind::Berries, 30_000, CreditReason::ContentSeed);
        let first = coordinator.collection().iter().next().unwrap().id;
        coordinator.evolve(first).unwrap();

        let before = coordinator.snapshot();
        let err = coordinator.evolve(first).unwrap_err();

        assert_eq!(
            err,
            ProgressionError::InsufficientFunds {
                needed: 50_000,
                available: 5_000,
            }
        );
        assert_eq!(coordinator.snapshot(), before);
    }

    #[test]
    fn test_passing_submit_applies_rewards_and_unlocks() {
        let mut coordinator = coordinator();
        let quest_id = coordinator.quest_by_slug("meadow-trail").unwrap().id;
        let gated_id = coordinator.quest_by_slug("fern-hollow").unwrap().id;
        let questions = four_questions();

        coordinator.start_attempt(quest_id, questions.clone()).unwrap();
        answer_n_correct(&mut coordinator, &questions, 3);
        let outcome = coordinator.submit_assessment().unwrap();

        assert!(outcome.report.passed); // 0.75 >= 0.70
        assert_eq!(outcome.berries_awarded, 1_500);
        assert_eq!(outcome.xp_awarded, 100);
        assert_eq!(outcome.quests_unlocked, vec![gated_id]);
        assert!(coordinator.quest_map().is_unlocked(gated_id));
        assert_eq!(coordinator.wallet().berries(), 1_500);
        assert_eq!(coordinator.attempt_phase(), Some(AttemptPhase::Applied));
    }

    #[test]
    fn test_failing_submit_touches_nothing() {
        let mut coordinator = coordinator();
        let quest_id = coordinator.quest_by_slug("meadow-trail").unwrap().id;
        let gated_id = coordinator.quest_by_slug("fern-hollow").unwrap().id;
        let questions = four_questions();

        coordinator.start_attempt(quest_id, questions.clone()).unwrap();
        answer_n_correct(&mut coordinator, &questions, 2);
        let outcome = coordinator.submit_assessment().unwrap();

        assert!(!outcome.report.passed); // 0.50 < 0.70
        assert_eq!(outcome.berries_awarded, 0);
        assert!(!coordinator.quest_map().is_unlocked(gated_id));
        assert!(!coordinator.quest_map().is_completed(quest_id));
        assert_eq!(coordinator.wallet().berries(), 0);
        assert_eq!(coordinator.attempt_phase(), Some(AttemptPhase::Scored));
    }

    #[test]
    fn test_failed_retry_does_not_relock() {
        let mut coordinator = coordinator();
        let quest_id = coordinator.quest_by_slug("meadow-trail").unwrap().id;
        let gated_id = coordinator.quest_by_slug("fern-hollow").unwrap().id;
        let questions = four_questions();

        coordinator.start_attempt(quest_id, questions.clone()).unwrap();
        answer_n_correct(&mut coordinator, &questions, 4);
        coordinator.submit_assessment().unwrap();
        assert!(coordinator.quest_map().is_unlocked(gated_id));

        // A fresh failing attempt must not claw anything back.
        coordinator.retry_assessment().unwrap();
        answer_n_correct(&mut coordinator, &questions, 1);
        let outcome = coordinator.submit_assessment().unwrap();

        assert!(!outcome.report.passed);
        assert!(coordinator.quest_map().is_unlocked(gated_id));
        assert!(coordinator.quest_map().is_completed(quest_id));
    }

    #[test]
    fn test_rewards_credited_once_per_quest() {
        let mut coordinator = coordinator();
        let quest_id = coordinator.quest_by_slug("meadow-trail").unwrap().id;
        let questions = four_questions();

        coordinator.start_attempt(quest_id, questions.clone()).unwrap();
        answer_n_correct(&mut coordinator, &questions, 4);
        let first = coordinator.submit_assessment().unwrap();
        assert_eq!(first.berries_awarded, 1_500);

        coordinator.retry_assessment().unwrap();
        answer_n_correct(&mut coordinator, &questions, 4);
        let second = coordinator.submit_assessment().unwrap();

        assert!(second.report.passed);
        assert_eq!(second.berries_awarded, 0);
        assert_eq!(coordinator.wallet().berries(), 1_500);
    }

    #[test]
    fn test_incomplete_submit_stays_in_progress() {
        let mut coordinator = coordinator();
        let quest_id = coordinator.quest_by_slug("meadow-trail").unwrap().id;
        let questions = four_questions();

        coordinator.start_attempt(quest_id, questions.clone()).unwrap();
        coordinator.record_answer(questions[0].id, 0).unwrap();

        let err = coordinator.submit_assessment().unwrap_err();
        assert_eq!(err, ProgressionError::Incomplete { answered: 1, total: 4 });
        assert_eq!(coordinator.attempt_phase(), Some(AttemptPhase::InProgress));
        // Still accepting answers.
        coordinator.record_answer(questions[1].id, 0).unwrap();
    }

    #[test]
    fn test_submitted_attempt_accepts_no_edits() {
        let mut coordinator = coordinator();
        let quest_id = coordinator.quest_by_slug("meadow-trail").unwrap().id;
        let questions = four_questions();

        coordinator.start_attempt(quest_id, questions.clone()).unwrap();
        answer_n_correct(&mut coordinator, &questions, 4);
        coordinator.submit_assessment().unwrap();

        let err = coordinator.record_answer(questions[0].id, 0).unwrap_err();
        assert!(matches!(err, ProgressionError::Locked(_)));

        let err = coordinator.submit_assessment().unwrap_err();
        assert!(matches!(err, ProgressionError::Locked(_)));
    }

    #[test]
    fn test_abandoned_attempt_mutates_nothing() {
        let mut coordinator = coordinator();
        let quest_id = coordinator.quest_by_slug("meadow-trail").unwrap().id;
        let questions = four_questions();
        let before = coordinator.snapshot();

        coordinator.start_attempt(quest_id, questions.clone()).unwrap();
        answer_n_correct(&mut coordinator, &questions, 4);
        coordinator.abandon_attempt();

        assert_eq!(coordinator.snapshot(), before);
        assert_eq!(coordinator.attempt_phase(), None);
    }

    #[test]
    fn test_start_attempt_on_locked_quest_rejected() {
        let mut coordinator = coordinator();
        let gated_id = coordinator.quest_by_slug("fern-hollow").unwrap().id;

        let err = coordinator.start_attempt(gated_id, four_questions()).unwrap_err();
        assert!(matches!(err, ProgressionError::Locked(_)));
        assert_eq!(coordinator.attempt_phase(), None);
    }

    #[test]
    fn test_admin_unlock_is_idempotent() {
        let mut coordinator = coordinator();
        let gated_id = coordinator.quest_by_slug("fern-hollow").unwrap().id;

        assert!(coordinator.unlock_quest(gated_id).unwrap());
        assert!(!coordinator.unlock_quest(gated_id).unwrap());
        assert!(coordinator.quest_map().is_unlocked(gated_id));
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut coordinator = coordinator();
        coordinator.grant(CurrencyKind::Berries, 30_000, CreditReason::ContentSeed);
        let first = coordinator.collection().iter().next().unwrap().id;
        coordinator.evolve(first).unwrap();

        let snapshot = coordinator.snapshot();
        let json = snapshot.to_json().unwrap();
        let restored =
            ProgressionCoordinator::restore(ProgressionSnapshot::from_json(&json).unwrap())
                .unwrap();

        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.wallet().berries(), 5_000);
    }

    struct RecordingSink {
        snapshots: Rc<RefCell<Vec<ProgressionSnapshot>>>,
    }

    impl SnapshotSink for RecordingSink {
        fn persist(&mut self, snapshot: &ProgressionSnapshot) -> std::io::Result<()> {
            self.snapshots.borrow_mut().push(snapshot.clone());
            Ok(())
        }
    }

    #[test]
    fn test_sink_receives_snapshot_after_mutation() {
        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = coordinator().with_sink(Box::new(RecordingSink {
            snapshots: Rc::clone(&snapshots),
        }));

        coordinator.grant(CurrencyKind::Berries, 30_000, CreditReason::ContentSeed);
        let first = coordinator.collection().iter().next().unwrap().id;
        coordinator.evolve(first).unwrap();

        let recorded = snapshots.borrow();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1].wallet.berries(), 5_000);
    }

    struct FailingSink;

    impl SnapshotSink for FailingSink {
        fn persist(&mut self, _snapshot: &ProgressionSnapshot) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_sink_failure_never_rolls_back_state() {
        let mut coordinator = coordinator().with_sink(Box::new(FailingSink));

        coordinator.grant(CurrencyKind::Berries, 30_000, CreditReason::ContentSeed);
        let first = coordinator.collection().iter().next().unwrap().id;
        let outcome = coordinator.evolve(first);

        assert!(outcome.is_ok());
        assert_eq!(coordinator.wallet().berries(), 5_000);
    }
}
