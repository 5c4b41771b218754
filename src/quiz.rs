//! Quiz state machine.
//!
//! A round walks a shuffled queue of neighborhood names. Each target
//! is judged on a confirmation click: the first click on a region arms
//! it, a second consecutive click on the same region judges it.
//! Clicking a different region re-arms instead of judging.
//!
//! All paint decisions derive from the round state through
//! [`Quiz::paint`]; nothing else stores colours.

use std::collections::{HashSet, VecDeque};

use crate::prng::Pcg32;
use crate::shuffle::shuffled;
use crate::types::RoundSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No target: never started, finished, or ended.
    Idle,
    AwaitingGuess,
    AwaitingConfirm,
}

/// Quiz-derived paint for one neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Default,
    Selected,
    Missed,
    Correct,
}

/// What follows a start or a judged guess.
#[derive(Debug, Clone, PartialEq)]
pub enum Next {
    Target(String),
    Complete(RoundSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizEvent {
    /// The call did not change any state.
    Ignored,
    Started(Next),
    Armed {
        name: String,
    },
    Judged {
        target: String,
        guessed: String,
        correct: bool,
        next: Next,
    },
    Skipped {
        deferred: String,
        target: String,
    },
    Ended {
        unresolved: usize,
    },
}

/// Percentage of `total` not missed, rounded to two decimals. An empty
/// round scores 100.
pub fn score(missed: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let raw = (1.0 - missed as f64 / total as f64) * 100.0;
    (raw * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
struct Round {
    total: usize,
    remaining: VecDeque<String>,
    current: Option<String>,
    selected: Option<String>,
    missed: Vec<String>,
}

impl Round {
    fn is_pending(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name) || self.remaining.iter().any(|n| n == name)
    }

    fn summary(&self) -> RoundSummary {
        RoundSummary {
            total: self.total,
            correct: self.total - self.missed.len(),
            missed: self.missed.clone(),
            score: score(self.missed.len(), self.total),
        }
    }

    /// Pop the next target, or finish the round.
    fn advance(&mut self) -> Next {
        self.selected = None;
        self.current = self.remaining.pop_front();
        match &self.current {
            Some(target) => Next::Target(target.clone()),
            None => {
                let summary = self.summary();
                tracing::info!(
                    total = summary.total,
                    missed = summary.missed.len(),
                    score = summary.score,
                    "round complete"
                );
                Next::Complete(summary)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Quiz {
    universe: Vec<String>,
    rng: Pcg32,
    round: Option<Round>,
}

impl Quiz {
    /// Quiz over `names`, shuffled from an entropy-seeded stream.
    pub fn new(names: Vec<String>) -> Self {
        Self::with_rng(names, Pcg32::from_entropy())
    }

    /// Repeated names are kept once, at their first position.
    pub fn with_rng(names: Vec<String>, rng: Pcg32) -> Self {
        let mut seen = HashSet::with_capacity(names.len());
        let universe: Vec<String> = names
            .into_iter()
            .filter(|n| seen.insert(n.clone()))
            .collect();
        Self {
            universe,
            rng,
            round: None,
        }
    }

    /// Begin a fresh round, discarding any round in progress.
    pub fn start(&mut self) -> QuizEvent {
        let order = shuffled(&self.universe, &mut self.rng);
        let mut round = Round {
            total: order.len(),
            remaining: order.into(),
            current: None,
            selected: None,
            missed: Vec::new(),
        };
        let next = round.advance();
        tracing::debug!(total = round.total, first = ?round.current, "round started");
        self.round = Some(round);
        QuizEvent::Started(next)
    }

    /// Handle a click on region `name`.
    pub fn guess(&mut self, name: &str) -> QuizEvent {
        let Some(round) = self.round.as_mut() else {
            return QuizEvent::Ignored;
        };
        if !round.is_pending(name) {
            return QuizEvent::Ignored;
        }
        if round.selected.as_deref() != Some(name) {
            round.selected = Some(name.to_string());
            tracing::debug!(name, "armed");
            return QuizEvent::Armed {
                name: name.to_string(),
            };
        }

        // Pending plus a live selection means `current` is set.
        let Some(target) = round.current.clone() else {
            return QuizEvent::Ignored;
        };
        let correct = target == name;
        if !correct {
            round.missed.push(target.clone());
        }
        tracing::debug!(target = %target, guessed = name, correct, "judged");
        let next = round.advance();
        QuizEvent::Judged {
            target,
            guessed: name.to_string(),
            correct,
            next,
        }
    }

    /// Send the current target to the back of the queue.
    pub fn skip(&mut self) -> QuizEvent {
        let Some(round) = self.round.as_mut() else {
            return QuizEvent::Ignored;
        };
        let Some(deferred) = round.current.take() else {
            return QuizEvent::Ignored;
        };
        round.remaining.push_back(deferred.clone());
        round.selected = None;
        round.current = round.remaining.pop_front();
        let target = round.current.clone().unwrap_or_else(|| deferred.clone());
        tracing::debug!(deferred = %deferred, target = %target, "skipped");
        QuizEvent::Skipped { deferred, target }
    }

    /// Abandon the round in progress; the board returns to idle.
    pub fn end(&mut self) -> QuizEvent {
        match self.round.take() {
            Some(round) if round.current.is_some() => {
                let unresolved = round.remaining.len() + 1;
                tracing::debug!(unresolved, "round ended early");
                QuizEvent::Ended { unresolved }
            }
            finished => {
                self.round = finished;
                QuizEvent::Ignored
            }
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.round {
            Some(Round {
                current: Some(_),
                selected: Some(_),
                ..
            }) => Phase::AwaitingConfirm,
            Some(Round {
                current: Some(_), ..
            }) => Phase::AwaitingGuess,
            _ => Phase::Idle,
        }
    }

    /// True while a target is being asked for.
    pub fn is_active(&self) -> bool {
        self.current().is_some()
    }

    pub fn current(&self) -> Option<&str> {
        self.round.as_ref().and_then(|r| r.current.as_deref())
    }

    pub fn selected(&self) -> Option<&str> {
        self.round.as_ref().and_then(|r| r.selected.as_deref())
    }

    pub fn missed(&self) -> &[String] {
        self.round
            .as_ref()
            .map(|r| r.missed.as_slice())
            .unwrap_or(&[])
    }

    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.round
            .iter()
            .flat_map(|r| r.remaining.iter().map(String::as_str))
    }

    pub fn remaining_len(&self) -> usize {
        self.round.as_ref().map_or(0, |r| r.remaining.len())
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    /// Summary of the last round once it has run out of targets.
    pub fn summary(&self) -> Option<RoundSummary> {
        self.round
            .as_ref()
            .filter(|r| r.current.is_none())
            .map(Round::summary)
    }

    pub fn paint(&self, name: &str) -> Paint {
        let Some(round) = &self.round else {
            return Paint::Default;
        };
        if round.selected.as_deref() == Some(name) {
            Paint::Selected
        } else if round.missed.iter().any(|m| m == name) {
            Paint::Missed
        } else if !round.is_pending(name) {
            Paint::Correct
        } else {
            Paint::Default
        }
    }

    pub fn is_missed(&self, name: &str) -> bool {
        self.missed().iter().any(|m| m == name)
    }
}
