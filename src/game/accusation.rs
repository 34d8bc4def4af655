//! Accusation engine
//!
//! Runs once per clue-bearing room the player enters. The clue is filed in
//! the clue index, its suspect is looked up in the ledger, and the evidence
//! against that suspect is recounted from scratch over the whole ledger.
//! Once the count reaches the threshold the player may accuse.
//!
//! ```text
//! Idle → ClueFound → Evaluated → AccusationOffered → ResolvedCorrect
//!                              │                   ↘ ResolvedIncorrect
//!                              ↘ NoAccusation
//! ```
//!
//! Every terminal state falls back to `Idle` when the next clue arrives.

use super::clue_index::ClueIndex;
use super::ledger::SuspectLedger;
use crate::data::{ClueText, SuspectName};
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Clues against one suspect needed before an accusation is offered.
pub const DEFAULT_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Idle,
    ClueFound,
    Evaluated,
    AccusationOffered,
    NoAccusation,
    ResolvedCorrect,
    ResolvedIncorrect,
}

/// What the engine made of a clue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub clue: ClueText,
    /// The clue was not in the index before.
    pub newly_filed: bool,
    /// Who the clue points at, if the ledger knows.
    pub suspect: Option<SuspectName>,
    /// Distinct discovered clues against `suspect`, this one included.
    pub evidence_count: usize,
    pub offer: Option<Offer>,
}

impl Evaluation {
    pub fn offers_accusation(&self) -> bool {
        self.offer.is_some()
    }
}

/// An accusation the player may make
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub suspect: SuspectName,
    pub evidence_count: usize,
    /// Every discovered clue, alphabetically.
    pub discovered: Vec<ClueText>,
}

/// The player's answer to an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Accuse,
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    /// No offer was made.
    NoAction,
    AccusationResolved {
        accused: SuspectName,
        verdict: Verdict,
    },
    /// The player passed on accusing `suspect`.
    Declined { suspect: SuspectName },
}

/// Asks the player whether to accuse.
pub trait AccusationPrompt {
    fn decide(&mut self, offer: &Offer) -> Decision;
}

impl<F> AccusationPrompt for F
where
    F: FnMut(&Offer) -> Decision,
{
    fn decide(&mut self, offer: &Offer) -> Decision {
        self(offer)
    }
}

#[derive(Debug, Clone)]
pub struct AccusationEngine {
    threshold: usize,
    state: EngineState,
    pending: Option<SuspectName>,
}

impl Default for AccusationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl AccusationEngine {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            state: EngineState::Idle,
            pending: None,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The suspect of the open offer, if any.
    pub fn pending(&self) -> Option<&SuspectName> {
        self.pending.as_ref()
    }

    fn transition(&mut self, to: EngineState) {
        debug!(from = ?self.state, to = ?to, "accusation engine");
        self.state = to;
    }

    /// Drop any open offer and go back to `Idle`.
    pub fn reset(&mut self) {
        self.pending = None;
        self.transition(EngineState::Idle);
    }

    /// File `clue` and weigh the evidence it adds.
    ///
    /// Fails with [`GameError::InvalidState`] while an offer is still open,
    /// and passes on [`GameError::CapacityExhausted`] if the index is full;
    /// in both cases nothing changes.
    pub fn discover(
        &mut self,
        clue: &ClueText,
        index: &mut ClueIndex,
        ledger: &SuspectLedger,
    ) -> Result<Evaluation> {
        if self.state == EngineState::AccusationOffered {
            return Err(GameError::InvalidState(
                "an accusation is still waiting for an answer".to_string(),
            ));
        }
        if self.state != EngineState::Idle {
            self.transition(EngineState::Idle);
        }
        self.transition(EngineState::ClueFound);

        let newly_filed = if index.contains(clue.as_str()) {
            false
        } else {
            match index.insert(clue.clone()) {
                Ok(inserted) => inserted,
                Err(e) => {
                    self.transition(EngineState::Idle);
                    return Err(e);
                }
            }
        };
        self.transition(EngineState::Evaluated);

        let Some(association) = ledger.find(clue.as_str()) else {
            self.transition(EngineState::NoAccusation);
            return Ok(Evaluation {
                clue: clue.clone(),
                newly_filed,
                suspect: None,
                evidence_count: 0,
                offer: None,
            });
        };
        let suspect = association.suspect().clone();

        // The triggering clue, plus every other discovered clue the whole
        // ledger links to the same suspect. Each text counts once.
        let mut corroborating: Vec<&str> = Vec::new();
        for a in ledger.iter() {
            let other = a.clue().as_str();
            if a.suspect() == &suspect
                && other != clue.as_str()
                && index.contains(other)
                && !corroborating.contains(&other)
            {
                corroborating.push(other);
            }
        }
        let evidence_count = 1 + corroborating.len();

        let offer = if evidence_count >= self.threshold {
            self.pending = Some(suspect.clone());
            self.transition(EngineState::AccusationOffered);
            Some(Offer {
                suspect: suspect.clone(),
                evidence_count,
                discovered: index.in_order().cloned().collect(),
            })
        } else {
            self.transition(EngineState::NoAccusation);
            None
        };

        Ok(Evaluation {
            clue: clue.clone(),
            newly_filed,
            suspect: Some(suspect),
            evidence_count,
            offer,
        })
    }

    /// Answer the open offer. Accusing compares the suspect with the true
    /// culprit; either way the clue index and ledger are left as they are.
    pub fn resolve(&mut self, decision: Decision, culprit: &SuspectName) -> Result<EngineOutcome> {
        let Some(accused) = self.pending.take() else {
            return Err(GameError::InvalidState(
                "there is no accusation to answer".to_string(),
            ));
        };

        match decision {
            Decision::Decline => {
                self.transition(EngineState::Idle);
                Ok(EngineOutcome::Declined { suspect: accused })
            }
            Decision::Accuse => {
                let verdict = if accused == *culprit {
                    self.transition(EngineState::ResolvedCorrect);
                    Verdict::Correct
                } else {
                    self.transition(EngineState::ResolvedIncorrect);
                    Verdict::Incorrect
                };
                Ok(EngineOutcome::AccusationResolved { accused, verdict })
            }
        }
    }

    /// The whole protocol in one call, with `prompt` answering the offer.
    pub fn on_clue_discovered(
        &mut self,
        clue: &ClueText,
        index: &mut ClueIndex,
        ledger: &SuspectLedger,
        culprit: &SuspectName,
        prompt: &mut impl AccusationPrompt,
    ) -> Result<EngineOutcome> {
        let evaluation = self.discover(clue, index, ledger)?;
        match evaluation.offer {
            None => Ok(EngineOutcome::NoAction),
            Some(offer) => {
                let decision = prompt.decide(&offer);
                self.resolve(decision, culprit)
            }
        }
    }
}
