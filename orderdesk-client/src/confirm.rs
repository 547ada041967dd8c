//! Confirmation gate for destructive actions
//!
//! Void, hard delete and mark-unpaid only run after an explicit yes.
//! Declining is a normal outcome, not an error.

use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestructiveAction {
    /// Soft delete, keeps an audit record
    Void { order_id: String },
    /// Irreversible removal
    HardDelete { order_id: String },
    /// Discards recorded payment evidence
    MarkUnpaid { order_id: String },
}

impl DestructiveAction {
    pub fn order_id(&self) -> &str {
        match self {
            Self::Void { order_id }
            | Self::HardDelete { order_id }
            | Self::MarkUnpaid { order_id } => order_id,
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            Self::Void { order_id } => format!("Void order #{}? A reason is required.", order_id),
            Self::HardDelete { order_id } => {
                format!("Permanently delete order #{}? This cannot be undone.", order_id)
            }
            Self::MarkUnpaid { order_id } => format!(
                "Mark order #{} as unpaid? Recorded payment details will be cleared.",
                order_id
            ),
        }
    }
}

/// Answer to a confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Declined,
    Confirmed {
        /// Free text entered with the answer (the void reason)
        reason: Option<String>,
    },
}

impl Confirmation {
    pub fn yes() -> Self {
        Self::Confirmed { reason: None }
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self::Confirmed {
            reason: Some(reason.into()),
        }
    }
}

/// Outcome of a gated workflow
#[derive(Debug, Clone, PartialEq)]
pub enum Decision<T> {
    Declined,
    Done(T),
}

impl<T> Decision<T> {
    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined)
    }

    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(v) => Some(v),
            Self::Declined => None,
        }
    }
}

#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    async fn confirm(&self, action: &DestructiveAction) -> Confirmation;
}

/// Gate with a fixed answer, for scripted runs and tests
#[derive(Debug)]
pub struct ScriptedGate {
    answer: Confirmation,
    asked: Mutex<Vec<DestructiveAction>>,
}

impl ScriptedGate {
    pub fn new(answer: Confirmation) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn accept() -> Self {
        Self::new(Confirmation::yes())
    }

    pub fn decline() -> Self {
        Self::new(Confirmation::Declined)
    }

    /// Prompts shown so far
    pub fn asked(&self) -> Vec<DestructiveAction> {
        self.asked
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ConfirmationGate for ScriptedGate {
    async fn confirm(&self, action: &DestructiveAction) -> Confirmation {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(action.clone());
        }
        self.answer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_gate_records_prompts() {
        let gate = ScriptedGate::decline();
        let action = DestructiveAction::MarkUnpaid {
            order_id: "O-1".into(),
        };
        assert_eq!(gate.confirm(&action).await, Confirmation::Declined);
        assert_eq!(gate.asked(), vec![action.clone()]);
        assert!(action.prompt().contains("#O-1"));
    }

    #[test]
    fn test_decision() {
        assert!(Decision::<()>::Declined.is_declined());
        assert_eq!(Decision::Done(3).done(), Some(3));
    }
}
