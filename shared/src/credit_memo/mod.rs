//! Credit memo subledger: editor drafts, evidence handling and per-order credits

pub mod draft;
pub mod evidence;
pub mod ledger;

pub use draft::{
    CreditMemoDraft, CreditMemoPayload, DraftLine, DraftMode, StagedUpload, Submission,
};
pub use evidence::{EvidenceFile, StagedFile};
pub use ledger::{CreditEntry, CreditLedger};
