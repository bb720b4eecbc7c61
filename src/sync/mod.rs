//! GitHub to Jira sync
//!
//! Pure helpers (label codec, field mapping, metadata extraction, description
//! and comment building) feed the per-issue [`IssueSyncer`], which
//! [`BulkSyncer`] drives across a whole repository.

mod bulk;
pub mod comment;
pub mod description;
pub mod draft;
pub mod extract;
pub mod field_mapper;
pub mod label_codec;
mod orchestrator;
pub mod outcome;

pub use bulk::BulkSyncer;
pub use comment::closing_comment;
pub use description::{compose_description, normalize_language};
pub use draft::{build_draft, derive_summary, JiraIssueDraft, PROVENANCE_LABELS};
pub use extract::{extract_metadata, CodeBlock, IssueMetadata};
pub use field_mapper::{resolve_issue_type, resolve_priority};
pub use label_codec::{
    build_sync_label_name, extract_sync_key, is_valid_jira_key, is_valid_project_key,
    SYNC_LABEL_PREFIX,
};
pub use orchestrator::{IssueSyncer, DRY_RUN_KEY_SUFFIX, SYNC_LABEL_COLOR};
pub use outcome::{BulkSyncReport, BulkSyncStats, SkipReason, SyncOutcome, SyncState};
