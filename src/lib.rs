//! Annotation state engine for pathology point scoring (HER2/Ki67).
//!
//! The interactive canvas reports complete viewport patches of
//! `{point, label}` records; this crate reconciles them into a persistent
//! per-image annotation set, derives CSV / report / overlay artifacts from
//! it, and recovers interrupted sessions from the last persisted CSV.
//!
//! The canvas itself and any remote synchronization backend are external
//! collaborators behind the [`widget::AnnotationWidget`] and
//! [`sync::RemoteStore`] traits.

pub mod config;
pub mod error;
pub mod export;
pub mod labels;
pub mod reconcile;
pub mod state;
pub mod storage;
pub mod sync;
pub mod utils;
pub mod widget;

pub use error::AnnotateError;
