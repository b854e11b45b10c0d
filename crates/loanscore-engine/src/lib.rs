//! Feature row construction and scoring for loanscore.
//!
//! - [`build_feature_row`] applies the default policy to a UI payload
//! - [`LogisticPipeline`] is the on-disk scoring artifact, read by [`load_artifact`]
//! - [`score_batch`] turns payloads into prediction results with one model call

mod artifact;
mod policy;
mod scoring;

pub use artifact::{load_artifact, LogisticPipeline};
pub use policy::{
    build_feature_row, map_purpose, to_number, FieldRule, Source, FIELD_RULES, OTHER_PURPOSE,
    PURPOSE_MAP, UI_KEYS,
};
pub use scoring::score_batch;
