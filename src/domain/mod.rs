//! Shared measurement vocabulary: endpoint targets, scenario tags and the
//! outcome records that flow from the invoker to the aggregator.
pub mod record;
pub mod run;
pub mod target;

pub use record::{HTTP_CODE_NONE, Outcome, OutcomeRecord, ScenarioTags, epoch_seconds};
pub use run::{Phase, ScenarioKind};
pub use target::{EndpointTarget, RequestParams};
