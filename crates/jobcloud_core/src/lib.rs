//! Jobcloud core: pure pipeline state machine, text normalization and term
//! frequency aggregation. Nothing in this crate performs IO.
mod effect;
mod frequency;
mod msg;
mod options;
mod result;
mod source;
mod state;
mod stopwords;
mod tokenize;
mod update;
mod urls;

pub use effect::Effect;
pub use frequency::{aggregate, TokenFrequencyMap};
pub use msg::Msg;
pub use options::{OptionsError, PipelineOptions, MAX_WORDS_RANGE, N_GRAM_RANGE};
pub use result::{PipelineFailure, PipelineResult};
pub use source::{ScrapeBatchResult, SourceFailureKind, SourceOutcome, SourceResult};
pub use state::{PipelineStage, PipelineState, CORPUS_FILENAME};
pub use stopwords::{is_stopword, ENGLISH_STOPWORDS};
pub use tokenize::tokenize;
pub use update::update;
pub use urls::{is_accepted_url, parse_url_lines, partition_urls, source_host};
