use crate::{
    aggregate, partition_urls, Effect, Msg, PipelineFailure, PipelineStage, PipelineState,
    CORPUS_FILENAME,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not fit the current stage are ignored.
pub fn update(mut state: PipelineState, msg: Msg) -> (PipelineState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlsSubmitted(raw) => {
            if state.stage() != PipelineStage::Start {
                return (state, Vec::new());
            }
            let (accepted, rejected) = partition_urls(raw);
            state.set_urls(accepted.clone(), rejected);
            if accepted.is_empty() {
                state.fail(PipelineFailure::NoValidUrls);
                state.set_stage(PipelineStage::Finished);
                Vec::new()
            } else {
                state.set_stage(PipelineStage::Scraping);
                vec![Effect::ScrapeUrls { urls: accepted }]
            }
        }
        Msg::ScrapeCompleted(batch) => {
            if state.stage() != PipelineStage::Scraping {
                return (state, Vec::new());
            }
            let texts: Vec<String> = batch.texts().into_iter().map(ToOwned::to_owned).collect();
            state.set_batch(batch);
            if texts.is_empty() {
                state.fail(PipelineFailure::NoSuccessfulScrape);
                state.set_stage(PipelineStage::Finished);
                return (state, Vec::new());
            }

            let corpus = texts.join(" ");
            let frequencies = aggregate(
                &texts,
                state.options().min_frequency(),
                state.options().n_gram_size(),
            );
            if frequencies.is_empty() {
                state.fail(PipelineFailure::EmptyFrequency);
            }
            state.set_frequencies(frequencies);
            state.set_corpus(corpus.clone());

            match state.options().output_dir().cloned() {
                Some(dir) => {
                    state.set_stage(PipelineStage::Persisting);
                    vec![Effect::PersistCorpus {
                        dir,
                        filename: CORPUS_FILENAME.to_string(),
                        corpus,
                    }]
                }
                None => {
                    state.set_stage(PipelineStage::Finished);
                    Vec::new()
                }
            }
        }
        Msg::CorpusPersisted(outcome) => {
            if state.stage() != PipelineStage::Persisting {
                return (state, Vec::new());
            }
            state.apply_persisted(outcome);
            state.set_stage(PipelineStage::Finished);
            Vec::new()
        }
    };

    (state, effects)
}
