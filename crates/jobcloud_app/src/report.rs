use std::fmt::Write;

use jobcloud_core::{PipelineResult, SourceOutcome};

/// Plain-text summary of a pipeline run for the terminal.
pub fn render(result: &PipelineResult, generated_at: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Job description term report ({generated_at})");

    if !result.batch.is_empty() {
        let _ = writeln!(out, "\nSources:");
        let width = result
            .batch
            .iter()
            .map(|source| display_host(&source.host, &source.identity).chars().count())
            .max()
            .unwrap_or(0);
        for source in &result.batch {
            let host = display_host(&source.host, &source.identity);
            match &source.outcome {
                SourceOutcome::Text(text) => {
                    let _ = writeln!(out, "  OK    {host:<width$}  {} chars", text.chars().count());
                }
                SourceOutcome::Failure { kind, detail } => {
                    let _ = writeln!(out, "  FAIL  {host:<width$}  {kind}: {detail}");
                }
            }
        }
    }

    if !result.rejected_urls.is_empty() {
        let _ = writeln!(out, "\nSkipped inputs (no http:// or https:// prefix):");
        for input in &result.rejected_urls {
            let _ = writeln!(out, "  {input}");
        }
    }

    let _ = writeln!(out, "\n{}", result.message);

    if !result.corpus.is_empty() {
        let _ = writeln!(
            out,
            "\nCorpus: {} characters, {} words",
            result.corpus.chars().count(),
            result.corpus.split_whitespace().count()
        );
    }
    if let Some(path) = &result.corpus_file {
        let _ = writeln!(out, "Saved to {}", path.display());
    }

    let terms = result.cloud_terms();
    if !terms.is_empty() {
        let _ = writeln!(
            out,
            "\nTop terms ({} of {} unique, {} occurrences):",
            terms.len(),
            result.frequencies.len(),
            result.frequencies.total()
        );
        let width = terms.iter().map(|(term, _)| term.chars().count()).max().unwrap_or(0);
        for (rank, (term, count)) in terms.iter().enumerate() {
            let _ = writeln!(out, "  {:>3}. {term:<width$}  {count}", rank + 1);
        }
    }

    out
}

/// Falls back to the full URL when it had no parseable host.
fn display_host<'a>(host: &'a str, identity: &'a str) -> &'a str {
    if host.is_empty() {
        identity
    } else {
        host
    }
}
