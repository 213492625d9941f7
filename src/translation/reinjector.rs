/*!
 * Replacement reinjection.
 *
 * Writes dispatch results back into the exact originating nodes of the
 * document model. The pass is total: spans without a replacement
 * (PRESERVE verdicts and failed translations) are written back with
 * their original content, which the tree records as a no-op that keeps
 * the original bytes. Node count, nesting and attribute sets are never
 * touched.
 */

use crate::document::{Span, XmlTree};
use crate::errors::XmlError;

/// Counters from one reinjection pass
#[derive(Debug, Default, Clone, Copy)]
pub struct ReinjectStats {
    /// Spans visited (always the full span list)
    pub visited: usize,
    /// Spans whose content actually changed
    pub replaced: usize,
}

/// Walk the span list and write every span back into its node
pub fn reinject(tree: &mut XmlTree, spans: &[Span]) -> Result<ReinjectStats, XmlError> {
    let mut stats = ReinjectStats::default();

    for span in spans {
        let value = span.replacement.as_deref().unwrap_or(&span.content);
        tree.write_text(span.node, value)?;
        stats.visited += 1;
        if span
            .replacement
            .as_deref()
            .is_some_and(|r| r != span.content)
        {
            stats.replaced += 1;
        }
    }

    Ok(stats)
}
