//! Priority-based conflict resolution.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::document::Annotation;

/// Merge overlapping annotations into a non-overlapping set.
///
/// Candidates are taken in order of priority (highest first), then start,
/// then longest, then kind; each one is kept only if it overlaps nothing
/// kept so far. The result is ordered by start offset and does not depend
/// on the order of the input.
pub fn resolve(mut candidates: Vec<Annotation>) -> Vec<Annotation> {
    candidates.retain(|ann| ann.start < ann.end);
    candidates.sort_unstable_by_key(|ann| (Reverse(ann.priority), ann.start, Reverse(ann.end), ann.kind));
    candidates.dedup_by_key(|ann| (ann.priority, ann.start, ann.end, ann.kind));

    // Accepted intervals never overlap, so keying by start keeps them
    // ordered by end as well.
    let mut accepted: BTreeMap<u32, Annotation> = BTreeMap::new();
    for ann in candidates {
        let overlaps_before = accepted
            .range(..ann.end)
            .next_back()
            .is_some_and(|(_, prev)| prev.end > ann.start);
        if !overlaps_before {
            accepted.insert(ann.start, ann);
        }
    }
    accepted.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{SyntaxKind, TextRange, TextStyle};

    fn ann(start: u32, end: u32, kind: SyntaxKind) -> Annotation {
        Annotation::new(TextRange::new(start, end), kind, TextStyle::default())
    }

    fn spans(resolved: &[Annotation]) -> Vec<(u32, u32, SyntaxKind)> {
        resolved.iter().map(|a| (a.start, a.end, a.kind)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve(Vec::new()).is_empty());
    }

    #[test]
    fn test_higher_priority_wins_overlap() {
        let resolved = resolve(vec![ann(0, 10, SyntaxKind::Bold), ann(2, 6, SyntaxKind::Italic)]);
        assert_eq!(spans(&resolved), vec![(2, 6, SyntaxKind::Italic)]);
    }

    #[test]
    fn test_disjoint_annotations_all_survive_in_order() {
        let resolved = resolve(vec![
            ann(10, 12, SyntaxKind::Bold),
            ann(0, 4, SyntaxKind::Heading(1)),
            ann(5, 8, SyntaxKind::Italic),
        ]);
        assert_eq!(
            spans(&resolved),
            vec![
                (0, 4, SyntaxKind::Heading(1)),
                (5, 8, SyntaxKind::Italic),
                (10, 12, SyntaxKind::Bold),
            ]
        );
    }

    #[test]
    fn test_touching_intervals_do_not_conflict() {
        let resolved = resolve(vec![ann(0, 5, SyntaxKind::Bold), ann(5, 9, SyntaxKind::Bold)]);
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_equal_priority_prefers_earlier_then_longer() {
        let resolved = resolve(vec![
            ann(3, 8, SyntaxKind::Bold),
            ann(0, 4, SyntaxKind::Bold),
            ann(0, 6, SyntaxKind::Bold),
        ]);
        assert_eq!(spans(&resolved), vec![(0, 6, SyntaxKind::Bold)]);
    }

    #[test]
    fn test_empty_annotations_dropped() {
        let resolved = resolve(vec![ann(4, 4, SyntaxKind::TablePipe), ann(0, 8, SyntaxKind::Bold)]);
        assert_eq!(spans(&resolved), vec![(0, 8, SyntaxKind::Bold)]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let resolved = resolve(vec![ann(1, 3, SyntaxKind::Italic), ann(1, 3, SyntaxKind::Italic)]);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_footnote_definition_beats_reference_at_same_start() {
        let resolved = resolve(vec![
            ann(0, 4, SyntaxKind::FootnoteReference),
            ann(0, 5, SyntaxKind::FootnoteDefinition),
        ]);
        assert_eq!(spans(&resolved), vec![(0, 5, SyntaxKind::FootnoteDefinition)]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        const KINDS: [SyntaxKind; 8] = [
            SyntaxKind::InlineCode,
            SyntaxKind::Heading(2),
            SyntaxKind::LinkText,
            SyntaxKind::Bold,
            SyntaxKind::Strikethrough,
            SyntaxKind::Italic,
            SyntaxKind::ListMarker,
            SyntaxKind::TablePipe,
        ];

        fn arb_annotation() -> impl Strategy<Value = Annotation> {
            (0u32..200, 0u32..40, 0..KINDS.len())
                .prop_map(|(start, len, kind)| ann(start, start + len, KINDS[kind]))
        }

        proptest! {
            #[test]
            fn resolved_set_never_overlaps(input in prop::collection::vec(arb_annotation(), 0..60)) {
                let resolved = resolve(input);
                for pair in resolved.windows(2) {
                    prop_assert!(pair[0].end <= pair[1].start);
                }
            }

            #[test]
            fn resolution_ignores_input_order(
                input in prop::collection::vec(arb_annotation(), 0..60),
                seed in any::<u64>(),
            ) {
                let mut shuffled = input.clone();
                // Deterministic rotation plus reversal stands in for a shuffle.
                if !shuffled.is_empty() {
                    let len = shuffled.len();
                    shuffled.rotate_left((seed as usize) % len);
                }
                if seed % 2 == 0 {
                    shuffled.reverse();
                }
                prop_assert_eq!(resolve(input), resolve(shuffled));
            }

            #[test]
            fn output_is_subset_of_input(input in prop::collection::vec(arb_annotation(), 0..60)) {
                let resolved = resolve(input.clone());
                for kept in &resolved {
                    prop_assert!(input.contains(kept));
                }
            }

            #[test]
            fn resolving_twice_is_stable(input in prop::collection::vec(arb_annotation(), 0..60)) {
                let once = resolve(input);
                prop_assert_eq!(resolve(once.clone()), once);
            }

            #[test]
            fn highest_priority_candidate_survives(input in prop::collection::vec(arb_annotation(), 1..60)) {
                let best = input
                    .iter()
                    .filter(|a| a.start < a.end)
                    .map(|a| a.priority)
                    .max();
                let resolved = resolve(input);
                if let Some(best) = best {
                    prop_assert!(resolved.iter().any(|a| a.priority == best));
                }
            }
        }
    }
}
