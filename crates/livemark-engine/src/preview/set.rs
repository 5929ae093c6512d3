use std::collections::HashMap;

use super::decoration::{Decoration, DecorationKind, Priority, WidgetKind};

/// Contract violations reported by [`DecorationSetBuilder::add`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecorationError {
    #[error("decoration {from}..{to} is inverted")]
    Inverted { from: usize, to: usize },
    #[error("decoration {from}..{to} ends past the document (length {len})")]
    OutOfBounds { from: usize, to: usize, len: usize },
    #[error("decoration starting at {from} added after one starting at {previous}")]
    OutOfOrder { from: usize, previous: usize },
    #[error("decoration {from}..{to} overlaps a {priority:?} range ending at {previous_end}")]
    Overlap {
        from: usize,
        to: usize,
        priority: Priority,
        previous_end: usize,
    },
}

/// Accumulates decorations under the host's range-set contract: ranges
/// arrive in non-decreasing `from` order and never overlap another range of
/// the same [`Priority`].
#[derive(Debug)]
pub struct DecorationSetBuilder {
    doc_len: usize,
    last_from: usize,
    layer_ends: HashMap<Priority, usize>,
    ranges: Vec<Decoration>,
}

impl DecorationSetBuilder {
    pub fn new(doc_len: usize) -> Self {
        Self {
            doc_len,
            last_from: 0,
            layer_ends: HashMap::new(),
            ranges: Vec::new(),
        }
    }

    pub fn add(&mut self, deco: Decoration) -> Result<(), DecorationError> {
        let Decoration { from, to, .. } = deco;
        if from > to {
            return Err(DecorationError::Inverted { from, to });
        }
        if to > self.doc_len {
            return Err(DecorationError::OutOfBounds {
                from,
                to,
                len: self.doc_len,
            });
        }
        if from < self.last_from {
            return Err(DecorationError::OutOfOrder {
                from,
                previous: self.last_from,
            });
        }
        let priority = deco.priority();
        if from < to
            && let Some(&previous_end) = self.layer_ends.get(&priority)
            && from < previous_end
        {
            return Err(DecorationError::Overlap {
                from,
                to,
                priority,
                previous_end,
            });
        }

        self.last_from = from;
        if from < to {
            self.layer_ends.insert(priority, to);
        }
        self.ranges.push(deco);
        Ok(())
    }

    pub fn finish(self) -> DecorationSet {
        DecorationSet {
            ranges: self.ranges,
        }
    }
}

/// Sorts candidate decorations and feeds them through the builder, dropping
/// the ones that break the contract.
pub fn build_validated(mut candidates: Vec<Decoration>, doc_len: usize) -> DecorationSet {
    candidates.retain(|d| d.from <= d.to && d.to <= doc_len);
    candidates.sort_by_key(|d| (d.from, d.priority(), d.to));
    candidates.dedup();

    let mut builder = DecorationSetBuilder::new(doc_len);
    for deco in candidates {
        if let Err(e) = builder.add(deco) {
            log::debug!("dropping decoration {:?}: {e}", deco.kind);
        }
    }
    builder.finish()
}

/// An immutable, sorted set of decorations for one document snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    ranges: Vec<Decoration>,
}

impl DecorationSet {
    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.ranges.iter()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Decorations whose range intersects `from..to` (zero-width ones at an
    /// endpoint included).
    pub fn in_range(&self, from: usize, to: usize) -> impl Iterator<Item = &Decoration> {
        let end = self.ranges.partition_point(|d| d.from <= to);
        self.ranges[..end].iter().filter(move |d| d.to >= from)
    }

    /// The widget covering `pos`, for click handling.
    pub fn widget_at(&self, pos: usize) -> Option<(&Decoration, WidgetKind)> {
        self.in_range(pos, pos).find_map(|d| match d.kind {
            DecorationKind::Widget(w) if d.from <= pos && pos < d.to => Some((d, w)),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::decoration::{LineKind, MarkKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_rejects_out_of_order() {
        let mut b = DecorationSetBuilder::new(10);
        b.add(Decoration::hide(4, 5)).unwrap();
        assert_eq!(
            b.add(Decoration::hide(1, 2)),
            Err(DecorationError::OutOfOrder {
                from: 1,
                previous: 4
            })
        );
    }

    #[test]
    fn builder_rejects_same_priority_overlap_only() {
        let mut b = DecorationSetBuilder::new(10);
        b.add(Decoration::mark(0, 6, MarkKind::LinkText)).unwrap();
        b.add(Decoration::mark(2, 4, MarkKind::Bold)).unwrap();
        assert!(matches!(
            b.add(Decoration::mark(3, 5, MarkKind::Bold)),
            Err(DecorationError::Overlap { .. })
        ));
    }

    #[test]
    fn builder_rejects_out_of_bounds() {
        let mut b = DecorationSetBuilder::new(3);
        assert!(matches!(
            b.add(Decoration::hide(2, 4)),
            Err(DecorationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn validated_set_is_sorted_and_drops_offenders() {
        let set = build_validated(
            vec![
                Decoration::hide(5, 7),
                Decoration::line(0, LineKind::Heading(1)),
                Decoration::hide(0, 2),
                Decoration::hide(6, 8),
                Decoration::hide(9, 30),
            ],
            10,
        );
        assert_eq!(
            set.as_slice(),
            &[
                Decoration::line(0, LineKind::Heading(1)),
                Decoration::hide(0, 2),
                Decoration::hide(5, 7),
            ]
        );
    }

    #[test]
    fn widget_lookup() {
        let marker = crate::parsing::rope::Span::new(2, 5);
        let set = build_validated(
            vec![Decoration::widget(
                2,
                5,
                WidgetKind::Checkbox {
                    checked: false,
                    marker,
                },
            )],
            10,
        );
        assert!(set.widget_at(3).is_some());
        assert!(set.widget_at(5).is_none());
    }
}
