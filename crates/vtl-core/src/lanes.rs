//! First-fit lane packing for drawing overlapping competencies.

use crate::segment::Segment;

/// Assigns competency segments to display lanes.
///
/// Segments are taken in start order; each joins the first lane whose last
/// segment ends at or before its start, or opens a new lane. Trash segments
/// are ignored. Display-only: the store never consults lanes.
pub fn pack_lanes<'a>(
    segments: impl IntoIterator<Item = &'a Segment>,
) -> Vec<Vec<&'a Segment>> {
    let mut competencies: Vec<&Segment> =
        segments.into_iter().filter(|s| !s.is_trash()).collect();
    competencies.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut lanes: Vec<Vec<&Segment>> = Vec::new();
    for segment in competencies {
        let free = lanes
            .iter_mut()
            .find(|lane| lane.last().is_some_and(|last| segment.start >= last.end));
        match free {
            Some(lane) => lane.push(segment),
            None => lanes.push(vec![segment]),
        }
    }
    lanes
}
