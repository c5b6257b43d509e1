//! Compass frame selection from a multi-view orbit.

use gensprite_spec::{CompassDirection, DirectionSet, DirectionTable};
use thiserror::Error;

/// The frames handed over do not cover the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectionError {
    #[error("{direction} needs frame {index}, but only {frame_count} frames were generated")]
    FrameOutOfRange {
        direction: CompassDirection,
        index: usize,
        frame_count: usize,
    },
}

/// Picks the frame standing in for each compass direction.
///
/// Frames are referenced, not copied, and never interpolated. Extra frames
/// beyond the table's view count are ignored.
pub fn select_frames<'a, T>(
    frames: &'a [T],
    table: &DirectionTable,
) -> Result<DirectionSet<&'a T>, DirectionError> {
    DirectionSet::try_from_fn(|direction| {
        let index = table.frame_index(direction);
        frames.get(index).ok_or(DirectionError::FrameOutOfRange {
            direction,
            index,
            frame_count: frames.len(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sv3d_selection() {
        let frames: Vec<usize> = (0..21).collect();
        let table = DirectionTable::for_view_count(21).unwrap();
        let selected = select_frames(&frames, table).unwrap();

        assert_eq!(*selected[CompassDirection::S], 0);
        assert_eq!(*selected[CompassDirection::N], 10);
        let picked: Vec<usize> = selected.iter().map(|(_, f)| **f).collect();
        assert_eq!(picked, [0, 3, 5, 8, 10, 13, 15, 18]);
    }

    #[test]
    fn test_every_table_on_its_own_orbit() {
        for view_count in DirectionTable::supported_view_counts() {
            let frames: Vec<usize> = (0..view_count).collect();
            let table = DirectionTable::for_view_count(view_count).unwrap();
            let selected = select_frames(&frames, table).unwrap();
            for (direction, frame) in selected.iter() {
                assert_eq!(**frame, table.frame_index(direction));
            }
        }
    }

    #[test]
    fn test_short_orbit_is_an_error() {
        let frames: Vec<usize> = (0..12).collect();
        let table = DirectionTable::for_view_count(16).unwrap();
        let err = select_frames(&frames, table).unwrap_err();
        assert_eq!(
            err,
            DirectionError::FrameOutOfRange {
                direction: CompassDirection::E,
                index: 12,
                frame_count: 12,
            }
        );
    }
}
