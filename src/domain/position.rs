//! Positioning
//!
//! Dense 1-based ordering of the items of one scope (the lists of a user,
//! the tasks of a list) and the "move next to" reindexer shared by both.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};

/// Position within a scope, 1-based in the steady state
pub type Position = i32;

/// An entity ordered among the siblings of its scope
pub trait PositionedItem: Entity {
    /// Grouping key (user for lists, list for tasks)
    type Scope: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    fn position(&self) -> Position;
}

/// Where the moving item lands relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Moving item was before the anchor, inserted right after it
    Forward,
    /// Moving item was after the anchor, inserted right before it
    Backward,
}

/// A single position write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate<Id> {
    pub id: Id,
    pub position: Position,
}

/// Compute the writes that move `moving` next to `anchor`.
///
/// `items` is the whole scope in fetch order. It is sorted by position with a
/// stable sort, so colliding positions keep their fetch order. The result
/// renumbers the scope `1..=N` and only contains items whose position changes.
pub fn reposition<T: PositionedItem>(
    items: &[T],
    moving: T::Id,
    anchor: T::Id,
) -> DomainResult<Vec<PositionUpdate<T::Id>>> {
    let mut ordered: Vec<&T> = items.iter().collect();
    ordered.sort_by_key(|item| item.position());

    let moving_index = index_of(&ordered, moving)?;
    let anchor_index = index_of(&ordered, anchor)?;

    if moving == anchor {
        return Ok(Vec::new());
    }

    let direction = match ordered[moving_index].position().cmp(&ordered[anchor_index].position()) {
        Ordering::Less => Direction::Forward,
        Ordering::Greater => Direction::Backward,
        Ordering::Equal => {
            return Err(DomainError::Conflict(format!(
                "equal position for distinct items {:?} and {:?}",
                moving, anchor
            )))
        }
    };

    let current = ordered.remove(moving_index);
    let anchor_index = index_of(&ordered, anchor)?;
    let insert_at = match direction {
        Direction::Forward => anchor_index + 1,
        Direction::Backward => anchor_index,
    };
    ordered.insert(insert_at, current);

    Ok(ordered
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let position = index as Position + 1;
            (item.position() != position).then(|| PositionUpdate {
                id: item.id(),
                position,
            })
        })
        .collect())
}

fn index_of<T: PositionedItem>(ordered: &[&T], id: T::Id) -> DomainResult<usize> {
    ordered
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| DomainError::NotFound(format!("Item {:?} not found in scope", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq)]
    struct Card {
        id: char,
        position: Position,
    }

    impl Entity for Card {
        type Id = char;

        fn id(&self) -> Self::Id {
            self.id
        }
    }

    impl PositionedItem for Card {
        type Scope = u32;

        fn position(&self) -> Position {
            self.position
        }
    }

    fn cards(spec: &[(char, Position)]) -> Vec<Card> {
        spec.iter().map(|&(id, position)| Card { id, position }).collect()
    }

    /// Apply updates and return the scope ordered by its new positions
    fn apply(items: &[Card], updates: &[PositionUpdate<char>]) -> Vec<(char, Position)> {
        let mut result: Vec<(char, Position)> = items
            .iter()
            .map(|card| {
                let position = updates
                    .iter()
                    .find(|u| u.id == card.id)
                    .map(|u| u.position)
                    .unwrap_or(card.position);
                (card.id, position)
            })
            .collect();
        result.sort_by_key(|&(_, position)| position);
        result
    }

    fn assert_dense(result: &[(char, Position)]) {
        let positions: HashSet<Position> = result.iter().map(|&(_, p)| p).collect();
        let expected: HashSet<Position> = (1..=result.len() as Position).collect();
        assert_eq!(positions, expected);
    }

    #[test]
    fn test_forward_move_inserts_after_anchor() {
        let items = cards(&[('A', 1), ('B', 2), ('C', 3), ('D', 4)]);
        let updates = reposition(&items, 'A', 'C').unwrap();

        assert_eq!(apply(&items, &updates), vec![('B', 1), ('C', 2), ('A', 3), ('D', 4)]);
    }

    #[test]
    fn test_backward_move_inserts_before_anchor() {
        let items = cards(&[('A', 1), ('B', 2), ('C', 3), ('D', 4)]);
        let updates = reposition(&items, 'D', 'B').unwrap();

        assert_eq!(apply(&items, &updates), vec![('A', 1), ('D', 2), ('B', 3), ('C', 4)]);
    }

    #[test]
    fn test_only_changed_items_are_written() {
        let items = cards(&[('A', 1), ('B', 2), ('C', 3), ('D', 4)]);
        let updates = reposition(&items, 'D', 'B').unwrap();

        assert_eq!(
            updates,
            vec![
                PositionUpdate { id: 'D', position: 2 },
                PositionUpdate { id: 'B', position: 3 },
                PositionUpdate { id: 'C', position: 4 },
            ]
        );
    }

    #[test]
    fn test_self_move_is_noop() {
        let items = cards(&[('A', 1), ('B', 2)]);
        assert!(reposition(&items, 'B', 'B').unwrap().is_empty());

        let single = cards(&[('A', 1)]);
        assert!(reposition(&single, 'A', 'A').unwrap().is_empty());
    }

    #[test]
    fn test_missing_anchor_is_not_found() {
        let items = cards(&[('A', 1)]);
        let err = reposition(&items, 'A', 'Z').unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn test_missing_moving_item_is_not_found() {
        let items = cards(&[('A', 1), ('B', 2)]);
        assert!(matches!(reposition(&items, 'Z', 'A'), Err(DomainError::NotFound(_))));

        let empty: Vec<Card> = Vec::new();
        assert!(matches!(reposition(&empty, 'A', 'B'), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_equal_positions_conflict() {
        let items = cards(&[('A', 1), ('B', 1), ('C', 2)]);
        let err = reposition(&items, 'A', 'B').unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn test_collisions_resolve_densely_in_fetch_order() {
        let items = cards(&[('A', 1), ('B', 1), ('C', 2)]);
        let updates = reposition(&items, 'A', 'C').unwrap();
        let result = apply(&items, &updates);

        assert_eq!(result, vec![('B', 1), ('C', 2), ('A', 3)]);
        assert_dense(&result);
    }

    #[test]
    fn test_gaps_and_zeros_are_compacted() {
        let items = cards(&[('A', 0), ('B', 5), ('C', 9), ('D', 12)]);
        let updates = reposition(&items, 'D', 'A').unwrap();
        let result = apply(&items, &updates);

        assert_eq!(result, vec![('D', 1), ('A', 2), ('B', 3), ('C', 4)]);
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let items = cards(&[('C', 3), ('A', 1), ('D', 4), ('B', 2)]);
        let updates = reposition(&items, 'A', 'C').unwrap();

        assert_eq!(apply(&items, &updates), vec![('B', 1), ('C', 2), ('A', 3), ('D', 4)]);
    }

    #[test]
    fn test_boundary_moves_are_mirrored_and_dense() {
        let items = cards(&[('A', 1), ('B', 2), ('C', 3), ('D', 4)]);

        let first_after_last = apply(&items, &reposition(&items, 'A', 'D').unwrap());
        assert_eq!(first_after_last, vec![('B', 1), ('C', 2), ('D', 3), ('A', 4)]);
        assert_dense(&first_after_last);

        let last_before_first = apply(&items, &reposition(&items, 'D', 'A').unwrap());
        assert_eq!(last_before_first, vec![('D', 1), ('A', 2), ('B', 3), ('C', 4)]);
        assert_dense(&last_before_first);
    }

    #[test]
    fn test_every_move_keeps_density_and_relative_order() {
        let items = cards(&[('A', 1), ('B', 2), ('C', 3), ('D', 4), ('E', 5)]);
        let ids: Vec<char> = items.iter().map(|c| c.id).collect();

        for &moving in &ids {
            for &anchor in &ids {
                let result = apply(&items, &reposition(&items, moving, anchor).unwrap());
                assert_dense(&result);

                let others: Vec<char> = result.iter().map(|&(id, _)| id).filter(|&id| id != moving).collect();
                let expected: Vec<char> = ids.iter().copied().filter(|&id| id != moving).collect();
                assert_eq!(others, expected, "moving {} next to {}", moving, anchor);
            }
        }
    }
}
