//! Display-order computations: name sorting, reset to creation order and
//! drag insertion. None of these touch the original-order index itself.

use crate::domain::{SortDirection, Task, TaskId};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Base letters of a name: NFD-decomposed, combining marks dropped, lowercased
fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Compare two names the way a root-locale collator would.
///
/// Base letters compare first, ignoring accents and case, so "éclair" sorts
/// between "apple" and "zebra". Ties are then broken by accents (unaccented
/// first), then by case (lowercase first), then by code point so the
/// comparison stays total.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = base_letters(a).cmp(base_letters(b));
    if primary != Ordering::Equal {
        return primary;
    }

    let accents = a
        .nfd()
        .flat_map(char::to_lowercase)
        .cmp(b.nfd().flat_map(char::to_lowercase));
    if accents != Ordering::Equal {
        return accents;
    }

    if let Some((x, y)) = a.chars().zip(b.chars()).find(|(x, y)| x != y) {
        match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }

    a.cmp(b)
}

/// Stable sort by display text
pub fn sort_by_text(tasks: &mut [Task], direction: SortDirection) {
    match direction {
        SortDirection::Ascending => tasks.sort_by(|a, b| locale_compare(&a.text, &b.text)),
        SortDirection::Descending => tasks.sort_by(|a, b| locale_compare(&b.text, &a.text)),
    }
}

/// Position of a task in the original order, -1 when it is not indexed
fn original_position(original: &[TaskId], id: TaskId) -> isize {
    original
        .iter()
        .position(|o| *o == id)
        .map_or(-1, |p| p as isize)
}

/// Reorder tasks by their position in the original order.
///
/// Tasks missing from the index sort as position -1: they move to the front
/// and keep their relative order.
pub fn reset_order(tasks: &mut [Task], original: &[TaskId]) {
    tasks.sort_by_key(|t| original_position(original, t.id));
}

/// Move `moved` so that it sits immediately before `before`, or at the end
/// when `before` is `None` or no longer in the list.
///
/// Returns false when `moved` is not in the list or the order did not change.
pub fn move_before(tasks: &mut Vec<Task>, moved: TaskId, before: Option<TaskId>) -> bool {
    if before == Some(moved) {
        return false;
    }
    let Some(from) = tasks.iter().position(|t| t.id == moved) else {
        return false;
    };

    let previous: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
    let task = tasks.remove(from);
    let to = before
        .and_then(|b| tasks.iter().position(|t| t.id == b))
        .unwrap_or(tasks.len());
    tasks.insert(to, task);

    tasks.iter().map(|t| t.id).ne(previous)
}

/// Vertical extent of one rendered row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBox {
    pub id: TaskId,
    pub top: f64,
    pub height: f64,
}

/// Pick the row a dragged task should be inserted before.
///
/// Among rows other than the dragged one, this is the row whose vertical
/// midpoint lies below the pointer and closest to it. `None` means no
/// midpoint is below the pointer, so the task goes to the end.
pub fn drop_target(rows: &[RowBox], dragged: TaskId, pointer_y: f64) -> Option<TaskId> {
    rows.iter()
        .filter(|row| row.id != dragged)
        .map(|row| (pointer_y - row.top - row.height / 2.0, row.id))
        .filter(|(offset, _)| *offset < 0.0)
        .fold(None, |closest: Option<(f64, TaskId)>, (offset, id)| match closest {
            Some((best, _)) if best >= offset => closest,
            _ => Some((offset, id)),
        })
        .map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tasks(names: &[&str]) -> Vec<Task> {
        names.iter().map(|n| Task::new(n.to_string())).collect()
    }

    fn names(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.text.as_str()).collect()
    }

    fn rows(tasks: &[Task]) -> Vec<RowBox> {
        tasks
            .iter()
            .enumerate()
            .map(|(i, t)| RowBox {
                id: t.id,
                top: i as f64 * 10.0,
                height: 10.0,
            })
            .collect()
    }

    #[test]
    fn test_locale_compare_ignores_case_first() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zebra", "apple"), Ordering::Greater);
    }

    #[test]
    fn test_locale_compare_lowercase_before_uppercase() {
        assert_eq!(locale_compare("milk", "Milk"), Ordering::Less);
        assert_eq!(locale_compare("Milk", "milk"), Ordering::Greater);
        assert_eq!(locale_compare("milk", "milk"), Ordering::Equal);
    }

    #[test]
    fn test_locale_compare_prefix() {
        assert_eq!(locale_compare("Buy", "Buy bread"), Ordering::Less);
    }

    #[test]
    fn test_locale_compare_ignores_accents_first() {
        assert_eq!(locale_compare("éclair", "zebra"), Ordering::Less);
        assert_eq!(locale_compare("éclair", "apple"), Ordering::Greater);
        assert_eq!(locale_compare("Öl", "oma"), Ordering::Less);
    }

    #[test]
    fn test_locale_compare_unaccented_before_accented() {
        assert_eq!(locale_compare("resume", "résumé"), Ordering::Less);
        assert_eq!(locale_compare("résumé", "resume"), Ordering::Greater);
        assert_eq!(locale_compare("résumé", "résumé"), Ordering::Equal);
    }

    #[test]
    fn test_sort_accented_names() {
        let mut list = tasks(&["zebra", "éclair", "apple"]);
        sort_by_text(&mut list, SortDirection::Ascending);
        assert_eq!(names(&list), vec!["apple", "éclair", "zebra"]);

        sort_by_text(&mut list, SortDirection::Descending);
        assert_eq!(names(&list), vec!["zebra", "éclair", "apple"]);
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let mut list = tasks(&["banana", "Cherry", "apple"]);
        sort_by_text(&mut list, SortDirection::Ascending);
        assert_eq!(names(&list), vec!["apple", "banana", "Cherry"]);

        sort_by_text(&mut list, SortDirection::Descending);
        assert_eq!(names(&list), vec!["Cherry", "banana", "apple"]);
    }

    #[test]
    fn test_descending_is_reverse_of_ascending() {
        let mut asc = tasks(&["delta", "Alpha", "charlie", "Bravo", "echo"]);
        sort_by_text(&mut asc, SortDirection::Ascending);
        let mut desc = asc.clone();
        sort_by_text(&mut desc, SortDirection::Descending);

        let mut reversed = names(&asc);
        reversed.reverse();
        assert_eq!(names(&desc), reversed);
    }

    #[test]
    fn test_reset_order_restores_creation_order() {
        let mut list = tasks(&["a", "b", "c", "d"]);
        let original: Vec<TaskId> = list.iter().map(|t| t.id).collect();

        sort_by_text(&mut list, SortDirection::Descending);
        assert_eq!(names(&list), vec!["d", "c", "b", "a"]);

        reset_order(&mut list, &original);
        assert_eq!(names(&list), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_reset_order_floats_unindexed_to_front() {
        let mut list = tasks(&["a", "b", "x", "c", "y"]);
        let original = vec![list[3].id, list[0].id, list[1].id];

        reset_order(&mut list, &original);
        assert_eq!(names(&list), vec!["x", "y", "c", "a", "b"]);
    }

    #[test]
    fn test_move_before() {
        let mut list = tasks(&["a", "b", "c"]);
        let (a, c) = (list[0].id, list[2].id);

        assert!(move_before(&mut list, c, Some(a)));
        assert_eq!(names(&list), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_move_before_none_goes_to_end() {
        let mut list = tasks(&["a", "b", "c"]);
        let a = list[0].id;

        assert!(move_before(&mut list, a, None));
        assert_eq!(names(&list), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_before_noops() {
        let mut list = tasks(&["a", "b", "c"]);
        let (a, b, c) = (list[0].id, list[1].id, list[2].id);

        assert!(!move_before(&mut list, a, Some(a)));
        assert!(!move_before(&mut list, a, Some(b)));
        assert!(!move_before(&mut list, c, None));
        assert!(!move_before(&mut list, TaskId::new(), Some(a)));
        assert_eq!(names(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_before_missing_target_goes_to_end() {
        let mut list = tasks(&["a", "b", "c"]);
        let a = list[0].id;

        assert!(move_before(&mut list, a, Some(TaskId::new())));
        assert_eq!(names(&list), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_drop_target_picks_nearest_midpoint_below() {
        let list = tasks(&["a", "b", "c", "d"]);
        let boxes = rows(&list);
        let dragged = list[0].id;

        // Midpoints at 5, 15, 25, 35
        assert_eq!(drop_target(&boxes, dragged, 12.0), Some(list[1].id));
        assert_eq!(drop_target(&boxes, dragged, 16.0), Some(list[2].id));
        assert_eq!(drop_target(&boxes, dragged, 30.0), Some(list[3].id));
    }

    #[test]
    fn test_drop_target_past_last_midpoint_is_end() {
        let list = tasks(&["a", "b", "c"]);
        let boxes = rows(&list);

        assert_eq!(drop_target(&boxes, list[0].id, 25.0), None);
        assert_eq!(drop_target(&boxes, list[0].id, 100.0), None);
    }

    #[test]
    fn test_drop_target_skips_dragged_row() {
        let list = tasks(&["a", "b", "c"]);
        let boxes = rows(&list);

        // Pointer above b's midpoint, but b is the one being dragged
        assert_eq!(drop_target(&boxes, list[1].id, 12.0), Some(list[2].id));
    }
}
