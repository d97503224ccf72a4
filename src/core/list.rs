//! # List Engine
//!
//! Pure transformations over the ordered book list. Every function borrows
//! the current list and returns a new one; nothing here mutates caller state,
//! performs I/O, or fails. Invalid requests (unknown id, blank title, no
//! sibling to swap with, nothing to un-nest from) return the input unchanged.
//!
//! ## Positional hierarchy
//!
//! Nesting lives in the flat order. A subtree is an item plus the run of
//! immediately following items with a strictly greater `level`:
//!
//! ```text
//! idx  level  title
//! 0    0      A        ┐ subtree(0) = 0..2
//! 1    1      B        ┘
//! 2    0      C        ] subtree(2) = 2..3
//! ```
//!
//! Sibling moves relocate whole subtrees so that run stays contiguous.

use log::debug;

use crate::core::book::{Book, MAX_LEVEL, Priority};

/// Direction for `move_by_sibling`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SiblingDirection {
    Up,
    Down,
}

/// Direction for `change_depth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthDirection {
    Right,
    Left,
}

/// Keyboard move: up/down reorder, right/left nest and un-nest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Right,
    Left,
}

fn position(books: &[Book], id: &str) -> Option<usize> {
    books.iter().position(|b| b.id == id)
}

/// Append a book titled `title` with a fresh UUID.
///
/// Returns the new list and the new id, or the input and `None` when the
/// title is blank.
pub fn insert_book(books: &[Book], title: &str) -> (Vec<Book>, Option<String>) {
    insert_book_with_id(books, title, uuid::Uuid::new_v4().to_string())
}

/// Same as `insert_book` with a caller-chosen id. An id already in the list
/// is rejected like a blank title.
pub fn insert_book_with_id(books: &[Book], title: &str, id: String) -> (Vec<Book>, Option<String>) {
    let title = title.trim();
    if title.is_empty() || position(books, &id).is_some() {
        return (books.to_vec(), None);
    }

    let mut book = Book::new(id.clone(), title);
    if let Some(last) = books.last() {
        book.level = last.level.min(MAX_LEVEL);
        if book.level == MAX_LEVEL {
            book.priority = Priority::Unspecified;
        }
    }

    let mut out = books.to_vec();
    out.push(book);
    (out, Some(id))
}

/// Remove the book with `id` and purge it from every `next_books`.
pub fn remove_book(books: &[Book], id: &str) -> Vec<Book> {
    books
        .iter()
        .filter(|b| b.id != id)
        .cloned()
        .map(|mut b| {
            b.next_books.retain(|next| next != id);
            b
        })
        .collect()
}

/// Flip High/Unspecified, only for a top-level book.
pub fn toggle_priority(books: &[Book], id: &str) -> Vec<Book> {
    books
        .iter()
        .cloned()
        .map(|mut b| {
            if b.id == id && b.level == 0 {
                b.priority = b.priority.toggled();
            }
            b
        })
        .collect()
}

/// Toggle `candidate_id` in the `next_books` of `parent_id`.
///
/// Removal always succeeds; adding an id that names no book is ignored so
/// references never dangle. Cycles are not checked.
pub fn set_next_relation(books: &[Book], parent_id: &str, candidate_id: &str) -> Vec<Book> {
    let candidate_exists = position(books, candidate_id).is_some();
    books
        .iter()
        .cloned()
        .map(|mut b| {
            if b.id == parent_id {
                if b.next_books.iter().any(|n| n == candidate_id) {
                    b.next_books.retain(|n| n != candidate_id);
                } else if candidate_exists {
                    b.next_books.push(candidate_id.to_string());
                }
            }
            b
        })
        .collect()
}

/// Index range of the subtree rooted at `index`: the item plus every
/// immediately following item with a greater level.
pub fn subtree_range(books: &[Book], index: usize) -> std::ops::Range<usize> {
    let Some(root) = books.get(index) else {
        return index..index;
    };
    let end = books[index + 1..]
        .iter()
        .position(|b| b.level <= root.level)
        .map(|offset| index + 1 + offset)
        .unwrap_or(books.len());
    index..end
}

fn previous_sibling(books: &[Book], index: usize) -> Option<usize> {
    let level = books[index].level;
    (0..index).rev().find(|&i| books[i].level == level)
}

fn next_sibling(books: &[Book], index: usize) -> Option<usize> {
    let level = books[index].level;
    (index + 1..books.len()).find(|&i| books[i].level == level)
}

/// Move the subtree rooted at `id` past its nearest same-level neighbour.
///
/// Up lands the subtree directly before the previous sibling; down lands it
/// directly after the next sibling's subtree. Levels and relations are
/// untouched.
pub fn move_by_sibling(books: &[Book], id: &str, direction: SiblingDirection) -> Vec<Book> {
    let Some(index) = position(books, id) else {
        return books.to_vec();
    };
    let moving = subtree_range(books, index);

    match direction {
        SiblingDirection::Up => {
            let Some(target) = previous_sibling(books, index) else {
                return books.to_vec();
            };
            debug!("Moving {} ({:?}) up before index {}", id, moving, target);
            let mut out = Vec::with_capacity(books.len());
            out.extend_from_slice(&books[..target]);
            out.extend_from_slice(&books[moving.clone()]);
            out.extend_from_slice(&books[target..moving.start]);
            out.extend_from_slice(&books[moving.end..]);
            out
        }
        SiblingDirection::Down => {
            let Some(target) = next_sibling(books, index) else {
                return books.to_vec();
            };
            let landing = subtree_range(books, target);
            debug!("Moving {} ({:?}) down after {:?}", id, moving, landing);
            let mut out = Vec::with_capacity(books.len());
            out.extend_from_slice(&books[..moving.start]);
            out.extend_from_slice(&books[moving.end..landing.end]);
            out.extend_from_slice(&books[moving.clone()]);
            out.extend_from_slice(&books[landing.end..]);
            out
        }
    }
}

/// Nest (right) or un-nest (left) the single book `id`.
///
/// Right makes the preceding book the parent: level becomes
/// `min(parent.level + 1, MAX_LEVEL)`, nested books lose their priority, and
/// the parent's `next_books` gains `id`. Left drops one level and removes
/// `id` from whichever book lists it. Descendants keep their levels.
pub fn change_depth(books: &[Book], id: &str, direction: DepthDirection) -> Vec<Book> {
    let Some(index) = position(books, id) else {
        return books.to_vec();
    };
    let mut out = books.to_vec();

    match direction {
        DepthDirection::Right => {
            if index == 0 {
                return out;
            }
            let parent = index - 1;
            let level = out[parent].level.saturating_add(1).min(MAX_LEVEL);

            let book = &mut out[index];
            book.level = level;
            if level == MAX_LEVEL {
                book.priority = Priority::Unspecified;
            }

            let parent = &mut out[parent];
            if !parent.next_books.iter().any(|n| n == id) {
                parent.next_books.push(id.to_string());
            }
        }
        DepthDirection::Left => {
            if out[index].level == 0 {
                return out;
            }
            out[index].level -= 1;
            match out.iter_mut().find(|b| b.next_books.iter().any(|n| n == id)) {
                Some(parent) => parent.next_books.retain(|n| n != id),
                None => debug!("Un-nested {} without a structural parent", id),
            }
        }
    }

    out
}

/// Keyboard entry point: Alt+arrow on a book.
pub fn move_book(books: &[Book], id: &str, direction: MoveDirection) -> Vec<Book> {
    match direction {
        MoveDirection::Up => move_by_sibling(books, id, SiblingDirection::Up),
        MoveDirection::Down => move_by_sibling(books, id, SiblingDirection::Down),
        MoveDirection::Right => change_depth(books, id, DepthDirection::Right),
        MoveDirection::Left => change_depth(books, id, DepthDirection::Left),
    }
}

/// Bring stored books back within the nesting rules: levels above
/// `MAX_LEVEL` are clamped and nested books lose their priority.
pub fn normalize_levels(books: Vec<Book>) -> Vec<Book> {
    books
        .into_iter()
        .map(|mut b| {
            if b.level > MAX_LEVEL {
                debug!("Clamping level {} of {}", b.level, b.id);
                b.level = MAX_LEVEL;
            }
            if b.is_nested() {
                b.priority = Priority::Unspecified;
            }
            b
        })
        .collect()
}

/// High-priority books, in list order.
pub fn high_priority_view(books: &[Book]) -> Vec<Book> {
    books
        .iter()
        .filter(|b| b.priority == Priority::High)
        .cloned()
        .collect()
}

/// Replace the notes of `id`. Whitespace-only notes clear the field.
pub fn update_notes(books: &[Book], id: &str, notes: &str) -> Vec<Book> {
    let notes = (!notes.trim().is_empty()).then(|| notes.to_string());
    books
        .iter()
        .cloned()
        .map(|mut b| {
            if b.id == id {
                b.notes = notes.clone();
            }
            b
        })
        .collect()
}

/// Append `url` (trimmed) to the links of `id`.
pub fn add_link(books: &[Book], id: &str, url: &str) -> Vec<Book> {
    let url = url.trim();
    if url.is_empty() {
        return books.to_vec();
    }
    books
        .iter()
        .cloned()
        .map(|mut b| {
            if b.id == id {
                b.links.get_or_insert_with(Vec::new).push(url.to_string());
            }
            b
        })
        .collect()
}

/// Drop the link at `index` from `id`. An emptied list becomes `None`.
pub fn remove_link(books: &[Book], id: &str, index: usize) -> Vec<Book> {
    books
        .iter()
        .cloned()
        .map(|mut b| {
            if b.id == id
                && let Some(links) = b.links.as_mut()
                && index < links.len()
            {
                links.remove(index);
                if links.is_empty() {
                    b.links = None;
                }
            }
            b
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, level: u8) -> Book {
        let mut b = Book::new(id, id.to_uppercase());
        b.level = level;
        if level > 0 {
            b.priority = Priority::Unspecified;
        }
        b
    }

    fn ids(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.id.as_str()).collect()
    }

    fn find<'a>(books: &'a [Book], id: &str) -> &'a Book {
        books.iter().find(|b| b.id == id).unwrap()
    }

    fn assert_nested_books_unprioritized(books: &[Book]) {
        for b in books {
            if b.level == 1 {
                assert_eq!(b.priority, Priority::Unspecified, "{} is nested", b.id);
            }
        }
    }

    // -- insert ----------------------------------------------------------

    #[test]
    fn test_insert_into_empty_list() {
        let (books, id) = insert_book(&[], "  Dune  ");
        let id = id.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, id);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].level, 0);
        assert_eq!(books[0].priority, Priority::High);
    }

    #[test]
    fn test_insert_blank_title_is_identity() {
        let start = vec![book("a", 0)];
        for title in ["", "   ", "\t\n"] {
            let (books, id) = insert_book(&start, title);
            assert_eq!(books, start);
            assert!(id.is_none());
        }
    }

    #[test]
    fn test_insert_after_nested_book_inherits_level() {
        let start = vec![book("a", 0), book("b", 1)];
        let (books, _) = insert_book_with_id(&start, "c", "c".to_string());
        let c = find(&books, "c");
        assert_eq!(c.level, 1);
        assert_eq!(c.priority, Priority::Unspecified);
        assert_nested_books_unprioritized(&books);
    }

    #[test]
    fn test_insert_after_top_level_book_stays_top_level() {
        let start = vec![book("a", 0)];
        let (books, _) = insert_book_with_id(&start, "b", "b".to_string());
        assert_eq!(find(&books, "b").level, 0);
        assert_eq!(find(&books, "b").priority, Priority::High);
    }

    #[test]
    fn test_insert_with_existing_id_is_rejected() {
        let start = vec![book("a", 0)];
        let (books, id) = insert_book_with_id(&start, "again", "a".to_string());
        assert_eq!(books, start);
        assert!(id.is_none());
    }

    #[test]
    fn test_insert_generates_distinct_ids() {
        let (books, first) = insert_book(&[], "one");
        let (_, second) = insert_book(&books, "two");
        assert_ne!(first, second);
    }

    #[test]
    fn test_insert_then_remove_restores_list() {
        let start = vec![book("a", 0), book("b", 1), book("c", 0)];
        let (books, id) = insert_book(&start, "X");
        let restored = remove_book(&books, &id.unwrap());
        assert_eq!(restored, start);
    }

    // -- remove ----------------------------------------------------------

    #[test]
    fn test_remove_purges_references() {
        let mut p = book("p", 0);
        p.next_books = vec!["a".to_string(), "z".to_string()];
        let start = vec![p, book("a", 0), book("z", 0)];

        let books = remove_book(&start, "a");
        assert_eq!(ids(&books), vec!["p", "z"]);
        assert_eq!(find(&books, "p").next_books, vec!["z".to_string()]);
    }

    #[test]
    fn test_remove_unknown_id_is_identity() {
        let start = vec![book("a", 0)];
        assert_eq!(remove_book(&start, "nope"), start);
        assert!(remove_book(&[], "nope").is_empty());
    }

    // -- priority --------------------------------------------------------

    #[test]
    fn test_toggle_priority_flips_top_level() {
        let start = vec![book("a", 0)];
        let books = toggle_priority(&start, "a");
        assert_eq!(books[0].priority, Priority::Unspecified);
        let books = toggle_priority(&books, "a");
        assert_eq!(books[0].priority, Priority::High);
    }

    #[test]
    fn test_toggle_priority_ignores_nested_until_unnested() {
        let start = vec![book("a", 0), book("b", 1)];
        let books = toggle_priority(&start, "b");
        assert_eq!(books, start);

        let books = change_depth(&books, "b", DepthDirection::Left);
        let books = toggle_priority(&books, "b");
        assert_eq!(find(&books, "b").priority, Priority::High);
    }

    #[test]
    fn test_toggle_priority_unknown_id_is_identity() {
        let start = vec![book("a", 0)];
        assert_eq!(toggle_priority(&start, "zzz"), start);
    }

    // -- next relation ---------------------------------------------------

    #[test]
    fn test_set_next_relation_toggles() {
        let start = vec![book("a", 0), book("b", 0)];
        let books = set_next_relation(&start, "a", "b");
        assert_eq!(find(&books, "a").next_books, vec!["b".to_string()]);
        let books = set_next_relation(&books, "a", "b");
        assert!(find(&books, "a").next_books.is_empty());
    }

    #[test]
    fn test_set_next_relation_rejects_unknown_candidate() {
        let start = vec![book("a", 0)];
        assert_eq!(set_next_relation(&start, "a", "ghost"), start);
    }

    #[test]
    fn test_set_next_relation_removes_dangling_entry() {
        let mut a = book("a", 0);
        a.next_books = vec!["ghost".to_string()];
        let books = set_next_relation(&[a], "a", "ghost");
        assert!(books[0].next_books.is_empty());
    }

    #[test]
    fn test_set_next_relation_allows_cycles() {
        let start = vec![book("a", 0), book("b", 0)];
        let books = set_next_relation(&start, "a", "b");
        let books = set_next_relation(&books, "b", "a");
        assert_eq!(find(&books, "b").next_books, vec!["a".to_string()]);
    }

    // -- subtree ---------------------------------------------------------

    #[test]
    fn test_subtree_range() {
        let books = vec![book("a", 0), book("b", 1), book("c", 1), book("d", 0)];
        assert_eq!(subtree_range(&books, 0), 0..3);
        assert_eq!(subtree_range(&books, 1), 1..2);
        assert_eq!(subtree_range(&books, 3), 3..4);
        assert_eq!(subtree_range(&books, 9), 9..9);
    }

    // -- sibling moves ---------------------------------------------------

    #[test]
    fn test_move_up_jumps_over_previous_subtree() {
        let start = vec![book("a", 0), book("b", 1), book("c", 0)];
        let books = move_by_sibling(&start, "c", SiblingDirection::Up);
        assert_eq!(ids(&books), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_move_up_carries_own_subtree() {
        let start = vec![book("a", 0), book("b", 0), book("b1", 1), book("b2", 1)];
        let books = move_by_sibling(&start, "b", SiblingDirection::Up);
        assert_eq!(ids(&books), vec!["b", "b1", "b2", "a"]);
    }

    #[test]
    fn test_move_down_lands_after_sibling_subtree() {
        let start = vec![
            book("a", 0),
            book("a1", 1),
            book("b", 0),
            book("b1", 1),
            book("c", 0),
        ];
        let books = move_by_sibling(&start, "a", SiblingDirection::Down);
        assert_eq!(ids(&books), vec!["b", "b1", "a", "a1", "c"]);
    }

    #[test]
    fn test_move_nested_book_within_parent() {
        let start = vec![book("a", 0), book("x", 1), book("y", 1), book("b", 0)];
        let books = move_by_sibling(&start, "y", SiblingDirection::Up);
        assert_eq!(ids(&books), vec!["a", "y", "x", "b"]);
        let books = move_by_sibling(&books, "y", SiblingDirection::Down);
        assert_eq!(ids(&books), vec!["a", "x", "y", "b"]);
    }

    #[test]
    fn test_move_without_sibling_is_identity() {
        let start = vec![book("a", 0), book("b", 0)];
        assert_eq!(move_by_sibling(&start, "a", SiblingDirection::Up), start);
        assert_eq!(move_by_sibling(&start, "b", SiblingDirection::Down), start);
        assert_eq!(move_by_sibling(&start, "zzz", SiblingDirection::Down), start);
        assert!(move_by_sibling(&[], "a", SiblingDirection::Up).is_empty());
    }

    #[test]
    fn test_move_preserves_items_and_fields() {
        let mut a = book("a", 0);
        a.next_books = vec!["a1".to_string()];
        let start = vec![a, book("a1", 1), book("b", 0), book("b1", 1), book("b2", 1)];
        for id in ["a", "a1", "b", "b1", "b2"] {
            for dir in [SiblingDirection::Up, SiblingDirection::Down] {
                let books = move_by_sibling(&start, id, dir);
                let mut before = start.clone();
                let mut after = books.clone();
                before.sort_by(|x, y| x.id.cmp(&y.id));
                after.sort_by(|x, y| x.id.cmp(&y.id));
                assert_eq!(before, after, "moving {id} {dir:?}");
            }
        }
    }

    #[test]
    fn test_move_keeps_subtree_order() {
        let start = vec![
            book("a", 0),
            book("b", 0),
            book("b1", 1),
            book("b2", 1),
            book("c", 0),
        ];
        let books = move_by_sibling(&start, "b", SiblingDirection::Down);
        assert_eq!(ids(&books), vec!["a", "c", "b", "b1", "b2"]);
        let books = move_by_sibling(&books, "b", SiblingDirection::Up);
        assert_eq!(ids(&books), vec!["a", "b", "b1", "b2", "c"]);
    }

    // -- depth -----------------------------------------------------------

    #[test]
    fn test_nest_right_links_parent() {
        let start = vec![book("a", 0), book("b", 0)];
        let books = change_depth(&start, "b", DepthDirection::Right);
        let b = find(&books, "b");
        assert_eq!(b.level, 1);
        assert_eq!(b.priority, Priority::Unspecified);
        assert_eq!(find(&books, "a").next_books, vec!["b".to_string()]);
    }

    #[test]
    fn test_nest_right_is_idempotent_at_cap() {
        let start = vec![book("a", 0), book("b", 0)];
        let once = change_depth(&start, "b", DepthDirection::Right);
        let twice = change_depth(&once, "b", DepthDirection::Right);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nest_right_first_item_is_identity() {
        let start = vec![book("a", 0), book("b", 0)];
        assert_eq!(change_depth(&start, "a", DepthDirection::Right), start);
    }

    #[test]
    fn test_unnest_left_unlinks_parent() {
        let start = vec![book("a", 0), book("b", 0)];
        let nested = change_depth(&start, "b", DepthDirection::Right);
        let books = change_depth(&nested, "b", DepthDirection::Left);
        assert_eq!(find(&books, "b").level, 0);
        assert!(find(&books, "a").next_books.is_empty());
        // Nesting dropped the priority; un-nesting does not restore it.
        assert_eq!(find(&books, "b").priority, Priority::Unspecified);
    }

    #[test]
    fn test_unnest_without_parent_only_changes_level() {
        let start = vec![book("a", 0), book("b", 1)];
        let books = change_depth(&start, "b", DepthDirection::Left);
        assert_eq!(find(&books, "b").level, 0);
        assert!(find(&books, "a").next_books.is_empty());
    }

    #[test]
    fn test_unnest_top_level_is_identity() {
        let start = vec![book("a", 0)];
        assert_eq!(change_depth(&start, "a", DepthDirection::Left), start);
    }

    #[test]
    fn test_depth_change_leaves_descendants() {
        let start = vec![book("a", 0), book("b", 0), book("c", 1)];
        let books = change_depth(&start, "b", DepthDirection::Right);
        assert_eq!(find(&books, "c").level, 1);
        assert_eq!(ids(&books), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_nest_under_out_of_range_level_stays_at_cap() {
        let start: Vec<Book> = serde_json::from_str(
            r#"[{"id":"a","title":"A","level":255},{"id":"b","title":"B"}]"#,
        )
        .unwrap();
        let books = change_depth(&start, "b", DepthDirection::Right);
        let b = find(&books, "b");
        assert_eq!(b.level, MAX_LEVEL);
        assert_eq!(b.priority, Priority::Unspecified);
    }

    #[test]
    fn test_normalize_levels_clamps_and_unprioritizes() {
        let mut deep = Book::new("b", "B");
        deep.level = 255;
        let mut nested = Book::new("c", "C");
        nested.level = 1;
        let books = normalize_levels(vec![book("a", 0), deep, nested]);

        assert_eq!(find(&books, "a").priority, Priority::High);
        assert_eq!(find(&books, "b").level, MAX_LEVEL);
        assert_eq!(find(&books, "c").level, 1);
        assert_nested_books_unprioritized(&books);
    }

    #[test]
    fn test_move_book_dispatch_keeps_invariant() {
        let mut books = Vec::new();
        for id in ["a", "b", "c", "d"] {
            books = insert_book_with_id(&books, id, id.to_string()).0;
        }
        let script = [
            ("b", MoveDirection::Right),
            ("c", MoveDirection::Right),
            ("c", MoveDirection::Up),
            ("d", MoveDirection::Up),
            ("b", MoveDirection::Left),
            ("a", MoveDirection::Down),
        ];
        for (id, dir) in script {
            books = move_book(&books, id, dir);
            assert_nested_books_unprioritized(&books);
            assert_eq!(books.len(), 4);
        }
    }

    // -- views and details -----------------------------------------------

    #[test]
    fn test_high_priority_view_keeps_order() {
        let mut c = book("c", 0);
        c.priority = Priority::Unspecified;
        let start = vec![book("a", 0), book("b", 1), c, book("d", 0)];
        assert_eq!(ids(&high_priority_view(&start)), vec!["a", "d"]);
        assert!(high_priority_view(&[]).is_empty());
    }

    #[test]
    fn test_update_notes_and_clear() {
        let start = vec![book("a", 0)];
        let books = update_notes(&start, "a", "reread chapter 3");
        assert_eq!(books[0].notes.as_deref(), Some("reread chapter 3"));
        let books = update_notes(&books, "a", "   ");
        assert!(books[0].notes.is_none());
    }

    #[test]
    fn test_links_add_and_remove() {
        let start = vec![book("a", 0)];
        let books = add_link(&start, "a", " https://example.com ");
        let books = add_link(&books, "a", "https://example.org");
        let books = add_link(&books, "a", "  ");
        assert_eq!(books[0].links(), ["https://example.com", "https://example.org"]);

        let books = remove_link(&books, "a", 5);
        assert_eq!(books[0].links().len(), 2);
        let books = remove_link(&books, "a", 0);
        let books = remove_link(&books, "a", 0);
        assert!(books[0].links.is_none());
    }
}
