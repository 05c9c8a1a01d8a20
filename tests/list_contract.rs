// ==============================================
// LIST CONTRACT TESTS (integration)
// ==============================================
//
// Cross-backend behavior: the wraparound index contract, merge/join
// round-trips, sort correctness, and the shared `List<T>` interface that
// both the two-link and the XOR-link backends implement.

use listkit::ds::{LinkedList, XorList};
use listkit::traits::List;

// ==============================================
// Shared List<T> interface
// ==============================================

fn exercise_list_contract<L: List<i32> + Default>() {
    let mut list = L::default();
    assert!(list.is_empty());
    assert_eq!(list.at(0), 0); // empty list yields the default value
    assert_eq!(list.delete(0), None);

    list.push_back(2);
    list.push_back(3);
    list.push_front(1);
    assert_eq!(list.len(), 3);

    // Wraparound contract: at(n) == at(0), at(-1) == at(n-1), at(-n) == at(0)
    let n = list.len() as isize;
    assert_eq!(list.at(n), list.at(0));
    assert_eq!(list.at(-1), list.at(n - 1));
    assert_eq!(list.at(-n), list.at(0));
    assert_eq!(list.at(0), 1);
    assert_eq!(list.at(-1), 3);

    assert_eq!(list.delete(1), Some(2));
    assert_eq!(list.len(), 2);

    list.shrink(1);
    assert_eq!(list.len(), 1);
    assert_eq!(list.at(0), 1);

    assert_eq!(list.pop_front(), Some(1));
    assert_eq!(list.pop_back(), None);

    list.push_back(9);
    list.clear();
    assert!(list.is_empty());
}

#[test]
fn linked_backend_satisfies_list_contract() {
    exercise_list_contract::<LinkedList<i32>>();
}

#[test]
fn xor_backend_satisfies_list_contract() {
    exercise_list_contract::<XorList<i32>>();
}

#[test]
fn backends_agree_on_an_operation_sequence() {
    let mut linked: LinkedList<i32> = LinkedList::new();
    let mut xored: XorList<i32> = XorList::new();

    for value in 0..20 {
        if value % 3 == 0 {
            linked.push_front(value);
            xored.push_front(value);
        } else {
            linked.push_back(value);
            xored.push_back(value);
        }
    }
    for index in [-5isize, 0, 7, 13] {
        assert_eq!(linked.delete(index), xored.delete(index));
    }
    linked.shrink(10);
    xored.shrink(10);

    let linked_values: Vec<i32> = linked.iter().copied().collect();
    let xored_values: Vec<i32> = xored.iter().copied().collect();
    assert_eq!(linked_values, xored_values);
}

// ==============================================
// Merge / Join round-trip
// ==============================================

#[test]
fn merge_then_join_round_trip() {
    let a: LinkedList<i32> = [1, 2, 3].into_iter().collect();
    let b: LinkedList<i32> = [4, 5].into_iter().collect();

    let merged = a.merge(&b);
    assert_eq!(merged.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);

    // Merge is non-destructive.
    assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(b.iter().copied().collect::<Vec<_>>(), vec![4, 5]);

    // Join consumes the argument and produces the same sequence.
    let mut joined = a.merge(&LinkedList::new());
    joined.join(b);
    assert_eq!(joined.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert!(joined.check_invariants().is_ok());
}

// ==============================================
// Sort
// ==============================================

#[test]
fn sort_is_correct_for_assorted_shapes() {
    for items in [
        vec![],
        vec![1],
        vec![2, 1],
        vec![1, 2, 3, 4, 5],
        vec![5, 4, 3, 2, 1],
        vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5],
        vec![7, 7, 7, 7],
    ] {
        let mut list: LinkedList<i32> = items.iter().copied().collect();
        list.sort_by(|a, b| a.cmp(b));

        let mut expected = items.clone();
        expected.sort_unstable();
        assert_eq!(
            list.iter().copied().collect::<Vec<_>>(),
            expected,
            "sorting {:?}",
            items
        );
        assert_eq!(list.len(), items.len());
        assert!(list.check_invariants().is_ok());
    }
}

#[test]
fn sort_with_three_way_comparator_on_structs() {
    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        priority: i32,
        label: &'static str,
    }

    let mut list: LinkedList<Item> = [
        Item { priority: 2, label: "b" },
        Item { priority: 3, label: "c" },
        Item { priority: 1, label: "a" },
    ]
    .into_iter()
    .collect();

    list.sort_by(|x, y| x.priority.cmp(&y.priority));
    let labels: Vec<&str> = list.iter().map(|item| item.label).collect();
    assert_eq!(labels, vec!["a", "b", "c"]);
}

// ==============================================
// Handle lifecycle across structural operations
// ==============================================

#[test]
fn handles_survive_reordering_but_not_removal() {
    let mut list = LinkedList::new();
    let a = list.push_back("a");
    let b = list.push_back("b");
    let c = list.push_back("c");

    // Reordering keeps every handle live.
    list.move_to_front(c);
    assert_eq!(list.get(a), Some(&"a"));
    assert_eq!(list.get(b), Some(&"b"));
    assert_eq!(list.get(c), Some(&"c"));

    // Removal expires exactly the removed handle, even after slot reuse.
    list.remove(b);
    let d = list.push_back("d");
    assert_eq!(list.get(b), None);
    assert!(list.try_get(b).is_err());
    assert_eq!(list.get(d), Some(&"d"));
    assert_eq!(list.len(), 3);
}

#[test]
fn shrink_expires_handles_of_trailing_nodes() {
    let mut list = LinkedList::new();
    let handles: Vec<_> = (0..6).map(|i| list.push_back(i)).collect();

    list.shrink(2);
    assert!(list.contains_handle(handles[0]));
    assert!(list.contains_handle(handles[1]));
    for &stale in &handles[2..] {
        assert!(!list.contains_handle(stale));
        assert!(!list.move_to_front(stale));
    }
    assert!(list.check_invariants().is_ok());
}
