use super::*;

fn sorted(mut v: Vec<&str>) -> Vec<&str> {
    v.sort_by(|a, b| alphanumeric_cmp(a, b));
    v
}

#[test]
fn numbers_compare_by_value() {
    assert_eq!(
        sorted(vec!["Name_10", "Name_2", "Name_1"]),
        vec!["Name_1", "Name_2", "Name_10"]
    );
    assert_eq!(alphanumeric_cmp("a9b", "a10b"), Ordering::Less);
}

#[test]
fn leading_zeros_break_ties_only() {
    assert_eq!(alphanumeric_cmp("x_01", "x_2"), Ordering::Less);
    assert_eq!(alphanumeric_cmp("x_1", "x_01"), Ordering::Less);
}

#[test]
fn letters_ignore_case_with_lowercase_first() {
    assert_eq!(alphanumeric_cmp("apple", "Banana"), Ordering::Less);
    assert_eq!(alphanumeric_cmp("abc", "Abc"), Ordering::Less);
}

#[test]
fn separators_sort_before_letters_and_digits() {
    assert_eq!(alphanumeric_cmp("a_b", "ab"), Ordering::Less);
    assert_eq!(alphanumeric_cmp("a1", "ab"), Ordering::Less);
}

#[test]
fn standalone_hex_runs_compare_by_value() {
    assert_eq!(
        sorted(vec!["AlmostRed_FFA0", "AlmostRed_FF9F"]),
        vec!["AlmostRed_FF9F", "AlmostRed_FFA0"]
    );
}

#[test]
fn prefix_sorts_first() {
    assert_eq!(alphanumeric_cmp("Shape", "ShapeVisual"), Ordering::Less);
    assert_eq!(alphanumeric_cmp("", "a"), Ordering::Less);
}

#[test]
fn order_is_total() {
    let names = [
        "a", "A", "a1", "a01", "a_1", "a-1", "a10", "aa", "FF", "ff", "0x", "x0", "FFaa", "é", "E",
    ];
    for a in names {
        assert_eq!(alphanumeric_cmp(a, a), Ordering::Equal);
        for b in names {
            assert_eq!(alphanumeric_cmp(a, b), alphanumeric_cmp(b, a).reverse(), "{a} {b}");
            if a != b {
                assert_ne!(alphanumeric_cmp(a, b), Ordering::Equal, "{a} {b}");
            }
            for c in names {
                if alphanumeric_cmp(a, b) == Ordering::Less
                    && alphanumeric_cmp(b, c) == Ordering::Less
                {
                    assert_eq!(alphanumeric_cmp(a, c), Ordering::Less, "{a} {b} {c}");
                }
            }
        }
    }
}
