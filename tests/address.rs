use sigread::{apply_offset, ADDRESS_MAX};

#[test]
fn test_apply_offset() {
    assert_eq!(apply_offset(1, 1), Some(2));
    assert_eq!(apply_offset(1, -1), Some(0));
    assert_eq!(apply_offset(0x1000, -0x10), Some(0xff0));
    assert_eq!(apply_offset(ADDRESS_MAX, 0), Some(ADDRESS_MAX));
    assert_eq!(apply_offset(ADDRESS_MAX, -1), Some(ADDRESS_MAX - 1));
}

#[test]
fn test_apply_offset_overflow() {
    assert_eq!(apply_offset(ADDRESS_MAX, 1), None);
    assert_eq!(apply_offset(1, -2), None);
    assert_eq!(apply_offset(0, isize::MIN), None);
    assert_eq!(apply_offset(ADDRESS_MAX, isize::MAX), None);
}

#[test]
fn test_apply_offset_extremes() {
    let half = isize::MAX as usize;

    assert_eq!(apply_offset(half + 1, isize::MIN), Some(0));
    assert_eq!(apply_offset(half + 1, isize::MAX), Some(ADDRESS_MAX));
}
