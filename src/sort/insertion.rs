//! Insertion sort

use super::Comparator;
use crate::errors::RtResult;

/// Stable in-place sort of `items[left..=right]`
///
/// Each element moves left past every predecessor that compares strictly
/// greater, so equal elements keep their order.
pub fn insertion_sort_range<T, C>(items: &mut [T], left: usize, right: usize, cmp: &mut C) -> RtResult<()>
where
    C: Comparator<T>,
{
    if items.is_empty() || right >= items.len() {
        return Ok(());
    }
    for i in left + 1..=right {
        let mut j = i;
        while j > left && cmp.gt(&items[j - 1], &items[i])? {
            j -= 1;
        }
        items[j..=i].rotate_right(1);
    }
    Ok(())
}

pub fn insertion_sort<T, C: Comparator<T>>(items: &mut [T], cmp: &mut C) -> RtResult<()> {
    if items.len() < 2 {
        return Ok(());
    }
    let right = items.len() - 1;
    insertion_sort_range(items, 0, right, cmp)
}

#[cfg(test)]
mod tests {
    use super::super::NaturalOrder;
    use super::*;

    #[test]
    fn test_sub_range_only() {
        let mut data = [9, 4, 3, 2, 1, 0];
        insertion_sort_range(&mut data, 1, 4, &mut NaturalOrder).unwrap();
        assert_eq!(data, [9, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_trivial_inputs() {
        let mut empty: [i32; 0] = [];
        insertion_sort(&mut empty, &mut NaturalOrder).unwrap();
        let mut one = [1];
        insertion_sort(&mut one, &mut NaturalOrder).unwrap();
        assert_eq!(one, [1]);
    }
}
