use super::*;

fn sum_to(n: u64, acc: u64) -> Trampoline<'static, u64> {
    if n == 0 {
        Trampoline::complete(acc)
    } else {
        Trampoline::intermediate(move || sum_to(n - 1, acc + n))
    }
}

#[test]
fn test_complete_is_returned_immediately() {
    let t = Trampoline::complete(7);
    assert!(t.is_complete());
    assert_eq!(t.compute(), 7);
}

#[test]
fn test_intermediate_is_driven() {
    let t = sum_to(10, 0);
    assert!(!t.is_complete());
    assert_eq!(t.compute(), 55);
}

#[test]
fn test_million_steps_do_not_grow_the_stack() {
    // Direct recursion this deep would overflow the default stack
    assert_eq!(sum_to(1_000_000, 0).compute(), 500_000_500_000);
}

#[test]
fn test_borrowing_thunks() {
    fn count_until(data: &[u8], needle: u8, index: usize) -> Trampoline<'_, Option<usize>> {
        match data.get(index) {
            None => Trampoline::complete(None),
            Some(b) if *b == needle => Trampoline::complete(Some(index)),
            Some(_) => Trampoline::intermediate(move || count_until(data, needle, index + 1)),
        }
    }

    let data = vec![1u8; 200_000];
    let mut with_needle = data.clone();
    with_needle.push(9);
    assert_eq!(count_until(&data, 9, 0).compute(), None);
    assert_eq!(count_until(&with_needle, 9, 0).compute(), Some(200_000));
}

#[test]
fn test_debug_output() {
    assert_eq!(format!("{:?}", Trampoline::<u8>::complete(1)), "Complete(1)");
    assert_eq!(format!("{:?}", sum_to(3, 0)), "Intermediate(..)");
}
