/// Alphabetic label of the `index`-th node in breadth-first order: `A`..`Z`, `AA`..`AZ`, `BA`, ...
/// This is bijective base-26, so there is no "zero" digit and every index has exactly one label.
pub fn label(index: usize) -> String {
    let mut digits = Vec::new();
    let mut rest = index + 1;
    while rest > 0 {
        rest -= 1;
        digits.push(b'A' + (rest % 26) as u8);
        rest /= 26;
    }
    digits.iter().rev().map(|&d| d as char).collect()
}
